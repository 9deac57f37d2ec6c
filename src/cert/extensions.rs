use std::net::{Ipv4Addr, Ipv6Addr};

use der::{Decode, oid::ObjectIdentifier};
use serde::Serialize;
use x509_cert::ext::pkix::name::GeneralName;

use super::oids;
use super::params::{AuthorityInfoAccess, SubjectAltName};
use crate::error::CryptError;

/// Trait for decoding X.509 extensions into their normalized form.
///
/// # Example
/// ```
/// use cryptkit::cert::extensions::{BasicConstraints, FromX509Extension};
/// // BasicConstraints { cA TRUE }
/// let decoded = BasicConstraints::from_x509_extension_value(&[0x30, 0x03, 0x01, 0x01, 0xff]).unwrap();
/// assert!(decoded.is_ca);
/// ```
pub trait FromX509Extension {
    /// The Object Identifier (OID) for the extension.
    const OID: ObjectIdentifier;

    /// Decodes the extension from a DER-encoded byte slice.
    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CryptError>
    where
        Self: Sized;
}

impl FromX509Extension for SubjectAltName {
    const OID: ObjectIdentifier = oids::SUBJECT_ALT_NAME;

    /// Other name forms (directory names, registered IDs, ...) are ignored.
    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CryptError> {
        let san = x509_cert::ext::pkix::SubjectAltName::from_der(extension)?;
        let mut names = SubjectAltName::default();
        for name in san.0.iter() {
            match name {
                GeneralName::DnsName(dns) => names.dns_names.push(dns.to_string()),
                GeneralName::Rfc822Name(email) => names.email_addresses.push(email.to_string()),
                GeneralName::IpAddress(ip) => names.ip_addresses.push(ip_address_text(ip.as_bytes())?),
                GeneralName::UniformResourceIdentifier(uri) => names.uris.push(uri.to_string()),
                _ => {}
            }
        }
        Ok(names)
    }
}

/// Canonical text of a 4 or 16 byte IP address; IPv4-mapped IPv6 prints as IPv4.
pub fn ip_address_text(bytes: &[u8]) -> Result<String, CryptError> {
    if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
        return Ok(Ipv4Addr::from(octets).to_string());
    }
    if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
        let v6 = Ipv6Addr::from(octets);
        return Ok(match v6.to_ipv4_mapped() {
            Some(v4) => v4.to_string(),
            None => v6.to_string(),
        });
    }
    Err(CryptError::CertificateParse(format!(
        "cannot parse IP address of length {}",
        bytes.len()
    )))
}

impl FromX509Extension for AuthorityInfoAccess {
    const OID: ObjectIdentifier = oids::AUTHORITY_INFO_ACCESS;

    /// Only URI locations are kept.
    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CryptError> {
        let aia = x509_cert::ext::pkix::AuthorityInfoAccessSyntax::from_der(extension)?;
        let mut access = AuthorityInfoAccess::default();
        for description in aia.0.iter() {
            let GeneralName::UniformResourceIdentifier(uri) = &description.access_location else {
                continue;
            };
            match description.access_method {
                oids::AD_OCSP => access.ocsp_server.push(uri.to_string()),
                oids::AD_CA_ISSUERS => access.issuing_certificate_url.push(uri.to_string()),
                _ => {}
            }
        }
        Ok(access)
    }
}

/// Represents the Basic Constraints extension.
///
/// # Fields
/// * `is_ca` - Indicates if the certificate is a CA.
/// * `max_path_length` - The maximum number of intermediate CAs allowed.
#[derive(Debug, Default)]
pub struct BasicConstraints {
    pub is_ca: bool,
    pub max_path_length: Option<u32>,
}

impl FromX509Extension for BasicConstraints {
    const OID: ObjectIdentifier = oids::BASIC_CONSTRAINTS;

    fn from_x509_extension_value(der_bytes: &[u8]) -> Result<Self, CryptError> {
        let bc = x509_cert::ext::pkix::BasicConstraints::from_der(der_bytes)?;
        Ok(Self {
            is_ca: bc.ca,
            max_path_length: bc.path_len_constraint.map(u32::from),
        })
    }
}

/// A single key usage flag.
///
/// The discriminant is the flag's bit position in the KeyUsage bit string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum KeyUsage {
    DigitalSignature = 0,
    ContentCommitment = 1,
    KeyEncipherment = 2,
    DataEncipherment = 3,
    KeyAgreement = 4,
    CertSign = 5,
    #[serde(rename = "CRLSign")]
    CrlSign = 6,
    EncipherOnly = 7,
    DecipherOnly = 8,
}

impl KeyUsage {
    /// Every flag, in bit order. Decoded usages are always reported in this order.
    pub const ALL: [KeyUsage; 9] = [
        KeyUsage::DigitalSignature,
        KeyUsage::ContentCommitment,
        KeyUsage::KeyEncipherment,
        KeyUsage::DataEncipherment,
        KeyUsage::KeyAgreement,
        KeyUsage::CertSign,
        KeyUsage::CrlSign,
        KeyUsage::EncipherOnly,
        KeyUsage::DecipherOnly,
    ];

    pub fn bit(self) -> u16 {
        1 << (self as u8)
    }

    pub fn name(self) -> &'static str {
        match self {
            KeyUsage::DigitalSignature => "DigitalSignature",
            KeyUsage::ContentCommitment => "ContentCommitment",
            KeyUsage::KeyEncipherment => "KeyEncipherment",
            KeyUsage::DataEncipherment => "DataEncipherment",
            KeyUsage::KeyAgreement => "KeyAgreement",
            KeyUsage::CertSign => "CertSign",
            KeyUsage::CrlSign => "CRLSign",
            KeyUsage::EncipherOnly => "EncipherOnly",
            KeyUsage::DecipherOnly => "DecipherOnly",
        }
    }
}

/// Maps a key usage bitmask (bit 0 = DigitalSignature .. bit 8 = DecipherOnly)
/// to the flags it sets, in bit order. Bits above 8 are ignored.
pub fn key_usage_names(bits: u16) -> Vec<KeyUsage> {
    KeyUsage::ALL
        .into_iter()
        .filter(|usage| bits & usage.bit() != 0)
        .collect()
}

/// Raw bits of the Key Usage extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyUsageBits(pub u16);

impl FromX509Extension for KeyUsageBits {
    const OID: ObjectIdentifier = oids::KEY_USAGE;

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CryptError> {
        let ku = x509_cert::ext::pkix::KeyUsage::from_der(extension)?;
        Ok(Self(ku.0.bits()))
    }
}

/// A recognized extended key usage purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExtendedKeyUsageOption {
    Any,
    ServerAuth,
    ClientAuth,
    CodeSigning,
    EmailProtection,
    TimeStamping,
    #[serde(rename = "OCSPSigning")]
    OcspSigning,
}

/// Purposes reported by name, keyed by their index in the extended key usage arc.
const REPORTED_PURPOSES: [(u8, ExtendedKeyUsageOption); 7] = [
    (0, ExtendedKeyUsageOption::Any),
    (1, ExtendedKeyUsageOption::ServerAuth),
    (2, ExtendedKeyUsageOption::ClientAuth),
    (3, ExtendedKeyUsageOption::CodeSigning),
    (4, ExtendedKeyUsageOption::EmailProtection),
    (8, ExtendedKeyUsageOption::TimeStamping),
    (9, ExtendedKeyUsageOption::OcspSigning),
];

/// Index assigned to each well-known purpose OID.
const PURPOSE_INDEX: [(ObjectIdentifier, u8); 14] = [
    (oids::EKU_ANY, 0),
    (oids::EKU_SERVER_AUTH, 1),
    (oids::EKU_CLIENT_AUTH, 2),
    (oids::EKU_CODE_SIGNING, 3),
    (oids::EKU_EMAIL_PROTECTION, 4),
    (oids::EKU_IPSEC_END_SYSTEM, 5),
    (oids::EKU_IPSEC_TUNNEL, 6),
    (oids::EKU_IPSEC_USER, 7),
    (oids::EKU_TIME_STAMPING, 8),
    (oids::EKU_OCSP_SIGNING, 9),
    (oids::EKU_MICROSOFT_SGC, 10),
    (oids::EKU_NETSCAPE_SGC, 11),
    (oids::EKU_MICROSOFT_COMMERCIAL_CODE_SIGNING, 12),
    (oids::EKU_MICROSOFT_KERNEL_CODE_SIGNING, 13),
];

impl ExtendedKeyUsageOption {
    /// Name for a purpose index; indices without a reported name yield `None`.
    pub fn from_index(index: u8) -> Option<Self> {
        REPORTED_PURPOSES
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, usage)| *usage)
    }

    pub fn oid(self) -> ObjectIdentifier {
        match self {
            ExtendedKeyUsageOption::Any => oids::EKU_ANY,
            ExtendedKeyUsageOption::ServerAuth => oids::EKU_SERVER_AUTH,
            ExtendedKeyUsageOption::ClientAuth => oids::EKU_CLIENT_AUTH,
            ExtendedKeyUsageOption::CodeSigning => oids::EKU_CODE_SIGNING,
            ExtendedKeyUsageOption::EmailProtection => oids::EKU_EMAIL_PROTECTION,
            ExtendedKeyUsageOption::TimeStamping => oids::EKU_TIME_STAMPING,
            ExtendedKeyUsageOption::OcspSigning => oids::EKU_OCSP_SIGNING,
        }
    }
}

/// Index of a purpose OID in the extended key usage arc, if it is a known one.
pub fn purpose_index(oid: &ObjectIdentifier) -> Option<u8> {
    PURPOSE_INDEX
        .iter()
        .find(|(known, _)| known == oid)
        .map(|(_, index)| *index)
}

/// Maps purpose indices to names, keeping order and duplicates and dropping
/// indices without a name.
pub fn extended_key_usage_names(indices: impl IntoIterator<Item = u8>) -> Vec<ExtendedKeyUsageOption> {
    indices
        .into_iter()
        .filter_map(ExtendedKeyUsageOption::from_index)
        .collect()
}

/// Represents the Extended Key Usage extension as the purpose OIDs it lists.
#[derive(Debug, Clone, Default)]
pub struct ExtendedKeyUsage {
    pub purposes: Vec<ObjectIdentifier>,
}

impl ExtendedKeyUsage {
    /// Recognized purposes in extension order; unknown OIDs are dropped.
    pub fn usages(&self) -> Vec<ExtendedKeyUsageOption> {
        extended_key_usage_names(self.purposes.iter().filter_map(purpose_index))
    }
}

impl FromX509Extension for ExtendedKeyUsage {
    const OID: ObjectIdentifier = oids::EXTENDED_KEY_USAGE;

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CryptError> {
        let eku = x509_cert::ext::pkix::ExtendedKeyUsage::from_der(extension)?;
        Ok(Self { purposes: eku.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use der::Encode;
    use der::asn1::{Ia5String, OctetString};

    #[test]
    fn test_key_usage_bits_decode_in_bit_order() {
        assert_eq!(
            key_usage_names(0b0_0000_0101),
            vec![KeyUsage::DigitalSignature, KeyUsage::KeyEncipherment]
        );
        assert_eq!(
            key_usage_names(0b1_0110_0000),
            vec![KeyUsage::CertSign, KeyUsage::CrlSign, KeyUsage::DecipherOnly]
        );
        assert!(key_usage_names(0).is_empty());
        assert_eq!(key_usage_names(0x1ff), KeyUsage::ALL.to_vec());
    }

    #[test]
    fn test_key_usage_names_serialize() {
        let json = serde_json::to_string(&key_usage_names(0b0100_0001)).unwrap();
        assert_eq!(json, r#"["DigitalSignature","CRLSign"]"#);
        assert_eq!(KeyUsage::CrlSign.name(), "CRLSign");
    }

    #[test]
    fn test_key_usage_extension_bits() {
        let ext = x509_cert::ext::pkix::KeyUsage(
            x509_cert::ext::pkix::KeyUsages::DigitalSignature
                | x509_cert::ext::pkix::KeyUsages::KeyAgreement,
        );
        let bits = KeyUsageBits::from_x509_extension_value(&ext.to_der().unwrap()).unwrap();
        assert_eq!(
            key_usage_names(bits.0),
            vec![KeyUsage::DigitalSignature, KeyUsage::KeyAgreement]
        );
    }

    #[test]
    fn test_extended_key_usage_index_table() {
        assert_eq!(ExtendedKeyUsageOption::from_index(0), Some(ExtendedKeyUsageOption::Any));
        assert_eq!(
            ExtendedKeyUsageOption::from_index(9),
            Some(ExtendedKeyUsageOption::OcspSigning)
        );
        for skipped in [5, 6, 7, 10, 11, 12, 13, 200] {
            assert_eq!(ExtendedKeyUsageOption::from_index(skipped), None);
        }
    }

    #[test]
    fn test_extended_key_usage_keeps_order_and_duplicates() {
        let names = extended_key_usage_names([2, 5, 1, 2]);
        assert_eq!(
            names,
            vec![
                ExtendedKeyUsageOption::ClientAuth,
                ExtendedKeyUsageOption::ServerAuth,
                ExtendedKeyUsageOption::ClientAuth,
            ]
        );
    }

    #[test]
    fn test_extended_key_usage_drops_unknown_oids() {
        let eku = x509_cert::ext::pkix::ExtendedKeyUsage(vec![
            oids::EKU_TIME_STAMPING,
            ObjectIdentifier::new_unwrap("1.2.3.4.5"),
            oids::EKU_IPSEC_USER,
            oids::EKU_SERVER_AUTH,
        ]);
        let decoded = ExtendedKeyUsage::from_x509_extension_value(&eku.to_der().unwrap()).unwrap();
        assert_eq!(
            decoded.usages(),
            vec![
                ExtendedKeyUsageOption::TimeStamping,
                ExtendedKeyUsageOption::ServerAuth,
            ]
        );
        let json = serde_json::to_string(&decoded.usages()).unwrap();
        assert_eq!(json, r#"["TimeStamping","ServerAuth"]"#);
    }

    #[test]
    fn test_every_reported_purpose_has_matching_oid_index() {
        for (index, usage) in REPORTED_PURPOSES {
            assert_eq!(purpose_index(&usage.oid()), Some(index));
        }
    }

    #[test]
    fn test_subject_alt_name_projection() {
        let san = x509_cert::ext::pkix::SubjectAltName(vec![
            GeneralName::DnsName(Ia5String::try_from("example.com".to_string()).unwrap()),
            GeneralName::IpAddress(OctetString::new(vec![192, 0, 2, 1]).unwrap()),
            GeneralName::Rfc822Name(Ia5String::try_from("ops@example.com".to_string()).unwrap()),
            GeneralName::UniformResourceIdentifier(
                Ia5String::try_from("https://example.com/id".to_string()).unwrap(),
            ),
            GeneralName::IpAddress(
                OctetString::new(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1).octets().to_vec())
                    .unwrap(),
            ),
        ]);
        let decoded = SubjectAltName::from_x509_extension_value(&san.to_der().unwrap()).unwrap();
        assert_eq!(decoded.dns_names, vec!["example.com"]);
        assert_eq!(decoded.email_addresses, vec!["ops@example.com"]);
        assert_eq!(decoded.ip_addresses, vec!["192.0.2.1", "2001:db8::1"]);
        assert_eq!(decoded.uris, vec!["https://example.com/id"]);
    }

    #[test]
    fn test_ip_address_text_forms() {
        let mapped = Ipv4Addr::new(10, 1, 2, 3).to_ipv6_mapped().octets();
        assert_eq!(ip_address_text(&mapped).unwrap(), "10.1.2.3");
        assert!(matches!(
            ip_address_text(&[1, 2, 3]),
            Err(CryptError::CertificateParse(_))
        ));
    }

    #[test]
    fn test_basic_constraints_decoding() {
        let bc = x509_cert::ext::pkix::BasicConstraints {
            ca: true,
            path_len_constraint: Some(2),
        };
        let decoded = BasicConstraints::from_x509_extension_value(&bc.to_der().unwrap()).unwrap();
        assert!(decoded.is_ca);
        assert_eq!(decoded.max_path_length, Some(2));
    }
}
