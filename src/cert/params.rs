use bon::Builder;
use const_oid::ObjectIdentifier;
use der::asn1::{PrintableStringRef, SetOfVec};
use der::{Any, Tag, Tagged};
use serde::{Deserialize, Serialize};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};

use super::oids;
use crate::error::CryptError;

/// Distinguished name components for a certificate subject or issuer.
///
/// Multi-valued components keep the order they appear in the source name.
/// Field names serialize in PascalCase; camelCase is accepted on input.
///
/// # Fields
/// * `country` - The country (C).
/// * `organization` - The organization (O).
/// * `organizational_unit` - The organizational unit (OU).
/// * `street_address` - The street address (STREET).
/// * `postal_code` - The postal code.
/// * `common_name` - The common name (CN).
#[derive(Clone, Debug, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistinguishedName {
    #[builder(default)]
    #[serde(default, alias = "country")]
    pub country: Vec<String>,
    #[builder(default)]
    #[serde(default, alias = "organization")]
    pub organization: Vec<String>,
    #[builder(default)]
    #[serde(default, alias = "organizationalUnit")]
    pub organizational_unit: Vec<String>,
    #[builder(default)]
    #[serde(default, alias = "streetAddress")]
    pub street_address: Vec<String>,
    #[builder(default)]
    #[serde(default, alias = "postalCode")]
    pub postal_code: Vec<String>,
    #[builder(default)]
    #[serde(default, alias = "commonName")]
    pub common_name: String,
}

impl DistinguishedName {
    /// Creates a `DistinguishedName` from an X.509 name.
    ///
    /// Attributes with non-string values are skipped. When the name carries
    /// several common names the last one wins.
    pub fn from_x509_name(x509dn: &Name) -> Self {
        let mut dn = DistinguishedName::default();

        for rdn in x509dn.0.iter() {
            for attr in rdn.0.iter() {
                let Some(value) = attribute_text(&attr.value) else {
                    continue;
                };
                match attr.oid {
                    oids::COUNTRY_NAME => dn.country.push(value),
                    oids::ORGANIZATION_NAME => dn.organization.push(value),
                    oids::ORGANIZATIONAL_UNIT_NAME => dn.organizational_unit.push(value),
                    oids::STREET_ADDRESS => dn.street_address.push(value),
                    oids::POSTAL_CODE => dn.postal_code.push(value),
                    oids::COMMON_NAME => dn.common_name = value,
                    _ => {}
                }
            }
        }

        dn
    }

    /// Converts the distinguished name to an X.509 name.
    ///
    /// Attributes are emitted as C, STREET, POSTALCODE, O, OU, CN. Each
    /// attribute type becomes one RDN holding all of its values, so two
    /// organizational units share a multi-valued RDN. Values inside an RDN
    /// are in DER set order and must be distinct. An empty common name is
    /// left out.
    pub fn as_x509_name(&self) -> Result<Name, CryptError> {
        let common_name: &[String] = if self.common_name.is_empty() {
            &[]
        } else {
            std::slice::from_ref(&self.common_name)
        };
        let components: [(ObjectIdentifier, &[String]); 6] = [
            (oids::COUNTRY_NAME, self.country.as_slice()),
            (oids::STREET_ADDRESS, self.street_address.as_slice()),
            (oids::POSTAL_CODE, self.postal_code.as_slice()),
            (oids::ORGANIZATION_NAME, self.organization.as_slice()),
            (oids::ORGANIZATIONAL_UNIT_NAME, self.organizational_unit.as_slice()),
            (oids::COMMON_NAME, common_name),
        ];
        let rdns = components
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(oid, values)| attribute_rdn(oid, values))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RdnSequence(rdns))
    }
}

fn attribute_rdn(oid: ObjectIdentifier, values: &[String]) -> Result<RelativeDistinguishedName, CryptError> {
    let encode_err = |e: der::Error| CryptError::CsrGeneration(e.to_string());
    let atvs = values
        .iter()
        .map(|value| -> Result<AttributeTypeAndValue, CryptError> {
            // PrintableString where the value allows it, UTF8String otherwise.
            let tag = if PrintableStringRef::new(value).is_ok() {
                Tag::PrintableString
            } else {
                Tag::Utf8String
            };
            Ok(AttributeTypeAndValue {
                oid,
                value: Any::new(tag, value.as_bytes()).map_err(encode_err)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RelativeDistinguishedName(
        SetOfVec::try_from(atvs).map_err(encode_err)?,
    ))
}

/// Text of a directory string attribute value, if it is one.
fn attribute_text(value: &Any) -> Option<String> {
    match value.tag() {
        Tag::Utf8String
        | Tag::PrintableString
        | Tag::Ia5String
        | Tag::TeletexString
        | Tag::VisibleString => String::from_utf8(value.value().to_vec()).ok(),
        Tag::BmpString => {
            let units: Vec<u16> = value
                .value()
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).ok()
        }
        _ => None,
    }
}

/// Subject alternative names carried by a certificate.
///
/// IP addresses and URIs are reported in their canonical text form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SubjectAltName {
    #[serde(rename = "DNSNames")]
    pub dns_names: Vec<String>,
    #[serde(rename = "EmailAddresses")]
    pub email_addresses: Vec<String>,
    #[serde(rename = "IPAddresses")]
    pub ip_addresses: Vec<String>,
    #[serde(rename = "URIs")]
    pub uris: Vec<String>,
}

/// URLs from the Authority Information Access extension.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AuthorityInfoAccess {
    #[serde(rename = "OCSPServer")]
    pub ocsp_server: Vec<String>,
    #[serde(rename = "IssuingCertificateURL")]
    pub issuing_certificate_url: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip_keeps_multi_values() {
        let dn = DistinguishedName::builder()
            .common_name("example.com".to_string())
            .country(vec!["US".to_string()])
            .organization(vec!["Example Corp".to_string(), "Example Holdings".to_string()])
            .street_address(vec!["1 Main Street".to_string()])
            .postal_code(vec!["94105".to_string()])
            .build();

        let name = dn.as_x509_name().unwrap();
        assert_eq!(name.0.len(), 5);
        assert_eq!(DistinguishedName::from_x509_name(&name), dn);
    }

    #[test]
    fn test_repeated_attribute_shares_one_rdn() {
        let dn = DistinguishedName::builder()
            .common_name("edge.example.com".to_string())
            .organizational_unit(vec!["Platform".to_string(), "Edge".to_string()])
            .build();

        let name = dn.as_x509_name().unwrap();
        assert_eq!(name.0.len(), 2);
        let units: Vec<_> = name.0[0].0.iter().collect();
        assert_eq!(units.len(), 2);
        assert!(units.iter().all(|atv| atv.oid == oids::ORGANIZATIONAL_UNIT_NAME));

        let mut decoded = DistinguishedName::from_x509_name(&name).organizational_unit;
        decoded.sort();
        assert_eq!(decoded, vec!["Edge".to_string(), "Platform".to_string()]);
    }

    #[test]
    fn test_name_order_and_string_types() {
        let dn = DistinguishedName::builder()
            .common_name("Zürich Labs".to_string())
            .country(vec!["CH".to_string()])
            .build();

        let name = dn.as_x509_name().unwrap();
        let first = name.0[0].0.iter().next().unwrap();
        let last = name.0[1].0.iter().next().unwrap();
        assert_eq!(first.oid, oids::COUNTRY_NAME);
        assert_eq!(first.value.tag(), Tag::PrintableString);
        assert_eq!(last.oid, oids::COMMON_NAME);
        assert_eq!(last.value.tag(), Tag::Utf8String);
    }

    #[test]
    fn test_empty_common_name_is_omitted() {
        let dn = DistinguishedName::builder()
            .organization(vec!["Example Corp".to_string()])
            .build();
        assert_eq!(dn.as_x509_name().unwrap().0.len(), 1);
    }

    #[test]
    fn test_bmp_string_value_is_decoded() {
        let value = Any::new(Tag::BmpString, [0x00, 0x41, 0x00, 0x42].as_slice()).unwrap();
        assert_eq!(attribute_text(&value), Some("AB".to_string()));

        let not_text = Any::new(Tag::Integer, [0x01].as_slice()).unwrap();
        assert_eq!(attribute_text(&not_text), None);
    }

    #[test]
    fn test_dn_accepts_camel_case_and_defaults() {
        let dn: DistinguishedName =
            serde_json::from_str(r#"{"commonName":"a.example","organization":["A"]}"#).unwrap();
        assert_eq!(dn.common_name, "a.example");
        assert_eq!(dn.organization, vec!["A".to_string()]);
        assert!(dn.country.is_empty());

        let json = serde_json::to_value(&dn).unwrap();
        assert_eq!(json["Country"], serde_json::json!([]));
        assert_eq!(json["CommonName"], "a.example");
    }
}
