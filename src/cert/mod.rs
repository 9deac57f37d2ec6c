pub mod algorithms;
pub mod extensions;
pub mod oids;
pub mod params;

use der::{Any, Decode};
use extensions::{
    BasicConstraints, ExtendedKeyUsage, ExtendedKeyUsageOption, FromX509Extension, KeyUsage,
    KeyUsageBits, key_usage_names,
};
use params::{AuthorityInfoAccess, DistinguishedName, SubjectAltName};
use serde::Serialize;
use time::OffsetDateTime;
use x509_cert::certificate::{CertificateInner, Version};

use crate::error::CryptError;

pub type Result<T> = std::result::Result<T, CryptError>;

/// PEM label of an X.509 certificate.
pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Represents the signature algorithms used to sign certificate requests.
///
/// This enum provides a mapping to the corresponding OIDs for each algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption (PKCS#1 v1.5).
    Sha256WithRSA,
    /// SHA-256 with ECDSA.
    Sha256WithECDSA,
    /// SHA-384 with ECDSA.
    Sha384WithECDSA,
    /// SHA-512 with ECDSA.
    Sha512WithECDSA,
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    /// Converts a `SignatureAlgorithm` into an `AlgorithmIdentifierOwned`.
    ///
    /// RSA carries an explicit NULL parameter; ECDSA omits parameters.
    fn from(value: SignatureAlgorithm) -> Self {
        let (oid, parameters) = match value {
            SignatureAlgorithm::Sha256WithRSA => {
                (const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION, Some(Any::null()))
            }
            SignatureAlgorithm::Sha256WithECDSA => (const_oid::db::rfc5912::ECDSA_WITH_SHA_256, None),
            SignatureAlgorithm::Sha384WithECDSA => (const_oid::db::rfc5912::ECDSA_WITH_SHA_384, None),
            SignatureAlgorithm::Sha512WithECDSA => (const_oid::db::rfc5912::ECDSA_WITH_SHA_512, None),
        };
        x509_cert::spki::AlgorithmIdentifierOwned { oid, parameters }
    }
}

/// Normalized view of an X.509 certificate, as reported by `certinfo`.
///
/// Collections are always present, empty when the certificate lacks the
/// corresponding extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CertificateDescriptor {
    pub subject: DistinguishedName,
    pub san: SubjectAltName,
    pub issuer: DistinguishedName,
    pub authority_information_access: AuthorityInfoAccess,
    #[serde(rename = "IsCA")]
    pub is_ca: bool,
    pub key_usage: Vec<KeyUsage>,
    pub extended_key_usage: Vec<ExtendedKeyUsageOption>,
    /// Unsigned decimal.
    pub serial_number: String,
    pub public_key_algorithm: String,
    pub signature_algorithm: String,
    /// 1-based; a v3 certificate reports 3.
    pub version: u8,
    #[serde(with = "time::serde::rfc3339")]
    pub not_before: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub not_after: OffsetDateTime,
}

/// Represents an X.509 certificate.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Decodes a certificate from a PEM block.
    ///
    /// Only `CERTIFICATE` blocks are accepted.
    pub fn from_pem_block(block: &pem::Pem) -> Result<Self> {
        if block.tag() != CERTIFICATE_LABEL {
            return Err(CryptError::UnsupportedCertificateType(block.tag().to_string()));
        }
        Self::from_der(block.contents())
    }

    /// Decodes a DER-encoded certificate.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = CertificateInner::from_der(der)?;
        Ok(Self { inner })
    }

    /// Projects the certificate into a [`CertificateDescriptor`].
    ///
    /// Fails when a recognized extension cannot be decoded. Unrecognized
    /// extensions are ignored. Nothing is validated.
    pub fn descriptor(&self) -> Result<CertificateDescriptor> {
        let tbs = &self.inner.tbs_certificate;

        let mut san = SubjectAltName::default();
        let mut aia = AuthorityInfoAccess::default();
        let mut is_ca = false;
        let mut key_usage = Vec::new();
        let mut extended_key_usage = Vec::new();

        for ext in tbs.extensions.iter().flatten() {
            let value = ext.extn_value.as_bytes();
            match ext.extn_id {
                SubjectAltName::OID => san = SubjectAltName::from_x509_extension_value(value)?,
                AuthorityInfoAccess::OID => {
                    aia = AuthorityInfoAccess::from_x509_extension_value(value)?
                }
                BasicConstraints::OID => {
                    is_ca = BasicConstraints::from_x509_extension_value(value)?.is_ca
                }
                KeyUsageBits::OID => {
                    key_usage = key_usage_names(KeyUsageBits::from_x509_extension_value(value)?.0)
                }
                ExtendedKeyUsage::OID => {
                    extended_key_usage = ExtendedKeyUsage::from_x509_extension_value(value)?.usages()
                }
                other => tracing::trace!(oid = %other, "skipping extension"),
            }
        }

        let version = match tbs.version {
            Version::V1 => 1,
            Version::V2 => 2,
            Version::V3 => 3,
        };

        Ok(CertificateDescriptor {
            subject: DistinguishedName::from_x509_name(&tbs.subject),
            san,
            issuer: DistinguishedName::from_x509_name(&tbs.issuer),
            authority_information_access: aia,
            is_ca,
            key_usage,
            extended_key_usage,
            serial_number: serial_number_text(tbs.serial_number.as_bytes()),
            public_key_algorithm: algorithms::public_key_algorithm_name(
                &tbs.subject_public_key_info.algorithm.oid,
            ),
            signature_algorithm: algorithms::signature_algorithm_name(
                &self.inner.signature_algorithm,
            ),
            version,
            not_before: OffsetDateTime::from(tbs.validity.not_before.to_system_time()),
            not_after: OffsetDateTime::from(tbs.validity.not_after.to_system_time()),
        })
    }
}

/// Decimal text of a DER INTEGER given as big-endian two's complement.
fn serial_number_text(bytes: &[u8]) -> String {
    let value = rsa::BigUint::from_bytes_be(bytes);
    match bytes.first() {
        Some(first) if first & 0x80 != 0 => {
            let modulus = rsa::BigUint::from(1u8) << (8 * bytes.len());
            format!("-{}", modulus - value)
        }
        _ => value.to_string(),
    }
}

/// Decode a certificate PEM block and project it into a descriptor.
pub fn decode_certificate(block: &pem::Pem) -> Result<CertificateDescriptor> {
    Certificate::from_pem_block(block)?.descriptor()
}

/// Decode a hex-encoded PEM certificate and describe it.
pub fn certificate_info(hex_input: &str) -> Result<CertificateDescriptor> {
    let block = crate::pem_utils::pem_from_hex(hex_input)?;
    decode_certificate(&block)
}
