use der::asn1::{BitString, Ia5String, OctetString, SetOfVec};
use der::{Any, Encode};
use serde::Deserialize;
use x509_cert::attr::Attribute;
use x509_cert::ext::Extension;
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::request::{CertReq, CertReqInfo, ExtensionReq, Version};

use crate::cert::oids;
use crate::cert::params::DistinguishedName;
use crate::error::CryptError;
use crate::key::{PrivateKey, decode_private_key};
use crate::pem_utils::{decode_hex, der_to_pem, parse_pem};

pub type Result<T> = std::result::Result<T, CryptError>;

/// PEM label of a PKCS#10 certificate signing request.
pub const CSR_LABEL: &str = "CERTIFICATE REQUEST";

/// Request document accepted by the `csr` command.
///
/// Keys are accepted in PascalCase or camelCase. `Key` holds the PEM text of
/// an `EC PRIVATE KEY` or `RSA PRIVATE KEY`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CsrRequest {
    #[serde(default, alias = "subject")]
    pub subject: DistinguishedName,
    #[serde(default, alias = "san")]
    pub san: CsrSubjectAltNames,
    #[serde(default, alias = "key")]
    pub key: String,
}

/// Alternative names that may be requested. Other name kinds are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CsrSubjectAltNames {
    #[serde(default, rename = "DNSNames", alias = "dnsNames", alias = "dNSNames")]
    pub dns_names: Vec<String>,
    #[serde(default, rename = "EmailAddresses", alias = "emailAddresses")]
    pub email_addresses: Vec<String>,
}

impl CsrRequest {
    /// Parses a request document from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| CryptError::MalformedRequest(e.to_string()))
    }

    /// Decodes the embedded private key.
    pub fn private_key(&self) -> Result<PrivateKey> {
        decode_private_key(&parse_pem(self.key.as_bytes())?)
    }
}

fn encode_err(err: der::Error) -> CryptError {
    CryptError::CsrGeneration(err.to_string())
}

/// Encodes a subjectAltName extension carrying DNS names then email addresses.
fn subject_alt_name_extension(dns_names: &[String], email_addresses: &[String]) -> Result<Extension> {
    let mut names = Vec::with_capacity(dns_names.len() + email_addresses.len());
    for dns in dns_names {
        names.push(GeneralName::DnsName(Ia5String::new(dns).map_err(encode_err)?));
    }
    for email in email_addresses {
        names.push(GeneralName::Rfc822Name(Ia5String::new(email).map_err(encode_err)?));
    }
    let value = x509_cert::ext::pkix::SubjectAltName(names)
        .to_der()
        .map_err(encode_err)?;
    Ok(Extension {
        extn_id: oids::SUBJECT_ALT_NAME,
        critical: false,
        extn_value: OctetString::new(value).map_err(encode_err)?,
    })
}

/// Builds and signs a PKCS#10 request, returning it PEM-encoded.
///
/// The signature algorithm follows the key: SHA-256 with RSA, or ECDSA with
/// SHA-256 for P-224 and P-256, SHA-384 for P-384 and SHA-512 for P-521. An `extensionRequest` attribute is
/// only added when there is at least one alternative name.
pub fn build_csr(
    subject: &DistinguishedName,
    dns_names: &[String],
    email_addresses: &[String],
    key: &PrivateKey,
) -> Result<String> {
    let attributes = if dns_names.is_empty() && email_addresses.is_empty() {
        SetOfVec::new()
    } else {
        let san = subject_alt_name_extension(dns_names, email_addresses)?;
        let request = Any::encode_from(&ExtensionReq(vec![san])).map_err(encode_err)?;
        let attribute = Attribute {
            oid: oids::EXTENSION_REQUEST,
            values: SetOfVec::try_from(vec![request]).map_err(encode_err)?,
        };
        SetOfVec::try_from(vec![attribute]).map_err(encode_err)?
    };

    let info = CertReqInfo {
        version: Version::V1,
        subject: subject.as_x509_name()?,
        public_key: key.public_key_info()?,
        attributes,
    };

    let signature = key.sign_data(&info.to_der().map_err(encode_err)?)?;
    let request = CertReq {
        info,
        algorithm: key.signature_algorithm().into(),
        signature: BitString::from_bytes(&signature).map_err(encode_err)?,
    };

    let der = request.to_der().map_err(encode_err)?;
    tracing::debug!(len = der.len(), "signed certificate request");
    Ok(der_to_pem(&der, CSR_LABEL))
}

/// Decode a hex-encoded JSON request document and produce a PEM CSR.
pub fn create_csr(hex_input: &str) -> Result<String> {
    let request = CsrRequest::from_json(&decode_hex(hex_input)?)?;
    let key = request.private_key()?;
    build_csr(
        &request.subject,
        &request.san.dns_names,
        &request.san.email_addresses,
        &key,
    )
}
