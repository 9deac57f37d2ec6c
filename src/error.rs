//! use cryptkit::error::CryptError;

use serde::Serialize;
use thiserror::Error;

/// Represents errors that can occur in the cryptkit library.
///
/// The `Display` text is the low-level cause; [`CryptError::context`] gives the
/// human-readable message that accompanies it in an [`ErrorEnvelope`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptError {
    /// Input was not valid hexadecimal.
    #[error("{0}")]
    Decode(String),

    /// No PEM block could be found in the decoded input.
    #[error("{0}")]
    InvalidPem(String),

    /// The PEM body did not parse as the key type its label declares.
    #[error("{reason}")]
    KeyParse { label: String, reason: String },

    /// The PEM label names a key type this tool does not handle.
    #[error("key block type unsupported: {0}")]
    UnsupportedKeyType(String),

    /// `certinfo` was handed a PEM block that is not a certificate.
    #[error("certificate block type unsupported: {0}")]
    UnsupportedCertificateType(String),

    /// The PEM body did not parse as an X.509 certificate.
    #[error("{0}")]
    CertificateParse(String),

    /// The CSR request document was not valid JSON for the expected schema.
    #[error("{0}")]
    MalformedRequest(String),

    /// Building, signing or encoding a CSR failed.
    #[error("{0}")]
    CsrGeneration(String),

    /// Generating a new private key failed.
    #[error("{0}")]
    KeyGeneration(String),

    /// Output could not be encoded.
    #[error("{0}")]
    Serialization(String),

    /// A random integer could not be produced.
    #[error("{0}")]
    RandomGeneration(String),

    /// Missing or invalid command-line arguments.
    #[error("{0}")]
    Argument(String),
}

impl CryptError {
    /// Human-readable context for the error, reported as `Message`.
    pub fn context(&self) -> String {
        match self {
            CryptError::Decode(_) => "Could not decode hexadecimal argument to string.".into(),
            CryptError::InvalidPem(_) => "Invalid PEM block provided.".into(),
            CryptError::KeyParse { label, .. } => match label.as_str() {
                "EC PRIVATE KEY" => "Could not parse EC private key.".into(),
                "RSA PRIVATE KEY" => "Could not parse RSA private key.".into(),
                other => format!("Could not parse {other}."),
            },
            CryptError::UnsupportedKeyType(_) => "Key block type provided is unsupported.".into(),
            CryptError::UnsupportedCertificateType(_) => {
                "Block type provided is not a certificate.".into()
            }
            CryptError::CertificateParse(_) => "Could not parse x509 certificate.".into(),
            CryptError::MalformedRequest(_) => "Could not parse request document.".into(),
            CryptError::CsrGeneration(_) => "Failed to generate CSR.".into(),
            CryptError::KeyGeneration(_) => "Failed to generate private key.".into(),
            CryptError::Serialization(_) => "Could not marshal output data.".into(),
            CryptError::RandomGeneration(_) => "Could not generate integer.".into(),
            CryptError::Argument(_) => "Invalid command or arguments.".into(),
        }
    }

    /// Wraps a key parser failure for the given PEM label.
    pub fn key_parse(label: &str, reason: impl ToString) -> Self {
        CryptError::KeyParse {
            label: label.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<hex::FromHexError> for CryptError {
    fn from(err: hex::FromHexError) -> Self {
        CryptError::Decode(err.to_string())
    }
}

impl From<pem::PemError> for CryptError {
    fn from(err: pem::PemError) -> Self {
        CryptError::InvalidPem(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for CryptError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        CryptError::key_parse("RSA PRIVATE KEY", err)
    }
}

impl From<der::Error> for CryptError {
    /// Converts a `der::Error` into a `CryptError`.
    fn from(err: der::Error) -> Self {
        CryptError::CertificateParse(err.to_string())
    }
}

impl From<serde_json::Error> for CryptError {
    fn from(err: serde_json::Error) -> Self {
        CryptError::Serialization(err.to_string())
    }
}

/// JSON object printed to stdout when a command fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    #[serde(rename = "Err")]
    pub err: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl From<&CryptError> for ErrorEnvelope {
    fn from(err: &CryptError) -> Self {
        Self {
            err: err.to_string(),
            message: err.context(),
        }
    }
}
