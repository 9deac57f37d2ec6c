//! # cryptkit - Certificate and Key Inspection in Pure Rust
//!
//! cryptkit decodes X.509 certificates and private keys into a stable JSON
//! schema, builds PKCS#10 certificate signing requests, and exposes SHA-2
//! hashing and secure random integers. It is built entirely on the
//! rustcrypto libraries and backs the `cryptkit` command-line tool, whose
//! commands read hex-encoded input and print one JSON document.
//!
//! ## Supported Key Types
//!
//! - **RSA**: PKCS#1 `RSA PRIVATE KEY` blocks
//! - **ECDSA**: SEC1 `EC PRIVATE KEY` blocks on P-224, P-256, P-384 and P-521
//!
//! ## Quick Start
//!
//! ### Describing a Private Key
//!
//! ```rust
//! use cryptkit::key::{EcCurve, KeyDescriptor, PrivateKey, private_key_info};
//!
//! # fn main() -> Result<(), cryptkit::error::CryptError> {
//! let pem = PrivateKey::generate_ec(EcCurve::P256).to_pem()?;
//! let info = private_key_info(&hex::encode(&pem))?;
//! assert_eq!(info, KeyDescriptor::Ec { curve: EcCurve::P256 });
//! assert_eq!(
//!     serde_json::to_string(&info).unwrap(),
//!     r#"{"Type":"EC","Curve":"P-256","Modulus":0}"#
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ### Generating a CSR
//!
//! ```rust
//! use cryptkit::{
//!     cert::params::DistinguishedName,
//!     csr::build_csr,
//!     key::{EcCurve, PrivateKey},
//! };
//!
//! # fn main() -> Result<(), cryptkit::error::CryptError> {
//! let key = PrivateKey::generate_ec(EcCurve::P384);
//! let subject = DistinguishedName::builder()
//!     .common_name("example.com".to_string())
//!     .organization(vec!["Example Corp".to_string()])
//!     .build();
//!
//! let csr = build_csr(&subject, &["example.com".to_string()], &[], &key)?;
//! assert!(csr.starts_with("-----BEGIN CERTIFICATE REQUEST-----"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Decoding Key Usage
//!
//! ```rust
//! use cryptkit::cert::extensions::{KeyUsage, key_usage_names};
//!
//! assert_eq!(
//!     key_usage_names(0b101),
//!     vec![KeyUsage::DigitalSignature, KeyUsage::KeyEncipherment]
//! );
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`error::CryptError`]. Its `Display` text is the
//! low-level cause and [`error::CryptError::context`] the human-readable
//! message; together they form the [`error::ErrorEnvelope`] the binary prints.
//!
//! ```rust
//! use cryptkit::{cert::certificate_info, error::CryptError};
//!
//! match certificate_info("not hex") {
//!     Ok(_) => unreachable!(),
//!     Err(CryptError::Decode(msg)) => println!("bad input: {msg}"),
//!     Err(e) => println!("other error: {e}"),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`pem_utils`]: Hex and PEM input decoding, PEM output
//! - [`key`]: Private key decoding, description, generation and signing
//! - [`cert`]: Certificate decoding, extensions and algorithm names
//! - [`csr`]: Certificate signing request construction
//! - [`hash`]: SHA-256 and SHA-512 digests
//! - [`random`]: Secure random integers
//! - [`command`]: Command-line surface and JSON output records
//! - [`telemetry`]: Log subscriber setup
//! - [`error`]: Error types and the error envelope

pub mod cert;
pub mod command;
pub mod csr;
pub mod error;
pub mod hash;
pub mod key;
pub mod pem_utils;
pub mod random;
pub mod telemetry;
