use std::fmt;
use std::str::FromStr;

use const_oid::{AssociatedOid, ObjectIdentifier};
use der::{Decode, Encode};
use ecdsa::signature::hazmat::PrehashSigner;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs1v15::SigningKey as RsaSigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use sec1::{EcParameters, EcPrivateKey};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use sha2::{Digest, Sha256};
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::cert::SignatureAlgorithm;
use crate::error::CryptError;
use crate::pem_utils::der_to_pem;

pub type Result<T> = std::result::Result<T, CryptError>;

/// PEM label of a SEC1 elliptic curve private key.
pub const EC_PRIVATE_KEY_LABEL: &str = "EC PRIVATE KEY";
/// PEM label of a PKCS#1 RSA private key.
pub const RSA_PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";

/// Smallest RSA modulus `generate_rsa` will produce.
pub const MIN_RSA_BITS: usize = 1024;

/// Named curves supported for EC private keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcCurve {
    P224,
    P256,
    P384,
    P521,
}

impl EcCurve {
    pub const ALL: [EcCurve; 4] = [EcCurve::P224, EcCurve::P256, EcCurve::P384, EcCurve::P521];

    /// NIST name of the curve, as reported in key descriptors.
    pub fn name(self) -> &'static str {
        match self {
            EcCurve::P224 => "P-224",
            EcCurve::P256 => "P-256",
            EcCurve::P384 => "P-384",
            EcCurve::P521 => "P-521",
        }
    }

    /// Object identifier of the named curve.
    pub fn oid(self) -> ObjectIdentifier {
        match self {
            EcCurve::P224 => p224::NistP224::OID,
            EcCurve::P256 => p256::NistP256::OID,
            EcCurve::P384 => p384::NistP384::OID,
            EcCurve::P521 => p521::NistP521::OID,
        }
    }

    pub fn from_oid(oid: ObjectIdentifier) -> Option<Self> {
        EcCurve::ALL
            .into_iter()
            .find(|curve| curve.oid() == oid)
    }
}

impl fmt::Display for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EcCurve {
    type Err = String;

    /// Accepts NIST names and the OpenSSL aliases for each curve.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "p-224" | "p224" | "secp224r1" => Ok(EcCurve::P224),
            "p-256" | "p256" | "prime256v1" | "secp256r1" => Ok(EcCurve::P256),
            "p-384" | "p384" | "secp384r1" => Ok(EcCurve::P384),
            "p-521" | "p521" | "secp521r1" => Ok(EcCurve::P521),
            _ => Err(format!("unsupported elliptic curve: {s}")),
        }
    }
}

/// A decoded private key, ready for inspection or signing.
#[derive(Debug, Clone)]
pub enum PrivateKey {
    Rsa(Box<RsaPrivateKey>),
    EcdsaP224(p224::SecretKey),
    EcdsaP256(p256::SecretKey),
    EcdsaP384(p384::SecretKey),
    EcdsaP521(p521::SecretKey),
}

impl PrivateKey {
    /// Decode a private key from a PEM block, dispatching on its label.
    ///
    /// The label is trusted: an `EC PRIVATE KEY` body must be SEC1 and an
    /// `RSA PRIVATE KEY` body must be PKCS#1. Any other label is rejected.
    pub fn from_pem_block(block: &pem::Pem) -> Result<Self> {
        match block.tag() {
            EC_PRIVATE_KEY_LABEL => Self::from_sec1_der(block.contents()),
            RSA_PRIVATE_KEY_LABEL => Self::from_pkcs1_der(block.contents()),
            other => Err(CryptError::UnsupportedKeyType(other.to_string())),
        }
    }

    /// Decode a SEC1 `ECPrivateKey`, selecting the curve from its parameters.
    pub fn from_sec1_der(der: &[u8]) -> Result<Self> {
        let parsed = EcPrivateKey::from_der(der)
            .map_err(|e| CryptError::key_parse(EC_PRIVATE_KEY_LABEL, e))?;

        let curve = match parsed.parameters {
            Some(EcParameters::NamedCurve(oid)) => EcCurve::from_oid(oid).ok_or_else(|| {
                CryptError::key_parse(EC_PRIVATE_KEY_LABEL, format!("unknown elliptic curve {oid}"))
            })?,
            None => {
                return Err(CryptError::key_parse(
                    EC_PRIVATE_KEY_LABEL,
                    "missing named curve parameters",
                ));
            }
        };

        let invalid = |e: p256::elliptic_curve::Error| CryptError::key_parse(EC_PRIVATE_KEY_LABEL, e);
        let key = match curve {
            EcCurve::P224 => PrivateKey::EcdsaP224(p224::SecretKey::from_sec1_der(der).map_err(invalid)?),
            EcCurve::P256 => PrivateKey::EcdsaP256(p256::SecretKey::from_sec1_der(der).map_err(invalid)?),
            EcCurve::P384 => PrivateKey::EcdsaP384(p384::SecretKey::from_sec1_der(der).map_err(invalid)?),
            EcCurve::P521 => PrivateKey::EcdsaP521(p521::SecretKey::from_sec1_der(der).map_err(invalid)?),
        };
        Ok(key)
    }

    /// Decode a PKCS#1 `RSAPrivateKey`.
    pub fn from_pkcs1_der(der: &[u8]) -> Result<Self> {
        let private = RsaPrivateKey::from_pkcs1_der(der)?;
        Ok(PrivateKey::Rsa(Box::new(private)))
    }

    /// Generate an RSA key with the given modulus size in bits.
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        if bits < MIN_RSA_BITS {
            return Err(CryptError::KeyGeneration(format!(
                "RSA modulus of {bits} bits is below the {MIN_RSA_BITS}-bit minimum"
            )));
        }
        let mut rng = rand_core::OsRng;
        let private = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| CryptError::KeyGeneration(e.to_string()))?;
        Ok(PrivateKey::Rsa(Box::new(private)))
    }

    /// Generate an EC key on the given curve.
    pub fn generate_ec(curve: EcCurve) -> Self {
        let mut rng = rand_core::OsRng;
        match curve {
            EcCurve::P224 => PrivateKey::EcdsaP224(p224::SecretKey::random(&mut rng)),
            EcCurve::P256 => PrivateKey::EcdsaP256(p256::SecretKey::random(&mut rng)),
            EcCurve::P384 => PrivateKey::EcdsaP384(p384::SecretKey::random(&mut rng)),
            EcCurve::P521 => PrivateKey::EcdsaP521(p521::SecretKey::random(&mut rng)),
        }
    }

    /// Encode the key as PEM, using the same label and format it is read back with.
    ///
    /// EC keys carry their named curve and public point, so the output loads
    /// in [`PrivateKey::from_sec1_der`] and in OpenSSL alike.
    pub fn to_pem(&self) -> Result<String> {
        let pem = match self {
            PrivateKey::Rsa(private) => {
                let doc = private
                    .to_pkcs1_der()
                    .map_err(|e| CryptError::KeyGeneration(e.to_string()))?;
                der_to_pem(doc.as_bytes(), RSA_PRIVATE_KEY_LABEL)
            }
            PrivateKey::EcdsaP224(secret) => sec1_pem(
                EcCurve::P224,
                &secret.to_bytes(),
                secret.public_key().to_encoded_point(false).as_bytes(),
            )?,
            PrivateKey::EcdsaP256(secret) => sec1_pem(
                EcCurve::P256,
                &secret.to_bytes(),
                secret.public_key().to_encoded_point(false).as_bytes(),
            )?,
            PrivateKey::EcdsaP384(secret) => sec1_pem(
                EcCurve::P384,
                &secret.to_bytes(),
                secret.public_key().to_encoded_point(false).as_bytes(),
            )?,
            PrivateKey::EcdsaP521(secret) => sec1_pem(
                EcCurve::P521,
                &secret.to_bytes(),
                secret.public_key().to_encoded_point(false).as_bytes(),
            )?,
        };
        Ok(pem)
    }

    /// Normalized description of the key.
    pub fn descriptor(&self) -> KeyDescriptor {
        match self {
            PrivateKey::Rsa(private) => KeyDescriptor::Rsa {
                modulus: private.size(),
            },
            PrivateKey::EcdsaP224(_) => KeyDescriptor::Ec {
                curve: EcCurve::P224,
            },
            PrivateKey::EcdsaP256(_) => KeyDescriptor::Ec {
                curve: EcCurve::P256,
            },
            PrivateKey::EcdsaP384(_) => KeyDescriptor::Ec {
                curve: EcCurve::P384,
            },
            PrivateKey::EcdsaP521(_) => KeyDescriptor::Ec {
                curve: EcCurve::P521,
            },
        }
    }

    /// Signature algorithm used when this key signs a request.
    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        match self {
            PrivateKey::Rsa(_) => SignatureAlgorithm::Sha256WithRSA,
            PrivateKey::EcdsaP224(_) => SignatureAlgorithm::Sha256WithECDSA,
            PrivateKey::EcdsaP256(_) => SignatureAlgorithm::Sha256WithECDSA,
            PrivateKey::EcdsaP384(_) => SignatureAlgorithm::Sha384WithECDSA,
            PrivateKey::EcdsaP521(_) => SignatureAlgorithm::Sha512WithECDSA,
        }
    }

    /// SubjectPublicKeyInfo of the matching public key.
    pub fn public_key_info(&self) -> Result<SubjectPublicKeyInfoOwned> {
        let spki = match self {
            PrivateKey::Rsa(private) => SubjectPublicKeyInfoOwned::from_key(private.to_public_key()),
            PrivateKey::EcdsaP224(secret) => SubjectPublicKeyInfoOwned::from_key(secret.public_key()),
            PrivateKey::EcdsaP256(secret) => SubjectPublicKeyInfoOwned::from_key(secret.public_key()),
            PrivateKey::EcdsaP384(secret) => SubjectPublicKeyInfoOwned::from_key(secret.public_key()),
            PrivateKey::EcdsaP521(secret) => SubjectPublicKeyInfoOwned::from_key(secret.public_key()),
        };
        spki.map_err(|e| CryptError::CsrGeneration(e.to_string()))
    }

    /// Signs `data` with the algorithm given by [`PrivateKey::signature_algorithm`].
    ///
    /// ECDSA signatures are returned DER-encoded, RSA signatures as the raw
    /// PKCS#1 v1.5 signature block. P-224 keys sign a SHA-256 digest,
    /// truncated to the curve order.
    pub fn sign_data(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            PrivateKey::Rsa(private) => {
                let signing_key: RsaSigningKey<Sha256> = RsaSigningKey::new((**private).clone());
                let signature = signing_key
                    .try_sign(data)
                    .map_err(|e| CryptError::CsrGeneration(e.to_string()))?;
                Ok(signature.to_vec())
            }
            PrivateKey::EcdsaP224(secret) => {
                let signing_key = p224::ecdsa::SigningKey::from(secret);
                let signature: p224::ecdsa::Signature = signing_key
                    .sign_prehash(&Sha256::digest(data))
                    .map_err(|e| CryptError::CsrGeneration(e.to_string()))?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
            PrivateKey::EcdsaP256(secret) => {
                let signing_key = p256::ecdsa::SigningKey::from(secret);
                let signature: p256::ecdsa::Signature = signing_key.sign(data);
                Ok(signature.to_der().as_bytes().to_vec())
            }
            PrivateKey::EcdsaP384(secret) => {
                let signing_key = p384::ecdsa::SigningKey::from(secret);
                let signature: p384::ecdsa::Signature = signing_key.sign(data);
                Ok(signature.to_der().as_bytes().to_vec())
            }
            PrivateKey::EcdsaP521(secret) => {
                let signing_key = p521::ecdsa::SigningKey::from_bytes(&secret.to_bytes())
                    .map_err(|e| CryptError::CsrGeneration(e.to_string()))?;
                let signature: p521::ecdsa::Signature = signing_key.sign(data);
                Ok(signature.to_der().as_bytes().to_vec())
            }
        }
    }
}

/// SEC1 `ECPrivateKey` PEM with named curve parameters and the public point.
fn sec1_pem(curve: EcCurve, private_key: &[u8], public_key: &[u8]) -> Result<String> {
    let der = EcPrivateKey {
        private_key,
        parameters: Some(EcParameters::NamedCurve(curve.oid())),
        public_key: Some(public_key),
    }
    .to_der()
    .map_err(|e| CryptError::KeyGeneration(e.to_string()))?;
    Ok(der_to_pem(&der, EC_PRIVATE_KEY_LABEL))
}

/// Key type and size information reported by `pkinfo`.
///
/// Serialized as the flat record `{Type, Curve, Modulus}`: `Curve` is empty
/// for RSA keys and `Modulus` is zero for EC keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDescriptor {
    Ec { curve: EcCurve },
    /// `modulus` is the key size in bytes.
    Rsa { modulus: usize },
}

impl KeyDescriptor {
    pub fn key_type(&self) -> &'static str {
        match self {
            KeyDescriptor::Ec { .. } => "EC",
            KeyDescriptor::Rsa { .. } => "RSA",
        }
    }
}

impl Serialize for KeyDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let (curve, modulus) = match self {
            KeyDescriptor::Ec { curve } => (curve.name(), 0),
            KeyDescriptor::Rsa { modulus } => ("", *modulus),
        };
        let mut state = serializer.serialize_struct("KeyDescriptor", 3)?;
        state.serialize_field("Type", self.key_type())?;
        state.serialize_field("Curve", curve)?;
        state.serialize_field("Modulus", &modulus)?;
        state.end()
    }
}

/// Decode a private key PEM block.
pub fn decode_private_key(block: &pem::Pem) -> Result<PrivateKey> {
    PrivateKey::from_pem_block(block)
}

/// Decode a hex-encoded PEM private key and describe it.
pub fn private_key_info(hex_input: &str) -> Result<KeyDescriptor> {
    let block = crate::pem_utils::pem_from_hex(hex_input)?;
    Ok(decode_private_key(&block)?.descriptor())
}
