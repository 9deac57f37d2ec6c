use sha2::{Digest, Sha256, Sha512};

use crate::error::CryptError;
use crate::pem_utils::decode_hex;

/// SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// SHA-512 digest of `data`.
pub fn sha512(data: &[u8]) -> [u8; 64] {
    let mut out = [0u8; 64];
    out.copy_from_slice(&Sha512::digest(data));
    out
}

/// Hex-decode the input and return the lowercase hex SHA-256 digest.
pub fn hash_sha256_hex(hex_input: &str) -> Result<String, CryptError> {
    Ok(hex::encode(sha256(&decode_hex(hex_input)?)))
}

/// Hex-decode the input and return the lowercase hex SHA-512 digest.
pub fn hash_sha512_hex(hex_input: &str) -> Result<String, CryptError> {
    Ok(hex::encode(sha512(&decode_hex(hex_input)?)))
}
