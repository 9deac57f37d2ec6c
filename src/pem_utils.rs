use crate::error::CryptError;

/// Decode a hex string (one stdin line, surrounding whitespace ignored) into bytes.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, CryptError> {
    Ok(hex::decode(input.trim())?)
}

/// Parse the first PEM block found in `bytes`.
pub fn parse_pem(bytes: &[u8]) -> Result<pem::Pem, CryptError> {
    let block = pem::parse(bytes)?;
    tracing::debug!(label = block.tag(), len = block.contents().len(), "decoded PEM block");
    Ok(block)
}

/// Decode hex input and parse the PEM block it carries.
pub fn pem_from_hex(input: &str) -> Result<pem::Pem, CryptError> {
    parse_pem(&decode_hex(input)?)
}

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(
        &pem,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = "-----BEGIN TEST BLOCK-----\nAQID\n-----END TEST BLOCK-----\n";

    #[test]
    fn test_decode_hex_trims_line() {
        assert_eq!(decode_hex("0a0B\n").unwrap(), vec![0x0a, 0x0b]);
    }

    #[test]
    fn test_decode_hex_rejects_garbage() {
        assert!(matches!(decode_hex("xyz"), Err(CryptError::Decode(_))));
        assert!(matches!(decode_hex("abc"), Err(CryptError::Decode(_))));
    }

    #[test]
    fn test_parse_pem_reads_label_and_body() {
        let block = pem_from_hex(&hex::encode(BLOCK)).unwrap();
        assert_eq!(block.tag(), "TEST BLOCK");
        assert_eq!(block.contents(), &[1, 2, 3]);
    }

    #[test]
    fn test_parse_pem_without_block_is_invalid() {
        let err = parse_pem(b"not a pem document").unwrap_err();
        assert!(matches!(err, CryptError::InvalidPem(_)));
    }

    #[test]
    fn test_der_to_pem_uses_lf() {
        let encoded = der_to_pem(&[1, 2, 3], "TEST BLOCK");
        assert_eq!(encoded, BLOCK);
    }
}
