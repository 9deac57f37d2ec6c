//! Display names for the public key and signature algorithms of a certificate.

use der::asn1::ObjectIdentifier;
use der::{Decode, Encode};
use rsa::pkcs1::RsaPssParams;
use x509_cert::spki::AlgorithmIdentifierOwned;

use super::oids;

/// Name of a subject public key algorithm, or its dotted OID when unknown.
pub fn public_key_algorithm_name(oid: &ObjectIdentifier) -> String {
    let name = match *oid {
        oids::RSA_ENCRYPTION => "RSA",
        oids::DSA => "DSA",
        oids::EC_PUBLIC_KEY => "ECDSA",
        oids::ED25519 => "Ed25519",
        _ => return oid.to_string(),
    };
    name.to_string()
}

/// Name of a certificate signature algorithm, or its dotted OID when unknown.
///
/// RSASSA-PSS is named after the digest in its parameters; only SHA-256,
/// SHA-384 and SHA-512 are recognized.
pub fn signature_algorithm_name(algorithm: &AlgorithmIdentifierOwned) -> String {
    let name = match algorithm.oid {
        oids::MD2_WITH_RSA => "MD2-RSA",
        oids::MD5_WITH_RSA => "MD5-RSA",
        oids::SHA1_WITH_RSA => "SHA1-RSA",
        oids::SHA256_WITH_RSA => "SHA256-RSA",
        oids::SHA384_WITH_RSA => "SHA384-RSA",
        oids::SHA512_WITH_RSA => "SHA512-RSA",
        oids::RSASSA_PSS => match pss_digest(algorithm) {
            Some(oids::SHA256) => "SHA256-RSAPSS",
            Some(oids::SHA384) => "SHA384-RSAPSS",
            Some(oids::SHA512) => "SHA512-RSAPSS",
            _ => return algorithm.oid.to_string(),
        },
        oids::DSA_WITH_SHA1 => "DSA-SHA1",
        oids::DSA_WITH_SHA256 => "DSA-SHA256",
        oids::ECDSA_WITH_SHA1 => "ECDSA-SHA1",
        oids::ECDSA_WITH_SHA256 => "ECDSA-SHA256",
        oids::ECDSA_WITH_SHA384 => "ECDSA-SHA384",
        oids::ECDSA_WITH_SHA512 => "ECDSA-SHA512",
        oids::ED25519 => "Ed25519",
        _ => return algorithm.oid.to_string(),
    };
    name.to_string()
}

fn pss_digest(algorithm: &AlgorithmIdentifierOwned) -> Option<ObjectIdentifier> {
    let params = algorithm.parameters.as_ref()?.to_der().ok()?;
    let pss = RsaPssParams::from_der(&params).ok()?;
    Some(pss.hash.oid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use der::Any;

    fn algorithm(oid: ObjectIdentifier) -> AlgorithmIdentifierOwned {
        AlgorithmIdentifierOwned {
            oid,
            parameters: None,
        }
    }

    #[test]
    fn test_public_key_names() {
        assert_eq!(public_key_algorithm_name(&oids::RSA_ENCRYPTION), "RSA");
        assert_eq!(public_key_algorithm_name(&oids::EC_PUBLIC_KEY), "ECDSA");
        assert_eq!(public_key_algorithm_name(&oids::ED25519), "Ed25519");
        assert_eq!(
            public_key_algorithm_name(&ObjectIdentifier::new_unwrap("1.3.101.110")),
            "1.3.101.110"
        );
    }

    #[test]
    fn test_signature_names() {
        assert_eq!(signature_algorithm_name(&algorithm(oids::SHA256_WITH_RSA)), "SHA256-RSA");
        assert_eq!(signature_algorithm_name(&algorithm(oids::ECDSA_WITH_SHA384)), "ECDSA-SHA384");
        assert_eq!(signature_algorithm_name(&algorithm(oids::DSA_WITH_SHA1)), "DSA-SHA1");
        assert_eq!(
            signature_algorithm_name(&algorithm(ObjectIdentifier::new_unwrap("1.2.3.4"))),
            "1.2.3.4"
        );
    }

    #[test]
    fn test_pss_named_by_digest() {
        let params = RsaPssParams::new::<sha2::Sha384>(48);
        let encoded = Any::from_der(&params.to_der().unwrap()).unwrap();
        let pss = AlgorithmIdentifierOwned {
            oid: oids::RSASSA_PSS,
            parameters: Some(encoded),
        };
        assert_eq!(signature_algorithm_name(&pss), "SHA384-RSAPSS");

        // Missing parameters default to SHA-1, which has no PSS name.
        assert_eq!(
            signature_algorithm_name(&algorithm(oids::RSASSA_PSS)),
            oids::RSASSA_PSS.to_string()
        );
    }
}
