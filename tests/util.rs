#![allow(dead_code)]

use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::ec::{Asn1Flag, EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::x509::extension::{
    BasicConstraints, ExtendedKeyUsage, KeyUsage, SubjectAlternativeName,
};
use openssl::x509::{X509, X509Extension, X509NameBuilder};

pub const SERIAL: &str = "1234567890123456789012345";
pub const NOT_BEFORE: i64 = 1_700_000_000;
pub const NOT_AFTER: i64 = 1_800_000_000;

/// SEC1 `EC PRIVATE KEY` PEM on the named curve.
pub fn ec_key_pem(curve: Nid) -> String {
    let mut group = EcGroup::from_curve_name(curve).unwrap();
    group.set_asn1_flag(Asn1Flag::NAMED_CURVE);
    let key = EcKey::generate(&group).unwrap();
    String::from_utf8(key.private_key_to_pem().unwrap()).unwrap()
}

/// PKCS#1 `RSA PRIVATE KEY` PEM.
pub fn rsa_key_pem(bits: u32) -> String {
    let key = Rsa::generate(bits).unwrap();
    String::from_utf8(key.private_key_to_pem().unwrap()).unwrap()
}

pub enum FixtureKey {
    Rsa,
    EcP256,
}

fn fixture_key(kind: &FixtureKey) -> PKey<Private> {
    match kind {
        FixtureKey::Rsa => PKey::from_rsa(Rsa::generate(2048).unwrap()).unwrap(),
        FixtureKey::EcP256 => {
            let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
            PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap()
        }
    }
}

/// Self-signed v3 server certificate carrying SAN, key usage, extended key
/// usage, authority information access and basic constraints.
#[allow(deprecated)]
pub fn server_certificate_pem(kind: FixtureKey, is_ca: bool) -> String {
    let key = fixture_key(&kind);

    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_nid(Nid::COUNTRYNAME, "US").unwrap();
    name.append_entry_by_nid(Nid::ORGANIZATIONNAME, "Example Corp").unwrap();
    name.append_entry_by_nid(Nid::ORGANIZATIONALUNITNAME, "Platform").unwrap();
    name.append_entry_by_nid(Nid::ORGANIZATIONALUNITNAME, "Edge").unwrap();
    name.append_entry_by_nid(Nid::COMMONNAME, "server.example.com").unwrap();
    let name = name.build();

    let mut builder = X509::builder().unwrap();
    builder.set_version(2).unwrap();
    let serial = BigNum::from_dec_str(SERIAL).unwrap();
    builder
        .set_serial_number(&serial.to_asn1_integer().unwrap())
        .unwrap();
    builder.set_subject_name(&name).unwrap();
    builder.set_issuer_name(&name).unwrap();
    builder.set_pubkey(&key).unwrap();
    builder
        .set_not_before(&Asn1Time::from_unix(NOT_BEFORE).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::from_unix(NOT_AFTER).unwrap())
        .unwrap();

    let mut basic = BasicConstraints::new();
    basic.critical();
    if is_ca {
        basic.ca();
    }
    builder.append_extension(basic.build().unwrap()).unwrap();

    builder
        .append_extension(
            KeyUsage::new()
                .critical()
                .digital_signature()
                .key_encipherment()
                .build()
                .unwrap(),
        )
        .unwrap();

    builder
        .append_extension(
            ExtendedKeyUsage::new()
                .server_auth()
                .client_auth()
                .other("1.3.6.1.5.5.7.3.5")
                .time_stamping()
                .build()
                .unwrap(),
        )
        .unwrap();

    let san = SubjectAlternativeName::new()
        .dns("server.example.com")
        .dns("www.example.com")
        .email("ops@example.com")
        .ip("192.0.2.1")
        .uri("https://example.com/service")
        .build(&builder.x509v3_context(None, None))
        .unwrap();
    builder.append_extension(san).unwrap();

    let aia = X509Extension::new_nid(
        None,
        Some(&builder.x509v3_context(None, None)),
        Nid::INFO_ACCESS,
        "OCSP;URI:http://ocsp.example.com,caIssuers;URI:http://ca.example.com/ca.crt",
    )
    .unwrap();
    builder.append_extension(aia).unwrap();

    builder.sign(&key, MessageDigest::sha256()).unwrap();
    String::from_utf8(builder.build().to_pem().unwrap()).unwrap()
}

/// Minimal v1 certificate without extensions.
pub fn bare_certificate_pem() -> String {
    bare_certificate_with_serial("7")
}

/// Minimal v1 certificate with the given decimal serial, which may be negative.
pub fn bare_certificate_with_serial(serial: &str) -> String {
    let key = fixture_key(&FixtureKey::EcP256);
    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_nid(Nid::COMMONNAME, "bare.example.com").unwrap();
    let name = name.build();

    let mut builder = X509::builder().unwrap();
    builder.set_version(0).unwrap();
    builder
        .set_serial_number(&BigNum::from_dec_str(serial).unwrap().to_asn1_integer().unwrap())
        .unwrap();
    builder.set_subject_name(&name).unwrap();
    builder.set_issuer_name(&name).unwrap();
    builder.set_pubkey(&key).unwrap();
    builder
        .set_not_before(&Asn1Time::from_unix(NOT_BEFORE).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::from_unix(NOT_AFTER).unwrap())
        .unwrap();
    builder.sign(&key, MessageDigest::sha384()).unwrap();
    String::from_utf8(builder.build().to_pem().unwrap()).unwrap()
}

/// Hex-encoded JSON request document for the `csr` command.
pub fn csr_request_hex(key_pem: &str) -> String {
    let doc = serde_json::json!({
        "Subject": {
            "Country": ["US"],
            "Organization": ["Example Corp"],
            "OrganizationalUnit": ["Platform"],
            "StreetAddress": ["1 Main Street"],
            "PostalCode": ["94105"],
            "CommonName": "csr.example.com"
        },
        "San": {
            "DNSNames": ["csr.example.com", "alt.example.com"],
            "EmailAddresses": ["admin@example.com"]
        },
        "Key": key_pem
    });
    hex::encode(doc.to_string())
}
