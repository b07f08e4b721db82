#![cfg(test)]

use pretty_assertions::assert_eq;

use super::base64::{self, DecodeError};

#[test]
fn test_standard_round_trip() {
    assert_eq!(base64::encode("Man"), "TWFu");
    assert_eq!(base64::decode("TWFu").unwrap(), "Man");

    assert_eq!(base64::encode("Ma"), "TWE=");
    assert_eq!(base64::encode("M"), "TQ==");
    assert_eq!(base64::decode("TQ==").unwrap(), "M");
}

#[test]
fn test_empty() {
    let encoded = base64::encode("");
    assert!(encoded.is_empty());
    assert_eq!(encoded.as_bytes_with_nul(), b"\0");
    assert!(base64::decode("").unwrap().is_empty());
}

#[test]
fn test_output_is_exact_and_terminated() {
    let encoded = base64::encode(b"any carnal pleas");
    assert_eq!(encoded, "YW55IGNhcm5hbCBwbGVhcw==");
    assert_eq!(encoded.capacity(), encoded.len());
    assert_eq!(*encoded.as_bytes_with_nul().last().unwrap(), 0);

    let decoded = base64::decode(&encoded).unwrap();
    assert_eq!(decoded, "any carnal pleas");
    assert_eq!(*decoded.as_bytes_with_nul().last().unwrap(), 0);
}

#[test]
fn test_url_safe() {
    let bytes = [0xfb, 0xff, 0xfe];
    assert_eq!(base64::encode(bytes), "+//+");
    assert_eq!(base64::encode_url(bytes), "-__-");
    assert_eq!(base64::decode_url("-__-").unwrap().as_bytes(), &bytes[..]);

    assert_eq!(base64::encode_url("M"), "TQ");
    assert_eq!(base64::decode_url("TQ").unwrap(), "M");
}

#[test]
fn test_binary_round_trip() {
    let bytes: Vec<u8> = (0..=255).collect();
    let decoded = base64::decode(base64::encode(&bytes)).unwrap();
    assert_eq!(decoded.as_bytes(), &bytes[..]);
}

#[test]
fn test_malformed() {
    assert!(matches!(base64::decode("TW*u"), Err(DecodeError::Malformed { .. })));
    assert!(base64::decode("TWF").is_err());
    assert!(base64::decode_url("TQ==").is_err());
    assert!(base64::decode("-__-").is_err());

    let error = base64::decode("TW*u").unwrap_err();
    assert!(error.to_string().starts_with("malformed base64: "));
}
