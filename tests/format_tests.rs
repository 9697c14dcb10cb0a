//! Tests for the record format
//!
//! These tests verify:
//! - Exact byte layout of encoded records
//! - Round-trip encoding for arbitrary UTF-8 (property tests)
//! - Header-only decoding
//! - Malformed buffer rejection

use caskkv::format::{
    decode_header, decode_record, decode_value, encode_header, encode_record, Header, Record,
    HEADER_SIZE,
};
use caskkv::CaskError;
use proptest::prelude::*;

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_encoded_length() {
    let bytes = encode_record(10, "othello", "shakespeare").unwrap();
    assert_eq!(bytes.len(), HEADER_SIZE + 7 + 11);
}

#[test]
fn test_encoded_layout() {
    let bytes = encode_record(1_700_000_000, "key", "value").unwrap();

    assert_eq!(&bytes[0..4], &1_700_000_000u32.to_le_bytes());
    assert_eq!(&bytes[4..8], &3u32.to_le_bytes());
    assert_eq!(&bytes[8..12], &5u32.to_le_bytes());
    assert_eq!(&bytes[12..15], b"key");
    assert_eq!(&bytes[15..], b"value");
}

#[test]
fn test_multibyte_utf8_written_in_full() {
    let key = "日本";
    let value = "crème brûlée 🍮";
    let bytes = encode_record(0, key, value).unwrap();

    let header = decode_header(&bytes[..HEADER_SIZE]).unwrap();
    assert_eq!(header.key_size as usize, key.len());
    assert_eq!(header.value_size as usize, value.len());
    assert_eq!(&bytes[HEADER_SIZE..HEADER_SIZE + key.len()], key.as_bytes());
    assert_eq!(&bytes[HEADER_SIZE + key.len()..], value.as_bytes());
}

#[test]
fn test_empty_key_and_value() {
    let bytes = encode_record(7, "", "").unwrap();
    assert_eq!(bytes.len(), HEADER_SIZE);

    let record = decode_record(&bytes).unwrap();
    assert_eq!(record, Record::new(7, "", ""));
}

#[test]
fn test_record_encode_matches_free_function() {
    let record = Record::new(99, "anna karenina", "tolstoy");
    let bytes = record.encode().unwrap();

    assert_eq!(bytes, encode_record(99, "anna karenina", "tolstoy").unwrap());
    assert_eq!(bytes.len(), record.encoded_len());
}

// =============================================================================
// Header Tests
// =============================================================================

#[test]
fn test_header_lengths() {
    let header = Header::new(0, 3, 5);
    assert_eq!(header.body_len(), 8);
    assert_eq!(header.record_len(), 20);
}

#[test]
fn test_header_for_entry() {
    let header = Header::for_entry(42, b"abc", b"de").unwrap();
    assert_eq!(header, Header::new(42, 3, 2));
    assert_eq!(header.encode(), encode_header(42, 3, 2));
}

#[test]
fn test_decode_header_wrong_size() {
    for len in [0, 1, 11, 13] {
        let buf = vec![0u8; len];
        let result = decode_header(&buf);
        assert!(
            matches!(result, Err(CaskError::MalformedHeader(_))),
            "len {} should be rejected",
            len
        );
    }
}

// =============================================================================
// Malformed Record Tests
// =============================================================================

#[test]
fn test_decode_record_too_short() {
    let result = decode_record(&[1, 2, 3]);
    assert!(matches!(result, Err(CaskError::MalformedHeader(_))));
}

#[test]
fn test_decode_record_truncated_body() {
    let bytes = encode_record(1, "key", "value").unwrap();
    let result = decode_record(&bytes[..bytes.len() - 1]);
    assert!(matches!(result, Err(CaskError::MalformedHeader(_))));
}

#[test]
fn test_decode_record_trailing_bytes() {
    let mut bytes = encode_record(1, "key", "value").unwrap().to_vec();
    bytes.push(0);
    let result = decode_record(&bytes);
    assert!(matches!(result, Err(CaskError::MalformedHeader(_))));
}

#[test]
fn test_decode_record_invalid_utf8() {
    let mut bytes = encode_header(1, 1, 1).to_vec();
    bytes.extend_from_slice(&[b'k', 0xFF]);
    let result = decode_record(&bytes);
    assert!(matches!(result, Err(CaskError::InvalidUtf8(_))));
}

#[test]
fn test_decode_value() {
    assert_eq!(decode_value(b"tolstoy".to_vec()).unwrap(), "tolstoy");
    assert!(matches!(
        decode_value(vec![0xC3]),
        Err(CaskError::InvalidUtf8(_))
    ));
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_record_round_trip(timestamp in any::<u32>(), key in ".*", value in ".*") {
        let bytes = encode_record(timestamp, &key, &value).unwrap();
        prop_assert_eq!(bytes.len(), HEADER_SIZE + key.len() + value.len());

        let record = decode_record(&bytes).unwrap();
        prop_assert_eq!(record, Record::new(timestamp, key, value));
    }

    #[test]
    fn prop_header_round_trip(
        timestamp in any::<u32>(),
        key_size in any::<u32>(),
        value_size in any::<u32>(),
    ) {
        let bytes = encode_header(timestamp, key_size, value_size);
        let header = decode_header(&bytes).unwrap();
        prop_assert_eq!(header, Header::new(timestamp, key_size, value_size));
    }
}
