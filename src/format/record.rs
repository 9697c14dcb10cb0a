//! Full record encoding and decoding

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{CaskError, Result};

use super::header::{decode_header, Header, HEADER_SIZE};

/// A decoded record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Unix seconds at the time of the write
    pub timestamp: u32,

    pub key: String,

    pub value: String,
}

impl Record {
    pub fn new(timestamp: u32, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            timestamp,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Encode this record to bytes
    pub fn encode(&self) -> Result<Bytes> {
        encode_record(self.timestamp, &self.key, &self.value)
    }

    /// On-disk length of this record
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.key.len() + self.value.len()
    }
}

/// Encode a record
///
/// Format: header (12) + key bytes + value bytes
pub fn encode_record(timestamp: u32, key: &str, value: &str) -> Result<Bytes> {
    let header = Header::for_entry(timestamp, key.as_bytes(), value.as_bytes())?;

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + key.len() + value.len());
    header.encode_into(&mut buf);
    buf.put_slice(key.as_bytes());
    buf.put_slice(value.as_bytes());

    Ok(buf.freeze())
}

/// Decode a record from exactly one record's worth of bytes
pub fn decode_record(bytes: &[u8]) -> Result<Record> {
    if bytes.len() < HEADER_SIZE {
        return Err(CaskError::MalformedHeader(format!(
            "record too short: {} bytes, header alone needs {}",
            bytes.len(),
            HEADER_SIZE
        )));
    }

    let header = decode_header(&bytes[..HEADER_SIZE])?;
    if bytes.len() as u64 != header.record_len() {
        return Err(CaskError::MalformedHeader(format!(
            "record length mismatch: header declares {} bytes, buffer holds {}",
            header.record_len(),
            bytes.len()
        )));
    }

    let (key, value) = bytes[HEADER_SIZE..].split_at(header.key_size as usize);

    Ok(Record {
        timestamp: header.timestamp,
        key: std::str::from_utf8(key)?.to_owned(),
        value: std::str::from_utf8(value)?.to_owned(),
    })
}

/// Decode a value read straight from its offset in the data file
pub fn decode_value(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| CaskError::InvalidUtf8(e.utf8_error()))
}
