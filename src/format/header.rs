//! Record header
//!
//! The three fixed-width fields that prefix every record.

use bytes::{Buf, BufMut};

use crate::error::{CaskError, Result};

/// Header size: timestamp (4) + key size (4) + value size (4)
pub const HEADER_SIZE: usize = 12;

/// Decoded record header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Unix seconds at the time of the write
    pub timestamp: u32,

    /// Byte length of the UTF-8 key
    pub key_size: u32,

    /// Byte length of the UTF-8 value
    pub value_size: u32,
}

impl Header {
    pub fn new(timestamp: u32, key_size: u32, value_size: u32) -> Self {
        Self {
            timestamp,
            key_size,
            value_size,
        }
    }

    /// Build the header for a key/value pair, checking both lengths fit in u32
    pub fn for_entry(timestamp: u32, key: &[u8], value: &[u8]) -> Result<Self> {
        Ok(Self {
            timestamp,
            key_size: checked_len("key", key.len())?,
            value_size: checked_len("value", value.len())?,
        })
    }

    /// Bytes following the header (key + value)
    pub fn body_len(&self) -> u64 {
        self.key_size as u64 + self.value_size as u64
    }

    /// Total on-disk length of the record this header describes
    pub fn record_len(&self) -> u64 {
        HEADER_SIZE as u64 + self.body_len()
    }

    /// Append the 12 header bytes to `buf`
    pub fn encode_into<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(self.timestamp);
        buf.put_u32_le(self.key_size);
        buf.put_u32_le(self.value_size);
    }

    /// Encode into a fixed-size array
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        self.encode_into(&mut &mut out[..]);
        out
    }
}

/// Encode a header from its raw fields
pub fn encode_header(timestamp: u32, key_size: u32, value_size: u32) -> [u8; HEADER_SIZE] {
    Header::new(timestamp, key_size, value_size).encode()
}

/// Decode exactly `HEADER_SIZE` bytes into a header
///
/// Used by replay to learn how many bytes to consume next without touching
/// the key and value.
pub fn decode_header(bytes: &[u8]) -> Result<Header> {
    if bytes.len() != HEADER_SIZE {
        return Err(CaskError::MalformedHeader(format!(
            "invalid header size: {} bytes, expected {}",
            bytes.len(),
            HEADER_SIZE
        )));
    }

    let mut buf = bytes;
    Ok(Header {
        timestamp: buf.get_u32_le(),
        key_size: buf.get_u32_le(),
        value_size: buf.get_u32_le(),
    })
}

fn checked_len(field: &'static str, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| CaskError::SizeOverflow { field, len })
}
