//! Log Replay
//!
//! Rebuilds the KeyDir by reading the data file front to back.

use std::io::{BufReader, Read};

use crate::error::{CaskError, Result};
use crate::format::{decode_header, HEADER_SIZE};

use super::{KeyDir, KeyEntry};

/// Result of a replay pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Records read, including superseded ones
    pub records_replayed: u64,

    /// Distinct keys in the rebuilt index
    pub live_keys: usize,

    /// Bytes consumed; equals the file length after a clean replay
    pub bytes_replayed: u64,
}

/// Replay `len` bytes of log from `reader`
///
/// This will:
/// 1. Decode each 12-byte header
/// 2. Check the declared key and value fit in what is left of the log
/// 3. Validate key and value as UTF-8
/// 4. Point the key at its value, later records overwriting earlier ones
///
/// A partial header or a record running past `len` is a torn write and fails
/// the whole replay with `TruncatedRecord`.
pub fn replay<R: Read>(reader: R, len: u64, buffer_size: usize) -> Result<(KeyDir, ReplayStats)> {
    let mut reader = BufReader::with_capacity(buffer_size, reader);
    let mut keydir = KeyDir::new();
    let mut stats = ReplayStats::default();

    let mut header_buf = [0u8; HEADER_SIZE];
    let mut body = Vec::new();
    let mut offset: u64 = 0;

    while offset < len {
        let remaining = len - offset;
        if remaining < HEADER_SIZE as u64 {
            return Err(truncated(offset, HEADER_SIZE as u64, remaining));
        }

        reader.read_exact(&mut header_buf)?;
        let header = decode_header(&header_buf)?;

        if header.record_len() > remaining {
            return Err(truncated(offset, header.record_len(), remaining));
        }

        body.clear();
        body.resize(header.body_len() as usize, 0);
        reader.read_exact(&mut body)?;

        let (key, value) = body.split_at(header.key_size as usize);
        let key = std::str::from_utf8(key)?;
        std::str::from_utf8(value)?;

        let value_offset = offset + HEADER_SIZE as u64 + header.key_size as u64;
        keydir.insert(
            key,
            KeyEntry::new(header.timestamp, value_offset, header.value_size),
        );

        tracing::trace!(offset, key, value_size = header.value_size, "replayed record");

        offset += header.record_len();
        stats.records_replayed += 1;
    }

    stats.live_keys = keydir.len();
    stats.bytes_replayed = offset;

    Ok((keydir, stats))
}

fn truncated(offset: u64, expected: u64, available: u64) -> CaskError {
    tracing::warn!(
        offset,
        expected,
        available,
        "log ends inside a record, refusing to open"
    );
    CaskError::TruncatedRecord {
        offset,
        expected,
        available,
    }
}
