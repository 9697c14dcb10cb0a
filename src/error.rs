//! Error types for caskkv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using CaskError
pub type Result<T> = std::result::Result<T, CaskError>;

/// Unified error type for caskkv operations
#[derive(Debug, Error)]
pub enum CaskError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    #[error("{field} length {len} does not fit in a 32-bit length field")]
    SizeOverflow { field: &'static str, len: usize },

    #[error("Invalid UTF-8 in record: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    // -------------------------------------------------------------------------
    // Log Errors
    // -------------------------------------------------------------------------
    #[error(
        "Truncated record at offset {offset}: expected {expected} bytes, only {available} remain"
    )]
    TruncatedRecord {
        offset: u64,
        expected: u64,
        available: u64,
    },

    #[error("Write shortfall: wrote {written} of {expected} bytes")]
    WriteShortfall { written: usize, expected: usize },

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Store closed")]
    StoreClosed,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
