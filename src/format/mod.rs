//! Record Format Module
//!
//! Translates between `(timestamp, key, value)` triples and their on-disk bytes.
//!
//! ## Responsibilities
//! - Fixed 12-byte header encoding (little-endian u32 fields)
//! - Full record encode/decode with exact length checks
//! - Header-only decode for log replay
//!
//! Everything here is a pure function over byte slices; no file access.
//!
//! ## File Format
//! The data file has no header, magic number or trailer. It is a plain
//! concatenation of records in write order.
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Record 1                                                     │
//! │ ┌───────────────┬──────────────┬────────────────┬─────┬─────┐│
//! │ │ Timestamp (4) │ Key Size (4) │ Value Size (4) │ Key │Value││
//! │ └───────────────┴──────────────┴────────────────┴─────┴─────┘│
//! ├──────────────────────────────────────────────────────────────┤
//! │ Record 2                                                     │
//! │ ┌───────────────┬──────────────┬────────────────┬─────┬─────┐│
//! │ │ Timestamp (4) │ Key Size (4) │ Value Size (4) │ Key │Value││
//! │ └───────────────┴──────────────┴────────────────┴─────┴─────┘│
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod header;
mod record;

pub use header::{decode_header, encode_header, Header, HEADER_SIZE};
pub use record::{decode_record, decode_value, encode_record, Record};
