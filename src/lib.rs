//! # caskkv
//!
//! An embeddable, single-file key-value store on the Bitcask model:
//! - Append-only data file; records are never rewritten in place
//! - In-memory KeyDir mapping each key to its newest value's offset
//! - One disk write per set, one positioned read per get
//! - Full log replay on open to rebuild the KeyDir
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Host / caskkv-cli                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  open / get / set / close
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Store                                 │
//! │           (one mutex: file + cursor + KeyDir)                │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │     KeyDir      │                │  Record Format  │
//!   │ key → (offset,  │                │ 12-byte header  │
//!   │   size, ts)     │                │  + key + value  │
//!   └─────────────────┘                └────────┬────────┘
//!                                               │
//!                                               ▼
//!                                      ┌─────────────────┐
//!                                      │   Data File     │
//!                                      │ (append-only)   │
//!                                      └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod format;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CaskError, Result};
pub use config::{Config, SyncStrategy};
pub use store::{KeyEntry, ReplayStats, Store};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of caskkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
