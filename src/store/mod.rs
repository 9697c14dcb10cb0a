//! Store Module
//!
//! The Bitcask engine: an append-only data file plus an in-memory index.
//!
//! ## Responsibilities
//! - Append encoded records at the end of the data file
//! - Keep the KeyDir pointing at the newest value of every key
//! - Serve reads with one positioned read, no scanning
//! - Rebuild the KeyDir by replaying the whole file on open
//!
//! ## Concurrency Model
//! The file handle, append cursor and KeyDir sit behind a single mutex, so a
//! reader never observes an index entry whose append has not completed. There
//! is no cross-process locking: one store per file.

mod keydir;
mod replay;
mod disk_store;

pub use keydir::{KeyDir, KeyEntry};
pub use replay::{replay, ReplayStats};
pub use disk_store::Store;
