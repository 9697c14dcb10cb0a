//! KeyDir
//!
//! In-memory map from key to the location of its newest value on disk.

use std::collections::HashMap;

/// Location and metadata of a key's newest value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEntry {
    /// Timestamp of the record that wrote this value
    pub timestamp: u32,

    /// Absolute file offset of the first value byte
    pub value_offset: u64,

    /// Value length in bytes
    pub value_size: u32,
}

impl KeyEntry {
    pub fn new(timestamp: u32, value_offset: u64, value_size: u32) -> Self {
        Self {
            timestamp,
            value_offset,
            value_size,
        }
    }
}

/// Index of live keys
///
/// Holds locations only, so memory grows with key count and not data size.
#[derive(Debug, Default)]
pub struct KeyDir {
    entries: HashMap<String, KeyEntry>,
}

impl KeyDir {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `key`, returning the previous one
    pub fn insert(&mut self, key: &str, entry: KeyEntry) -> Option<KeyEntry> {
        // Overwrites are the common case on hot keys; skip the key allocation.
        if let Some(slot) = self.entries.get_mut(key) {
            return Some(std::mem::replace(slot, entry));
        }
        self.entries.insert(key.to_owned(), entry);
        None
    }

    pub fn get(&self, key: &str) -> Option<KeyEntry> {
        self.entries.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All live keys in sorted order
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
