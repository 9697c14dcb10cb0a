//! Store implementation
//!
//! Owns the data file, the append cursor and the KeyDir.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::config::{Config, SyncStrategy};
use crate::error::{CaskError, Result};
use crate::format::{decode_value, encode_record, HEADER_SIZE};

use super::replay::{replay, ReplayStats};
use super::{KeyDir, KeyEntry};

/// A single-file Bitcask store
///
/// ## Lifecycle
/// `open` replays the log and returns a ready store. `close` syncs and drops
/// the file handle; every later call fails with `StoreClosed`. A failed append
/// closes the store the same way.
///
/// ## Concurrency
/// All operations take `&self`. The file, cursor and KeyDir share one mutex:
/// - Sets are serialized, keeping cursor and index entry consistent
/// - A get sees an entry only once its append and index update both finished
///
/// Typical usage:
///
/// ```no_run
/// use caskkv::Store;
///
/// let store = Store::open("books.db")?;
/// store.set("othello", "shakespeare")?;
/// assert_eq!(store.get("othello")?.as_deref(), Some("shakespeare"));
/// store.close()?;
/// # Ok::<(), caskkv::CaskError>(())
/// ```
#[derive(Debug)]
pub struct Store {
    /// Store configuration
    config: Config,

    /// Statistics from the replay performed by `open`
    replay_stats: ReplayStats,

    /// Open state; `None` once closed
    inner: Mutex<Option<OpenState>>,
}

/// Everything guarded by the store mutex
#[derive(Debug)]
struct OpenState {
    /// Data file, opened read + append
    file: File,

    /// Offset of the next append (always the file length)
    cursor: u64,

    /// Index of live keys
    keydir: KeyDir,

    /// Appends since the last fsync
    unsynced_writes: usize,
}

impl Store {
    /// Open or create a store at `path` with default config
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(Config::with_path(path.as_ref()))
    }

    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Validate config
    /// 2. Open/create the data file (never truncated)
    /// 3. Replay the whole file into a fresh KeyDir
    /// 4. Ready to serve requests
    pub fn open_with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(config.create_if_missing)
            .open(&config.path)?;

        let len = file.metadata()?.len();
        let (keydir, replay_stats) = replay(&file, len, config.replay_buffer_size)?;

        tracing::info!(
            path = %config.path.display(),
            records = replay_stats.records_replayed,
            live_keys = replay_stats.live_keys,
            bytes = replay_stats.bytes_replayed,
            "store opened"
        );

        Ok(Self {
            inner: Mutex::new(Some(OpenState {
                file,
                cursor: replay_stats.bytes_replayed,
                keydir,
                unsynced_writes: 0,
            })),
            config,
            replay_stats,
        })
    }

    /// Get the value for a key
    ///
    /// Returns:
    /// - `Ok(Some(value))` — key is live
    /// - `Ok(None)` — key was never written
    ///
    /// A failed read at an indexed offset is an error, not a miss: the index
    /// says the bytes exist.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self.inner.lock();
        let state = guard.as_ref().ok_or(CaskError::StoreClosed)?;

        let Some(entry) = state.keydir.get(key) else {
            return Ok(None);
        };

        let mut buf = vec![0u8; entry.value_size as usize];
        read_exact_at(&state.file, &mut buf, entry.value_offset)?;

        decode_value(buf).map(Some)
    }

    /// Set a key-value pair
    ///
    /// Steps:
    /// 1. Encode the record with the current unix time, taken under the lock
    ///    so file order and timestamp order agree
    /// 2. Append it in one write call
    /// 3. Point the key at the new value
    /// 4. Apply the sync strategy
    ///
    /// A failed or short append may leave bytes at the tail, so the cursor no
    /// longer matches the file. The store is closed on the spot and every later
    /// call fails with `StoreClosed`; reopening replays the log and reports the
    /// torn record.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self.inner.lock();
        let state = guard.as_mut().ok_or(CaskError::StoreClosed)?;

        let timestamp = unix_timestamp();
        let data = encode_record(timestamp, key, value)?;

        if let Err(e) = append_record(&mut state.file, &data) {
            tracing::error!(
                path = %self.config.path.display(),
                cursor = state.cursor,
                error = %e,
                "append failed, closing store"
            );
            guard.take();
            return Err(e);
        }

        let value_offset = state.cursor + HEADER_SIZE as u64 + key.len() as u64;
        // Length already checked against u32 by the encoder.
        let entry = KeyEntry::new(timestamp, value_offset, value.len() as u32);
        state.keydir.insert(key, entry);
        state.cursor += data.len() as u64;

        tracing::debug!(key, offset = value_offset, len = data.len(), "record appended");

        state.unsynced_writes += 1;
        let due = match self.config.sync_strategy {
            SyncStrategy::Never => false,
            SyncStrategy::EveryWrite => true,
            SyncStrategy::EveryNWrites { count } => state.unsynced_writes >= count,
        };
        if due {
            state.sync()?;
        }

        Ok(())
    }

    /// Force buffered appends to disk
    pub fn sync(&self) -> Result<()> {
        let mut guard = self.inner.lock();
        let state = guard.as_mut().ok_or(CaskError::StoreClosed)?;
        state.sync()
    }

    /// Close the store
    ///
    /// Syncs the file and releases the handle and the index. The store is
    /// closed even if the final sync fails.
    pub fn close(&self) -> Result<()> {
        let state = self.inner.lock().take().ok_or(CaskError::StoreClosed)?;

        tracing::debug!(
            path = %self.config.path.display(),
            cursor = state.cursor,
            live_keys = state.keydir.len(),
            "closing store"
        );

        state.file.sync_all()?;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Whether `key` is live
    pub fn contains_key(&self, key: &str) -> Result<bool> {
        self.with_keydir(|keydir| keydir.contains_key(key))
    }

    /// Index metadata for `key`
    pub fn entry(&self, key: &str) -> Result<Option<KeyEntry>> {
        self.with_keydir(|keydir| keydir.get(key))
    }

    /// Number of live keys
    pub fn len(&self) -> Result<usize> {
        self.with_keydir(KeyDir::len)
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.with_keydir(KeyDir::is_empty)
    }

    /// All live keys, sorted
    pub fn keys(&self) -> Result<Vec<String>> {
        self.with_keydir(KeyDir::keys)
    }

    /// Offset of the next append (the file length), or `None` once closed
    pub fn cursor(&self) -> Option<u64> {
        self.inner.lock().as_ref().map(|state| state.cursor)
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().is_none()
    }

    /// Get the data file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the replay statistics from open
    pub fn replay_stats(&self) -> ReplayStats {
        self.replay_stats
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn with_keydir<T>(&self, f: impl FnOnce(&KeyDir) -> T) -> Result<T> {
        let guard = self.inner.lock();
        let state = guard.as_ref().ok_or(CaskError::StoreClosed)?;
        Ok(f(&state.keydir))
    }
}

impl OpenState {
    fn sync(&mut self) -> Result<()> {
        self.file.sync_data()?;
        self.unsynced_writes = 0;
        Ok(())
    }
}

/// Append `data` with a single write call
///
/// A short write leaves a torn record at the tail; it is reported, never retried.
fn append_record<W: Write>(writer: &mut W, data: &[u8]) -> Result<()> {
    let written = writer.write(data)?;
    if written != data.len() {
        tracing::error!(written, expected = data.len(), "short append");
        return Err(CaskError::WriteShortfall {
            written,
            expected: data.len(),
        });
    }
    Ok(())
}

/// One positioned read of exactly `buf.len()` bytes at `offset`
#[cfg(unix)]
fn read_exact_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.read_exact_at(buf, offset)
}

#[cfg(windows)]
fn read_exact_at(file: &File, mut buf: &mut [u8], mut offset: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;
    while !buf.is_empty() {
        match file.seek_read(buf, offset) {
            Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
            Ok(n) => {
                buf = &mut buf[n..];
                offset += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Current unix time in seconds, saturating at the u32 limit
fn unix_timestamp() -> u32 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    u32::try_from(secs).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts at most `limit` bytes per write call
    struct ShortWriter {
        limit: usize,
        buf: Vec<u8>,
    }

    impl Write for ShortWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            let n = data.len().min(self.limit);
            self.buf.extend_from_slice(&data[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_append_record_full_write() {
        let mut writer = ShortWriter {
            limit: usize::MAX,
            buf: Vec::new(),
        };
        append_record(&mut writer, b"0123456789abcdef").unwrap();
        assert_eq!(writer.buf, b"0123456789abcdef");
    }

    #[test]
    fn test_append_record_short_write_is_error() {
        let mut writer = ShortWriter {
            limit: 5,
            buf: Vec::new(),
        };
        let err = append_record(&mut writer, b"0123456789abcdef").unwrap_err();
        assert!(matches!(
            err,
            CaskError::WriteShortfall {
                written: 5,
                expected: 16
            }
        ));
    }

    #[test]
    fn test_read_exact_at_ignores_append_position() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(dir.path().join("log"))
            .unwrap();
        file.write_all(b"headerVALUEtail").unwrap();

        let mut buf = [0u8; 5];
        read_exact_at(&file, &mut buf, 6).unwrap();
        assert_eq!(&buf, b"VALUE");

        let mut past_end = [0u8; 8];
        let err = read_exact_at(&file, &mut past_end, 10).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_unix_timestamp_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(unix_timestamp() > 1_577_836_800);
    }

    #[test]
    fn test_store_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Store>();
    }
}
