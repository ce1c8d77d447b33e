//! Non-volatile key-value storage trait
//!
//! Byte-blob persistence keyed by string, used for calibration offset
//! storage. The backing medium (flash page, EEPROM, NVS partition) is a
//! platform concern; this trait only promises that a value written under a
//! key can be read back wholesale.

use crate::platform::Result;

/// Key-value storage interface
///
/// # Semantics
///
/// - Values are opaque byte blobs; the store never interprets them.
/// - `put_bytes` overwrites any existing value wholesale, never merges.
/// - `get_bytes` reports the *stored* length even when the caller's buffer
///   is smaller, so callers can detect size mismatches without trusting the
///   payload.
pub trait KeyValueStorage {
    /// Read the value stored under `key` into `buf`.
    ///
    /// Copies `min(buf.len(), stored_len)` bytes and returns
    /// `Some(stored_len)`, or `None` if no value exists under the key.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Storage` if the backend cannot be read.
    fn get_bytes(&mut self, key: &str, buf: &mut [u8]) -> Result<Option<usize>>;

    /// Store `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Storage` if the backend rejects the write.
    fn put_bytes(&mut self, key: &str, value: &[u8]) -> Result<()>;
}
