//! Mock key-value storage for testing
//!
//! In-memory store with a write counter (so tests can assert a persistence
//! write happened exactly once) and write-failure injection.

use crate::platform::{
    error::StorageError,
    traits::KeyValueStorage,
    PlatformError, Result,
};
use heapless::{FnvIndexMap, String, Vec};

/// Maximum key length accepted by the mock
const KEY_CAPACITY: usize = 16;

/// Maximum value length accepted by the mock
const VALUE_CAPACITY: usize = 64;

/// Maximum number of entries (must be a power of two)
const ENTRY_CAPACITY: usize = 4;

/// Mock key-value storage
///
/// # Example
///
/// ```ignore
/// use pico_compass::platform::mock::MockStorage;
/// use pico_compass::platform::traits::KeyValueStorage;
///
/// let mut storage = MockStorage::new();
/// storage.put_bytes("CAL_OFFSETS", &[1, 2, 3]).unwrap();
///
/// let mut buf = [0u8; 3];
/// assert_eq!(storage.get_bytes("CAL_OFFSETS", &mut buf).unwrap(), Some(3));
/// assert_eq!(buf, [1, 2, 3]);
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    entries: FnvIndexMap<String<KEY_CAPACITY>, Vec<u8, VALUE_CAPACITY>, ENTRY_CAPACITY>,
    write_count: u32,
    fail_writes: bool,
}

impl MockStorage {
    /// Create a new empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes since construction
    pub fn write_count(&self) -> u32 {
        self.write_count
    }

    /// Make all subsequent writes fail with `StorageError::WriteFailed`
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Seed an entry directly, bypassing the write counter.
    ///
    /// Lets tests stage pre-existing (possibly wrong-length) stored data.
    pub fn seed(&mut self, key: &str, value: &[u8]) {
        let key = make_key(key).expect("mock key too long");
        let value = Vec::from_slice(value).expect("mock value too large");
        let _ = self.entries.insert(key, value);
    }
}

fn make_key(key: &str) -> core::result::Result<String<KEY_CAPACITY>, StorageError> {
    let mut k = String::new();
    k.push_str(key).map_err(|_| StorageError::KeyTooLong)?;
    Ok(k)
}

impl KeyValueStorage for MockStorage {
    fn get_bytes(&mut self, key: &str, buf: &mut [u8]) -> Result<Option<usize>> {
        let key = make_key(key).map_err(PlatformError::Storage)?;
        match self.entries.get(&key) {
            None => Ok(None),
            Some(value) => {
                let n = buf.len().min(value.len());
                buf[..n].copy_from_slice(&value[..n]);
                Ok(Some(value.len()))
            }
        }
    }

    fn put_bytes(&mut self, key: &str, value: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(PlatformError::Storage(StorageError::WriteFailed));
        }
        let key = make_key(key).map_err(PlatformError::Storage)?;
        let value = Vec::from_slice(value)
            .map_err(|_| PlatformError::Storage(StorageError::CapacityExceeded))?;
        self.entries
            .insert(key, value)
            .map_err(|_| PlatformError::Storage(StorageError::CapacityExceeded))?;
        self.write_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_reads_none() {
        let mut storage = MockStorage::new();
        let mut buf = [0u8; 4];
        assert_eq!(storage.get_bytes("MISSING", &mut buf).unwrap(), None);
    }

    #[test]
    fn put_then_get_round_trips() {
        let mut storage = MockStorage::new();
        storage.put_bytes("BLOB", &[9, 8, 7, 6]).unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(storage.get_bytes("BLOB", &mut buf).unwrap(), Some(4));
        assert_eq!(buf, [9, 8, 7, 6]);
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn get_reports_stored_length_for_short_buffer() {
        let mut storage = MockStorage::new();
        storage.put_bytes("BLOB", &[1, 2, 3, 4, 5]).unwrap();

        let mut buf = [0u8; 2];
        assert_eq!(storage.get_bytes("BLOB", &mut buf).unwrap(), Some(5));
        assert_eq!(buf, [1, 2]);
    }

    #[test]
    fn overwrite_replaces_wholesale() {
        let mut storage = MockStorage::new();
        storage.put_bytes("BLOB", &[1, 2, 3, 4]).unwrap();
        storage.put_bytes("BLOB", &[5, 6]).unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(storage.get_bytes("BLOB", &mut buf).unwrap(), Some(2));
        assert_eq!(&buf[..2], &[5, 6]);
        assert_eq!(storage.write_count(), 2);
    }

    #[test]
    fn injected_write_failure() {
        let mut storage = MockStorage::new();
        storage.set_fail_writes(true);

        assert_eq!(
            storage.put_bytes("BLOB", &[1]),
            Err(PlatformError::Storage(StorageError::WriteFailed))
        );
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn oversized_key_is_rejected() {
        let mut storage = MockStorage::new();
        let mut buf = [0u8; 1];
        assert_eq!(
            storage.get_bytes("THIS_KEY_IS_FAR_TOO_LONG", &mut buf),
            Err(PlatformError::Storage(StorageError::KeyTooLong))
        );
    }
}
