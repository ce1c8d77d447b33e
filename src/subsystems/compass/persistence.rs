//! Calibration offset persistence
//!
//! Pure data marshalling between [`CalibrationOffsets`] and the key-value
//! store. No policy lives here: the state machine decides *when* to save,
//! this gateway only moves the blob and validates its size.

use crate::devices::traits::{CalibrationOffsets, OFFSET_BLOB_LEN};
use crate::platform::{traits::KeyValueStorage, PlatformError};
use crate::{log_error, log_warn};

/// Fixed storage key for the offset blob
pub const CAL_OFFSETS_KEY: &str = "CAL_OFFSETS";

/// Gateway between the calibration state machine and non-volatile storage.
pub struct CalibrationStore<K: KeyValueStorage> {
    storage: K,
}

impl<K: KeyValueStorage> CalibrationStore<K> {
    /// Create a store over the given storage backend
    pub fn new(storage: K) -> Self {
        Self { storage }
    }

    /// Borrow the storage backend (test inspection)
    pub fn storage(&self) -> &K {
        &self.storage
    }

    /// Mutably borrow the storage backend
    pub fn storage_mut(&mut self) -> &mut K {
        &mut self.storage
    }

    /// Load previously persisted offsets.
    ///
    /// Returns `None` when no entry exists, when the stored length does not
    /// match the chip's offset block (corrupt data is never partially
    /// applied), or when the backend fails to read. Read problems are
    /// logged, not surfaced; the caller falls back to auto-calibration.
    pub fn load(&mut self) -> Option<CalibrationOffsets> {
        let mut blob = [0u8; OFFSET_BLOB_LEN];
        match self.storage.get_bytes(CAL_OFFSETS_KEY, &mut blob) {
            Ok(Some(len)) if len == OFFSET_BLOB_LEN => Some(CalibrationOffsets(blob)),
            Ok(Some(len)) => {
                log_warn!(
                    "stored calibration is {} bytes, expected {}; ignoring",
                    len,
                    OFFSET_BLOB_LEN
                );
                None
            }
            Ok(None) => None,
            Err(e) => {
                log_error!("calibration read failed: {}", e);
                None
            }
        }
    }

    /// Persist offsets wholesale under the fixed key.
    ///
    /// No retries; backend failures are surfaced as-is.
    pub fn save(&mut self, offsets: &CalibrationOffsets) -> Result<(), PlatformError> {
        self.storage.put_bytes(CAL_OFFSETS_KEY, &offsets.0)
    }
}
