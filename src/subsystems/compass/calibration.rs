//! Calibration state machine
//!
//! Owns the calibration lifecycle: restore persisted offsets at startup,
//! watch the chip's confidence scores, and persist fresh offsets once full
//! calibration has held for a contiguous stability window. A momentary full
//! reading followed by a drop restarts the window; only sustained quality
//! is trusted to the store.

use super::persistence::CalibrationStore;
use crate::devices::traits::{CalibrationLevels, CalibrationOffsets, OrientationSensor, SensorError};
use crate::platform::{traits::KeyValueStorage, PlatformError};
use crate::{log_info, log_warn};

/// Contiguous full-quality duration required before offsets are persisted
pub const STABILITY_WINDOW_MS: u64 = 3000;

/// Calibration lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationState {
    /// Calibration restored or captured; compass in ordinary operation
    Normal,
    /// Unattended first-time calibration (no stored offsets at boot)
    AutoCalibrating,
    /// Operator-requested recalibration
    ManualCalibrating,
}

/// Operator-facing status pair: mode label and instruction text.
///
/// An output value, not state: the caller decides whether and how to render
/// it. `current_status` re-serves the latest pair so a UI attached late can
/// catch up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationStatus {
    pub mode: &'static str,
    pub instruction: &'static str,
}

const STATUS_IDLE: CalibrationStatus = CalibrationStatus {
    mode: "",
    instruction: "",
};
const STATUS_RESTORED: CalibrationStatus = CalibrationStatus {
    mode: "RESTORED",
    instruction: "Calibration restored",
};
const STATUS_AUTO_START: CalibrationStatus = CalibrationStatus {
    mode: "AUTO-CAL",
    instruction: "Move sensor on all axes",
};
const STATUS_AUTO_PROGRESS: CalibrationStatus = CalibrationStatus {
    mode: "AUTO-CAL",
    instruction: "Rotate on all axes",
};
const STATUS_AUTO_READY: CalibrationStatus = CalibrationStatus {
    mode: "AUTO DONE",
    instruction: "Ready",
};
const STATUS_MANUAL_START: CalibrationStatus = CalibrationStatus {
    mode: "MANUAL",
    instruction: "Move sensor until CAL=3",
};
const STATUS_MANUAL_HOLD: CalibrationStatus = CalibrationStatus {
    mode: "MANUAL",
    instruction: "Hold still to save",
};
const STATUS_MANUAL_MOVE: CalibrationStatus = CalibrationStatus {
    mode: "MANUAL",
    instruction: "Keep moving device",
};
const STATUS_SAVED: CalibrationStatus = CalibrationStatus {
    mode: "SAVED",
    instruction: "Calibration stored",
};

/// Calibration state machine over a persistence gateway.
///
/// State is owned here exclusively; every other component reads it through
/// [`state`](Self::state).
pub struct CalibrationManager<K: KeyValueStorage> {
    state: CalibrationState,
    store: CalibrationStore<K>,
    /// Set on the first cycle quality becomes full, cleared on regression
    calibrated_since_ms: Option<u64>,
    status: CalibrationStatus,
    restored: bool,
    last_save_error: Option<PlatformError>,
}

impl<K: KeyValueStorage> CalibrationManager<K> {
    /// Create a manager over the given store. Call
    /// [`init`](Self::init) once the sensor is up.
    pub fn new(store: CalibrationStore<K>) -> Self {
        Self {
            state: CalibrationState::Normal,
            store,
            calibrated_since_ms: None,
            status: STATUS_IDLE,
            restored: false,
            last_save_error: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> CalibrationState {
        self.state
    }

    /// Latest status pair (for late UI attachment)
    pub fn current_status(&self) -> CalibrationStatus {
        self.status
    }

    /// True when offsets were restored from storage at startup
    pub fn calibration_restored(&self) -> bool {
        self.restored
    }

    /// Error from the most recent persistence attempt, if it failed
    pub fn last_save_error(&self) -> Option<PlatformError> {
        self.last_save_error
    }

    /// Borrow the persistence gateway (test inspection)
    pub fn store(&self) -> &CalibrationStore<K> {
        &self.store
    }

    /// Startup: restore persisted offsets if present.
    ///
    /// With stored offsets the sensor is loaded (configuration mode, offset
    /// write, back to fusion) and the state machine starts in `Normal`.
    /// Without them it starts in `AutoCalibrating` and waits for the chip
    /// to calibrate itself in use.
    ///
    /// # Errors
    ///
    /// A sensor failure while applying offsets is fatal to initialization
    /// and surfaced to the caller; retrying is the caller's policy.
    pub fn init<S: OrientationSensor>(&mut self, sensor: &mut S) -> Result<(), SensorError> {
        match self.store.load() {
            Some(offsets) => {
                apply_offsets(sensor, &offsets)?;
                self.state = CalibrationState::Normal;
                self.restored = true;
                self.status = STATUS_RESTORED;
                log_info!("calibration offsets restored from storage");
            }
            None => {
                self.state = CalibrationState::AutoCalibrating;
                self.status = STATUS_AUTO_START;
                log_info!("no stored calibration, auto-calibrating");
            }
        }
        Ok(())
    }

    /// Operator requested manual calibration. Always allowed, from any
    /// state, regardless of current quality.
    pub fn request_manual(&mut self) {
        self.state = CalibrationState::ManualCalibrating;
        self.status = STATUS_MANUAL_START;
        log_info!("manual calibration requested");
    }

    /// Feed one cycle of calibration quality.
    ///
    /// Tracks the contiguous full-quality window, persists offsets and
    /// transitions to `Normal` when it elapses, and returns the status pair
    /// for this cycle. A persistence failure does not block the transition:
    /// calibration is usable in-session either way, and the error stays
    /// readable via [`last_save_error`](Self::last_save_error).
    pub fn update<S: OrientationSensor>(
        &mut self,
        sensor: &mut S,
        levels: CalibrationLevels,
        now_ms: u64,
    ) -> CalibrationStatus {
        let full = levels.at_maximum();

        if full {
            if self.calibrated_since_ms.is_none() {
                self.calibrated_since_ms = Some(now_ms);
            }
        } else {
            self.calibrated_since_ms = None;
        }

        let window_elapsed = self
            .calibrated_since_ms
            .is_some_and(|since| now_ms.saturating_sub(since) > STABILITY_WINDOW_MS);
        if window_elapsed {
            self.persist(sensor);
            self.state = CalibrationState::Normal;
            self.calibrated_since_ms = None;
        } else {
            match self.state {
                CalibrationState::AutoCalibrating => {
                    self.status = if full {
                        STATUS_AUTO_READY
                    } else {
                        STATUS_AUTO_PROGRESS
                    };
                }
                CalibrationState::ManualCalibrating => {
                    self.status = if full {
                        STATUS_MANUAL_HOLD
                    } else {
                        STATUS_MANUAL_MOVE
                    };
                }
                CalibrationState::Normal => {}
            }
        }

        self.status
    }

    fn persist<S: OrientationSensor>(&mut self, sensor: &mut S) {
        match capture_offsets(sensor) {
            Ok(offsets) => match self.store.save(&offsets) {
                Ok(()) => {
                    self.status = STATUS_SAVED;
                    self.restored = false;
                    self.last_save_error = None;
                    log_info!("calibration offsets stored");
                }
                Err(e) => {
                    self.last_save_error = Some(e);
                    log_warn!("calibration save failed: {}", e);
                }
            },
            Err(e) => {
                log_warn!("offset capture failed: {}", e);
            }
        }
    }
}

/// Load offsets into the sensor.
///
/// Offset registers are writable only outside active fusion, so the
/// sequence config-write-fusion is mandatory and must not be interleaved
/// with any other sensor access.
fn apply_offsets<S: OrientationSensor>(
    sensor: &mut S,
    offsets: &CalibrationOffsets,
) -> Result<(), SensorError> {
    sensor.enter_config_mode()?;
    sensor.write_offsets(offsets)?;
    sensor.enter_fusion_mode()
}

/// Capture the sensor's current offsets (same mode sequencing as apply).
fn capture_offsets<S: OrientationSensor>(
    sensor: &mut S,
) -> Result<CalibrationOffsets, SensorError> {
    sensor.enter_config_mode()?;
    let offsets = sensor.read_offsets()?;
    sensor.enter_fusion_mode()?;
    Ok(offsets)
}
