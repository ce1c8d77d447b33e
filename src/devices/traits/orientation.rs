//! Orientation sensor trait and data types
//!
//! Device-independent interface for absolute-orientation sensors with
//! on-chip fusion, consumed by the compass subsystem. The chip computes
//! orientation and per-subsystem calibration confidence internally; the
//! driver only moves registers.

use core::fmt;

use crate::platform::PlatformError;

/// Maximum confidence score the chip reports per fusion subsystem
pub const MAX_CONFIDENCE: u8 = 3;

/// Size of the chip's calibration offset register block in bytes
///
/// Accelerometer offset XYZ, magnetometer offset XYZ, gyroscope offset XYZ
/// (6 bytes each), accelerometer radius and magnetometer radius (2 bytes
/// each). The layout is chip-defined and treated as opaque here.
pub const OFFSET_BLOB_LEN: usize = 22;

/// Sensor error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// I2C communication failed
    I2c,
    /// Chip identification register returned an unexpected value
    InvalidChipId,
    /// Driver not initialized
    NotInitialized,
    /// Offset registers accessed outside configuration mode
    NotInConfigMode,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::I2c => write!(f, "I2C communication failed"),
            SensorError::InvalidChipId => write!(f, "unexpected chip ID"),
            SensorError::NotInitialized => write!(f, "driver not initialized"),
            SensorError::NotInConfigMode => {
                write!(f, "offset registers require configuration mode")
            }
        }
    }
}

impl From<PlatformError> for SensorError {
    fn from(_: PlatformError) -> Self {
        SensorError::I2c
    }
}

/// Sensor operating mode
///
/// Offset registers are writable only in `Config`; orientation and
/// calibration-status reads are meaningful only in `Fusion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// Configuration mode (fusion halted, offset registers accessible)
    Config,
    /// Fusion mode (NDOF; orientation output active)
    Fusion,
}

/// Per-subsystem calibration confidence, each score in `[0, 3]`
///
/// Re-read from the sensor every poll cycle; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationLevels {
    /// Overall fusion confidence
    pub system: u8,
    /// Gyroscope confidence
    pub gyro: u8,
    /// Accelerometer confidence
    pub accel: u8,
    /// Magnetometer confidence
    pub mag: u8,
}

impl CalibrationLevels {
    /// Create calibration levels from the four confidence scores
    pub fn new(system: u8, gyro: u8, accel: u8, mag: u8) -> Self {
        Self {
            system,
            gyro,
            accel,
            mag,
        }
    }

    /// Display-facing full-calibration check: every score at least 3.
    pub fn fully_calibrated(&self) -> bool {
        self.system >= MAX_CONFIDENCE
            && self.gyro >= MAX_CONFIDENCE
            && self.accel >= MAX_CONFIDENCE
            && self.mag >= MAX_CONFIDENCE
    }

    /// Persistence predicate: every score exactly at the scale maximum.
    ///
    /// Numerically identical to [`fully_calibrated`](Self::fully_calibrated)
    /// while the scale tops out at 3, but kept distinct so the stricter
    /// contract survives a future scale change.
    pub fn at_maximum(&self) -> bool {
        self.system == MAX_CONFIDENCE
            && self.gyro == MAX_CONFIDENCE
            && self.accel == MAX_CONFIDENCE
            && self.mag == MAX_CONFIDENCE
    }
}

/// Opaque calibration offset blob
///
/// A snapshot of the chip's calibration registers. Captured once the fusion
/// subsystems report stable full calibration, persisted, and written back at
/// the next boot to skip runtime recalibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationOffsets(pub [u8; OFFSET_BLOB_LEN]);

impl Default for CalibrationOffsets {
    fn default() -> Self {
        Self([0; OFFSET_BLOB_LEN])
    }
}

/// Absolute-orientation sensor interface
///
/// # Mode sequencing
///
/// `read_offsets` / `write_offsets` are valid only in configuration mode;
/// callers bracket them with `enter_config_mode` / `enter_fusion_mode`.
/// Implementations observe the chip's settling delays inside the mode
/// transitions, and the whole sequence must not be interleaved with any
/// other sensor access.
pub trait OrientationSensor {
    /// Initialize the sensor and leave it in fusion mode.
    ///
    /// # Errors
    ///
    /// Fatal to startup: `SensorError::I2c` if the bus is unreachable,
    /// `SensorError::InvalidChipId` if the wrong device answers.
    fn begin(&mut self) -> Result<(), SensorError>;

    /// Read the fused heading in degrees.
    ///
    /// May be negative; callers normalize into `[0, 360)`.
    fn read_heading(&mut self) -> Result<f32, SensorError>;

    /// Read the four calibration confidence scores.
    fn read_calibration(&mut self) -> Result<CalibrationLevels, SensorError>;

    /// Switch to configuration mode (settling delay included).
    fn enter_config_mode(&mut self) -> Result<(), SensorError>;

    /// Switch back to fusion mode (settling delay included).
    fn enter_fusion_mode(&mut self) -> Result<(), SensorError>;

    /// Read the calibration offset registers. Configuration mode only.
    fn read_offsets(&mut self) -> Result<CalibrationOffsets, SensorError>;

    /// Write the calibration offset registers. Configuration mode only.
    fn write_offsets(&mut self, offsets: &CalibrationOffsets) -> Result<(), SensorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_calibrated_accepts_scores_at_or_above_three() {
        assert!(CalibrationLevels::new(3, 3, 3, 3).fully_calibrated());
        assert!(!CalibrationLevels::new(3, 3, 2, 3).fully_calibrated());
        assert!(!CalibrationLevels::new(0, 0, 0, 0).fully_calibrated());
    }

    #[test]
    fn at_maximum_requires_every_axis_at_three() {
        assert!(CalibrationLevels::new(3, 3, 3, 3).at_maximum());
        assert!(!CalibrationLevels::new(3, 3, 3, 2).at_maximum());
        assert!(!CalibrationLevels::new(2, 3, 3, 3).at_maximum());
    }

    #[test]
    fn default_levels_are_uncalibrated() {
        let levels = CalibrationLevels::default();
        assert!(!levels.fully_calibrated());
        assert!(!levels.at_maximum());
    }

    #[test]
    fn default_offsets_are_zeroed() {
        assert_eq!(CalibrationOffsets::default().0, [0u8; OFFSET_BLOB_LEN]);
    }
}
