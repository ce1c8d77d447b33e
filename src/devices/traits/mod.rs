//! Device trait definitions
//!
//! Device-independent interfaces consumed by the compass subsystem.

pub mod orientation;

pub use orientation::{
    CalibrationLevels, CalibrationOffsets, OperatingMode, OrientationSensor, SensorError,
    MAX_CONFIDENCE, OFFSET_BLOB_LEN,
};
