//! Compass subsystem
//!
//! Manages the calibration-quality lifecycle of the orientation sensor and
//! turns its raw output into display-ready values:
//!
//! - [`angle_filter`]: exponential smoothing of the wrapping heading signal
//! - [`direction`]: eight-point compass direction labels
//! - [`persistence`]: calibration offset load/save over key-value storage
//! - [`warning`]: debounced low-confidence warning
//! - [`calibration`]: the calibration state machine
//! - [`service`]: per-cycle facade tying the pieces together
//!
//! Everything here is polling-driven and single-threaded; timers are plain
//! millisecond timestamps supplied by the caller each cycle.

pub mod angle;
pub mod angle_filter;
pub mod calibration;
pub mod direction;
pub mod persistence;
pub mod service;
pub mod warning;

pub use angle_filter::AngleFilter;
pub use calibration::{CalibrationManager, CalibrationState, CalibrationStatus};
pub use direction::CompassPoint;
pub use persistence::CalibrationStore;
pub use service::{CompassReading, OrientationService};
pub use warning::WarningMonitor;
