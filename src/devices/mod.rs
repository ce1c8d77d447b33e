//! Device drivers
//!
//! This module contains device drivers that use platform abstraction traits.
//!
//! ## Modules
//!
//! - `bno055`: register-level driver for the Bosch BNO055 orientation sensor
//! - `traits`: device trait definitions (`OrientationSensor`, quality and
//!   offset types)
//! - `mock`: scriptable `OrientationSensor` for subsystem tests

pub mod bno055;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
