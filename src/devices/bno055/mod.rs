//! BNO055 9-Axis Absolute Orientation Sensor Driver
//!
//! I2C driver for the Bosch BNO055 with integrated ARM Cortex-M0 running
//! on-chip 9-axis sensor fusion. Unlike raw IMUs, the BNO055 outputs fused
//! Euler orientation directly and reports a per-subsystem calibration
//! confidence score, so no host-side fusion or filtering beyond display
//! smoothing is required.
//!
//! ## Hardware
//!
//! - 3-axis gyroscope, accelerometer, magnetometer
//! - ARM Cortex-M0 for sensor fusion (NDOF mode)
//! - I2C @ up to 400 kHz, default address 0x28
//! - Calibration offset registers writable only in configuration mode
//!
//! ## Usage
//!
//! ```ignore
//! use pico_compass::devices::bno055::{Bno055Config, Bno055Driver};
//! use pico_compass::devices::traits::OrientationSensor;
//!
//! let mut driver = Bno055Driver::new(i2c, Bno055Config::default());
//! driver.begin()?;
//!
//! let heading = driver.read_heading()?;
//! let levels = driver.read_calibration()?;
//! ```

mod driver;
pub mod registers;

pub use driver::{Bno055Config, Bno055Driver};
pub use registers::SelfTestResult;
