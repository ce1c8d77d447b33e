//! Mock platform implementations for testing
//!
//! In-memory stand-ins for the I2C bus and the key-value store. Both are
//! built on `heapless` collections so they stay usable from `no_std`
//! contexts when the `mock` feature is enabled.

pub mod i2c;
pub mod storage;

pub use i2c::{I2cTransaction, MockI2c};
pub use storage::MockStorage;
