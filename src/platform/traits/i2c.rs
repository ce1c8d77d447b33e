//! I2C interface trait
//!
//! This module defines the I2C bus communication interface that platform
//! implementations must provide. The BNO055 driver is written entirely
//! against this trait.

use crate::platform::Result;

/// I2C configuration
#[derive(Debug, Clone, Copy)]
pub struct I2cConfig {
    /// Bus frequency in Hz (typically 100_000 or 400_000)
    pub frequency: u32,
    /// Timeout in microseconds
    pub timeout_us: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            frequency: 100_000,    // 100 kHz standard mode
            timeout_us: 1_000_000, // 1 second
        }
    }
}

/// I2C interface trait
///
/// # Safety Invariants
///
/// - I2C peripheral must be initialized before use
/// - Only one owner per I2C bus instance
/// - No concurrent access to the same I2C bus from multiple contexts
/// - Address must be 7-bit (valid range: 0x00..=0x7F)
pub trait I2cInterface {
    /// Write data to I2C device
    ///
    /// Performs a complete I2C write transaction:
    /// START - ADDR(W) - DATA - STOP
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c` if the device does not acknowledge,
    /// a bus error occurs, or the timeout expires.
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()>;

    /// Read data from I2C device
    ///
    /// Performs a complete I2C read transaction:
    /// START - ADDR(R) - DATA - STOP
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c` if the device does not acknowledge,
    /// a bus error occurs, or the timeout expires.
    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()>;

    /// Write then read from I2C device
    ///
    /// Performs a combined write-read transaction with a repeated START:
    /// START - ADDR(W) - WRITE_DATA - REPEATED_START - ADDR(R) - READ_DATA - STOP
    ///
    /// This is commonly used to write a register address then read the
    /// register value.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c` if the device does not acknowledge,
    /// a bus error occurs, or the timeout expires.
    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()>;
}
