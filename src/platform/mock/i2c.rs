//! Mock I2C implementation for testing
//!
//! Records all transactions for test verification and serves pre-programmed
//! read bytes in FIFO order.

use crate::platform::{
    error::I2cError,
    traits::{I2cConfig, I2cInterface},
    PlatformError, Result,
};
use heapless::Vec;

/// Maximum payload bytes recorded per transaction
const DATA_CAPACITY: usize = 32;

/// Maximum transactions held in the log
const LOG_CAPACITY: usize = 64;

/// Capacity of the scripted read byte queue
const READ_CAPACITY: usize = 64;

/// I2C transaction type for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cTransaction {
    /// Write transaction
    Write {
        addr: u8,
        data: Vec<u8, DATA_CAPACITY>,
    },
    /// Read transaction
    Read { addr: u8, len: usize },
    /// Write-Read transaction
    WriteRead {
        addr: u8,
        write_data: Vec<u8, DATA_CAPACITY>,
        read_len: usize,
    },
}

/// Mock I2C implementation
///
/// Read transactions consume bytes from a scripted queue, so a test can
/// queue every register value a driver sequence will fetch and then assert
/// the recorded transaction order.
#[derive(Debug, Default)]
pub struct MockI2c {
    config: I2cConfig,
    transactions: Vec<I2cTransaction, LOG_CAPACITY>,
    read_data: Vec<u8, READ_CAPACITY>,
    fail_next: Option<I2cError>,
}

impl MockI2c {
    /// Create a new mock I2C bus with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new mock I2C bus with the given configuration
    pub fn with_config(config: I2cConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Configured bus frequency
    pub fn frequency(&self) -> u32 {
        self.config.frequency
    }

    /// Get the transaction log (for test verification)
    pub fn transactions(&self) -> &[I2cTransaction] {
        &self.transactions
    }

    /// Clear the transaction log
    pub fn clear_transactions(&mut self) {
        self.transactions.clear();
    }

    /// Append bytes to the scripted read queue
    pub fn queue_read_data(&mut self, data: &[u8]) {
        self.read_data
            .extend_from_slice(data)
            .expect("mock read queue overflow");
    }

    /// Make the next transaction fail with the given error
    pub fn fail_next(&mut self, error: I2cError) {
        self.fail_next = Some(error);
    }

    fn take_injected_failure(&mut self) -> Result<()> {
        match self.fail_next.take() {
            Some(e) => Err(PlatformError::I2c(e)),
            None => Ok(()),
        }
    }

    fn serve_read(&mut self, buffer: &mut [u8]) {
        let n = buffer.len().min(self.read_data.len());
        buffer[..n].copy_from_slice(&self.read_data[..n]);
        let remaining: Vec<u8, READ_CAPACITY> =
            Vec::from_slice(&self.read_data[n..]).expect("mock read queue slice");
        self.read_data = remaining;
    }
}

impl I2cInterface for MockI2c {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        self.take_injected_failure()?;
        let data = Vec::from_slice(data).map_err(|_| PlatformError::InvalidConfig)?;
        self.transactions
            .push(I2cTransaction::Write { addr, data })
            .map_err(|_| PlatformError::InvalidConfig)?;
        Ok(())
    }

    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        self.take_injected_failure()?;
        self.transactions
            .push(I2cTransaction::Read {
                addr,
                len: buffer.len(),
            })
            .map_err(|_| PlatformError::InvalidConfig)?;
        self.serve_read(buffer);
        Ok(())
    }

    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        self.take_injected_failure()?;
        let write_data = Vec::from_slice(write_data).map_err(|_| PlatformError::InvalidConfig)?;
        self.transactions
            .push(I2cTransaction::WriteRead {
                addr,
                write_data,
                read_len: read_buffer.len(),
            })
            .map_err(|_| PlatformError::InvalidConfig)?;
        self.serve_read(read_buffer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_is_logged() {
        let mut i2c = MockI2c::new();
        i2c.write(0x28, &[0x3D, 0x0C]).unwrap();

        assert_eq!(
            i2c.transactions(),
            &[I2cTransaction::Write {
                addr: 0x28,
                data: Vec::from_slice(&[0x3D, 0x0C]).unwrap(),
            }]
        );
    }

    #[test]
    fn read_serves_queued_bytes() {
        let mut i2c = MockI2c::new();
        i2c.queue_read_data(&[0xAA, 0xBB, 0xCC]);

        let mut buf = [0u8; 3];
        i2c.read(0x28, &mut buf).unwrap();

        assert_eq!(buf, [0xAA, 0xBB, 0xCC]);
        assert_eq!(i2c.transactions(), &[I2cTransaction::Read { addr: 0x28, len: 3 }]);
    }

    #[test]
    fn write_read_consumes_queue_in_order() {
        let mut i2c = MockI2c::new();
        i2c.queue_read_data(&[0xA0, 0x0F]);

        let mut first = [0u8; 1];
        i2c.write_read(0x28, &[0x00], &mut first).unwrap();
        assert_eq!(first, [0xA0]);

        let mut second = [0u8; 1];
        i2c.write_read(0x28, &[0x36], &mut second).unwrap();
        assert_eq!(second, [0x0F]);
    }

    #[test]
    fn config_is_retained() {
        let i2c = MockI2c::with_config(I2cConfig {
            frequency: 400_000,
            timeout_us: 10_000,
        });
        assert_eq!(i2c.frequency(), 400_000);
        assert_eq!(MockI2c::new().frequency(), 100_000);
    }

    #[test]
    fn injected_failure_fires_once() {
        let mut i2c = MockI2c::new();
        i2c.fail_next(I2cError::Nack);

        assert_eq!(
            i2c.write(0x28, &[0x00]),
            Err(PlatformError::I2c(I2cError::Nack))
        );
        assert!(i2c.write(0x28, &[0x00]).is_ok());
    }
}
