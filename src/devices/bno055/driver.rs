//! BNO055 I2C driver implementation
//!
//! Platform-agnostic driver written against [`I2cInterface`]. Mode
//! transitions observe the chip's settling times (real delays with the
//! `embassy` feature, no-ops on host).

use nalgebra::Vector3;

use super::registers::{self as regs, opr_mode, pwr_mode, sys_trigger, SelfTestResult};
use crate::devices::traits::{
    CalibrationLevels, CalibrationOffsets, OperatingMode, OrientationSensor, SensorError,
    OFFSET_BLOB_LEN,
};
use crate::platform::traits::I2cInterface;
use crate::{log_info, log_warn};

/// Settling time after switching into configuration mode
const CONFIG_MODE_SETTLE_MS: u64 = 25;

/// Settling time after switching into NDOF fusion mode
const FUSION_MODE_SETTLE_MS: u64 = 20;

/// Settling time after rewriting the offset registers
const OFFSET_WRITE_SETTLE_MS: u64 = 10;

/// Wait before re-probing CHIP_ID (the chip boots in ~400 ms, double it)
const BOOT_RETRY_DELAY_MS: u64 = 800;

/// Blocking delay in milliseconds
///
/// Uses `embassy_time` when the `embassy` feature is enabled.
/// No-op for host tests.
#[cfg(feature = "embassy")]
fn delay_ms(ms: u64) {
    embassy_time::block_for(embassy_time::Duration::from_millis(ms));
}

#[cfg(not(feature = "embassy"))]
fn delay_ms(_ms: u64) {
    // Host test stub
}

/// BNO055 driver configuration
#[derive(Debug, Clone, Copy)]
pub struct Bno055Config {
    /// 7-bit I2C device address
    pub address: u8,
    /// Drive the fusion clock from the external 32.768 kHz crystal
    pub use_external_crystal: bool,
}

impl Default for Bno055Config {
    fn default() -> Self {
        Self {
            address: regs::I2C_ADDR_A,
            use_external_crystal: true,
        }
    }
}

/// BNO055 I2C driver
///
/// Implements [`OrientationSensor`]. Tracks the chip's operating mode so
/// offset-register access outside configuration mode is rejected before it
/// reaches the bus.
pub struct Bno055Driver<I2C: I2cInterface> {
    i2c: I2C,
    config: Bno055Config,
    mode: OperatingMode,
    initialized: bool,
}

impl<I2C: I2cInterface> Bno055Driver<I2C> {
    /// Create a new driver (uninitialized). Call [`begin`](Self::begin)
    /// before use.
    pub fn new(i2c: I2C, config: Bno055Config) -> Self {
        Self {
            i2c,
            config,
            // The chip powers up in configuration mode
            mode: OperatingMode::Config,
            initialized: false,
        }
    }

    /// Consume the driver and return the I2C bus
    pub fn into_bus(self) -> I2C {
        self.i2c
    }

    /// Current operating mode as tracked by the driver
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.config.address, &[reg], &mut buf)?;
        Ok(buf[0])
    }

    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), SensorError> {
        self.i2c.write_read(self.config.address, &[reg], buf)?;
        Ok(())
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), SensorError> {
        self.i2c.write(self.config.address, &[reg, value])?;
        Ok(())
    }

    fn require_initialized(&self) -> Result<(), SensorError> {
        if self.initialized {
            Ok(())
        } else {
            Err(SensorError::NotInitialized)
        }
    }

    /// Read fused Euler angles in degrees: (heading, roll, pitch)
    ///
    /// 6-byte burst read; registers are 1/16 degree, little endian.
    pub fn read_euler(&mut self) -> Result<Vector3<f32>, SensorError> {
        self.require_initialized()?;

        let mut buf = [0u8; 6];
        self.read_registers(regs::EULER_H_LSB, &mut buf)?;

        let heading = i16::from_le_bytes([buf[0], buf[1]]) as f32 / regs::EULER_LSB_PER_DEGREE;
        let roll = i16::from_le_bytes([buf[2], buf[3]]) as f32 / regs::EULER_LSB_PER_DEGREE;
        let pitch = i16::from_le_bytes([buf[4], buf[5]]) as f32 / regs::EULER_LSB_PER_DEGREE;

        Ok(Vector3::new(heading, roll, pitch))
    }

    /// Run the power-on self-test check
    pub fn self_test(&mut self) -> Result<SelfTestResult, SensorError> {
        let raw = self.read_register(regs::ST_RESULT)?;
        Ok(SelfTestResult::from_bits_truncate(raw))
    }
}

impl<I2C: I2cInterface> OrientationSensor for Bno055Driver<I2C> {
    /// Initialize the sensor:
    ///
    /// 1. Verify CHIP_ID (one delayed retry; the chip boots slowly)
    /// 2. Enter configuration mode
    /// 3. Select register page 0, normal power mode
    /// 4. Clock source per configuration
    /// 5. Check the power-on self-test result
    /// 6. Enter NDOF fusion mode
    fn begin(&mut self) -> Result<(), SensorError> {
        let mut id = self.read_register(regs::CHIP_ID)?;
        if id != regs::BNO055_ID {
            delay_ms(BOOT_RETRY_DELAY_MS);
            id = self.read_register(regs::CHIP_ID)?;
            if id != regs::BNO055_ID {
                return Err(SensorError::InvalidChipId);
            }
        }

        self.enter_config_mode()?;
        self.write_register(regs::PAGE_ID, 0x00)?;
        self.write_register(regs::PWR_MODE, pwr_mode::NORMAL)?;

        let clk = if self.config.use_external_crystal {
            sys_trigger::CLK_SEL
        } else {
            0x00
        };
        self.write_register(regs::SYS_TRIGGER, clk)?;

        let st = self.self_test()?;
        if !st.all_passed() {
            log_warn!("BNO055 self-test incomplete: {}", st.bits());
        }

        self.enter_fusion_mode()?;
        self.initialized = true;
        log_info!("BNO055 initialized in NDOF mode");
        Ok(())
    }

    fn read_heading(&mut self) -> Result<f32, SensorError> {
        Ok(self.read_euler()?.x)
    }

    fn read_calibration(&mut self) -> Result<CalibrationLevels, SensorError> {
        self.require_initialized()?;

        let raw = self.read_register(regs::CALIB_STAT)?;
        Ok(CalibrationLevels::new(
            (raw >> 6) & 0x03,
            (raw >> 4) & 0x03,
            (raw >> 2) & 0x03,
            raw & 0x03,
        ))
    }

    fn enter_config_mode(&mut self) -> Result<(), SensorError> {
        self.write_register(regs::OPR_MODE, opr_mode::CONFIG)?;
        delay_ms(CONFIG_MODE_SETTLE_MS);
        self.mode = OperatingMode::Config;
        Ok(())
    }

    fn enter_fusion_mode(&mut self) -> Result<(), SensorError> {
        self.write_register(regs::OPR_MODE, opr_mode::NDOF)?;
        delay_ms(FUSION_MODE_SETTLE_MS);
        self.mode = OperatingMode::Fusion;
        Ok(())
    }

    fn read_offsets(&mut self) -> Result<CalibrationOffsets, SensorError> {
        self.require_initialized()?;
        if self.mode != OperatingMode::Config {
            return Err(SensorError::NotInConfigMode);
        }

        let mut blob = [0u8; OFFSET_BLOB_LEN];
        self.read_registers(regs::ACC_OFFSET_X_LSB, &mut blob)?;
        Ok(CalibrationOffsets(blob))
    }

    fn write_offsets(&mut self, offsets: &CalibrationOffsets) -> Result<(), SensorError> {
        self.require_initialized()?;
        if self.mode != OperatingMode::Config {
            return Err(SensorError::NotInConfigMode);
        }

        let mut frame = [0u8; 1 + OFFSET_BLOB_LEN];
        frame[0] = regs::ACC_OFFSET_X_LSB;
        frame[1..].copy_from_slice(&offsets.0);
        self.i2c.write(self.config.address, &frame)?;
        delay_ms(OFFSET_WRITE_SETTLE_MS);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::error::I2cError;
    use crate::platform::mock::{I2cTransaction, MockI2c};

    /// Build a driver and run `begin` against a healthy chip script
    fn initialized_driver() -> Bno055Driver<MockI2c> {
        let mut i2c = MockI2c::new();
        i2c.queue_read_data(&[regs::BNO055_ID, 0x0F]);

        let mut driver = Bno055Driver::new(i2c, Bno055Config::default());
        driver.begin().unwrap();
        driver.i2c.clear_transactions();
        driver
    }

    #[test]
    fn begin_runs_init_sequence() {
        let mut i2c = MockI2c::new();
        i2c.queue_read_data(&[regs::BNO055_ID, 0x0F]);

        let mut driver = Bno055Driver::new(i2c, Bno055Config::default());
        driver.begin().unwrap();
        assert_eq!(driver.mode(), OperatingMode::Fusion);

        let expected_writes: &[&[u8]] = &[
            &[regs::OPR_MODE, opr_mode::CONFIG],
            &[regs::PAGE_ID, 0x00],
            &[regs::PWR_MODE, pwr_mode::NORMAL],
            &[regs::SYS_TRIGGER, sys_trigger::CLK_SEL],
            &[regs::OPR_MODE, opr_mode::NDOF],
        ];

        let writes: Vec<_> = driver
            .i2c
            .transactions()
            .iter()
            .filter_map(|t| match t {
                I2cTransaction::Write { data, .. } => Some(data.as_slice().to_vec()),
                _ => None,
            })
            .collect();
        assert_eq!(writes, expected_writes);
    }

    #[test]
    fn begin_rejects_wrong_chip_id_after_retry() {
        let mut i2c = MockI2c::new();
        i2c.queue_read_data(&[0x00, 0x00]);

        let mut driver = Bno055Driver::new(i2c, Bno055Config::default());
        assert_eq!(driver.begin(), Err(SensorError::InvalidChipId));
    }

    #[test]
    fn begin_retries_slow_boot_once() {
        let mut i2c = MockI2c::new();
        // First probe sees garbage, second sees the real ID
        i2c.queue_read_data(&[0x00, regs::BNO055_ID, 0x0F]);

        let mut driver = Bno055Driver::new(i2c, Bno055Config::default());
        assert!(driver.begin().is_ok());
    }

    #[test]
    fn begin_maps_bus_failure() {
        let mut i2c = MockI2c::new();
        i2c.fail_next(I2cError::Nack);

        let mut driver = Bno055Driver::new(i2c, Bno055Config::default());
        assert_eq!(driver.begin(), Err(SensorError::I2c));
    }

    #[test]
    fn uninitialized_reads_are_rejected() {
        let mut driver = Bno055Driver::new(MockI2c::new(), Bno055Config::default());
        assert_eq!(driver.read_heading(), Err(SensorError::NotInitialized));
        assert_eq!(driver.read_calibration(), Err(SensorError::NotInitialized));
    }

    #[test]
    fn read_euler_converts_sixteenths() {
        let mut driver = initialized_driver();
        // heading 90.0° = 1440, roll -10.0° = -160, pitch 2.5° = 40
        let raw: [i16; 3] = [1440, -160, 40];
        let mut bytes = [0u8; 6];
        for (i, v) in raw.iter().enumerate() {
            bytes[2 * i..2 * i + 2].copy_from_slice(&v.to_le_bytes());
        }
        driver.i2c.queue_read_data(&bytes);

        let euler = driver.read_euler().unwrap();
        assert!((euler.x - 90.0).abs() < 1e-6);
        assert!((euler.y - (-10.0)).abs() < 1e-6);
        assert!((euler.z - 2.5).abs() < 1e-6);
    }

    #[test]
    fn read_calibration_unpacks_bitfields() {
        let mut driver = initialized_driver();
        // sys=3 gyro=2 accel=1 mag=0
        driver.i2c.queue_read_data(&[0b1110_0100]);

        let levels = driver.read_calibration().unwrap();
        assert_eq!(levels, CalibrationLevels::new(3, 2, 1, 0));
    }

    #[test]
    fn offset_access_requires_config_mode() {
        let mut driver = initialized_driver();
        assert_eq!(driver.read_offsets(), Err(SensorError::NotInConfigMode));
        assert_eq!(
            driver.write_offsets(&CalibrationOffsets::default()),
            Err(SensorError::NotInConfigMode)
        );
    }

    #[test]
    fn offset_round_trip_in_config_mode() {
        let mut driver = initialized_driver();
        driver.enter_config_mode().unwrap();

        let stored: [u8; OFFSET_BLOB_LEN] = core::array::from_fn(|i| i as u8);
        driver.i2c.queue_read_data(&stored);
        let offsets = driver.read_offsets().unwrap();
        assert_eq!(offsets.0, stored);

        driver.i2c.clear_transactions();
        driver.write_offsets(&offsets).unwrap();

        match &driver.i2c.transactions()[0] {
            I2cTransaction::Write { addr, data } => {
                assert_eq!(*addr, regs::I2C_ADDR_A);
                assert_eq!(data[0], regs::ACC_OFFSET_X_LSB);
                assert_eq!(&data[1..], &stored);
            }
            other => panic!("expected offset write, got {:?}", other),
        }
    }
}
