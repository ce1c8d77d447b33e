//! Mock orientation sensor for subsystem testing
//!
//! Scriptable [`OrientationSensor`] with a mode-transition log, so tests can
//! assert the mandatory config-write-fusion sequencing around offset access
//! without a bus in the loop.

use heapless::Vec;

use crate::devices::traits::{
    CalibrationLevels, CalibrationOffsets, OperatingMode, OrientationSensor, SensorError,
};

/// Capacity of the mode-transition log
const MODE_LOG_CAPACITY: usize = 16;

/// Mock orientation sensor
///
/// Returns whatever heading and calibration levels the test last staged.
/// Offset access is mode-checked exactly like the real driver.
#[derive(Debug)]
pub struct MockOrientationSensor {
    heading: f32,
    levels: CalibrationLevels,
    offsets: CalibrationOffsets,
    mode: OperatingMode,
    mode_log: Vec<OperatingMode, MODE_LOG_CAPACITY>,
    written_offsets: Option<CalibrationOffsets>,
    fail_begin: Option<SensorError>,
    begun: bool,
}

impl Default for MockOrientationSensor {
    fn default() -> Self {
        Self {
            heading: 0.0,
            levels: CalibrationLevels::default(),
            offsets: CalibrationOffsets::default(),
            mode: OperatingMode::Config,
            mode_log: Vec::new(),
            written_offsets: None,
            fail_begin: None,
            begun: false,
        }
    }
}

impl MockOrientationSensor {
    /// Create a mock sensor reporting heading 0 and zero calibration
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the heading returned by subsequent reads
    pub fn set_heading(&mut self, heading: f32) {
        self.heading = heading;
    }

    /// Stage the calibration levels returned by subsequent reads
    pub fn set_levels(&mut self, system: u8, gyro: u8, accel: u8, mag: u8) {
        self.levels = CalibrationLevels::new(system, gyro, accel, mag);
    }

    /// Stage the offset blob served by `read_offsets`
    pub fn set_offsets(&mut self, offsets: CalibrationOffsets) {
        self.offsets = offsets;
    }

    /// Make `begin` fail with the given error
    pub fn fail_begin(&mut self, error: SensorError) {
        self.fail_begin = Some(error);
    }

    /// Mode transitions observed so far, in order
    pub fn mode_log(&self) -> &[OperatingMode] {
        &self.mode_log
    }

    /// Offsets last written via `write_offsets`, if any
    pub fn written_offsets(&self) -> Option<&CalibrationOffsets> {
        self.written_offsets.as_ref()
    }

    fn log_mode(&mut self, mode: OperatingMode) {
        self.mode = mode;
        let _ = self.mode_log.push(mode);
    }
}

impl OrientationSensor for MockOrientationSensor {
    fn begin(&mut self) -> Result<(), SensorError> {
        if let Some(e) = self.fail_begin {
            return Err(e);
        }
        self.begun = true;
        self.log_mode(OperatingMode::Fusion);
        Ok(())
    }

    fn read_heading(&mut self) -> Result<f32, SensorError> {
        if !self.begun {
            return Err(SensorError::NotInitialized);
        }
        Ok(self.heading)
    }

    fn read_calibration(&mut self) -> Result<CalibrationLevels, SensorError> {
        if !self.begun {
            return Err(SensorError::NotInitialized);
        }
        Ok(self.levels)
    }

    fn enter_config_mode(&mut self) -> Result<(), SensorError> {
        self.log_mode(OperatingMode::Config);
        Ok(())
    }

    fn enter_fusion_mode(&mut self) -> Result<(), SensorError> {
        self.log_mode(OperatingMode::Fusion);
        Ok(())
    }

    fn read_offsets(&mut self) -> Result<CalibrationOffsets, SensorError> {
        if self.mode != OperatingMode::Config {
            return Err(SensorError::NotInConfigMode);
        }
        Ok(self.offsets)
    }

    fn write_offsets(&mut self, offsets: &CalibrationOffsets) -> Result<(), SensorError> {
        if self.mode != OperatingMode::Config {
            return Err(SensorError::NotInConfigMode);
        }
        self.written_offsets = Some(*offsets);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_require_begin() {
        let mut sensor = MockOrientationSensor::new();
        assert_eq!(sensor.read_heading(), Err(SensorError::NotInitialized));

        sensor.begin().unwrap();
        sensor.set_heading(123.4);
        assert_eq!(sensor.read_heading(), Ok(123.4));
    }

    #[test]
    fn offset_access_is_mode_checked() {
        let mut sensor = MockOrientationSensor::new();
        sensor.begin().unwrap();
        assert_eq!(sensor.read_offsets(), Err(SensorError::NotInConfigMode));

        sensor.enter_config_mode().unwrap();
        assert!(sensor.read_offsets().is_ok());
        assert_eq!(
            sensor.mode_log(),
            &[OperatingMode::Fusion, OperatingMode::Config]
        );
    }
}
