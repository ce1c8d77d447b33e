//! Orientation service facade
//!
//! Ties the compass subsystem together. The host drives one `update` per
//! polling cycle (sub-second cadence assumed); each cycle polls the sensor
//! once, feeds the filter, state machine and warning monitor, and returns a
//! [`CompassReading`] for the caller to render. Nothing here schedules
//! itself or talks to a display.

use super::angle::wrap_360;
use super::angle_filter::AngleFilter;
use super::calibration::{CalibrationManager, CalibrationState, CalibrationStatus};
use super::direction::CompassPoint;
use super::persistence::CalibrationStore;
use super::warning::WarningMonitor;
use crate::core::traits::TimeSource;
use crate::devices::traits::{CalibrationLevels, OrientationSensor, SensorError};
use crate::platform::traits::KeyValueStorage;

/// One cycle's worth of display-ready compass output.
///
/// This is the service's output event: the caller decides whether and how
/// to render it (draw the needle, update the calibration panel, raise the
/// warning icon).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompassReading {
    /// Smoothed heading in [0, 360) degrees
    pub heading: f32,
    /// Eight-point direction for the smoothed heading
    pub direction: CompassPoint,
    /// Instantaneous calibration confidence scores
    pub levels: CalibrationLevels,
    /// Display-facing full-calibration flag (every score >= 3)
    pub fully_calibrated: bool,
    /// Debounced low-confidence warning flag
    pub warning_active: bool,
    /// Operator-facing status pair for this cycle
    pub status: CalibrationStatus,
}

/// Top-level compass service.
///
/// Owns the sensor, the calibration state machine (and through it the
/// persistence gateway), the heading filter and the warning monitor.
pub struct OrientationService<S, K, T>
where
    S: OrientationSensor,
    K: KeyValueStorage,
    T: TimeSource,
{
    sensor: S,
    time: T,
    filter: AngleFilter,
    calibration: CalibrationManager<K>,
    warning: WarningMonitor,
}

impl<S, K, T> OrientationService<S, K, T>
where
    S: OrientationSensor,
    K: KeyValueStorage,
    T: TimeSource,
{
    /// Assemble the service. Call [`begin`](Self::begin) before polling.
    pub fn new(sensor: S, storage: K, time: T) -> Self {
        Self {
            sensor,
            time,
            filter: AngleFilter::new(),
            calibration: CalibrationManager::new(CalibrationStore::new(storage)),
            warning: WarningMonitor::new(),
        }
    }

    /// Initialize the sensor and restore persisted calibration.
    ///
    /// # Errors
    ///
    /// Sensor unavailability here is fatal and surfaced as-is; retry policy
    /// belongs to the caller.
    pub fn begin(&mut self) -> Result<(), SensorError> {
        self.sensor.begin()?;
        self.calibration.init(&mut self.sensor)
    }

    /// Run one polling cycle.
    ///
    /// Reads the sensor once, updates every component and returns the
    /// display-ready reading.
    pub fn update(&mut self) -> Result<CompassReading, SensorError> {
        let raw = wrap_360(self.sensor.read_heading()?);
        let heading = self.filter.update(raw);

        let levels = self.sensor.read_calibration()?;
        let now_ms = self.time.now_ms();

        let status = self.calibration.update(&mut self.sensor, levels, now_ms);
        let warning_active = self
            .warning
            .update(&levels, self.calibration.state(), now_ms);

        Ok(CompassReading {
            heading,
            direction: CompassPoint::from_heading(heading),
            levels,
            fully_calibrated: levels.fully_calibrated(),
            warning_active,
            status,
        })
    }

    /// Operator action: start manual calibration.
    pub fn request_manual_calibration(&mut self) {
        self.calibration.request_manual();
    }

    /// Latest status pair, for a UI attached after startup.
    pub fn current_status(&self) -> CalibrationStatus {
        self.calibration.current_status()
    }

    /// Current calibration lifecycle state (read-only)
    pub fn state(&self) -> CalibrationState {
        self.calibration.state()
    }

    /// Latest smoothed heading
    pub fn heading(&self) -> f32 {
        self.filter.value()
    }

    /// Current warning flag without running a cycle
    pub fn warning_active(&self) -> bool {
        self.warning.is_active()
    }

    /// Borrow the calibration manager (inspection)
    pub fn calibration(&self) -> &CalibrationManager<K> {
        &self.calibration
    }

    /// Mutably borrow the sensor (test scripting)
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::MockTime;
    use crate::devices::mock::MockOrientationSensor;
    use crate::devices::traits::CalibrationOffsets;
    use crate::platform::mock::MockStorage;
    use crate::subsystems::compass::persistence::CAL_OFFSETS_KEY;

    type Service<'t> = OrientationService<MockOrientationSensor, MockStorage, &'t MockTime>;

    fn service_with(storage: MockStorage, time: &MockTime) -> Service<'_> {
        OrientationService::new(MockOrientationSensor::new(), storage, time)
    }

    #[test]
    fn begin_with_empty_store_starts_auto_calibrating() {
        let time = MockTime::new();
        let mut service = service_with(MockStorage::new(), &time);

        service.begin().unwrap();
        assert_eq!(service.state(), CalibrationState::AutoCalibrating);
        assert_eq!(service.current_status().mode, "AUTO-CAL");
    }

    #[test]
    fn begin_with_seeded_store_restores_and_starts_normal() {
        let offsets = CalibrationOffsets([5u8; 22]);
        let mut storage = MockStorage::new();
        storage.seed(CAL_OFFSETS_KEY, &offsets.0);

        let time = MockTime::new();
        let mut service = service_with(storage, &time);

        service.begin().unwrap();
        assert_eq!(service.state(), CalibrationState::Normal);
        assert_eq!(service.sensor_mut().written_offsets(), Some(&offsets));
    }

    #[test]
    fn begin_surfaces_sensor_failure() {
        let time = MockTime::new();
        let mut service = service_with(MockStorage::new(), &time);
        service.sensor_mut().fail_begin(SensorError::I2c);

        assert_eq!(service.begin(), Err(SensorError::I2c));
    }

    #[test]
    fn negative_raw_heading_is_normalized() {
        let time = MockTime::new();
        let mut service = service_with(MockStorage::new(), &time);
        service.begin().unwrap();

        service.sensor_mut().set_heading(-90.0);
        let reading = service.update().unwrap();

        // Raw -90 normalizes to 270; one filter step from 0 moves along the
        // short path (backwards through the seam)
        assert!((0.0..360.0).contains(&reading.heading));
        assert!(
            (reading.heading - 351.0).abs() < 1e-3,
            "got {}",
            reading.heading
        );
    }

    #[test]
    fn full_cycle_auto_calibration_scenario() {
        let time = MockTime::new();
        let mut service = service_with(MockStorage::new(), &time);
        service.begin().unwrap();
        assert_eq!(service.state(), CalibrationState::AutoCalibrating);

        // Partially calibrated: keep-moving instruction, no persistence
        service.sensor_mut().set_levels(2, 3, 3, 2);
        let reading = service.update().unwrap();
        assert!(!reading.fully_calibrated);
        assert_eq!(reading.status.instruction, "Rotate on all axes");

        // Quality reaches full and holds through the stability window
        service.sensor_mut().set_levels(3, 3, 3, 3);
        service
            .sensor_mut()
            .set_offsets(CalibrationOffsets([3u8; 22]));

        time.set(1_000);
        let reading = service.update().unwrap();
        assert!(reading.fully_calibrated);
        assert_eq!(reading.status.mode, "AUTO DONE");

        time.set(2_500);
        service.update().unwrap();
        assert_eq!(service.state(), CalibrationState::AutoCalibrating);

        time.set(4_001);
        let reading = service.update().unwrap();
        assert_eq!(service.state(), CalibrationState::Normal);
        assert_eq!(reading.status.mode, "SAVED");
        assert_eq!(
            service.calibration().store().storage().write_count(),
            1,
            "exactly one persistence write"
        );
    }

    #[test]
    fn manual_request_overrides_any_quality() {
        let time = MockTime::new();
        let mut service = service_with(MockStorage::new(), &time);
        service.begin().unwrap();

        service.sensor_mut().set_levels(3, 3, 3, 3);
        service.update().unwrap();

        service.request_manual_calibration();
        assert_eq!(service.state(), CalibrationState::ManualCalibrating);
        assert_eq!(service.current_status().instruction, "Move sensor until CAL=3");
    }

    #[test]
    fn warning_raises_through_the_service_after_sustained_low_quality() {
        let offsets = CalibrationOffsets([5u8; 22]);
        let mut storage = MockStorage::new();
        storage.seed(CAL_OFFSETS_KEY, &offsets.0);

        let time = MockTime::new();
        let mut service = service_with(storage, &time);
        service.begin().unwrap();
        assert_eq!(service.state(), CalibrationState::Normal);

        // Magnetometer confidence collapses
        service.sensor_mut().set_levels(3, 3, 3, 0);

        let mut warned_at = None;
        for step in 0..12u64 {
            time.set(step * 600);
            let reading = service.update().unwrap();
            if reading.warning_active && warned_at.is_none() {
                warned_at = Some(step * 600);
            }
        }

        // First sample past the 5 s window is at 5400 ms
        assert_eq!(warned_at, Some(5_400));

        // Recovery clears the warning at the next sample
        service.sensor_mut().set_levels(3, 3, 3, 3);
        time.set(7_300);
        let reading = service.update().unwrap();
        assert!(!reading.warning_active);
    }

    #[test]
    fn direction_tracks_the_filtered_heading() {
        let time = MockTime::new();
        let mut service = service_with(MockStorage::new(), &time);
        service.begin().unwrap();

        service.sensor_mut().set_heading(90.0);
        let reading = service.update().unwrap();

        // One smoothing step from 0 toward 90 lands at 9°, still North
        assert_eq!(reading.direction, CompassPoint::North);
        assert_eq!(reading.direction.label(), "N");

        for _ in 0..40 {
            service.update().unwrap();
        }
        let reading = service.update().unwrap();
        assert_eq!(reading.direction, CompassPoint::East);
    }
}
