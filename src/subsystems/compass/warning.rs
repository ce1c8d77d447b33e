//! Low-confidence warning monitor
//!
//! Raises an operator-visible warning when calibration confidence stays low
//! for a sustained window, and clears it the moment quality recovers.
//! Raising is debounced so a brief magnetometer occlusion (hand over the
//! case, passing near a speaker) does not flash the warning; clearing is
//! immediate.

use super::calibration::CalibrationState;
use crate::devices::traits::CalibrationLevels;

/// Evaluation is rate-limited to this interval regardless of call frequency
pub const SAMPLE_INTERVAL_MS: u64 = 500;

/// Default duration low quality must persist before the warning raises
pub const DEFAULT_WARNING_DELAY_MS: u64 = 5000;

/// Confidence floor: below this on system or magnetometer counts as low
const MIN_CONFIDENCE: u8 = 2;

/// Debounced detector for sustained low calibration confidence.
///
/// Only watches while the state machine is in `Normal`; during calibration
/// the operator already sees calibration instructions and a warning would
/// be noise.
pub struct WarningMonitor {
    warning_delay_ms: u64,
    last_sample_ms: Option<u64>,
    low_since_ms: Option<u64>,
    active: bool,
}

impl Default for WarningMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl WarningMonitor {
    /// Create a monitor with the default 5 s raise delay
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_WARNING_DELAY_MS)
    }

    /// Create a monitor with a custom raise delay
    pub fn with_delay(warning_delay_ms: u64) -> Self {
        Self {
            warning_delay_ms,
            last_sample_ms: None,
            low_since_ms: None,
            active: false,
        }
    }

    /// Current warning flag without re-evaluating
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Feed one cycle of calibration quality.
    ///
    /// Calls closer together than the sampling interval return the cached
    /// flag unchanged (debounced sampling, not debounced detection). The
    /// warning raises once low quality has persisted longer than the
    /// configured delay with the state machine in `Normal`, and clears at
    /// the first sampled recovery.
    pub fn update(
        &mut self,
        levels: &CalibrationLevels,
        state: CalibrationState,
        now_ms: u64,
    ) -> bool {
        if let Some(last) = self.last_sample_ms {
            if now_ms.saturating_sub(last) < SAMPLE_INTERVAL_MS {
                return self.active;
            }
        }
        self.last_sample_ms = Some(now_ms);

        let low = levels.system < MIN_CONFIDENCE || levels.mag < MIN_CONFIDENCE;

        if state == CalibrationState::Normal && low {
            let since = *self.low_since_ms.get_or_insert(now_ms);
            if now_ms.saturating_sub(since) > self.warning_delay_ms {
                self.active = true;
            }
        } else {
            self.low_since_ms = None;
            self.active = false;
        }

        self.active
    }
}
