//! Heading exponential smoothing filter
//!
//! Low-pass filters the fused heading before display so the needle does not
//! jitter with sensor noise. A naive EMA on the raw angle snaps visibly at
//! the 0°/360° seam (359° followed by 1° would average through 180°);
//! the update therefore applies the smoothing gain to the signed shortest
//! angular difference instead.

use super::angle::{wrap_180, wrap_360};

/// Default smoothing coefficient
///
/// - `1.0`: no filtering (pass-through)
/// - `0.10`: heavy smoothing suited to a handheld display (default)
pub const DEFAULT_SMOOTHING: f32 = 0.10;

/// Exponential smoothing filter for a wrapping 0-360° signal.
pub struct AngleFilter {
    alpha: f32,
    filtered: f32,
}

impl Default for AngleFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl AngleFilter {
    /// Create a filter with the default smoothing coefficient.
    pub fn new() -> Self {
        Self::with_smoothing(DEFAULT_SMOOTHING)
    }

    /// Create a filter with the given smoothing coefficient.
    ///
    /// Alpha is clamped to [0.0, 1.0]. Lower alpha = more smoothing.
    pub fn with_smoothing(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            filtered: 0.0,
        }
    }

    /// Feed a raw heading (degrees, [0, 360)) and return the smoothed value.
    ///
    /// Moves the internal state toward `raw` by `alpha` times the signed
    /// shortest angular difference, then re-normalizes into [0, 360).
    pub fn update(&mut self, raw: f32) -> f32 {
        let diff = wrap_180(raw - self.filtered);
        self.filtered = wrap_360(self.filtered + self.alpha * diff);
        self.filtered
    }

    /// Current smoothed heading without feeding a new sample.
    pub fn value(&self) -> f32 {
        self.filtered
    }

    /// Reset the filter state to 0°.
    pub fn reset(&mut self) {
        self.filtered = 0.0;
    }
}
