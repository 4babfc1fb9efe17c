//! Sensor core state — calibration, alarm threshold, last raw reading.
//!
//! The variant-specific sampling behavior lives in the `app` crate; this
//! type holds the state every sensor shares and the alarm predicate.

/// Shared mutable state of a sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorCore {
    calibration: f64,
    alarm: Option<f64>,
    raw_value: f64,
}

impl Default for SensorCore {
    fn default() -> Self {
        Self {
            calibration: 1.0,
            alarm: None,
            raw_value: 0.0,
        }
    }
}

impl SensorCore {
    /// Fresh state: calibration 1.0, no alarm, raw reading 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Multiplicative factor applied to raw readings.
    #[must_use]
    pub fn calibration(&self) -> f64 {
        self.calibration
    }

    /// Replace the calibration factor.
    pub fn set_calibration(&mut self, calibration: f64) {
        self.calibration = calibration;
    }

    /// The configured alarm threshold, if any.
    #[must_use]
    pub fn alarm(&self) -> Option<f64> {
        self.alarm
    }

    /// Arm the alarm at `threshold`.
    pub fn set_alarm(&mut self, threshold: f64) {
        self.alarm = Some(threshold);
    }

    /// Last-sampled raw reading.
    #[must_use]
    pub fn raw_value(&self) -> f64 {
        self.raw_value
    }

    /// Record a fresh raw sample.
    pub fn set_raw_value(&mut self, raw: f64) {
        self.raw_value = raw;
    }

    /// The raw reading scaled by the calibration factor.
    #[must_use]
    pub fn calibrated(&self) -> f64 {
        self.raw_value * self.calibration
    }

    /// True iff an alarm threshold is set and the *raw* reading meets or
    /// exceeds it. The threshold compares the raw value, never the
    /// calibrated one — this is the existing contract.
    #[must_use]
    pub fn has_alarm(&self) -> bool {
        self.alarm.is_some_and(|threshold| self.raw_value >= threshold)
    }
}
