//! # brewery-adapter-sim
//!
//! Simulated pin bank implementing both hardware ports. On a real rig
//! this crate is replaced by a GPIO-backed adapter; here it serves the
//! demo binary and the test suites.
//!
//! ## Dependency rule
//!
//! Depends on `brewery-app` (port traits) only.

use std::collections::HashMap;
use std::sync::Mutex;

use brewery_app::ports::{DigitalOutput, TemperatureProbe};

/// In-memory pin bank.
///
/// Temperature pins answer with whatever was last set on them; pins with
/// no reading (or forced invalid) answer `None`, which the core treats as
/// an invalid hardware read. Output writes are recorded per pin.
#[derive(Debug, Default)]
pub struct SimPins {
    temperatures: Mutex<HashMap<u8, Option<f64>>>,
    outputs: Mutex<HashMap<u8, bool>>,
}

impl SimPins {
    /// Empty bank: every temperature read is invalid, no outputs driven.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `pin` answer with `celsius` on the next reads.
    pub fn set_temperature(&self, pin: u8, celsius: f64) {
        self.lock_temperatures().insert(pin, Some(celsius));
    }

    /// Force invalid reads on `pin` until a new temperature is set.
    pub fn set_invalid(&self, pin: u8) {
        self.lock_temperatures().insert(pin, None);
    }

    /// The last level written to `pin`, if any.
    #[must_use]
    pub fn output_level(&self, pin: u8) -> Option<bool> {
        self.lock_outputs().get(&pin).copied()
    }

    fn lock_temperatures(&self) -> std::sync::MutexGuard<'_, HashMap<u8, Option<f64>>> {
        self.temperatures
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock_outputs(&self) -> std::sync::MutexGuard<'_, HashMap<u8, bool>> {
        self.outputs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TemperatureProbe for SimPins {
    fn read(&self, pin: u8) -> Option<f64> {
        self.lock_temperatures().get(&pin).copied().flatten()
    }
}

impl DigitalOutput for SimPins {
    fn write(&self, pin: u8, level: bool) {
        tracing::debug!(pin, level, "sim output");
        self.lock_outputs().insert(pin, level);
    }
}
