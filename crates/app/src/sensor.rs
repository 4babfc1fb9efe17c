//! Sensor variants — flow meter, temperature probe, CO2 meter.
//!
//! Every variant exposes the same two operations: `update_value()`
//! refreshes the raw reading from its source, `get_value()` forces a
//! fresh sample and returns the calibrated reading. Chat handlers report
//! the last raw sample as-is; only the polling loop and `get_value()`
//! touch the hardware.

use std::sync::{Arc, Mutex};

use brewery_domain::command::CommandTarget;
use brewery_domain::entity::EntityInfo;
use brewery_domain::error::BreweryError;
use brewery_domain::sensor::SensorCore;

use crate::ports::TemperatureProbe;
use crate::registry::{CommandHandler, CommandRegistry};

/// Reported by an uninstrumented temperature sensor (no pin configured).
pub const UNINSTRUMENTED: f64 = -100.0;

/// The flow counter wraps back to zero once it passes this count.
const FLOW_WRAP: f64 = 1000.0;

/// Variant-specific sampling behavior and resources.
pub enum SensorKind {
    /// Monotonic pulse counter; stands in for a real flow transducer.
    Flow,
    /// One-wire temperature probe on `pin`; `None` means uninstrumented.
    Temperature {
        pin: Option<u8>,
        probe: Arc<dyn TemperatureProbe>,
    },
    /// Pseudo-random stand-in for an unimplemented hardware path.
    Co2,
}

/// A sensor: identity, shared core state, and a sampling variant.
pub struct Sensor {
    info: EntityInfo,
    core: Mutex<SensorCore>,
    kind: SensorKind,
}

impl Sensor {
    /// Assemble a sensor from its parts. Commands are registered
    /// separately via [`register_commands`](Self::register_commands).
    #[must_use]
    pub fn new(info: EntityInfo, core: SensorCore, kind: SensorKind) -> Self {
        Self {
            info,
            core: Mutex::new(core),
            kind,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Unique dispatch key.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.info.slug
    }

    /// The chat command this variant answers to.
    #[must_use]
    pub fn command(&self) -> &'static str {
        match self.kind {
            SensorKind::Flow => "/flow",
            SensorKind::Temperature { .. } => "/temp",
            SensorKind::Co2 => "/co2",
        }
    }

    /// Refresh the raw reading from the variant's source.
    pub fn update_value(&self) {
        match &self.kind {
            SensorKind::Flow => {
                let mut core = self.lock_core();
                let next = core.raw_value() + 1.0;
                core.set_raw_value(if next > FLOW_WRAP { 0.0 } else { next });
            }
            SensorKind::Temperature { pin: None, .. } => {
                self.lock_core().set_raw_value(UNINSTRUMENTED);
            }
            SensorKind::Temperature {
                pin: Some(pin),
                probe,
            } => match probe.read(*pin) {
                Some(celsius) => self.lock_core().set_raw_value(celsius),
                // Invalid reads are absorbed; the previous value stands.
                None => tracing::debug!(
                    sensor = %self.info.slug,
                    "invalid temperature read, keeping previous value"
                ),
            },
            SensorKind::Co2 => {
                self.lock_core().set_raw_value(rand::random::<f64>() * 100.0);
            }
        }
    }

    /// Force a fresh sample, then return the calibrated reading.
    pub fn get_value(&self) -> f64 {
        self.update_value();
        self.lock_core().calibrated()
    }

    /// Last raw sample, without resampling.
    #[must_use]
    pub fn raw_value(&self) -> f64 {
        self.lock_core().raw_value()
    }

    /// Replace the calibration factor.
    pub fn set_calibration(&self, calibration: f64) {
        self.lock_core().set_calibration(calibration);
    }

    /// Arm the alarm at `threshold`.
    pub fn set_alarm(&self, threshold: f64) {
        self.lock_core().set_alarm(threshold);
    }

    /// True iff the alarm is armed and the raw reading meets it.
    #[must_use]
    pub fn has_alarm(&self) -> bool {
        self.lock_core().has_alarm()
    }

    /// Register this sensor's command under its own slug and under the
    /// wildcard, with a handler reporting the last raw sample.
    ///
    /// # Errors
    ///
    /// Propagates registry validation failures.
    pub fn register_commands(
        self: &Arc<Self>,
        registry: &mut CommandRegistry,
    ) -> Result<(), BreweryError> {
        let command = self.command();
        let sensor = Arc::clone(self);
        let handler: CommandHandler = Arc::new(move |_msg| sensor.report());
        registry.register(command, CommandTarget::slug(self.slug()), Arc::clone(&handler))?;
        registry.register(command, CommandTarget::Wildcard, handler)
    }

    /// Human-readable report of the last raw sample.
    fn report(&self) -> String {
        let raw = self.raw_value();
        match self.kind {
            SensorKind::Flow => format!("Flow in {} is {raw} liters", self.info.name),
            SensorKind::Temperature { .. } => format!("{} temperature is {raw}", self.info.name),
            SensorKind::Co2 => format!("{} CO2 is {raw}", self.info.name),
        }
    }

    fn lock_core(&self) -> std::sync::MutexGuard<'_, SensorCore> {
        self.core
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewery_domain::slug::SlugGenerator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Probe double: scripted reading plus a read counter.
    struct ScriptedProbe {
        reading: Mutex<Option<f64>>,
        reads: AtomicUsize,
    }

    impl ScriptedProbe {
        fn returning(reading: Option<f64>) -> Arc<Self> {
            Arc::new(Self {
                reading: Mutex::new(reading),
                reads: AtomicUsize::new(0),
            })
        }

        fn set(&self, reading: Option<f64>) {
            *self.reading.lock().unwrap() = reading;
        }

        fn read_count(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl TemperatureProbe for ScriptedProbe {
        fn read(&self, _pin: u8) -> Option<f64> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            *self.reading.lock().unwrap()
        }
    }

    fn info(name: &str) -> EntityInfo {
        EntityInfo::new(name, None, &mut SlugGenerator::new())
    }

    fn flow_sensor(name: &str) -> Sensor {
        Sensor::new(info(name), SensorCore::new(), SensorKind::Flow)
    }

    fn temp_sensor(name: &str, pin: Option<u8>, probe: Arc<ScriptedProbe>) -> Sensor {
        Sensor::new(
            info(name),
            SensorCore::new(),
            SensorKind::Temperature { pin, probe },
        )
    }

    #[test]
    fn should_increment_flow_counter_per_update() {
        let sensor = flow_sensor("Chiller line");
        sensor.update_value();
        sensor.update_value();
        assert!((sensor.raw_value() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_wrap_flow_counter_to_zero_after_1001_updates() {
        let sensor = flow_sensor("Chiller line");
        for _ in 0..1000 {
            sensor.update_value();
        }
        assert!((sensor.raw_value() - 1000.0).abs() < f64::EPSILON);
        sensor.update_value();
        assert!((sensor.raw_value() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_report_sentinel_when_no_pin_is_configured() {
        let probe = ScriptedProbe::returning(Some(42.0));
        let sensor = temp_sensor("Mash tun", None, probe);
        sensor.set_calibration(3.0);
        sensor.update_value();
        assert!((sensor.raw_value() - UNINSTRUMENTED).abs() < f64::EPSILON);
    }

    #[test]
    fn should_take_reading_from_probe() {
        let probe = ScriptedProbe::returning(Some(63.5));
        let sensor = temp_sensor("Mash tun", Some(4), Arc::clone(&probe));
        sensor.update_value();
        assert!((sensor.raw_value() - 63.5).abs() < f64::EPSILON);
    }

    #[test]
    fn should_retain_previous_value_on_invalid_read() {
        let probe = ScriptedProbe::returning(Some(63.5));
        let sensor = temp_sensor("Mash tun", Some(4), Arc::clone(&probe));
        sensor.update_value();
        probe.set(None);
        sensor.update_value();
        assert!((sensor.raw_value() - 63.5).abs() < f64::EPSILON);
    }

    #[test]
    fn should_sample_exactly_once_per_get_value() {
        let probe = ScriptedProbe::returning(Some(20.0));
        let sensor = temp_sensor("Mash tun", Some(4), Arc::clone(&probe));
        let _ = sensor.get_value();
        assert_eq!(probe.read_count(), 1);
        let _ = sensor.get_value();
        assert_eq!(probe.read_count(), 2);
    }

    #[test]
    fn should_apply_calibration_on_get_value() {
        let sensor = flow_sensor("Chiller line");
        sensor.set_calibration(2.0);
        // First update makes the raw counter 1, calibrated 2.
        assert!((sensor.get_value() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_produce_co2_readings_within_range() {
        let sensor = Sensor::new(info("Fermenter"), SensorCore::new(), SensorKind::Co2);
        for _ in 0..100 {
            sensor.update_value();
            let raw = sensor.raw_value();
            assert!((0.0..100.0).contains(&raw), "out of range: {raw}");
        }
    }

    #[test]
    fn should_register_command_under_slug_and_wildcard() {
        let sensor = Arc::new(flow_sensor("Chiller line"));
        let mut registry = CommandRegistry::default();
        sensor.register_commands(&mut registry).unwrap();

        let slug = CommandTarget::slug(sensor.slug());
        assert_eq!(registry.resolve("/flow", &slug).len(), 1);
        assert_eq!(registry.resolve("/flow", &CommandTarget::Wildcard).len(), 1);
    }

    #[test]
    fn should_report_raw_value_without_resampling() {
        let sensor = Arc::new(flow_sensor("Chiller line"));
        let mut registry = CommandRegistry::default();
        sensor.register_commands(&mut registry).unwrap();
        sensor.update_value();

        let handlers = registry.resolve("/flow", &CommandTarget::Wildcard);
        let reply = handlers[0]("/flow *");
        assert_eq!(reply, "Flow in Chiller line is 1 liters");
        // Reporting must not trigger a fresh sample.
        assert!((sensor.raw_value() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_answer_variant_specific_commands() {
        let probe = ScriptedProbe::returning(None);
        assert_eq!(flow_sensor("a").command(), "/flow");
        assert_eq!(temp_sensor("b", None, probe).command(), "/temp");
        let co2 = Sensor::new(info("c"), SensorCore::new(), SensorKind::Co2);
        assert_eq!(co2.command(), "/co2");
    }

    #[test]
    fn should_alarm_through_the_sensor_facade() {
        let sensor = flow_sensor("Chiller line");
        sensor.set_alarm(2.0);
        sensor.update_value();
        assert!(!sensor.has_alarm());
        sensor.update_value();
        assert!(sensor.has_alarm());
    }
}
