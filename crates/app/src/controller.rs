//! Controller — builds the entity set, owns the registry, runs the loop.
//!
//! One poll cycle: sample every sensor, turn alarm conditions into
//! notifications, drain the queue into the channel (LIFO), sleep. The
//! loop never terminates on its own; process shutdown is the only exit.

use std::sync::Arc;
use std::time::Duration;

use brewery_domain::entity::EntityInfo;
use brewery_domain::error::BreweryError;
use brewery_domain::notification::Notification;
use brewery_domain::sensor::SensorCore;
use brewery_domain::slug::SlugGenerator;

use crate::actuator::{Actuator, ActuatorKind};
use crate::ports::{DigitalOutput, NotificationChannel, TemperatureProbe};
use crate::registry::CommandRegistry;
use crate::rig::{ActuatorType, EntityEntry, RigSpec, SensorType};
use crate::sensor::{Sensor, SensorKind};

/// Priority tag on every notification this controller raises. The value
/// is opaque to the core and passed through to the channel.
pub const NOTIFICATION_PRIORITY: u8 = 1;

/// Delivered once at startup to prove the channel works end to end.
const SMOKE_TEST_MESSAGE: &str = "This is a test";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// The brewing-rig controller.
pub struct Controller {
    sensors: Vec<Arc<Sensor>>,
    actuators: Vec<Arc<Actuator>>,
    registry: Arc<CommandRegistry>,
    notifications: Vec<Notification>,
    poll_interval: Duration,
}

impl Controller {
    /// Build the entity set from the rig description.
    ///
    /// Entities are created in section order (sorted type tags, entry
    /// order within a tag), each self-registering its chat commands. The
    /// slug generator is owned by this call, so every controller starts
    /// its slug namespace fresh.
    ///
    /// # Errors
    ///
    /// Returns [`BreweryError::MissingOption`] when a heater has no
    /// `gpio` pin configured.
    pub fn new(
        rig: &RigSpec,
        probe: Arc<dyn TemperatureProbe>,
        output: Arc<dyn DigitalOutput>,
    ) -> Result<Self, BreweryError> {
        let mut slugs = SlugGenerator::new();
        let mut registry = CommandRegistry::default();

        let mut sensors = Vec::new();
        for (sensor_type, entries) in &rig.sensors {
            for (name, options) in entries.iter().flat_map(EntityEntry::items) {
                let info = EntityInfo::new(&name, options.slug.as_deref(), &mut slugs);
                let mut core = SensorCore::new();
                if let Some(threshold) = options.alarm {
                    core.set_alarm(threshold);
                }
                if let Some(calibration) = options.calibration {
                    core.set_calibration(calibration);
                }
                let kind = match sensor_type {
                    SensorType::Temperature => SensorKind::Temperature {
                        pin: options.gpio,
                        probe: Arc::clone(&probe),
                    },
                    SensorType::FlowMeter => SensorKind::Flow,
                    SensorType::CO2Meter => SensorKind::Co2,
                };
                let sensor = Arc::new(Sensor::new(info, core, kind));
                sensor.register_commands(&mut registry)?;
                tracing::debug!(slug = sensor.slug(), command = sensor.command(), "sensor ready");
                sensors.push(sensor);
            }
        }

        let mut actuators = Vec::new();
        for (actuator_type, entries) in &rig.active_elements {
            for (name, options) in entries.iter().flat_map(EntityEntry::items) {
                let info = EntityInfo::new(&name, options.slug.as_deref(), &mut slugs);
                let kind = match actuator_type {
                    ActuatorType::Heater => {
                        let pin = options.gpio.ok_or_else(|| BreweryError::MissingOption {
                            entity: name.clone(),
                            option: "gpio",
                        })?;
                        ActuatorKind::Heater {
                            pin,
                            output: Arc::clone(&output),
                        }
                    }
                    ActuatorType::Mixer => ActuatorKind::Mixer,
                    ActuatorType::Valve => ActuatorKind::Valve,
                };
                let actuator = Arc::new(Actuator::new(info, kind));
                actuator.register_commands(&mut registry)?;
                tracing::debug!(slug = actuator.slug(), "actuator ready");
                actuators.push(actuator);
            }
        }

        Ok(Self {
            sensors,
            actuators,
            registry: Arc::new(registry),
            notifications: vec![Notification::new(SMOKE_TEST_MESSAGE, NOTIFICATION_PRIORITY)],
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Replace the fixed sleep between poll cycles (default 5 s).
    pub fn set_poll_interval(&mut self, interval: Duration) {
        self.poll_interval = interval;
    }

    /// The populated command registry, to hand to the chat adapter.
    ///
    /// Read-only from here on; sharing it needs no locking.
    #[must_use]
    pub fn registry(&self) -> Arc<CommandRegistry> {
        Arc::clone(&self.registry)
    }

    /// Sensors in construction order.
    #[must_use]
    pub fn sensors(&self) -> &[Arc<Sensor>] {
        &self.sensors
    }

    /// Actuators in construction order.
    #[must_use]
    pub fn actuators(&self) -> &[Arc<Actuator>] {
        &self.actuators
    }

    /// Run one poll cycle: sample, alarm-check, drain. No sleep.
    pub async fn poll_once<C: NotificationChannel>(&mut self, channel: &C) {
        for sensor in &self.sensors {
            sensor.update_value();
        }
        self.check_alarms();
        self.drain(channel).await;
    }

    /// Run the polling loop forever.
    pub async fn run<C: NotificationChannel>(mut self, channel: C) {
        tracing::info!(
            sensors = self.sensors.len(),
            actuators = self.actuators.len(),
            interval_secs = self.poll_interval.as_secs(),
            "controller polling"
        );
        loop {
            self.poll_once(&channel).await;
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn check_alarms(&mut self) {
        for sensor in &self.sensors {
            if sensor.has_alarm() {
                let message = format!("Alarm: {} reads {}", sensor.name(), sensor.raw_value());
                tracing::warn!(slug = sensor.slug(), %message, "alarm raised");
                self.notifications
                    .push(Notification::new(message, NOTIFICATION_PRIORITY));
            }
        }
    }

    /// Deliver queued notifications, most recent first (LIFO). A delivery
    /// failure drops that notification and moves on; it never aborts the
    /// loop.
    async fn drain<C: NotificationChannel>(&mut self, channel: &C) {
        while let Some(notification) = self.notifications.pop() {
            if let Err(err) = channel.send_notification(notification).await {
                tracing::warn!(%err, "failed to deliver notification");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::dispatch;
    use brewery_domain::command::CommandTarget;
    use std::future::Future;
    use std::sync::Mutex;

    /// Channel double recording delivery order.
    #[derive(Default)]
    struct RecordingChannel {
        sent: Mutex<Vec<Notification>>,
    }

    impl RecordingChannel {
        fn messages(&self) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|n| n.message.clone())
                .collect()
        }
    }

    impl NotificationChannel for RecordingChannel {
        fn send_notification(
            &self,
            notification: Notification,
        ) -> impl Future<Output = Result<(), BreweryError>> + Send {
            self.sent.lock().unwrap().push(notification);
            async { Ok(()) }
        }
    }

    /// Channel double that rejects everything.
    struct FailingChannel;

    impl NotificationChannel for FailingChannel {
        fn send_notification(
            &self,
            _notification: Notification,
        ) -> impl Future<Output = Result<(), BreweryError>> + Send {
            async { Err(BreweryError::Channel("down".into())) }
        }
    }

    /// Pin double: fixed temperature, recorded writes.
    #[derive(Default)]
    struct StubPins;

    impl TemperatureProbe for StubPins {
        fn read(&self, _pin: u8) -> Option<f64> {
            Some(20.0)
        }
    }

    impl DigitalOutput for StubPins {
        fn write(&self, _pin: u8, _level: bool) {}
    }

    fn pins() -> Arc<StubPins> {
        Arc::new(StubPins)
    }

    fn build(rig_toml: &str) -> Controller {
        let rig: RigSpec = toml::from_str(rig_toml).unwrap();
        let pins = pins();
        Controller::new(&rig, pins.clone(), pins).unwrap()
    }

    #[test]
    fn should_build_entities_from_the_rig_description() {
        let controller = build(
            r#"
            [sensors]
            Temperature = [{ "Mash tun" = { gpio = 4 } }]
            FlowMeter = ["Chiller line"]
            CO2Meter = ["Fermenter"]

            [active_elements]
            Heater = [{ "Boil kettle" = { gpio = 17 } }]
            Mixer = ["Mash mixer"]
            Valve = ["Drain valve"]
            "#,
        );
        assert_eq!(controller.sensors().len(), 3);
        assert_eq!(controller.actuators().len(), 3);
    }

    #[test]
    fn should_register_every_sensor_command() {
        let controller = build(
            r#"
            [sensors]
            Temperature = ["Mash tun"]
            FlowMeter = ["Chiller line"]
            CO2Meter = ["Fermenter"]
            "#,
        );
        let registry = controller.registry();
        for command in ["/temp", "/flow", "/co2"] {
            assert_eq!(registry.resolve(command, &CommandTarget::Wildcard).len(), 1);
        }
    }

    #[test]
    fn should_give_samename_entities_distinct_slugs() {
        let controller = build(
            r#"
            [sensors]
            CO2Meter = ["Sensor", "Sensor"]
            "#,
        );
        let slugs: Vec<&str> = controller.sensors().iter().map(|s| s.slug()).collect();
        assert_eq!(slugs, ["sensor", "sensor-1"]);
    }

    #[test]
    fn should_restart_slug_namespace_per_controller() {
        let first = build(r#"[sensors]
CO2Meter = ["Fermenter"]"#);
        let second = build(r#"[sensors]
CO2Meter = ["Fermenter"]"#);
        assert_eq!(first.sensors()[0].slug(), "fermenter");
        assert_eq!(second.sensors()[0].slug(), "fermenter");
    }

    #[test]
    fn should_fail_on_heater_without_gpio() {
        let rig: RigSpec = toml::from_str(
            r#"
            [active_elements]
            Heater = ["Boil kettle"]
            "#,
        )
        .unwrap();
        let pins = pins();
        let result = Controller::new(&rig, pins.clone(), pins);
        assert!(matches!(
            result,
            Err(BreweryError::MissingOption { option: "gpio", .. })
        ));
    }

    #[tokio::test]
    async fn should_deliver_the_startup_smoke_test_first() {
        let mut controller = build("");
        let channel = RecordingChannel::default();
        controller.poll_once(&channel).await;
        assert_eq!(channel.messages(), ["This is a test"]);
    }

    #[tokio::test]
    async fn should_drain_alarms_lifo() {
        // Both flow sensors alarm on the very first poll (raw 1 >= 1).
        let mut controller = build(
            r#"
            [sensors]
            FlowMeter = [
                { "First" = { alarm = 1.0 } },
                { "Second" = { alarm = 1.0 } },
            ]
            "#,
        );
        let channel = RecordingChannel::default();
        controller.poll_once(&channel).await;

        // Second's alarm was raised after First's, so it goes out first;
        // the startup smoke test sits at the bottom of the stack.
        assert_eq!(
            channel.messages(),
            [
                "Alarm: Second reads 1",
                "Alarm: First reads 1",
                "This is a test",
            ]
        );
    }

    #[tokio::test]
    async fn should_not_alarm_below_threshold() {
        let mut controller = build(
            r#"
            [sensors]
            FlowMeter = [{ "Chiller line" = { alarm = 100.0 } }]
            "#,
        );
        let channel = RecordingChannel::default();
        controller.poll_once(&channel).await;
        assert_eq!(channel.messages(), ["This is a test"]);
    }

    #[tokio::test]
    async fn should_survive_channel_failures() {
        let mut controller = build(
            r#"
            [sensors]
            FlowMeter = [{ "Chiller line" = { alarm = 1.0 } }]
            "#,
        );
        controller.poll_once(&FailingChannel).await;

        // Failed deliveries are dropped, not re-queued.
        let channel = RecordingChannel::default();
        controller.poll_once(&channel).await;
        assert_eq!(channel.messages(), ["Alarm: Chiller line reads 2"]);
    }

    #[tokio::test]
    async fn should_dispatch_a_sensor_command_through_the_registry() {
        let mut controller = build(
            r#"
            [sensors]
            FlowMeter = ["Chiller line"]
            "#,
        );
        let channel = RecordingChannel::default();
        controller.poll_once(&channel).await;

        let registry = controller.registry();
        let reply = dispatch(
            &registry,
            "/flow",
            &CommandTarget::slug("chiller-line"),
            "/flow chiller-line",
        );
        assert_eq!(reply.as_deref(), Some("Flow in Chiller line is 1 liters"));
    }

    #[tokio::test]
    async fn should_address_one_sensor_without_reaching_its_siblings() {
        let mut controller = build(
            r#"
            [sensors]
            FlowMeter = ["First", "Second"]
            "#,
        );
        let channel = RecordingChannel::default();
        controller.poll_once(&channel).await;

        let registry = controller.registry();
        let reply = dispatch(&registry, "/flow", &CommandTarget::slug("first"), "/flow first");
        assert_eq!(reply.as_deref(), Some("Flow in First is 1 liters"));

        let reply = dispatch(&registry, "/flow", &CommandTarget::Wildcard, "/flow *");
        assert_eq!(
            reply.as_deref(),
            Some("Flow in First is 1 liters\nFlow in Second is 1 liters")
        );
    }
}
