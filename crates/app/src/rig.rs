//! Declarative rig description — the configuration boundary.
//!
//! The controller is built from two sections: `sensors` and
//! `active_elements`, each mapping a type tag to a list of entries. An
//! entry is either a bare name (defaults apply) or a single-key map from
//! the name to an options record. Maps are ordered (`BTreeMap`) so
//! construction order is deterministic.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Sensor type tags recognized in the `sensors` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub enum SensorType {
    Temperature,
    FlowMeter,
    CO2Meter,
}

/// Actuator type tags recognized in the `active_elements` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub enum ActuatorType {
    Heater,
    Mixer,
    Valve,
}

/// Per-entity options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EntityOptions {
    /// Pin identifier for hardware-backed entities.
    pub gpio: Option<u8>,
    /// Alarm threshold compared against the raw reading.
    pub alarm: Option<f64>,
    /// Explicit slug override; derived from the name when absent.
    pub slug: Option<String>,
    /// Calibration factor; defaults to 1.0.
    pub calibration: Option<f64>,
}

/// One configured entity: a bare name, or a name mapped to options.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EntityEntry {
    /// `"Mash tun"` — defaults apply.
    Name(String),
    /// `{ "Mash tun" = { gpio = 4, alarm = 78.0 } }`.
    WithOptions(BTreeMap<String, EntityOptions>),
}

impl EntityEntry {
    /// Flatten the entry into `(name, options)` pairs.
    pub(crate) fn items(&self) -> Vec<(String, EntityOptions)> {
        match self {
            Self::Name(name) => vec![(name.clone(), EntityOptions::default())],
            Self::WithOptions(map) => map
                .iter()
                .map(|(name, options)| (name.clone(), options.clone()))
                .collect(),
        }
    }
}

/// The whole rig: every sensor and active element to instantiate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RigSpec {
    /// Sensors by type tag.
    pub sensors: BTreeMap<SensorType, Vec<EntityEntry>>,
    /// Actuators by type tag.
    pub active_elements: BTreeMap<ActuatorType, Vec<EntityEntry>>,
}
