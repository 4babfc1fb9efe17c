//! Actuator variants — heater relay, mixer, valve.
//!
//! `turn_on`/`turn_off` are the only mutators of the tracked state: each
//! calls the variant's `activate` side effect and then records the
//! boolean. The heater's chat commands call `activate` directly and leave
//! the tracked state untouched — that asymmetry is part of the contract
//! (see `register_commands`).

use std::sync::{Arc, Mutex};

use brewery_domain::command::CommandTarget;
use brewery_domain::entity::EntityInfo;
use brewery_domain::error::BreweryError;

use crate::ports::DigitalOutput;
use crate::registry::{CommandHandler, CommandRegistry};

/// Variant-specific side effect and resources.
pub enum ActuatorKind {
    /// Relay on a physical output pin.
    Heater {
        pin: u8,
        output: Arc<dyn DigitalOutput>,
    },
    /// Stand-in actuator; a real rig would drive a motor controller here.
    Mixer,
    /// Stand-in actuator; a real rig would drive a solenoid here.
    Valve,
}

/// An actuator: identity, tracked on/off state, and a side-effect variant.
pub struct Actuator {
    info: EntityInfo,
    state: Mutex<bool>,
    kind: ActuatorKind,
}

impl Actuator {
    /// Assemble an actuator; the tracked state starts off.
    #[must_use]
    pub fn new(info: EntityInfo, kind: ActuatorKind) -> Self {
        Self {
            info,
            state: Mutex::new(false),
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

    /// Tracked on/off state. Only `turn_on`/`turn_off` mutate it.
    #[must_use]
    pub fn state(&self) -> bool {
        *self.lock_state()
    }

    /// Fire the variant's side effect and return its observable result.
    ///
    /// Does **not** touch the tracked state.
    pub fn activate(&self, on: bool) -> String {
        match &self.kind {
            ActuatorKind::Heater { pin, output } => {
                output.write(*pin, on);
                if on {
                    "The heater relay is ON".to_string()
                } else {
                    "The heater relay is OFF".to_string()
                }
            }
            ActuatorKind::Mixer => {
                let glyph = if on { "X" } else { " " };
                tracing::info!(mixer = %self.info.slug, glyph, "mixer");
                glyph.to_string()
            }
            ActuatorKind::Valve => {
                let glyph = if on { "O" } else { "." };
                tracing::info!(valve = %self.info.slug, glyph, "valve");
                glyph.to_string()
            }
        }
    }

    /// Activate, then record the state as on.
    pub fn turn_on(&self) {
        self.activate(true);
        *self.lock_state() = true;
    }

    /// Deactivate, then record the state as off.
    pub fn turn_off(&self) {
        self.activate(false);
        *self.lock_state() = false;
    }

    /// Register the heater's chat toggles (`/onheater`, `/offheater`)
    /// under its slug and the wildcard; other variants register nothing.
    ///
    /// The handlers call [`activate`](Self::activate) directly, so
    /// chat-triggered toggles bypass the tracked state. Intent in the rig
    /// is unclear, so the behavior is kept as-is rather than unified with
    /// `turn_on`/`turn_off`.
    ///
    /// # Errors
    ///
    /// Propagates registry validation failures.
    pub fn register_commands(
        self: &Arc<Self>,
        registry: &mut CommandRegistry,
    ) -> Result<(), BreweryError> {
        if !matches!(self.kind, ActuatorKind::Heater { .. }) {
            return Ok(());
        }
        let slug = self.slug().to_string();
        let on_handler: CommandHandler = {
            let actuator = Arc::clone(self);
            Arc::new(move |_msg| actuator.activate(true))
        };
        let off_handler: CommandHandler = {
            let actuator = Arc::clone(self);
            Arc::new(move |_msg| actuator.activate(false))
        };
        registry.register("/onheater", CommandTarget::slug(&slug), Arc::clone(&on_handler))?;
        registry.register("/onheater", CommandTarget::Wildcard, on_handler)?;
        registry.register("/offheater", CommandTarget::slug(&slug), Arc::clone(&off_handler))?;
        registry.register("/offheater", CommandTarget::Wildcard, off_handler)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, bool> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
