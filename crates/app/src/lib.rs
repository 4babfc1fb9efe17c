//! # brewery-app
//!
//! Application core for the brewd brewing-rig controller.
//!
//! ## Responsibilities
//! - The **command registry**: maps a chat command plus a target selector
//!   (entity slug or wildcard) to an ordered list of handlers
//! - **Sensor** and **actuator** variants built from the declarative rig
//!   description, each self-registering its chat commands
//! - The **controller**: construction from a [`rig::RigSpec`], the
//!   polling/alarm loop, and the LIFO notification drain
//! - **Ports** (traits) for the hardware drivers and the chat channel;
//!   concrete implementations live in adapter crates

pub mod actuator;
pub mod controller;
pub mod ports;
pub mod registry;
pub mod rig;
pub mod sensor;
