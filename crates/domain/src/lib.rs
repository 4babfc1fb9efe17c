//! # brewery-domain
//!
//! Pure domain model for the brewd brewing-rig controller.
//!
//! ## Responsibilities
//! - Entity identity and the collision-resolving slug generator
//! - Sensor core state (calibration, alarm threshold, raw reading)
//! - **Notifications** (message + priority records queued for the chat channel)
//! - **Command targets** (a specific slug, or the wildcard selector)
//! - Error conventions shared across the workspace
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod command;
pub mod entity;
pub mod error;
pub mod notification;
pub mod sensor;
pub mod slug;
