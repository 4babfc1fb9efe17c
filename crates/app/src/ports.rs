//! Ports — IO boundaries expressed as traits.
//!
//! Adapters implement these; the core only ever talks to the traits.

pub mod channel;
pub mod hardware;

pub use channel::{LogChannel, NotificationChannel};
pub use hardware::{DigitalOutput, TemperatureProbe};
