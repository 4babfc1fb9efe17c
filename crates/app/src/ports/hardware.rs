//! Hardware ports — pin-addressed driver access consumed by the core.
//!
//! Both traits are synchronous: a one-wire temperature read is a short
//! blocking bit-bang and a relay write is a register poke. They are object
//! safe so entities can hold them as `Arc<dyn _>`.

/// Pin-addressed temperature reader (DHT11-style one-wire probe).
pub trait TemperatureProbe: Send + Sync {
    /// Read the temperature on `pin` in degrees Celsius.
    ///
    /// Returns `None` when the read was invalid (checksum failure, probe
    /// missing). Callers absorb invalid reads and retain the previous
    /// value; they are never treated as errors.
    fn read(&self, pin: u8) -> Option<f64>;
}

/// Pin-addressed digital output (relay driver).
pub trait DigitalOutput: Send + Sync {
    /// Drive `pin` high (`true`) or low (`false`).
    fn write(&self, pin: u8, level: bool);
}
