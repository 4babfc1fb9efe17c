//! # brewd — brewing-rig controller daemon
//!
//! Composition root that wires the adapters together and runs the
//! polling loop.
//!
//! ## Responsibilities
//! - Load configuration (TOML file, env var overrides)
//! - Initialize tracing
//! - Build the controller from the rig description
//! - Hand the command registry to the Telegram dispatcher task
//! - Run the polling loop until the process is terminated
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use brewery_adapter_sim::SimPins;
use brewery_adapter_telegram::TelegramChannel;
use brewery_app::controller::Controller;
use brewery_app::ports::LogChannel;
use tracing_subscriber::EnvFilter;

use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // The simulated pin bank stands in for the GPIO / one-wire drivers.
    let pins = Arc::new(SimPins::new());
    let mut controller = Controller::new(&config.rig, pins.clone(), pins)?;
    controller.set_poll_interval(Duration::from_secs(config.controller.poll_interval_secs));

    if config.telegram.token.is_empty() {
        tracing::warn!("no telegram token configured, notifications go to the log");
        tokio::select! {
            () = controller.run(LogChannel) => {}
            _ = tokio::signal::ctrl_c() => tracing::info!("shutting down"),
        }
    } else {
        let channel = Arc::new(TelegramChannel::new(config.telegram));
        tokio::spawn(Arc::clone(&channel).run_dispatcher(controller.registry()));
        tokio::select! {
            () = controller.run(channel) => {}
            _ = tokio::signal::ctrl_c() => tracing::info!("shutting down"),
        }
    }

    Ok(())
}
