//! Sports Feed Service Library
//!
//! Configuration, logging, HTTP routes and shutdown handling for the service that
//! serves the latest normalized sports feed snapshot.

use anyhow::{Context, Result};

pub mod config;
pub mod logging;
pub mod rest_api;
pub mod signals;

pub use config::ServiceConfig;
pub use logging::initialize_logging;
pub use signals::{graceful_shutdown, setup_signal_handlers};

/// Load configuration from a `.env` file (if present) and the environment
pub fn load_configuration() -> Result<ServiceConfig> {
    dotenv::dotenv().ok();
    config::load_config().context("Failed to load service configuration")
}
