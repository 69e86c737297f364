//! Service configuration management

use anyhow::{Context, Result};
use sports_feed::FeedConfig;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Main service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Upstream sources and refresh cadence
    pub feed: FeedConfig,

    /// HTTP server settings
    pub server: ServerSettings,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Address to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// How long to wait for the refresh task on shutdown, in seconds
    pub shutdown_timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty)
    pub format: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8081, shutdown_timeout_secs: 10 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("Invalid bind host: {}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Load configuration from the process environment
pub fn load_config() -> Result<ServiceConfig> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Load configuration through an arbitrary variable lookup
pub fn load_from_lookup<F>(lookup: F) -> Result<ServiceConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let feed = FeedConfig::from_lookup(&lookup).context("Invalid feed configuration")?;

    let mut config =
        ServiceConfig { feed, server: ServerSettings::default(), logging: LoggingConfig::default() };

    load_from_env(&mut config, &lookup)?;
    validate_config(&config)?;

    Ok(config)
}

/// Override defaults with environment variables
fn load_from_env<F>(config: &mut ServiceConfig, lookup: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("FEED_HOST") {
        config.server.host = host.trim().to_string();
    }

    if let Some(port) = lookup("FEED_PORT") {
        config.server.port =
            port.trim().parse().with_context(|| format!("Invalid FEED_PORT: {port}"))?;
    }

    if let Some(timeout) = lookup("FEED_SHUTDOWN_TIMEOUT_SECS") {
        config.server.shutdown_timeout_secs = timeout
            .trim()
            .parse()
            .with_context(|| format!("Invalid FEED_SHUTDOWN_TIMEOUT_SECS: {timeout}"))?;
    }

    if let Some(level) = lookup("FEED_LOG_LEVEL") {
        config.logging.level = level.trim().to_lowercase();
    }

    if let Some(format) = lookup("FEED_LOG_FORMAT") {
        config.logging.format = format.trim().to_lowercase();
    }

    Ok(())
}

/// Validate configuration
fn validate_config(config: &ServiceConfig) -> Result<()> {
    config.server.socket_addr()?;

    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow::anyhow!("Invalid log level: {}", config.logging.level)),
    }

    match config.logging.format.as_str() {
        "json" | "pretty" => {}
        _ => return Err(anyhow::anyhow!("Invalid log format: {}", config.logging.format)),
    }

    Ok(())
}
