use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Runtime configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_port: u16,
    /// Base URL of the metrics service. Polling is disabled when unset.
    pub metrics_url: Option<String>,
    pub poll_interval: Duration,
    pub fetch_timeout: Duration,
    pub cache_ttl: Duration,
    /// Program plus arguments of the external container-listing command.
    pub listing_command: Vec<String>,
    pub event_capacity: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

fn default_listing_command() -> Vec<String> {
    ["podman", "ps", "--format", "json"]
        .map(String::from)
        .to_vec()
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            listen_port: parse_var("BACKEND_PORT", 5174)?,
            metrics_url: std::env::var("METRICS_URL").ok().filter(|v| !v.is_empty()),
            poll_interval: Duration::from_millis(parse_var("POLL_INTERVAL_MS", 5000)?),
            fetch_timeout: Duration::from_millis(parse_var("FETCH_TIMEOUT_MS", 10_000)?),
            cache_ttl: Duration::from_millis(parse_var("CACHE_TTL_MS", 3000)?),
            listing_command: listing_command_from_env()?,
            event_capacity: parse_var("EVENT_LOG_CAPACITY", crate::events::DEFAULT_EVENT_CAPACITY)?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.listen_port)
    }

    /// Program and argv tail of the listing command.
    pub fn listing_command_parts(&self) -> (&str, &[String]) {
        match self.listing_command.split_first() {
            Some((program, args)) => (program, args),
            None => ("podman", &[]),
        }
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    let raw = match std::env::var(name) {
        Ok(v) if !v.is_empty() => v,
        _ => return Ok(default),
    };
    raw.parse()
        .map_err(|_| ConfigError::Invalid { name, value: raw })
}

fn listing_command_from_env() -> Result<Vec<String>, ConfigError> {
    match std::env::var("LISTING_COMMAND") {
        Ok(raw) if !raw.trim().is_empty() => Ok(raw.split_whitespace().map(String::from).collect()),
        Ok(raw) => Err(ConfigError::Invalid {
            name: "LISTING_COMMAND",
            value: raw,
        }),
        Err(_) => Ok(default_listing_command()),
    }
}
