//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::game::ContactPolicy;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,

    /// What a player contact does to the round
    pub contact_policy: ContactPolicy,
    /// Seed for enemy timers; random when unset
    pub world_seed: Option<u64>,

    /// Snapshots buffered per connection before new ones are dropped
    pub client_buffer: usize,
    /// Keepalive ping period
    pub ping_interval: Duration,
    /// Inbound silence after which a connection is dropped
    pub client_timeout: Duration,

    /// Allowed client origins for CORS ("*" for any)
    pub client_origin: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // PORT wins over SERVER_ADDR for hosted deployments
        let server_addr = if let Ok(port) = env::var("PORT") {
            format!("0.0.0.0:{}", port)
        } else {
            env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        };

        let config = Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_json: matches!(env::var("LOG_FORMAT").as_deref(), Ok("json")),

            contact_policy: parse_or("CONTACT_POLICY", ContactPolicy::LogOnly)?,
            world_seed: parse_opt("WORLD_SEED")?,

            client_buffer: parse_or("CLIENT_BUFFER", 4)?,
            ping_interval: Duration::from_secs(parse_or("PING_INTERVAL_SECS", 5)?),
            client_timeout: Duration::from_secs(parse_or("CLIENT_TIMEOUT_SECS", 15)?),

            client_origin: env::var("CLIENT_ORIGIN").unwrap_or_else(|_| "*".to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.client_buffer == 0 {
            return Err(ConfigError::Invalid("CLIENT_BUFFER"));
        }
        if self.ping_interval.is_zero() {
            return Err(ConfigError::Invalid("PING_INTERVAL_SECS"));
        }
        if self.client_timeout <= self.ping_interval {
            return Err(ConfigError::Invalid("CLIENT_TIMEOUT_SECS"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_level: "info".to_string(),
            log_json: false,
            contact_policy: ContactPolicy::LogOnly,
            world_seed: None,
            client_buffer: 4,
            ping_interval: Duration::from_secs(5),
            client_timeout: Duration::from_secs(15),
            client_origin: "*".to_string(),
        }
    }
}

fn parse_opt<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(None),
    }
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    Ok(parse_opt(key)?.unwrap_or(default))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid server address format")]
    InvalidAddress,
}
