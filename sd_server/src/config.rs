//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated
//! configuration with CLI overrides layered on top.

use seotda::room::RoomConfig;
use std::net::SocketAddr;
use std::time::Duration;

/// Complete server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address.
    pub bind: SocketAddr,
    /// Optional Prometheus exporter bind address.
    pub metrics_bind: Option<SocketAddr>,
    /// Defaults applied to rooms whose creator omitted a parameter.
    pub room_defaults: RoomConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns an error when a variable parses but fails validation.
    pub fn from_env(bind_override: Option<SocketAddr>) -> Result<Self, ConfigError> {
        let bind = bind_override
            .or_else(|| {
                std::env::var("SERVER_BIND")
                    .ok()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or_else(|| {
                "127.0.0.1:7788"
                    .parse()
                    .expect("Default bind address is valid")
            });

        let metrics_bind = std::env::var("METRICS_BIND")
            .ok()
            .and_then(|s| s.parse().ok());

        let mut room_defaults = RoomConfig {
            start_chips: parse_env_or("ROOM_START_CHIPS", RoomConfig::default().start_chips),
            ante: parse_env_or("ROOM_ANTE", RoomConfig::default().ante),
            ..RoomConfig::default()
        };
        if let Some(millis) = std::env::var("ROOM_NEXT_ROUND_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            room_defaults.next_round_delay = Duration::from_millis(millis);
        }

        let config = Self {
            bind,
            metrics_bind,
            room_defaults,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the room defaults describe an
    /// unplayable stake structure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.room_defaults
            .validate()
            .map_err(|e| ConfigError::Invalid {
                var: "ROOM_START_CHIPS/ROOM_ANTE".to_string(),
                reason: e.to_string(),
            })?;

        if self.room_defaults.next_round_delay.is_zero() {
            return Err(ConfigError::Invalid {
                var: "ROOM_NEXT_ROUND_DELAY_MS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback.
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
