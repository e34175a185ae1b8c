use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::engine::types::{AgentRecord, Schema};

pub const CONFIG_ENV: &str = "QUERY_BROKER_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub broker: BrokerConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub http_addr: String,
    /// Queries in flight at or above this count are refused with 503.
    #[serde(default = "default_max_in_flight_queries")]
    pub max_in_flight_queries: usize,
}

fn default_max_in_flight_queries() -> usize {
    256
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    pub query_timeout_ms: u64,
    #[serde(default = "default_channel_capacity")]
    pub agent_channel_capacity: usize,
    #[serde(default = "default_channel_capacity")]
    pub result_channel_capacity: usize,
    /// Run an in-process agent for every directory entry.
    #[serde(default)]
    pub local_agents: bool,
}

fn default_channel_capacity() -> usize {
    1024
}

impl BrokerConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub schema: Schema,
    #[serde(default)]
    pub agents: Vec<AgentRecord>,
}

// An hour is far beyond any sane scatter-gather wait.
const MAX_QUERY_TIMEOUT_MS: u64 = 60 * 60 * 1000;

impl Settings {
    fn validate(self) -> Result<Self, config::ConfigError> {
        let timeout = self.broker.query_timeout_ms;
        if timeout == 0 || timeout > MAX_QUERY_TIMEOUT_MS {
            return Err(config::ConfigError::Message(format!(
                "broker.query_timeout_ms must be between 1 and {MAX_QUERY_TIMEOUT_MS}, got {timeout}"
            )));
        }
        for (key, capacity) in [
            ("agent_channel_capacity", self.broker.agent_channel_capacity),
            ("result_channel_capacity", self.broker.result_channel_capacity),
        ] {
            if capacity == 0 {
                return Err(config::ConfigError::Message(format!(
                    "broker.{key} must be at least 1"
                )));
            }
        }
        if self.server.max_in_flight_queries == 0 {
            return Err(config::ConfigError::Message(
                "server.max_in_flight_queries must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var(CONFIG_ENV).unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

/// Loads settings from `path`; the extension may be omitted.
pub fn load_settings_from(path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()?
        .try_deserialize()?;

    settings.validate()
}
