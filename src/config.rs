use std::env;
use std::time::Duration;

use crate::error::ConfigError;
use crate::state::notification::DEFAULT_DURATION;

pub const API_URL_KEY: &str = "BANK_API_URL";
pub const MESSAGE_DURATION_KEY: &str = "BANK_MESSAGE_DURATION_MS";
pub const LOG_LEVEL_KEY: &str = "BANK_LOG_LEVEL";

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    pub api_url: String,
    pub message_duration: Duration,
    pub log_level: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            api_url: DEFAULT_API_URL.to_string(),
            message_duration: DEFAULT_DURATION,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<ConsoleConfig, ConfigError> {
        dotenv::dotenv().ok();
        ConsoleConfig::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<ConsoleConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConsoleConfig::default();

        if let Some(url) = lookup(API_URL_KEY).filter(|v| !v.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(MESSAGE_DURATION_KEY) {
            let millis = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidDuration {
                key: MESSAGE_DURATION_KEY,
                value: raw.clone(),
            })?;
            config.message_duration = Duration::from_millis(millis);
        }

        if let Some(level) = lookup(LOG_LEVEL_KEY).filter(|v| !v.trim().is_empty()) {
            config.log_level = level.trim().to_string();
        }

        Ok(config)
    }
}
