//! Configuration and settings management
//!
//! Loads settings from environment variables and optional config files.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token
    pub telegram_token: String,

    /// Remote host to run diagnostic commands on
    pub ssh_host: String,
    /// SSH port of the remote host
    #[serde(default = "default_ssh_port")]
    pub ssh_port: u16,
    /// SSH user name
    pub ssh_username: String,
    /// SSH password
    pub ssh_password: String,

    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

const fn default_ssh_port() -> u16 {
    22
}

fn default_database_path() -> String {
    "bot.db".to_string()
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails or a required key is missing.
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            // Optional file-based configuration, not checked into git
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Environment::default() auto-converts UPPER_SNAKE_CASE to snake_case;
            // ignore_empty treats empty env vars as unset
            .add_source(Environment::default().ignore_empty(true))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    // Runs as a single test to avoid environment variable race conditions
    #[test]
    fn test_config_env_loading() -> Result<(), Box<dyn std::error::Error>> {
        env::set_var("TELEGRAM_TOKEN", "dummy_token");
        env::set_var("SSH_HOST", "203.0.113.7");
        env::set_var("SSH_USERNAME", "monitor");
        env::set_var("SSH_PASSWORD", "secret");

        let settings = Settings::new()?;
        assert_eq!(settings.telegram_token, "dummy_token");
        assert_eq!(settings.ssh_host, "203.0.113.7");
        // Defaults kick in for keys that were not set
        assert_eq!(settings.ssh_port, 22);
        assert_eq!(settings.database_path, "bot.db");

        env::set_var("SSH_PORT", "2222");
        env::set_var("DATABASE_PATH", "/var/lib/bot/bot.db");

        let settings = Settings::new()?;
        assert_eq!(settings.ssh_port, 2222);
        assert_eq!(settings.database_path, "/var/lib/bot/bot.db");

        for key in [
            "TELEGRAM_TOKEN",
            "SSH_HOST",
            "SSH_USERNAME",
            "SSH_PASSWORD",
            "SSH_PORT",
            "DATABASE_PATH",
        ] {
            env::remove_var(key);
        }
        Ok(())
    }
}
