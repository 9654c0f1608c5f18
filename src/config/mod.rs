//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `CHAT_RELAY` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use chat_relay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod batching;
mod database;
mod error;
mod openai;
mod server;
mod twilio;

pub use batching::BatchingConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use openai::OpenAiConfig;
pub use server::{Environment, LogFormat, ServerConfig};
pub use twilio::TwilioAccountConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Debounce window and flush timeouts
    #[serde(default)]
    pub batching: BatchingConfig,

    /// Reply generation (OpenAI Responses API)
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Outbound delivery (Twilio WhatsApp)
    #[serde(default)]
    pub twilio: TwilioAccountConfig,

    /// PostgreSQL; in-memory stores are used when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CHAT_RELAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `CHAT_RELAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CHAT_RELAY__BATCHING__DEBOUNCE_SECS=10` -> `batching.debounce_secs = 10`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CHAT_RELAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.batching.validate()?;
        self.openai.validate()?;
        self.twilio.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use std::time::Duration;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "CHAT_RELAY__OPENAI__API_KEY",
        "CHAT_RELAY__TWILIO__ACCOUNT_SID",
        "CHAT_RELAY__TWILIO__AUTH_TOKEN",
        "CHAT_RELAY__TWILIO__WHATSAPP_NUMBER",
        "CHAT_RELAY__SERVER__PORT",
        "CHAT_RELAY__SERVER__ENVIRONMENT",
        "CHAT_RELAY__BATCHING__DEBOUNCE_SECS",
        "CHAT_RELAY__DATABASE__URL",
    ];

    fn set_minimal_env() {
        env::set_var("CHAT_RELAY__OPENAI__API_KEY", "sk-test");
        env::set_var("CHAT_RELAY__TWILIO__ACCOUNT_SID", "AC0123456789");
        env::set_var("CHAT_RELAY__TWILIO__AUTH_TOKEN", "token");
        env::set_var("CHAT_RELAY__TWILIO__WHATSAPP_NUMBER", "+14155238886");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let config = load_with(&[]).unwrap();

        assert_eq!(config.openai.api_key, "sk-test");
        assert_eq!(config.twilio.whatsapp_number, "+14155238886");
        assert!(config.database.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = load_with(&[]).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.batching.debounce(), Duration::from_secs(10));
        assert_eq!(config.twilio.channel_prefix, "whatsapp:");
    }

    #[test]
    fn test_overrides() {
        let config = load_with(&[
            ("CHAT_RELAY__SERVER__PORT", "3000"),
            ("CHAT_RELAY__SERVER__ENVIRONMENT", "production"),
            ("CHAT_RELAY__BATCHING__DEBOUNCE_SECS", "0"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert!(config.batching.debounce().is_zero());
    }

    #[test]
    fn test_database_section_enables_postgres() {
        let config = load_with(&[("CHAT_RELAY__DATABASE__URL", "postgres://localhost/relay")])
            .unwrap();

        let database = config.database.as_ref().unwrap();
        assert_eq!(database.url(), "postgres://localhost/relay");
        assert_eq!(database.max_connections, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_credentials_fail_validation() {
        let config = AppConfig {
            server: ServerConfig::default(),
            batching: BatchingConfig::default(),
            openai: OpenAiConfig::default(),
            twilio: TwilioAccountConfig::default(),
            database: None,
        };

        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }
}
