use config::{Config, ConfigError as BaseConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const MAX_FAILURE_DELAY_MS: u64 = 10_000;

/// Environment variables and the settings they override.
const ENV_OVERRIDES: [(&str, &str); 6] = [
    ("SERVER_BIND_ADDR", "server.bind_addr"),
    ("SERVER_PORT", "server.port"),
    ("DATABASE_URL", "database.url"),
    ("DATABASE_MAX_CONNECTIONS", "database.max_connections"),
    ("PASSWORD_PEPPER", "security.password_pepper"),
    ("FAILURE_DELAY_MS", "security.failure_delay_ms"),
];

#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct SecurityConfig {
    pub password_pepper: Option<String>,
    /// Minimum response latency applied to every denied unlock attempt.
    pub failure_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Config(#[from] BaseConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::load_from(None, |key| std::env::var(key).ok())
    }

    /// Layer defaults, then the config file, then environment variables.
    ///
    /// `config_file` replaces the optional `config.*` file in the working
    /// directory and must exist when given. `env` looks up a variable by name;
    /// unset variables leave the lower layers untouched.
    pub fn load_from(
        config_file: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file = match config_file {
            Some(path) => File::from(path),
            None => File::with_name("config").required(false),
        };

        let mut settings = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(file);

        for (env_key, config_key) in ENV_OVERRIDES {
            if let Some(value) = env(env_key) {
                settings = settings.set_override(config_key, value)?;
            }
        }

        let mut config: AppConfig = settings.build()?.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    /// Delay enforced before a denied verdict is returned.
    pub fn failure_delay(&self) -> Duration {
        Duration::from_millis(self.security.failure_delay_ms)
    }

    fn validate(&mut self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "DATABASE_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        if self.security.failure_delay_ms < 1 || self.security.failure_delay_ms > MAX_FAILURE_DELAY_MS
        {
            return Err(ConfigError::Validation(format!(
                "FAILURE_DELAY_MS must be between 1 and {MAX_FAILURE_DELAY_MS}"
            )));
        }

        // An empty pepper is the same as no pepper.
        if self
            .security
            .password_pepper
            .as_deref()
            .is_some_and(|pepper| pepper.is_empty())
        {
            self.security.password_pepper = None;
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_addr: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite://data/shares.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            security: SecurityConfig {
                password_pepper: None,
                failure_delay_ms: 1_000,
            },
        }
    }
}
