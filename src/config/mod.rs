use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application configuration, loaded from environment variables with
/// sensible defaults. `.env` files are honored by the binary before
/// loading. Configuration is an owned value threaded through
/// construction, not a global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub port: u16,
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub log_level: String,
    /// Items returned by the public news feed when no limit is given.
    pub news_default_limit: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file path.
    pub path: String,
    /// Upper bound on pooled connections; 0 means the driver default.
    pub max_connections: u32,
    /// Connections kept warm in the pool; 0 means the driver default.
    pub min_connections: u32,
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Error)]
#[error("configuration validation failed:\n- {}", .issues.join("\n- "))]
pub struct ConfigError {
    pub issues: Vec<String>,
}

impl AppConfig {
    /// Read configuration from the environment, applying defaults.
    /// Call [`validate`](Self::validate) before using the result.
    pub fn load() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        Self {
            port: get_env_parse("PORT", 8080),
            environment,
            database: DatabaseConfig {
                path: get_env("DATABASE_URL", "./data/lab-cms.db"),
                max_connections: get_env_parse("DB_MAX_CONNECTIONS", 0),
                min_connections: get_env_parse("DB_MIN_CONNECTIONS", 0),
                busy_timeout_ms: get_env_parse("DB_BUSY_TIMEOUT_MS", 5000),
            },
            log_level: get_env("LOG_LEVEL", "info").to_lowercase(),
            news_default_limit: get_env_parse("NEWS_DEFAULT_LIMIT", 20),
        }
    }

    /// Check every field, collecting all problems into one error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut issues = Vec::new();

        const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            issues.push(format!(
                "LOG_LEVEL must be one of trace, debug, info, warn, error; got: {}",
                self.log_level
            ));
        }

        if self.database.path.trim().is_empty() {
            issues.push("DATABASE_URL must not be empty".to_string());
        }

        if self.news_default_limit <= 0 {
            issues.push("NEWS_DEFAULT_LIMIT must be positive".to_string());
        }

        if self.is_production() && (self.log_level == "debug" || self.log_level == "trace") {
            issues.push(format!(
                "LOG_LEVEL cannot be '{}' in production",
                self.log_level
            ));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigError { issues })
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn get_env(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

fn get_env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            port: 8080,
            environment: Environment::Development,
            database: DatabaseConfig {
                path: "./data/lab-cms.db".into(),
                max_connections: 0,
                min_connections: 0,
                busy_timeout_ms: 5000,
            },
            log_level: "info".into(),
            news_default_limit: 20,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let mut config = base_config();
        config.log_level = "verbose".into();
        let err = config.validate().unwrap_err();
        assert!(err.issues.iter().any(|i| i.contains("LOG_LEVEL")));
    }

    #[test]
    fn production_rejects_debug_logging() {
        let mut config = base_config();
        config.environment = Environment::Production;
        config.log_level = "debug".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_collects_every_issue() {
        let mut config = base_config();
        config.log_level = "loud".into();
        config.database.path = " ".into();
        config.news_default_limit = 0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.issues.len(), 3);
    }
}
