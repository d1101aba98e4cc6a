//! Runtime configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::domain::ConfigError;

use super::database::PostgresConfig;
use super::observability::LogFormat;

/// Application configuration.
///
/// `DATABASE_URL` is required and kept as a secret so it never shows up in
/// `Debug` output or logs. Everything else has a default.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: SecretString,
    pub postgres: PostgresConfig,
    pub log_format: LogFormat,
    pub metrics_addr: Option<SocketAddr>,
    pub run_migrations: bool,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

        let defaults = PostgresConfig::default();
        let postgres = PostgresConfig {
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: parse_or(&lookup, "DB_MIN_CONNECTIONS", defaults.min_connections)?,
            acquire_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout.as_secs(),
            )?),
            ..defaults
        };
        if postgres.min_connections > postgres.max_connections {
            return Err(ConfigError::InvalidValue {
                key: "DB_MIN_CONNECTIONS".to_string(),
                message: format!(
                    "must not exceed DB_MAX_CONNECTIONS ({})",
                    postgres.max_connections
                ),
            });
        }

        Ok(Self {
            database_url: SecretString::from(database_url),
            postgres,
            log_format: parse_or(&lookup, "LOG_FORMAT", LogFormat::Pretty)?,
            metrics_addr: parse_optional(&lookup, "METRICS_ADDR")?,
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", true)?,
        })
    }
}

fn parse_optional<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map(Some)
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: e.to_string(),
                })
        }
        _ => Ok(None),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_optional(lookup, key)?.unwrap_or(default))
}
