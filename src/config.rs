// config.rs
use std::{str::FromStr, time::Duration};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::Invalid {
                key: "STORE_BACKEND",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub store_backend: StoreBackend,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    pub db_max_connections: u32,
    pub transaction_timeout: Duration,
    pub lock_timeout: Duration,
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match lookup("STORE_BACKEND") {
            Some(value) => value.parse::<StoreBackend>()?,
            None => StoreBackend::Postgres,
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let jwt_secret = lookup("JWT_SECRET_KEY")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET_KEY"))?;

        let jwt_maxage: i64 = parse_or(&lookup, "JWT_MAXAGE", 60)?;
        if jwt_maxage <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_MAXAGE",
                value: jwt_maxage.to_string(),
            });
        }

        let db_max_connections: u32 = parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?;
        if db_max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        // Postgres reads a zero timeout as "wait forever".
        let transaction_timeout_secs: u64 = parse_or(&lookup, "TRANSACTION_TIMEOUT_SECS", 5)?;
        if transaction_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "TRANSACTION_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let lock_timeout_ms: u64 = parse_or(&lookup, "LOCK_TIMEOUT_MS", 2000)?;
        if lock_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "LOCK_TIMEOUT_MS",
                value: "0".to_string(),
            });
        }

        Ok(Config {
            database_url,
            store_backend,
            jwt_secret,
            jwt_maxage,
            port: parse_or(&lookup, "PORT", 8000)?,
            db_max_connections,
            transaction_timeout: Duration::from_secs(transaction_timeout_secs),
            lock_timeout: Duration::from_millis(lock_timeout_ms),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value.trim().parse::<T>().map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
