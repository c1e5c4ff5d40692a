use std::env::VarError;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::BsError;
use crate::service::DEFAULT_QUERY_TIMEOUT;

const DATABASE_URL: &str = "WEATHER_STATION_DATABASE_URL";
const ADDRESS: &str = "WEATHER_STATION_ADDRESS";
const PORT: &str = "WEATHER_STATION_PORT";
const QUERY_TIMEOUT_MS: &str = "WEATHER_STATION_QUERY_TIMEOUT_MS";
const MAX_CONNECTIONS: &str = "WEATHER_STATION_MAX_CONNECTIONS";
const LOG_LEVEL: &str = "WEATHER_STATION_LOG_LEVEL";
const LOG_DIR: &str = "WEATHER_STATION_LOG_DIR";
const MIGRATE: &str = "WEATHER_STATION_MIGRATE";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    pub query_timeout: Duration,
    pub max_connections: u32,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub run_migrations: bool,
}

impl Config {
    /// Reads the process environment (after any `.env` file has been loaded).
    pub fn from_env() -> Result<Self, BsError> {
        Self::from_lookup(|key| dotenvy::var(key))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, BsError>
    where
        F: Fn(&str) -> Result<String, dotenvy::Error>,
    {
        let optional = |key: &str| match lookup(key) {
            Ok(value) => Ok(Some(value)),
            Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(None),
            Err(e) => Err(BsError::Config(e)),
        };

        Ok(Self {
            database_url: lookup(DATABASE_URL)?,
            address: optional(ADDRESS)?.unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(optional(PORT)?, PORT, 12345)?,
            query_timeout: optional(QUERY_TIMEOUT_MS)?
                .map(|v| parse::<u64>(&v, QUERY_TIMEOUT_MS).map(Duration::from_millis))
                .transpose()?
                .unwrap_or(DEFAULT_QUERY_TIMEOUT),
            max_connections: parse_or(optional(MAX_CONNECTIONS)?, MAX_CONNECTIONS, 5)?,
            log_level: optional(LOG_LEVEL)?.unwrap_or_else(|| "info".to_string()),
            log_dir: optional(LOG_DIR)?.map(PathBuf::from),
            run_migrations: parse_or(optional(MIGRATE)?, MIGRATE, false)?,
        })
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

fn parse<T>(value: &str, variable: &'static str) -> Result<T, BsError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| BsError::InvalidConfig {
        variable,
        reason: format!("'{value}': {e}"),
    })
}

fn parse_or<T>(value: Option<String>, variable: &'static str, default: T) -> Result<T, BsError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |v| parse(&v, variable))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, dotenvy::Error> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| {
            vars.get(key)
                .cloned()
                .ok_or(dotenvy::Error::EnvVar(VarError::NotPresent))
        }
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[(DATABASE_URL, "sqlite://weather.db")])).unwrap();

        assert_eq!(config.database_url, "sqlite://weather.db");
        assert_eq!(config.listen_address(), "0.0.0.0:12345");
        assert_eq!(config.query_timeout, DEFAULT_QUERY_TIMEOUT);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_dir, None);
        assert!(!config.run_migrations);
    }

    #[test]
    fn overrides() {
        let config = Config::from_lookup(lookup(&[
            (DATABASE_URL, "sqlite::memory:"),
            (ADDRESS, "127.0.0.1"),
            (PORT, "8080"),
            (QUERY_TIMEOUT_MS, "250"),
            (MAX_CONNECTIONS, "2"),
            (LOG_LEVEL, "debug"),
            (LOG_DIR, "/var/log/weather"),
            (MIGRATE, "true"),
        ]))
        .unwrap();

        assert_eq!(config.listen_address(), "127.0.0.1:8080");
        assert_eq!(config.query_timeout, Duration::from_millis(250));
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/weather")));
        assert!(config.run_migrations);
    }

    #[test]
    fn database_url_is_required() {
        assert!(matches!(
            Config::from_lookup(lookup(&[])),
            Err(BsError::Config(_))
        ));
    }

    #[test]
    fn invalid_numbers_name_the_variable() {
        let result = Config::from_lookup(lookup(&[(DATABASE_URL, "sqlite::memory:"), (PORT, "http")]));
        match result {
            Err(BsError::InvalidConfig { variable, .. }) => assert_eq!(variable, PORT),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }
}
