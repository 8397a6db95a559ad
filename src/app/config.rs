//! Process configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::domain::{ConfigError, NetworkConfig};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

/// Application configuration
#[derive(Debug)]
pub struct Config {
    pub database_url: SecretString,
    pub host: String,
    pub port: u16,
    pub network: NetworkConfig,
    /// Per-check timeout for the readiness probe
    pub health_check_timeout: Duration,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL")
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;
        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_var("PORT", get("PORT"), 5700)?;

        let mut network = NetworkConfig::new(
            get("ROSETTA_NETWORK").unwrap_or_else(|| "testnet".to_string()),
        );
        if let Some(node_version) = get("ROSETTA_NODE_VERSION") {
            network.node_version = node_version;
        }
        network.online = get("ROSETTA_ONLINE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true);

        let health_check_timeout = Duration::from_secs(parse_var(
            "HEALTH_CHECK_TIMEOUT_SECS",
            get("HEALTH_CHECK_TIMEOUT_SECS"),
            10,
        )?);
        let log_format = parse_var("LOG_FORMAT", get("LOG_FORMAT"), LogFormat::Text)?;

        Ok(Self {
            database_url,
            host,
            port,
            network,
            health_check_timeout,
            log_format,
        })
    }
}

fn parse_var<T>(name: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name: name.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://db")])).unwrap();

        assert_eq!(config.database_url.expose_secret(), "postgres://db");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5700);
        assert_eq!(config.network, NetworkConfig::new("testnet"));
        assert_eq!(config.health_check_timeout, Duration::from_secs(10));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db"),
            ("PORT", "8082"),
            ("ROSETTA_NETWORK", "mainnet"),
            ("ROSETTA_NODE_VERSION", "0.60.0"),
            ("ROSETTA_ONLINE", "false"),
            ("HEALTH_CHECK_TIMEOUT_SECS", "3"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8082);
        assert_eq!(config.network.network, "mainnet");
        assert_eq!(config.network.node_version, "0.60.0");
        assert!(!config.network.online);
        assert_eq!(config.health_check_timeout, Duration::from_secs(3));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_missing_database_url() {
        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("DATABASE_URL".to_string()));
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db"),
            ("PORT", "seventy"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name, .. } if name == "PORT"));
    }
}
