// src/common/config.rs
//! Process configuration, read once at startup
//!
//! Values come from the environment (after `.env` is loaded). Business logic
//! never reads the environment itself; it receives the values built here.

use axum::http::HeaderName;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CREDENTIAL_HEADER: &str = "token";
const DEFAULT_DATABASE_URL: &str = "sqlite://auth_api.db";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SIGNUP_TIMEOUT_SECS: u64 = 100;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SECRET_KEY (or JWT_SECRET) must be set to a non-empty value")]
    MissingSecret,

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Deadlines applied to user store calls
#[derive(Debug, Clone, Copy)]
pub struct StoreTimeouts {
    /// Login, refresh and read paths
    pub default: Duration,
    /// Signup path (counts plus insert)
    pub signup: Duration,
}

impl Default for StoreTimeouts {
    fn default() -> Self {
        Self {
            default: Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
            signup: Duration::from_secs(DEFAULT_SIGNUP_TIMEOUT_SECS),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub secret_key: String,
    pub credential_header: HeaderName,
    pub cors_origins: Vec<String>,
    pub store_timeouts: StoreTimeouts,
    pub reset_db: bool,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url)
            .field("port", &self.port)
            .field("secret_key", &"<redacted>")
            .field("credential_header", &self.credential_header)
            .field("cors_origins", &self.cors_origins)
            .field("store_timeouts", &self.store_timeouts)
            .field("reset_db", &self.reset_db)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("SECRET_KEY")
            .filter(|s| !s.trim().is_empty())
            .or_else(|| lookup("JWT_SECRET").filter(|s| !s.trim().is_empty()))
            .ok_or(ConfigError::MissingSecret)?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let header_raw = lookup("CREDENTIAL_HEADER")
            .map(|h| h.trim().to_lowercase())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_CREDENTIAL_HEADER.to_string());
        let credential_header =
            HeaderName::from_bytes(header_raw.as_bytes()).map_err(|_| ConfigError::InvalidValue {
                key: "CREDENTIAL_HEADER",
                value: header_raw.clone(),
            })?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let store_timeouts = StoreTimeouts {
            default: parse_secs(&lookup, "STORE_TIMEOUT_SECS", DEFAULT_STORE_TIMEOUT_SECS)?,
            signup: parse_secs(&lookup, "SIGNUP_TIMEOUT_SECS", DEFAULT_SIGNUP_TIMEOUT_SECS)?,
        };

        let reset_db = lookup("RESET_DB")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            port,
            secret_key,
            credential_header,
            cors_origins,
            store_timeouts,
            reset_db,
        })
    }
}

fn parse_secs<F>(lookup: &F, key: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ConfigError::InvalidValue { key, value: raw }),
        },
        None => Ok(Duration::from_secs(default)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingSecret);

        let result = AppConfig::from_lookup(lookup_from(&[("SECRET_KEY", "   ")]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingSecret);
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[("SECRET_KEY", "s3cret")])).unwrap();

        assert_eq!(config.secret_key, "s3cret");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "sqlite://auth_api.db");
        assert_eq!(config.credential_header.as_str(), "token");
        assert_eq!(config.store_timeouts.default, Duration::from_secs(30));
        assert_eq!(config.store_timeouts.signup, Duration::from_secs(100));
        assert!(!config.reset_db);
    }

    #[test]
    fn test_jwt_secret_fallback() {
        let config = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "fallback")])).unwrap();
        assert_eq!(config.secret_key, "fallback");
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("SECRET_KEY", "s3cret"),
            ("PORT", "9000"),
            ("CREDENTIAL_HEADER", "X-Access-Token"),
            ("STORE_TIMEOUT_SECS", "5"),
            ("RESET_DB", "TRUE"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.credential_header.as_str(), "x-access-token");
        assert_eq!(config.store_timeouts.default, Duration::from_secs(5));
        assert!(config.reset_db);

        let bad_port = AppConfig::from_lookup(lookup_from(&[("SECRET_KEY", "s"), ("PORT", "http")]));
        assert!(matches!(
            bad_port,
            Err(ConfigError::InvalidValue { key: "PORT", .. })
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AppConfig::from_lookup(lookup_from(&[("SECRET_KEY", "do-not-print")])).unwrap();
        assert!(!format!("{:?}", config).contains("do-not-print"));
    }
}
