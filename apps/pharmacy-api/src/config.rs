//! API server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file in the working directory is read first, if present.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Signing secret used when `JWT_SECRET` is unset. Rejected in production.
pub const DEV_JWT_SECRET: &str = "pharmacy-dev-secret-change-in-production";

/// Deployment environment, from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    Development,
    Production,
}

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub database_max_connections: u32,

    /// JWT secret key for signing tokens
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// JWT access token lifetime in seconds
    pub jwt_expiration_secs: i64,

    pub environment: AppEnv,

    /// Admin account created at startup when absent (`ADMIN_USERNAME`)
    pub admin_username: Option<String>,

    #[serde(skip_serializing)]
    pub admin_password: Option<String>,

    pub admin_email: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            port: 8080,
            database_path: PathBuf::from("./data/pharmacy.db"),
            database_max_connections: 5,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiration_secs: 86_400, // 24 hours
            environment: AppEnv::Development,
            admin_username: None,
            admin_password: None,
            admin_email: None,
        }
    }
}

impl ApiConfig {
    /// Load configuration from the process environment (and `.env`).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ApiConfig::default();

        let environment = match lookup("APP_ENV").as_deref().map(str::trim) {
            None | Some("") | Some("development") | Some("dev") => AppEnv::Development,
            Some("production") | Some("prod") => AppEnv::Production,
            Some(_) => return Err(ConfigError::InvalidValue("APP_ENV".to_string())),
        };

        let config = ApiConfig {
            port: parse_or(&lookup, "PORT", defaults.port)?,

            database_path: lookup("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            database_max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,

            jwt_secret: lookup("JWT_SECRET")
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.jwt_secret),

            jwt_expiration_secs: parse_or(&lookup, "JWT_EXPIRATION_SECS", defaults.jwt_expiration_secs)?,

            environment,

            admin_username: lookup("ADMIN_USERNAME").filter(|s| !s.trim().is_empty()),
            admin_password: lookup("ADMIN_PASSWORD").filter(|s| !s.is_empty()),
            admin_email: lookup("ADMIN_EMAIL").filter(|s| !s.trim().is_empty()),
        };

        if config.admin_username.is_some() && config.admin_password.is_none() {
            return Err(ConfigError::MissingRequired("ADMIN_PASSWORD".to_string()));
        }

        if config.database_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()));
        }

        if config.jwt_expiration_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_EXPIRATION_SECS".to_string()));
        }

        if config.environment == AppEnv::Production && config.uses_default_secret() {
            return Err(ConfigError::MissingRequired("JWT_SECRET".to_string()));
        }

        Ok(config)
    }

    /// True when tokens are signed with the built-in development secret.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
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
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, PathBuf::from("./data/pharmacy.db"));
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.jwt_expiration_secs, 86_400);
        assert_eq!(config.environment, AppEnv::Development);
        assert!(config.uses_default_secret());
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("DATABASE_PATH", "/var/lib/pharmacy/db.sqlite"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRATION_SECS", "600"),
            ("APP_ENV", "production"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.jwt_expiration_secs, 600);
        assert_eq!(config.environment, AppEnv::Production);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ApiConfig::from_lookup(lookup_from(&[("PORT", "eighty")])),
            Err(ConfigError::InvalidValue(ref key)) if key == "PORT"
        ));
        assert!(ApiConfig::from_lookup(lookup_from(&[("DATABASE_MAX_CONNECTIONS", "0")])).is_err());
        assert!(ApiConfig::from_lookup(lookup_from(&[("APP_ENV", "staging")])).is_err());
    }

    #[test]
    fn test_admin_bootstrap_settings() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            ("ADMIN_USERNAME", "root"),
            ("ADMIN_PASSWORD", "changeme"),
        ]))
        .unwrap();
        assert_eq!(config.admin_username.as_deref(), Some("root"));
        assert_eq!(config.admin_email, None);

        let result = ApiConfig::from_lookup(lookup_from(&[("ADMIN_USERNAME", "root")]));
        assert!(matches!(result, Err(ConfigError::MissingRequired(ref key)) if key == "ADMIN_PASSWORD"));
    }

    #[test]
    fn test_production_requires_real_secret() {
        let result = ApiConfig::from_lookup(lookup_from(&[("APP_ENV", "production")]));
        assert!(matches!(result, Err(ConfigError::MissingRequired(_))));
    }
}
