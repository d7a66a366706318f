//! Process configuration, read from the environment (and `.env` when present).
//!
//! - `MONGO_URI` (default `mongodb://127.0.0.1:27017`)
//! - `MONGO_DB` (default `khetsathi`)
//! - `JWT_SECRET` (required)
//! - `TOKEN_TTL_HOURS` (default `24`)
//! - `HOST` / `PORT` (default `0.0.0.0` / `5000`)
//! - `CORS_ORIGINS` comma separated (default: the local dev origins)
//! - `STATIC_DIR` (default `public`)

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use log::info;
use thiserror::Error;

const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:3000,http://127.0.0.1:3000,http://localhost:5000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_db: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingEnvVar("JWT_SECRET"))?;

        Ok(Self {
            mongo_uri: or_default("MONGO_URI", "mongodb://127.0.0.1:27017"),
            mongo_db: or_default("MONGO_DB", "khetsathi"),
            jwt_secret,
            token_ttl_hours: parsed("TOKEN_TTL_HOURS", 24)?,
            host: or_default("HOST", "0.0.0.0"),
            port: parsed("PORT", 5000)?,
            cors_origins: or_default("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            static_dir: PathBuf::from(or_default("STATIC_DIR", "public")),
        })
    }

    /// Local settings with the given signing secret, for tests and tooling.
    pub fn local(jwt_secret: impl Into<String>) -> Self {
        Self {
            mongo_uri: "mongodb://127.0.0.1:27017".to_string(),
            mongo_db: "khetsathi".to_string(),
            jwt_secret: jwt_secret.into(),
            token_ttl_hours: 24,
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_origins: DEFAULT_CORS_ORIGINS.split(',').map(String::from).collect(),
            static_dir: PathBuf::from("public"),
        }
    }
}

fn or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn parsed<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key, e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_config_uses_day_long_tokens() {
        let config = Config::local("s3cret");
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.cors_origins.len(), 3);
    }

    #[test]
    fn bad_numbers_are_reported_with_their_key() {
        env::set_var("KHETSATHI_TEST_BAD_PORT", "abc");
        assert!(matches!(
            parsed::<u16>("KHETSATHI_TEST_BAD_PORT", 5000),
            Err(ConfigError::InvalidEnvVar("KHETSATHI_TEST_BAD_PORT", _))
        ));
        assert_eq!(parsed::<u16>("KHETSATHI_TEST_UNSET_PORT", 5000).unwrap(), 5000);
    }
}
