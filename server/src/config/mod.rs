use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{ApiError, Result};

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "resource/config.json";

pub const MIN_SIGNING_KEY_LEN: usize = 32;

/// Longest accepted session, one year in minutes.
pub const MAX_SESSION_MINUTES: u64 = 60 * 24 * 365;

const DEFAULT_OPERATOR: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    MongoDb,
    Memory,
}

/// Service settings, read from a JSON file.
///
/// Field names follow the existing `config.json` layout (`dburi`,
/// `sessionTime`, `JWT_Key`, ...), so older files keep working.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_db_uri")]
    pub dburi: String,
    #[serde(default)]
    pub db_user: String,
    #[serde(default)]
    pub db_passwd: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port", deserialize_with = "deserialize_port")]
    pub port: u16,
    /// Session lifetime in minutes.
    #[serde(rename = "sessionTime")]
    pub session_time: u64,
    #[serde(rename = "JWT_Key")]
    pub jwt_key: String,
    #[serde(default)]
    pub storage: StorageBackend,
}

fn default_db_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "root".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

// Older files store the port as a string ("8080").
fn deserialize_port<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPort {
        Number(u16),
        Text(String),
    }

    match RawPort::deserialize(deserializer)? {
        RawPort::Number(port) => Ok(port),
        RawPort::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid port '{}'", text))),
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| ApiError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Applies overrides from the process environment.
    pub fn from_env_overrides(mut self) -> Result<Self> {
        self.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(self)
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup("MONGODB_URI") {
            self.dburi = uri;
        }
        if let Some(database) = lookup("DATABASE_NAME") {
            self.database = database;
        }
        if let Some(host) = lookup("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.port = port
                .parse()
                .map_err(|_| ApiError::Config(format!("SERVER_PORT '{}' is not a port", port)))?;
        }
        if let Some(minutes) = lookup("SESSION_TIME_MINUTES") {
            self.session_time = minutes.parse().map_err(|_| {
                ApiError::Config(format!("SESSION_TIME_MINUTES '{}' is not a number", minutes))
            })?;
        }
        if let Some(key) = lookup("JWT_KEY") {
            self.jwt_key = key;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_key.len() < MIN_SIGNING_KEY_LEN {
            return Err(ApiError::Config(format!(
                "JWT_Key must be at least {} bytes",
                MIN_SIGNING_KEY_LEN
            )));
        }
        if self.session_time == 0 {
            return Err(ApiError::Config(
                "sessionTime must be greater than zero".to_string(),
            ));
        }
        if self.session_time > MAX_SESSION_MINUTES {
            return Err(ApiError::Config(format!(
                "sessionTime must be at most {} minutes",
                MAX_SESSION_MINUTES
            )));
        }
        match (&self.user, &self.password) {
            (Some(user), _) if user.trim().is_empty() => {
                return Err(ApiError::Config("user must not be empty".to_string()));
            }
            (Some(_), None) => {
                return Err(ApiError::Config("user is set without a password".to_string()));
            }
            (None, Some(_)) => {
                return Err(ApiError::Config("password is set without a user".to_string()));
            }
            _ => {}
        }
        Ok(())
    }

    pub fn session_lifetime(&self) -> Duration {
        Duration::from_secs(self.session_time.saturating_mul(60))
    }

    /// Operator credentials seeded into the credential store.
    ///
    /// Falls back to `admin`/`admin` when the file does not name an operator.
    pub fn operator_credentials(&self) -> (String, String) {
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => (user.clone(), password.clone()),
            _ => {
                log::warn!(
                    "No operator credentials configured, using the default '{}' account",
                    DEFAULT_OPERATOR
                );
                (DEFAULT_OPERATOR.to_string(), DEFAULT_OPERATOR.to_string())
            }
        }
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const KEY: &str = "0123456789abcdef0123456789abcdef";

    fn minimal_json() -> String {
        format!(r#"{{ "sessionTime": 5, "JWT_Key": "{}" }}"#, KEY)
    }

    #[test]
    fn test_parse_full_config() {
        let json = format!(
            r#"{{
                "user": "operator",
                "password": "s3cret",
                "dburi": "mongodb://db:27017",
                "db_user": "companies",
                "db_passwd": "S3cret",
                "port": "9090",
                "sessionTime": 15,
                "JWT_Key": "{}",
                "storage": "memory"
            }}"#,
            KEY
        );

        let config = AppConfig::from_json(&json).unwrap();
        assert_eq!(config.dburi, "mongodb://db:27017");
        assert_eq!(config.db_user, "companies");
        assert_eq!(config.port, 9090);
        assert_eq!(config.session_time, 15);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(
            config.operator_credentials(),
            ("operator".to_string(), "s3cret".to_string())
        );
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_json(&minimal_json()).unwrap();
        assert_eq!(config.database, "root");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage, StorageBackend::MongoDb);
        assert_eq!(config.session_lifetime(), Duration::from_secs(300));
        assert_eq!(
            config.operator_credentials(),
            ("admin".to_string(), "admin".to_string())
        );
    }

    #[test]
    fn test_numeric_port() {
        let json = format!(r#"{{ "port": 3000, "sessionTime": 1, "JWT_Key": "{}" }}"#, KEY);
        assert_eq!(AppConfig::from_json(&json).unwrap().port, 3000);
    }

    #[test]
    fn test_rejects_bad_port() {
        let json = format!(r#"{{ "port": "http", "sessionTime": 1, "JWT_Key": "{}" }}"#, KEY);
        assert!(AppConfig::from_json(&json).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::from_json(&minimal_json()).unwrap();
        let env: HashMap<&str, &str> = [
            ("MONGODB_URI", "mongodb://other:27017"),
            ("SERVER_PORT", "8181"),
            ("SESSION_TIME_MINUTES", "60"),
        ]
        .into_iter()
        .collect();

        config
            .apply_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.dburi, "mongodb://other:27017");
        assert_eq!(config.port, 8181);
        assert_eq!(config.session_time, 60);
    }

    #[test]
    fn test_env_override_rejects_bad_port() {
        let mut config = AppConfig::from_json(&minimal_json()).unwrap();
        let result = config.apply_env_overrides(|key| {
            (key == "SERVER_PORT").then(|| "not-a-port".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validate() {
        let config = AppConfig::from_json(&minimal_json()).unwrap();
        assert!(config.validate().is_ok());

        let mut short_key = config.clone();
        short_key.jwt_key = "short".to_string();
        assert!(short_key.validate().is_err());

        let mut no_session = config.clone();
        no_session.session_time = 0;
        assert!(no_session.validate().is_err());

        let mut blank_user = config;
        blank_user.user = Some("  ".to_string());
        blank_user.password = Some("s3cret".to_string());
        assert!(blank_user.validate().is_err());
    }

    #[test]
    fn test_validate_session_upper_bound() {
        let mut config = AppConfig::from_json(&minimal_json()).unwrap();

        config.session_time = MAX_SESSION_MINUTES;
        assert!(config.validate().is_ok());

        config.session_time = MAX_SESSION_MINUTES + 1;
        assert!(config.validate().is_err());

        // Would overflow the token expiry if accepted
        config.session_time = u64::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sessionTime"));
    }

    #[test]
    fn test_validate_operator_pairing() {
        let config = AppConfig::from_json(&minimal_json()).unwrap();

        let mut both = config.clone();
        both.user = Some("operator".to_string());
        both.password = Some("s3cret".to_string());
        assert!(both.validate().is_ok());

        let mut user_only = config.clone();
        user_only.user = Some("operator".to_string());
        let err = user_only.validate().unwrap_err();
        assert!(err.to_string().contains("without a password"));

        let mut password_only = config;
        password_only.password = Some("s3cret".to_string());
        let err = password_only.validate().unwrap_err();
        assert!(err.to_string().contains("without a user"));
    }
}
