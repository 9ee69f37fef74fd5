use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr, time::Duration};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::firebase::parse_firebase_config;

const SECRETS_DIR: &str = "/run/secrets";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("Invalid {key} value: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub store_url: String,
    pub session_secret: String,
    pub access_password: String,
    pub firebase_config: Map<String, Value>,
    pub app_id: String,
    pub static_dir: PathBuf,
    pub session_ttl: Duration,
    pub roster_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: try_load(&lookup, "RUST_PORT", "1111")?,
            store_url: try_load(&lookup, "STORE_URL", "redis://127.0.0.1:6379")?,
            session_secret: read_secret(&lookup, "SESSION_SECRET")?,
            access_password: read_secret(&lookup, "ACCESS_PASSWORD")?,
            firebase_config: parse_firebase_config(lookup("FIREBASE_CONFIG").as_deref()),
            app_id: try_load(&lookup, "APP_ID", "default-app-id")?,
            static_dir: try_load(&lookup, "STATIC_DIR", "static")?,
            session_ttl: Duration::from_secs(try_load(&lookup, "SESSION_TTL_SECS", "43200")?),
            roster_path: lookup("ROSTER_PATH").map(PathBuf::from),
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                message: e.to_string(),
            }
        })
}

/// Environment first, then the docker secret file of the same name.
fn read_secret<F>(lookup: &F, secret_name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(secret_name).filter(|v| !v.trim().is_empty()) {
        return Ok(value.trim().to_string());
    }

    let path = format!("{SECRETS_DIR}/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::Missing(secret_name))
}

#[cfg(test)]
pub(crate) fn test_config(pairs: &[(&str, &str)]) -> Config {
    let mut vars: std::collections::HashMap<String, String> = [
        ("SESSION_SECRET", "test-secret"),
        ("ACCESS_PASSWORD", "hunter2"),
        ("STORE_URL", "memory://"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (key, value) in pairs {
        vars.insert(key.to_string(), value.to_string());
    }

    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = test_config(&[]);

        assert_eq!(config.port, 1111);
        assert_eq!(config.app_id, "default-app-id");
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.session_ttl, Duration::from_secs(43200));
        assert!(config.firebase_config.is_empty());
        assert!(config.roster_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = test_config(&[
            ("RUST_PORT", "8080"),
            ("APP_ID", "debate"),
            ("FIREBASE_CONFIG", r#"{"apiKey": "abc", "projectId": "rooms"}"#),
            ("ROSTER_PATH", "roster.json"),
            ("ACCESS_PASSWORD", "  padded  "),
        ]);

        assert_eq!(config.port, 8080);
        assert_eq!(config.app_id, "debate");
        assert_eq!(config.firebase_config["projectId"], "rooms");
        assert_eq!(config.roster_path, Some(PathBuf::from("roster.json")));
        assert_eq!(config.access_password, "padded");
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_lookup(|key| match key {
            "RUST_PORT" => Some("not-a-port".to_string()),
            "SESSION_SECRET" | "ACCESS_PASSWORD" => Some("x".to_string()),
            _ => None,
        });

        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "RUST_PORT", .. })
        ));
    }

    #[test]
    fn test_missing_password() {
        let result = Config::from_lookup(|key| match key {
            "SESSION_SECRET" => Some("x".to_string()),
            _ => None,
        });

        assert!(matches!(result, Err(ConfigError::Missing("ACCESS_PASSWORD"))));
    }
}
