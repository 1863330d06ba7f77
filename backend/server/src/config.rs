use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    Invalid { key: String, reason: String },

    #[error("Secret {0} not found in /run/secrets or the environment")]
    MissingSecret(String),
}

/// Where the ledger and the bookmark catalog live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Redis,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "redis" => Ok(Backend::Redis),
            other => Err(format!("unknown backend '{other}', expected memory or redis")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend: Backend,
    pub redis_url: String,
    pub jwt_secret: String,
    pub seed_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("RUST_PORT", "8080")?,
            backend: try_load("LEDGER_BACKEND", "memory")?,
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379")?,
            jwt_secret: read_secret("JWT_SECRET")?,
            seed_path: var("SEED_PATH").map(PathBuf::from),
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })
}

fn read_secret(secret_name: &str) -> Result<String, ConfigError> {
    let path = format!("/run/secrets/{secret_name}");

    match read_to_string(&path) {
        Ok(secret) => Ok(secret.trim().to_string()),
        Err(e) => {
            warn!("Failed to read {secret_name} from file: {e}, trying environment");
            var(secret_name)
                .map(|secret| secret.trim().to_string())
                .ok_or_else(|| ConfigError::MissingSecret(secret_name.to_string()))
        }
    }
}
