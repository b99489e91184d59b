use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_POOL_SIZE: u32 = 10;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} was invalid: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Server settings, read from the environment (and `.env`).
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub bind: String,
    pub pool_max_size: u32,
    /// JSON file overriding response messages.
    pub messages_file: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Result<Settings, ConfigError> {
        Settings::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Settings, ConfigError>
        where
            F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind = lookup("BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let pool_max_size = match lookup("DB_POOL_MAX") {
            None => DEFAULT_POOL_SIZE,
            Some(raw) => raw.parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid { name: "DB_POOL_MAX", value: raw })?,
        };

        let messages_file = lookup("MESSAGES_FILE")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Ok(Settings {
            database_url,
            bind,
            pool_max_size,
            messages_file,
        })
    }
}
