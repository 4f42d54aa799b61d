//! Environment-driven server configuration.
//!
//! Values come from the process environment (after `.env` loading by the
//! binary). Unparseable values fall back to defaults and are reported through
//! `WebConfig::warnings`, since logging is not initialized yet at load time.

use notepad_core::{default_log_level, MissingDeletePolicy, StoreConfig};
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const HOST: &str = "NOTEPAD_HOST";
    pub const PORT: &str = "NOTEPAD_PORT";
    pub const DATABASE_PATH: &str = "NOTEPAD_DATABASE_PATH";
    /// HMAC key for CSRF tokens. A random key is generated when unset.
    pub const SECRET_KEY: &str = "NOTEPAD_SECRET_KEY";
    /// Set to "false" or "0" to turn CSRF protection off.
    pub const CSRF: &str = "NOTEPAD_CSRF";
    /// `ignore` or `report`.
    pub const MISSING_DELETE: &str = "NOTEPAD_MISSING_DELETE";
    pub const LOG_LEVEL: &str = "NOTEPAD_LOG_LEVEL";
    /// Absolute directory for rolling log files; stderr only when unset.
    pub const LOG_DIR: &str = "NOTEPAD_LOG_DIR";
}

/// Default values
pub mod defaults {
    pub const HOST: &str = "127.0.0.1";
    pub const PORT: u16 = 5000;
    pub const DATABASE_PATH: &str = "database.db";
    pub const CSRF: bool = true;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub secret_key: Option<String>,
    pub csrf_enabled: bool,
    pub missing_delete: MissingDeletePolicy,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// Problems found while loading; log them once logging is up.
    pub warnings: Vec<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            database_path: PathBuf::from(defaults::DATABASE_PATH),
            secret_key: None,
            csrf_enabled: defaults::CSRF,
            missing_delete: MissingDeletePolicy::default(),
            log_level: default_log_level().to_string(),
            log_dir: None,
            warnings: Vec::new(),
        }
    }
}

impl WebConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(host) = get(env_vars::HOST) {
            config.host = host;
        }
        if let Some(raw) = get(env_vars::PORT) {
            match raw.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => config.warn_invalid(env_vars::PORT, &raw),
            }
        }
        if let Some(path) = get(env_vars::DATABASE_PATH) {
            config.database_path = PathBuf::from(path);
        }
        config.secret_key = get(env_vars::SECRET_KEY);
        if let Some(raw) = get(env_vars::CSRF) {
            match parse_bool(&raw) {
                Some(enabled) => config.csrf_enabled = enabled,
                None => config.warn_invalid(env_vars::CSRF, &raw),
            }
        }
        if let Some(raw) = get(env_vars::MISSING_DELETE) {
            match raw.parse::<MissingDeletePolicy>() {
                Ok(policy) => config.missing_delete = policy,
                Err(_) => config.warn_invalid(env_vars::MISSING_DELETE, &raw),
            }
        }
        if let Some(level) = get(env_vars::LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = get(env_vars::LOG_DIR);

        config
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            database_path: self.database_path.clone(),
            missing_delete: self.missing_delete,
        }
    }

    fn warn_invalid(&mut self, key: &str, raw: &str) {
        self.warnings
            .push(format!("ignoring invalid {key}=`{raw}`; using default"));
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
