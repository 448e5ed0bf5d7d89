//! Worker configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SQUALL_*)
//! 2. TOML config file (if SQUALL_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Worker configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SQUALL_*)
/// 2. TOML config file (if SQUALL_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Cache generation identifier. Bumping this (e.g. "v1" to "v2") makes
    /// the next activation evict every store built under the old value.
    ///
    /// Set via SQUALL_VERSION environment variable.
    #[serde(default = "default_version")]
    pub version: String,

    /// Prefix combined with `version` to name the current store.
    ///
    /// Set via SQUALL_CACHE_PREFIX environment variable.
    #[serde(default = "default_cache_prefix")]
    pub cache_prefix: String,

    /// Origin that manifest paths resolve against.
    ///
    /// Set via SQUALL_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Origin-relative paths precached at install (the app shell).
    ///
    /// Set via SQUALL_PRECACHE environment variable (comma-separated).
    #[serde(default)]
    pub precache: Vec<String>,

    /// Hosts the worker never intercepts; requests to them come back
    /// unhandled so the host performs its own fetch.
    ///
    /// Set via SQUALL_PASSTHROUGH_HOSTS environment variable (comma-separated).
    #[serde(default)]
    pub passthrough_hosts: Vec<String>,

    /// Path to the SQLite snapshot store.
    ///
    /// Set via SQUALL_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for outbound fetches.
    ///
    /// Set via SQUALL_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to buffer per response.
    ///
    /// Set via SQUALL_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Per-fetch timeout in milliseconds.
    ///
    /// Set via SQUALL_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_version() -> String {
    "v1".into()
}

fn default_cache_prefix() -> String {
    "squall".into()
}

fn default_origin() -> String {
    "http://localhost:8000".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./squall-cache.sqlite")
}

fn default_user_agent() -> String {
    "squall/0.1".into()
}

fn default_max_bytes() -> usize {
    10_485_760 // 10MB
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            cache_prefix: default_cache_prefix(),
            origin: default_origin(),
            precache: Vec::new(),
            passthrough_hosts: Vec::new(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl WorkerConfig {
    /// Name of the store this configuration considers current.
    pub fn cache_name(&self) -> String {
        format!("{}-{}", self.cache_prefix, self.version)
    }

    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SQUALL_`
    /// 2. TOML file from `SQUALL_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SQUALL_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SQUALL_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
