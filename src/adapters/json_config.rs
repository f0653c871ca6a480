//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over an optional JSON file.  The path comes
//! from the `EC_FAND_CONFIG` environment variable; without it the
//! built-in platform defaults are used.  Any subset of fields may be
//! given, the rest keep their defaults.
//!
//! ```json
//! { "registers": { "fan_duty": 73 }, "wait": { "mode": "spin" } }
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use log::{error, info};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::FanConfig;

pub const CONFIG_ENV_VAR: &str = "EC_FAND_CONFIG";

pub struct JsonFileConfig {
    path: Option<PathBuf>,
}

impl JsonFileConfig {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Path from `EC_FAND_CONFIG`, if set and non-empty.
    pub fn from_env() -> Self {
        let path = env::var_os(CONFIG_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::new(path)
    }
}

impl ConfigPort for JsonFileConfig {
    fn load(&self) -> Result<FanConfig, ConfigError> {
        let Some(path) = &self.path else {
            info!("No {} set, using built-in platform defaults", CONFIG_ENV_VAR);
            let config = FanConfig::default();
            config.validate()?;
            return Ok(config);
        };

        let text = fs::read_to_string(path).map_err(|e| {
            error!("Cannot read config {}: {}", path.display(), e);
            match e.kind() {
                io::ErrorKind::NotFound => ConfigError::NotFound,
                _ => ConfigError::IoError,
            }
        })?;

        let config: FanConfig = serde_json::from_str(&text).map_err(|e| {
            error!("Config {} is not valid: {}", path.display(), e);
            ConfigError::Corrupted
        })?;

        config.validate()?;
        info!("Config loaded from {}", path.display());
        Ok(config)
    }
}
