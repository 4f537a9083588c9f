//! Configuration for decor.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::DecorResult;

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "decor.toml";

/// Main configuration for decor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset dump settings.
    #[serde(default)]
    pub dump: DumpConfig,

    /// In-memory cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Dataset dump settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpConfig {
    /// Base directory under which `nc_dump/` lives. Current directory if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,

    /// Maximum length of an auto-generated file name (extension excluded).
    #[serde(default = "default_keep_chars")]
    pub keep_chars: usize,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            keep_chars: default_keep_chars(),
        }
    }
}

fn default_keep_chars() -> usize {
    15
}

/// In-memory cache settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries; 0 means unbounded.
    #[serde(default)]
    pub capacity: usize,
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> DecorResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> DecorResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            general: GeneralConfig::default(),
            dump: DumpConfig::default(),
            cache: CacheConfig::default(),
        }
    }

    /// Rejects values that would make the dump layer unusable.
    pub fn validate(&self) -> DecorResult<()> {
        if self.dump.keep_chars == 0 {
            return Err(crate::DecorError::config(
                "dump.keep_chars must be greater than zero",
            ));
        }
        match self.general.log_format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(crate::DecorError::config(format!(
                "unknown log_format '{}' (expected text or json)",
                other
            ))),
        }
    }

    /// Path of the per-user configuration file, if a config dir exists.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("decor").join(CONFIG_FILE_NAME))
    }

    /// Tries the current directory, then the user config dir, then defaults.
    pub fn load_or_default() -> Self {
        let candidates = std::iter::once(PathBuf::from(CONFIG_FILE_NAME))
            .chain(Self::user_config_path());

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load(&path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring invalid config");
                }
            }
        }

        Self::default_config()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
