//! CLI configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tabi_abi::AbiConfig;

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Coder settings
    #[serde(default)]
    pub abi: AbiConfig,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            abi: AbiConfig::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".tabi"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from the given file, or the default location, or return default
    pub fn load(path: Option<&Path>) -> Self {
        path.map(Path::to_path_buf)
            .or_else(Self::config_path)
            .filter(|path| path.exists())
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Save config to the given file or the default location
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf, std::io::Error> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(Self::config_path)
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "Cannot determine config path")
            })?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        std::fs::write(&path, content)?;
        Ok(path)
    }
}
