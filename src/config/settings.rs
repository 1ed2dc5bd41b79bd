use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::read_buffer::DEFAULT_CAPACITY;

/// Largest scratch capacity accepted from configuration (16 MiB)
pub const MAX_CAPACITY: usize = 16 * 1024 * 1024;

/// Settings stored in settings.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub read: ReadSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load from the platform config dir. A missing file yields defaults
    /// and nothing is written; call [`save`](Self::save) to persist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_or_default(&Self::settings_path()?)
    }

    /// Write to the platform config dir, creating the directory if needed
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::settings_path()?;
        super::paths::ensure_config_dir().map_err(ConfigError::CreateDir)?;
        self.save_to(&path)
    }

    fn settings_path() -> Result<std::path::PathBuf, ConfigError> {
        super::paths::settings_file().ok_or_else(|| ConfigError::ReadFile {
            path: std::path::PathBuf::from("settings.toml"),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine settings file path",
            ),
        })
    }

    /// [`load_from`](Self::load_from), or defaults when `path` does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load and validate settings from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let settings: Self = toml::from_str(&content)?;
        settings.validate()?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let content = toml::to_string_pretty(self)?;
        super::write_atomic(path, &content).map_err(|e| ConfigError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.read.validate()
    }
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

/// `[read]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadSettings {
    /// Scratch buffer size in bytes for new read buffers
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for ReadSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl ReadSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "read.capacity must be between 1 and {} bytes, got {}",
                MAX_CAPACITY, self.capacity
            )));
        }
        Ok(())
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

/// `[logging]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// Default filter directive when RUST_LOG is unset
    #[serde(default = "default_level")]
    pub level: String,
    /// Also write a daily rolling log file
    #[serde(default = "default_true")]
    pub file: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: true,
        }
    }
}
