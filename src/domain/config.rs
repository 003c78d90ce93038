use std::path::Path;

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

/// Configuration for a to-do list.
///
/// Read from `config.toml` in the data directory. Every field has a
/// default, so an absent file behaves like an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The backend key the snapshot is stored under.
    storage_key: NonEmptyString,

    /// Terminal width (in columns) below which list rows are shortened.
    pub narrow_width: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            narrow_width: default_narrow_width(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        toml::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Loads `config.toml` from `root`, falling back to the defaults.
    #[must_use]
    pub fn load_or_default(root: &Path) -> Self {
        let path = root.join("config.toml");
        Self::load(&path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config from {}: {e}", path.display());
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }

    /// The backend key the snapshot is stored under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        self.storage_key.as_str()
    }

    /// Changes the storage key.
    ///
    /// # Errors
    ///
    /// Returns the rejected input if it is empty.
    pub fn set_storage_key(&mut self, key: String) -> Result<(), String> {
        self.storage_key = NonEmptyString::new(key)?;
        Ok(())
    }
}

/// Errors reading or writing the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file: {0}")]
    Read(#[source] std::io::Error),
    /// The file is not valid configuration TOML.
    #[error("Failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),
    /// The configuration could not be rendered as TOML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] toml::ser::Error),
    /// The file could not be written.
    #[error("Failed to write config file: {0}")]
    Write(#[source] std::io::Error),
}

fn default_storage_key() -> NonEmptyString {
    NonEmptyString::new("toDos".to_string()).expect("default key is non-empty")
}

const fn default_narrow_width() -> u16 {
    60
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_storage_key")]
        storage_key: NonEmptyString,

        #[serde(default = "default_narrow_width")]
        narrow_width: u16,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                storage_key,
                narrow_width,
            } => Self {
                storage_key,
                narrow_width,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            storage_key: config.storage_key,
            narrow_width: config.narrow_width,
        }
    }
}
