//! Store configuration.
//!
//! Configuration is explicit: callers load a [`Config`] once and pass the
//! pieces to the engine calls that need them. There is no process-wide
//! state. The language set is consulted only by translation creation.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// error loading or parsing configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// location of the repository (working copy + object store)
    pub repository: PathBuf,

    /// translation languages
    #[serde(default)]
    pub languages: LanguageConfig,
}

impl Config {
    /// parse configuration from a TOML string
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml(&input)
    }
}

/// the set of enabled translation languages plus the default
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    pub default: String,
    pub enabled: Vec<String>,
}

impl LanguageConfig {
    /// whether a language code may be used as a translation target
    pub fn is_enabled(&self, code: &str) -> bool {
        self.enabled.iter().any(|c| c == code)
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            default: "en".to_string(),
            enabled: vec!["en".to_string()],
        }
    }
}
