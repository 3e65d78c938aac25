use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, FfcomposeError};

fn default_binary_path() -> String {
    "ffmpeg".to_string()
}

fn default_log_file_name() -> String {
    "ffcompose.log".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub presets: PresetConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffmpeg binary, used as the program of rendered command lines
    #[serde(default = "default_binary_path")]
    pub binary_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetConfig {
    /// Directory searched for `<name>.toml` preset files after the built-in presets
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for daily-rotated log files; console only when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_log_file_name")]
    pub file_name: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            binary_path: default_binary_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: default_log_file_name(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FfcomposeError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| FfcomposeError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FfcomposeError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| FfcomposeError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
