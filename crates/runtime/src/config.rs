use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

pub const PROGRAM_NAME: &str = "donkey";
pub const PROGRAM_LOG_LEVEL: &str = "DONKEY_LOG_LEVEL";
/// Overrides the settings file location.
pub const CONFIG_ENV: &str = "DONKEY_CONFIG";
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_PORT: u16 = 50052;
pub const DEFAULT_THREADS: usize = 8;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:50052";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to listen on.
    pub bind: String,
    pub port: u16,
    /// Worker pool size.
    pub threads: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            threads: DEFAULT_THREADS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// `host[:port]` of the server to call.
    pub server: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER_ADDRESS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub client: ClientSettings,
    pub log_level: Option<String>,
}

/// `$DONKEY_CONFIG` if set, otherwise `<config dir>/donkey/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV)
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir().map(|d| d.join(PROGRAM_NAME).join(CONFIG_FILE_NAME))
}

impl Settings {
    /// Load from the default location. No file means defaults.
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No settings file at {}; using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read settings from {}", path.display()));
            }
        };

        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
