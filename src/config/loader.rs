// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{ConfigFile, RawConfigFile, RawStreamConfig};
use crate::errors::{Result, StreammonError};

pub const ERR_EMPTY_CONFIG: &str = "the config file was empty or contained invalid json";

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// Top-level array of stream objects.
    Json,
    /// `[[stream]]` tables plus optional global keys.
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Load a configuration file from a given path and return the raw config.
///
/// This only performs deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    parse_str(&contents, ConfigFormat::from_path(path))
}

/// Parse configuration text in the given format.
pub fn parse_str(contents: &str, format: ConfigFormat) -> Result<RawConfigFile> {
    match format {
        ConfigFormat::Json => {
            if contents.trim().is_empty() {
                return Err(StreammonError::ConfigError(ERR_EMPTY_CONFIG.to_string()));
            }
            let stream: Vec<RawStreamConfig> = serde_json::from_str(contents)?;
            Ok(RawConfigFile {
                stream,
                ..RawConfigFile::default()
            })
        }
        ConfigFormat::Toml => Ok(toml::from_str(contents)?),
    }
}

/// Load a configuration file from path and validate every stream entry.
///
/// This is the recommended entry point for the rest of the application.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw = load_from_path(&path)?;
    ConfigFile::try_from(raw)
}
