//! Configuration module for tuneshelf
//!
//! Manages application configuration: which extensions count as audio, how
//! organize handles collisions, how clean traverses, and display preferences.
//! Configuration is stored in the user's config directory.

use std::fs;
use std::path::PathBuf;
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::commands::{CleanMode, CollisionPolicy};

/// Path display format
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum PathFormat {
    /// Display absolute paths
    #[default]
    Absolute,
    /// Display relative paths (relative to current directory)
    Relative,
}

fn default_audio_extensions() -> Vec<String> {
    vec![".mp3".to_string()]
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TuneshelfConfig {
    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,

    /// Default format for displaying paths (absolute or relative)
    #[serde(default)]
    pub path_format: PathFormat,

    /// Filename suffixes treated as audio by mass updates and `--kind audio`
    #[serde(default = "default_audio_extensions")]
    pub audio_extensions: Vec<String>,

    /// What organize does when the target file already exists
    #[serde(default)]
    pub collision: CollisionPolicy,

    /// Traversal strategy for clean
    #[serde(default)]
    pub clean_mode: CleanMode,

    /// Destination used by organize when none is given
    #[serde(default)]
    pub default_destination: Option<PathBuf>,
}

impl Default for TuneshelfConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            path_format: PathFormat::default(),
            audio_extensions: default_audio_extensions(),
            collision: CollisionPolicy::default(),
            clean_mode: CleanMode::default(),
            default_destination: None,
        }
    }
}

/// Keys accepted by `config get` / `config set`
pub const CONFIG_KEYS: &[&str] = &[
    "quiet",
    "path_format",
    "audio_extensions",
    "collision",
    "clean_mode",
    "default_destination",
];

impl TuneshelfConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("tuneshelf").join("config.toml"))
    }

    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        Self::load_from(config_path)
    }

    /// Load configuration from an explicit file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        fs::write(&config_path, self.to_toml()?)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Serialize to TOML text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))
    }

    /// Read a single setting as display text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the key is unknown.
    pub fn get_value(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "quiet" => self.quiet.to_string(),
            "path_format" => enum_text(&self.path_format)?,
            "audio_extensions" => self.audio_extensions.join(","),
            "collision" => enum_text(&self.collision)?,
            "clean_mode" => enum_text(&self.clean_mode)?,
            "default_destination" => self
                .default_destination
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Update a single setting from text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the key is unknown or the value cannot be parsed.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "quiet" => {
                self.quiet = value.parse::<bool>().map_err(|_| {
                    ConfigError::Message(format!(
                        "Invalid value for quiet: '{value}'. Use 'true' or 'false'"
                    ))
                })?;
            }
            "path_format" => self.path_format = enum_from_text(key, value)?,
            "audio_extensions" => {
                let extensions: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect();
                if extensions.is_empty() {
                    return Err(ConfigError::Message(
                        "audio_extensions needs at least one suffix, e.g. .mp3".to_string(),
                    ));
                }
                self.audio_extensions = extensions;
            }
            "collision" => self.collision = enum_from_text(key, value)?,
            "clean_mode" => self.clean_mode = enum_from_text(key, value)?,
            "default_destination" => {
                self.default_destination = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::Message(format!(
        "Unknown configuration key: '{key}'. Available keys: {}",
        CONFIG_KEYS.join(", ")
    ))
}

fn enum_text<T: Serialize>(value: &T) -> Result<String, ConfigError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => Ok(s),
        Ok(other) => Ok(other.to_string()),
        Err(e) => Err(ConfigError::Message(e.to_string())),
    }
}

fn enum_from_text<T: for<'de> Deserialize<'de>>(key: &str, value: &str) -> Result<T, ConfigError> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| ConfigError::Message(format!("Invalid value for {key}: '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TuneshelfConfig::default();
        assert!(!config.quiet);
        assert_eq!(config.audio_extensions, vec![".mp3"]);
        assert_eq!(config.collision, CollisionPolicy::Overwrite);
        assert_eq!(config.clean_mode, CleanMode::SinglePass);
        assert!(config.default_destination.is_none());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "collision = \"skip\"").unwrap();
        writeln!(file, "clean_mode = \"fixed-point\"").unwrap();

        let config = TuneshelfConfig::load_from(file.path().to_path_buf()).unwrap();
        assert_eq!(config.collision, CollisionPolicy::Skip);
        assert_eq!(config.clean_mode, CleanMode::FixedPoint);
        assert_eq!(config.audio_extensions, vec![".mp3"]);
        assert_eq!(config.path_format, PathFormat::Absolute);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = TuneshelfConfig::default();
        config.audio_extensions = vec![".mp3".into(), ".m4a".into()];
        config.default_destination = Some(PathBuf::from("/music/sorted"));

        let text = config.to_toml().unwrap();
        let parsed: TuneshelfConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.audio_extensions, config.audio_extensions);
        assert_eq!(parsed.default_destination, config.default_destination);
    }

    #[test]
    fn test_set_and_get_values() {
        let mut config = TuneshelfConfig::default();

        config.set_value("quiet", "true").unwrap();
        assert_eq!(config.get_value("quiet").unwrap(), "true");

        config.set_value("collision", "skip").unwrap();
        assert_eq!(config.get_value("collision").unwrap(), "skip");

        config.set_value("clean_mode", "fixed-point").unwrap();
        assert_eq!(config.get_value("clean_mode").unwrap(), "fixed-point");

        config.set_value("path_format", "relative").unwrap();
        assert_eq!(config.path_format, PathFormat::Relative);

        config.set_value("audio_extensions", ".mp3, .m4a").unwrap();
        assert_eq!(config.get_value("audio_extensions").unwrap(), ".mp3,.m4a");

        config.set_value("default_destination", "/srv/music").unwrap();
        assert_eq!(config.get_value("default_destination").unwrap(), "/srv/music");
        config.set_value("default_destination", "").unwrap();
        assert!(config.default_destination.is_none());
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = TuneshelfConfig::default();
        assert!(config.set_value("quiet", "maybe").is_err());
        assert!(config.set_value("collision", "explode").is_err());
        assert!(config.set_value("audio_extensions", " , ").is_err());
        let err = config.set_value("colour", "red").unwrap_err();
        assert!(err.to_string().contains("Available keys"));
    }
}
