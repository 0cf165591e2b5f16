//! Configuration management for stickynotes
//!
//! Values are layered, lowest precedence first:
//! 1. Defaults
//! 2. `STICKYNOTES_*` environment variables
//! 3. A `stickynotes.yaml` file

use crate::common::env_loader::EnvLoader;
use crate::error::{NotesError, Result};
use crate::notes::{Color, DEFAULT_BACKGROUND_COLOR, DEFAULT_TEXT_COLOR};
use crate::storage::{FileKeyValueStore, PersistenceGateway, DEFAULT_STORAGE_KEY};
use crate::summarize::{HttpSummarizer, SummaryBounds, DEFAULT_SUMMARIZER_URL};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const CONFIG_FILENAME: &str = "stickynotes.yaml";
const ENV_PREFIX: &str = "STICKYNOTES";

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file from disk
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        /// Path to the configuration file that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse YAML content from a configuration file
    #[error("Invalid YAML syntax in {path}:\n{source}\n\nHint: Check for proper indentation and YAML formatting")]
    YamlParse {
        /// Path to the configuration file with invalid YAML content
        path: PathBuf,
        /// Underlying YAML parsing error
        #[source]
        source: serde_yaml::Error,
    },

    /// Invalid configuration value for a specific field
    #[error("Invalid configuration value for '{field}': {value}\n{hint}")]
    InvalidValue {
        /// Name of the offending field
        field: String,
        /// The value that was provided
        value: String,
        /// How to fix it
        hint: String,
    },

    /// Configuration validation failed
    #[error("Configuration validation failed: {message}")]
    Validation {
        /// What is inconsistent
        message: String,
    },
}

impl From<ConfigError> for NotesError {
    fn from(error: ConfigError) -> Self {
        NotesError::Config(error.to_string())
    }
}

/// Configuration settings for stickynotes
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the notes file (default: platform data dir)
    pub data_dir: Option<PathBuf>,
    /// Key the collection is stored under (default: "notes")
    pub storage_key: String,
    /// Background color of new notes (default: "white")
    pub default_background_color: String,
    /// Text color of new notes (default: "black")
    pub default_text_color: String,
    /// Summarization endpoint
    pub summarizer_url: String,
    /// Bearer token for the summarization endpoint
    pub summarizer_token: Option<String>,
    /// Minimum summary length (default: 20)
    pub summary_min_length: u32,
    /// Maximum summary length (default: 50)
    pub summary_max_length: u32,
    /// Summarization request timeout (default: 30)
    pub summarizer_timeout_secs: u64,
    /// Lines of content shown for a collapsed note (default: 3)
    pub collapsed_lines: usize,
}

impl Default for Config {
    fn default() -> Self {
        let bounds = SummaryBounds::default();
        Self {
            data_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            default_text_color: DEFAULT_TEXT_COLOR.to_string(),
            summarizer_url: DEFAULT_SUMMARIZER_URL.to_string(),
            summarizer_token: None,
            summary_min_length: bounds.min_length,
            summary_max_length: bounds.max_length,
            summarizer_timeout_secs: 30,
            collapsed_lines: 3,
        }
    }
}

impl Config {
    /// Load configuration from defaults, environment and the first
    /// `stickynotes.yaml` found. An unusable YAML file is logged and skipped.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env_vars();

        match YamlConfig::load_or_default() {
            Ok(yaml_config) => yaml_config.apply_to_config(&mut config),
            Err(e) => {
                tracing::warn!(
                    "Failed to load YAML configuration, falling back to env vars and defaults: {}",
                    e
                );
            }
        }

        config
    }

    /// Load configuration from defaults, environment and an explicit YAML
    /// file, which must exist and parse
    pub fn with_yaml_file(path: &Path) -> std::result::Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_vars();
        YamlConfig::load_from_file(path)?.apply_to_config(&mut config);
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        let loader = EnvLoader::new(ENV_PREFIX);

        self.data_dir = loader.load_optional("DATA_DIR").or(self.data_dir.take());
        self.storage_key = loader.load_string("STORAGE_KEY", &self.storage_key);
        self.default_background_color =
            loader.load_string("DEFAULT_BACKGROUND_COLOR", &self.default_background_color);
        self.default_text_color =
            loader.load_string("DEFAULT_TEXT_COLOR", &self.default_text_color);
        self.summarizer_url = loader.load_string("SUMMARIZER_URL", &self.summarizer_url);
        self.summarizer_token = loader
            .load_optional("SUMMARIZER_TOKEN")
            .or(self.summarizer_token.take());
        self.summary_min_length =
            loader.load_parsed("SUMMARY_MIN_LENGTH", self.summary_min_length);
        self.summary_max_length =
            loader.load_parsed("SUMMARY_MAX_LENGTH", self.summary_max_length);
        self.summarizer_timeout_secs =
            loader.load_parsed("SUMMARIZER_TIMEOUT_SECS", self.summarizer_timeout_secs);
        self.collapsed_lines = loader.load_parsed("COLLAPSED_LINES", self.collapsed_lines);
    }

    /// Find `stickynotes.yaml` in the working directory,
    /// `~/.config/stickynotes/` or `~`, in that order
    pub fn find_yaml_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(CONFIG_FILENAME)];
        if let Some(home_dir) = dirs::home_dir() {
            search_paths.push(home_dir.join(".config").join("stickynotes").join(CONFIG_FILENAME));
            search_paths.push(home_dir.join(CONFIG_FILENAME));
        }

        let found = search_paths
            .iter()
            .find_map(|path| Self::check_config_file(path));
        match &found {
            Some(path) => tracing::debug!("Found configuration file: {:?}", path),
            None => tracing::debug!("No {} found in any search location", CONFIG_FILENAME),
        }
        found
    }

    /// Check if a configuration file exists and is readable
    pub fn check_config_file(config_path: &Path) -> Option<PathBuf> {
        match config_path.try_exists() {
            Ok(true) if config_path.is_file() => match std::fs::File::open(config_path) {
                Ok(_) => Some(config_path.to_path_buf()),
                Err(e) => {
                    tracing::warn!(
                        "Configuration file {:?} exists but cannot be read: {}",
                        config_path,
                        e
                    );
                    None
                }
            },
            Ok(false) => None,
            Ok(true) => {
                tracing::debug!("Found {:?} but it is not a file", config_path);
                None
            }
            Err(e) => {
                tracing::warn!("Error checking for configuration file {:?}: {}", config_path, e);
                None
            }
        }
    }

    /// Validate the current configuration settings
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.storage_key.is_empty()
            || self.storage_key.starts_with('.')
            || !self
                .storage_key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(ConfigError::InvalidValue {
                field: "storage_key".to_string(),
                value: self.storage_key.clone(),
                hint: "storage_key may only contain letters, digits, '-', '_' and '.'".to_string(),
            });
        }

        self.background_color()?;
        self.text_color()?;

        let url = &self.summarizer_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "summarizer_url".to_string(),
                value: self.summarizer_url.clone(),
                hint: "summarizer_url must be an http:// or https:// URL".to_string(),
            });
        }

        if self.summary_min_length == 0 || self.summary_min_length > self.summary_max_length {
            return Err(ConfigError::Validation {
                message: format!(
                    "summary_min_length ({}) must be positive and not exceed summary_max_length ({})",
                    self.summary_min_length, self.summary_max_length
                ),
            });
        }

        for (field, value) in [
            ("summarizer_timeout_secs", self.summarizer_timeout_secs as usize),
            ("collapsed_lines", self.collapsed_lines),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    hint: format!("{} must be at least 1", field),
                });
            }
        }

        Ok(())
    }

    /// Parsed default background color
    pub fn background_color(&self) -> std::result::Result<Color, ConfigError> {
        Self::parse_color("default_background_color", &self.default_background_color)
    }

    /// Parsed default text color
    pub fn text_color(&self) -> std::result::Result<Color, ConfigError> {
        Self::parse_color("default_text_color", &self.default_text_color)
    }

    fn parse_color(field: &str, value: &str) -> std::result::Result<Color, ConfigError> {
        Color::parse(value).map_err(|e| ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            hint: e.to_string(),
        })
    }

    /// Summary length bounds
    pub fn summary_bounds(&self) -> SummaryBounds {
        SummaryBounds {
            min_length: self.summary_min_length,
            max_length: self.summary_max_length,
        }
    }

    /// The configured data directory, or the platform default
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(FileKeyValueStore::new_default()?.dir().to_path_buf()),
        }
    }

    /// Persistence gateway over the file store in the data directory
    pub fn gateway(&self) -> Result<PersistenceGateway> {
        let store = FileKeyValueStore::new(self.resolve_data_dir()?);
        Ok(
            PersistenceGateway::new(Box::new(store), self.storage_key.clone())
                .with_default_colors(self.background_color()?, self.text_color()?),
        )
    }

    /// HTTP summarizer for the configured endpoint
    pub fn summarizer(&self) -> Result<HttpSummarizer> {
        HttpSummarizer::new(
            self.summarizer_url.clone(),
            self.summarizer_token.clone(),
            Duration::from_secs(self.summarizer_timeout_secs),
        )
    }

    /// Example YAML configuration file content
    pub fn example_yaml_config() -> &'static str {
        r#"# stickynotes.yaml

# Where notes.json is kept (default: platform data directory)
# data_dir: /home/me/notes

default_background_color: "white"
default_text_color: "black"

summarizer_url: "https://api-inference.huggingface.co/models/facebook/bart-large-cnn"
# summarizer_token: "hf_..."
summary_min_length: 20
summary_max_length: 50
"#
    }
}

/// Configuration loaded from a `stickynotes.yaml` file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlConfig {
    /// Directory holding the notes file
    pub data_dir: Option<PathBuf>,
    /// Storage key
    pub storage_key: Option<String>,
    /// Background color of new notes
    pub default_background_color: Option<String>,
    /// Text color of new notes
    pub default_text_color: Option<String>,
    /// Summarization endpoint
    pub summarizer_url: Option<String>,
    /// Summarization bearer token
    pub summarizer_token: Option<String>,
    /// Minimum summary length
    pub summary_min_length: Option<u32>,
    /// Maximum summary length
    pub summary_max_length: Option<u32>,
    /// Summarization request timeout
    pub summarizer_timeout_secs: Option<u64>,
    /// Lines shown for a collapsed note
    pub collapsed_lines: Option<usize>,
}

impl YamlConfig {
    /// Apply the values present in the file; they take precedence
    pub fn apply_to_config(&self, config: &mut Config) {
        fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }

        if self.data_dir.is_some() {
            config.data_dir = self.data_dir.clone();
        }
        if self.summarizer_token.is_some() {
            config.summarizer_token = self.summarizer_token.clone();
        }
        set(&mut config.storage_key, &self.storage_key);
        set(&mut config.default_background_color, &self.default_background_color);
        set(&mut config.default_text_color, &self.default_text_color);
        set(&mut config.summarizer_url, &self.summarizer_url);
        set(&mut config.summary_min_length, &self.summary_min_length);
        set(&mut config.summary_max_length, &self.summary_max_length);
        set(&mut config.summarizer_timeout_secs, &self.summarizer_timeout_secs);
        set(&mut config.collapsed_lines, &self.collapsed_lines);
    }

    /// Load YAML configuration from a file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::debug!("Loading YAML configuration from: {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        // An empty file deserializes as unit, not a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|e| ConfigError::YamlParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load the first configuration file found, or defaults if there is none
    pub fn load_or_default() -> std::result::Result<Self, ConfigError> {
        match Config::find_yaml_config_file() {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}
