#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for sheetcheck
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/sheetcheck/config.toml)
//! - Environment variables
//! - CLI flags

use serde::{Deserialize, Serialize};
use sheetcheck_errors::{ConfigError, Error};
use sheetcheck_types::{ColorChoice, OutputFormat};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub processing: ProcessingConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub source: SourceConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
}

/// Batch processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Run checks even when content is unchanged
    #[serde(default = "default_force_reprocess")]
    pub force_reprocess: bool,
    /// Documents processed at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Separators that end the entity token in a file name, tried in order
    #[serde(default = "default_entity_separators")]
    pub entity_separators: Vec<String>,
}

/// Result storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    pub database_path: Option<PathBuf>,
}

/// Document source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub input_dir: Option<PathBuf>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color_choice(),
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            force_reprocess: default_force_reprocess(),
            concurrency: default_concurrency(),
            entity_separators: default_entity_separators(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            input_dir: None,
            extensions: default_extensions(),
        }
    }
}

// Default value functions for serde
fn default_output_format() -> OutputFormat {
    OutputFormat::Tty
}

fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_force_reprocess() -> bool {
    false
}

fn default_concurrency() -> usize {
    1
}

fn default_entity_separators() -> Vec<String> {
    vec!["_".to_string(), "-".to_string(), " ".to_string()]
}

fn default_extensions() -> Vec<String> {
    ["xlsx", "xlsm", "xltx", "xltm"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("sheetcheck").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// holds values that fail validation.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // SHEETCHECK_OUTPUT
        if let Ok(output) = std::env::var("SHEETCHECK_OUTPUT") {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => return Err(invalid("SHEETCHECK_OUTPUT", output)),
            };
        }

        // SHEETCHECK_COLOR
        if let Ok(color) = std::env::var("SHEETCHECK_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => return Err(invalid("SHEETCHECK_COLOR", color)),
            };
        }

        // SHEETCHECK_FORCE
        if let Ok(force) = std::env::var("SHEETCHECK_FORCE") {
            self.processing.force_reprocess = match force.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => return Err(invalid("SHEETCHECK_FORCE", force)),
            };
        }

        // SHEETCHECK_CONCURRENCY
        if let Ok(concurrency) = std::env::var("SHEETCHECK_CONCURRENCY") {
            self.processing.concurrency = match concurrency.parse() {
                Ok(n) if n > 0 => n,
                _ => return Err(invalid("SHEETCHECK_CONCURRENCY", concurrency)),
            };
        }

        // SHEETCHECK_DATABASE
        if let Ok(database) = std::env::var("SHEETCHECK_DATABASE") {
            self.storage.database_path = Some(PathBuf::from(database));
        }

        // SHEETCHECK_INPUT_DIR
        if let Ok(input_dir) = std::env::var("SHEETCHECK_INPUT_DIR") {
            self.source.input_dir = Some(PathBuf::from(input_dir));
        }

        Ok(())
    }

    /// Reject values that would make a run meaningless
    ///
    /// # Errors
    ///
    /// Returns an error if concurrency is zero or no separators/extensions are set.
    pub fn validate(&self) -> Result<(), Error> {
        if self.processing.concurrency == 0 {
            return Err(invalid("processing.concurrency", "0".to_string()));
        }
        if self.processing.entity_separators.iter().all(String::is_empty) {
            return Err(invalid("processing.entity_separators", "[]".to_string()));
        }
        if self.source.extensions.is_empty() {
            return Err(invalid("source.extensions", "[]".to_string()));
        }
        Ok(())
    }

    /// Get the result database path (with default)
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage.database_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("sheetcheck")
                .join("results.sqlite")
        })
    }

    /// Get the input directory (with default)
    #[must_use]
    pub fn input_dir(&self) -> PathBuf {
        self.source
            .input_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}

fn invalid(field: &str, value: String) -> Error {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value,
    }
    .into()
}
