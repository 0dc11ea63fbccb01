// crates/refdoc-core/src/config.rs
// ============================================================================
// Module: Generator Configuration
// Description: Configuration loading and validation for the doc generator.
// Purpose: Provide strict config parsing with hard input limits.
// Dependencies: crate::events, serde, toml, thiserror
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The file is optional: when neither an explicit path nor the environment
//! variable names one and `refdoc.toml` does not exist, defaults apply.
//! Unknown fields are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::build::DEFAULT_LIST_ITEM_PREFIX;
use crate::events::EventSink;
use crate::events::FileEventSink;
use crate::events::NoopEventSink;
use crate::events::StderrEventSink;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "refdoc.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "REFDOC_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Reference configuration document.
    #[serde(default = "default_reference_path")]
    pub reference_path: PathBuf,
    /// Directory holding `<container>-info.json` metadata files.
    #[serde(default = "default_assets_path")]
    pub assets_path: PathBuf,
    /// Directory receiving generated Markdown artifacts.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Anchor prefix of component table rows.
    #[serde(default = "default_list_item_prefix")]
    pub list_item_prefix: String,
    /// Reject undocumented top-level keys instead of dropping them.
    #[serde(default)]
    pub strict_keys: bool,
    /// Generation event logging.
    #[serde(default)]
    pub events: EventsConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            reference_path: default_reference_path(),
            assets_path: default_assets_path(),
            output_dir: default_output_dir(),
            list_item_prefix: default_list_item_prefix(),
            strict_keys: false,
            events: EventsConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        if !explicit && !resolved.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_path_field("reference_path", &self.reference_path)?;
        validate_path_field("assets_path", &self.assets_path)?;
        validate_path_field("output_dir", &self.output_dir)?;
        if self.list_item_prefix.is_empty() {
            return Err(ConfigError::Invalid("list_item_prefix must be non-empty".to_string()));
        }
        if self.list_item_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(
                "list_item_prefix must not contain whitespace".to_string(),
            ));
        }
        self.events.validate()
    }
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Event sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `events.path`.
    File,
    /// Events discarded.
    #[serde(rename = "none")]
    Disabled,
}

/// Event logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: EventSinkKind,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl EventsConfig {
    /// Validates sink settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file sink has no path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (EventSinkKind::File, None) => {
                Err(ConfigError::Invalid("events.path is required for the file sink".to_string()))
            }
            (EventSinkKind::File, Some(path)) => validate_path_field("events.path", path),
            _ => Ok(()),
        }
    }

    /// Builds the configured event sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the event log cannot be opened.
    pub fn build_sink(&self) -> Result<Arc<dyn EventSink>, ConfigError> {
        match (self.sink, &self.path) {
            (EventSinkKind::Stderr, _) => Ok(Arc::new(StderrEventSink)),
            (EventSinkKind::Disabled, _) => Ok(Arc::new(NoopEventSink)),
            (EventSinkKind::File, Some(path)) => {
                let sink = FileEventSink::new(path)
                    .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
                Ok(Arc::new(sink))
            }
            (EventSinkKind::File, None) => {
                Err(ConfigError::Invalid("events.path is required for the file sink".to_string()))
            }
        }
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default reference document path.
fn default_reference_path() -> PathBuf {
    PathBuf::from(".golangci.reference.yml")
}

/// Default metadata directory.
fn default_assets_path() -> PathBuf {
    PathBuf::from("assets")
}

/// Default artifact directory.
fn default_output_dir() -> PathBuf {
    PathBuf::from("docs/generated")
}

/// Default table anchor prefix.
fn default_list_item_prefix() -> String {
    DEFAULT_LIST_ITEM_PREFIX.to_string()
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
///
/// The flag is true when the path was named explicitly.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path field against length constraints.
fn validate_path_field(field: &str, path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in path.components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}
