// crates/policy-test-config/src/config.rs
// ============================================================================
// Module: Policy Test Configuration
// Description: Configuration loading and validation for suite verification.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Resolution order is an explicit path, then [`CONFIG_ENV_VAR`], then
//! `policy-test.toml` in the working directory. Every section has defaults,
//! so an empty file is a valid configuration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "policy-test.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "POLICY_TEST_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default maximum artifact size in bytes.
pub(crate) const DEFAULT_MAX_FILE_BYTES: usize = 1024 * 1024;
/// Maximum allowed artifact size in bytes.
pub(crate) const MAX_MAX_FILE_BYTES: usize = 64 * 1024 * 1024;
/// Maximum allowed run timeout in milliseconds.
pub(crate) const MAX_TIMEOUT_MS: u64 = 3_600_000;
/// Maximum filter expression length.
pub(crate) const MAX_FILTER_LENGTH: usize = 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Policy test verification configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyConfig {
    /// Suite discovery configuration.
    #[serde(default)]
    pub suites: SuitesConfig,
    /// Run selection and cancellation configuration.
    #[serde(default)]
    pub run: RunConfig,
    /// Report output configuration.
    #[serde(default)]
    pub output: OutputConfig,
    /// Resource limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl VerifyConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path);
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
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
        self.suites.validate()?;
        self.run.validate()?;
        self.limits.validate()
    }
}

/// Suite discovery configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuitesConfig {
    /// Directory that bounds every file the run may read.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Suite file or directory, relative to `root`.
    #[serde(default = "default_target")]
    pub target: String,
    /// Scan subdirectories of `target` for suites.
    #[serde(default)]
    pub recursive: bool,
}

impl Default for SuitesConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            target: default_target(),
            recursive: false,
        }
    }
}

impl SuitesConfig {
    /// Validates discovery settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path(&self.root)?;
        if self.target.is_empty() {
            return Err(ConfigError::Invalid("suites.target must be set".to_string()));
        }
        let target = Path::new(&self.target);
        validate_path(target)?;
        for component in target.components() {
            match component {
                Component::ParentDir => {
                    return Err(ConfigError::Invalid(
                        "suites.target must not escape suites.root".to_string(),
                    ));
                }
                Component::Prefix(_) | Component::RootDir => {
                    return Err(ConfigError::Invalid(
                        "suites.target must be relative to suites.root".to_string(),
                    ));
                }
                Component::CurDir | Component::Normal(_) => {}
            }
        }
        Ok(())
    }
}

/// Run selection and cancellation configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Test/case filter expression (`TESTS//CASES`).
    #[serde(default)]
    pub filter: String,
    /// Optional overall run timeout in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl RunConfig {
    /// Returns the configured timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Validates run settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.filter.len() > MAX_FILTER_LENGTH {
            return Err(ConfigError::Invalid("run.filter exceeds length limit".to_string()));
        }
        if let Some(timeout_ms) = self.timeout_ms
            && !(1 ..= MAX_TIMEOUT_MS).contains(&timeout_ms)
        {
            return Err(ConfigError::Invalid(format!(
                "run.timeout_ms must be between 1 and {MAX_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable text report.
    #[default]
    Text,
    /// JSON report tree.
    Json,
}

/// Report output configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,
    /// Include passing and skipped units in text reports.
    #[serde(default)]
    pub verbose: bool,
}

/// Resource limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum size of any suite or artifact file, in bytes.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

impl LimitsConfig {
    /// Validates limit settings.
    fn validate(self) -> Result<(), ConfigError> {
        if self.max_file_bytes == 0 || self.max_file_bytes > MAX_MAX_FILE_BYTES {
            return Err(ConfigError::Invalid(format!(
                "limits.max_file_bytes must be between 1 and {MAX_MAX_FILE_BYTES}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// Config file is not valid TOML for this schema.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Config values are invalid.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default suite root.
fn default_root() -> PathBuf {
    PathBuf::from(".")
}

/// Default suite target.
fn default_target() -> String {
    ".".to_string()
}

/// Default artifact size limit.
const fn default_max_file_bytes() -> usize {
    DEFAULT_MAX_FILE_BYTES
}

/// Resolves the config path from an explicit value, the environment, or the default.
fn resolve_path(path: Option<&Path>) -> PathBuf {
    if let Some(path) = path {
        return path.to_path_buf();
    }
    env::var_os(CONFIG_ENV_VAR).map_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from)
}

/// Validates a path against length constraints.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("path component too long".to_string()));
        }
    }
    Ok(())
}
