//! Configuration loading via `ortho-config`.
//!
//! Settings merge defaults, `ukfast.toml` (discovered in the usual places or
//! named by `UKF_CONFIG_PATH`), and `UKF_*` environment variables. Command
//! line flags such as `--output` override the loaded values in the binary.

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::output::RenderFormat;

/// Default location of the offline catalog, relative to the working
/// directory.
pub const DEFAULT_CATALOG_PATH: &str = "ukfast-catalog.json";

/// Client settings shared by every command.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "UKF",
    discovery(
        app_name = "ukfast",
        env_var = "UKF_CONFIG_PATH",
        config_file_name = "ukfast.toml",
        dotfile_name = ".ukfast.toml",
        project_file_name = "ukfast.toml"
    )
)]
pub struct CliConfig {
    /// JSON catalog backing the resource services.
    #[ortho_config(default = DEFAULT_CATALOG_PATH.to_owned())]
    pub catalog_path: String,
    /// Output format used when `--output` is not given.
    #[ortho_config(default = "table".to_owned())]
    pub output: String,
    /// Log filter applied when `RUST_LOG` is unset, e.g. `warn` or
    /// `ukfast=debug`.
    #[ortho_config(default = "warn".to_owned())]
    pub log_level: String,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }

    fn missing(&self) -> ConfigError {
        ConfigError::MissingField(format!(
            "missing {}: set {} or add {} to ukfast.toml",
            self.description, self.env_var, self.toml_key
        ))
    }
}

const CATALOG_FIELD: FieldMetadata =
    FieldMetadata::new("catalog path", "UKF_CATALOG_PATH", "catalog_path");
const OUTPUT_FIELD: FieldMetadata = FieldMetadata::new("output format", "UKF_OUTPUT", "output");
const LOG_LEVEL_FIELD: FieldMetadata =
    FieldMetadata::new("log level", "UKF_LOG_LEVEL", "log_level");

impl CliConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(metadata.missing());
        }
        Ok(())
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("ukfast")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Performs semantic validation. Error messages name the environment
    /// variable and TOML key that supply the offending value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty
    /// and [`ConfigError::InvalidField`] when the output format is unknown.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(&self.catalog_path, &CATALOG_FIELD)?;
        Self::require_field(&self.output, &OUTPUT_FIELD)?;
        Self::require_field(&self.log_level, &LOG_LEVEL_FIELD)?;
        self.render_format().map(|_| ())
    }

    /// Default output format parsed from [`CliConfig::output`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] naming the accepted formats.
    pub fn render_format(&self) -> Result<RenderFormat, ConfigError> {
        self.output.parse().map_err(|_| {
            let accepted: Vec<&str> =
                RenderFormat::ALL.iter().map(|format| format.name()).collect();
            ConfigError::InvalidField(format!(
                "unknown output format [{}]: set {} or {} in ukfast.toml to one of {}",
                self.output.trim(),
                OUTPUT_FIELD.env_var,
                OUTPUT_FIELD.toml_key,
                accepted.join(", ")
            ))
        })
    }

    /// Catalog location as a UTF-8 path.
    #[must_use]
    pub fn catalog_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.catalog_path.trim())
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            catalog_path: DEFAULT_CATALOG_PATH.to_owned(),
            output: String::from("table"),
            log_level: String::from("warn"),
        }
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates a configuration field holds an unusable value.
    #[error("invalid configuration field: {0}")]
    InvalidField(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
