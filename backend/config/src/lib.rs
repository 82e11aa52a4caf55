//! `folio-config`: runtime configuration for the Folio tools.
//!
//! Provides:
//! - Typed config schema (media, logging)
//! - YAML loading from `FOLIO_CONFIG_DIR` or `~/.folio/`
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Validation with per-field messages

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_raw_config};
pub use schema::{FolioConfig, LoggingConfig, MediaConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use std::path::Path;

/// Load a config file, substitute env vars, apply defaults, and validate.
///
/// The report is returned rather than logged so callers can install a
/// logger from the loaded config first.
pub async fn load_and_validate(path: &Path) -> Result<(FolioConfig, ValidationReport)> {
    let value = load_raw_config(path).await?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;

    let config: FolioConfig =
        serde_json::from_value(value).context("Failed to deserialize config")?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    Ok((config, report))
}

pub fn log_report(report: &ValidationReport) {
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
}

/// [`load_and_validate`], logging any findings. The config is returned
/// even when validation reports errors.
pub async fn load_and_prepare(path: &Path) -> Result<FolioConfig> {
    let (config, report) = load_and_validate(path).await?;
    log_report(&report);
    Ok(config)
}
