//! Config validation with field paths in every message.

use crate::schema::FolioConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &FolioConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_media(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_media(config: &FolioConfig, report: &mut ValidationReport) {
    let Some(media) = &config.media else { return };

    if let Some(prefix) = &media.upload_prefix {
        if !prefix.starts_with('/') {
            report.error("media.uploadPrefix", format!("Prefix must start with '/': {prefix}"));
        } else if prefix.trim_end_matches('/').is_empty() {
            report.error("media.uploadPrefix", "Prefix cannot be the site root");
        }
    }

    if media.max_concurrent_deletions == Some(0) {
        report.error("media.maxConcurrentDeletions", "Must be greater than 0");
    }

    if let Some(origin) = &media.public_origin {
        let scheme_ok = origin.starts_with("http://") || origin.starts_with("https://");
        let host = origin.split_once("://").map(|(_, rest)| rest).unwrap_or("");
        if !scheme_ok || host.is_empty() {
            report.warn(
                "media.publicOrigin",
                format!("Expected an http(s) origin such as https://example.com, got {origin}"),
            );
        } else if host.ends_with('/') {
            report.warn("media.publicOrigin", "Origin should not end with '/'");
        } else if host.contains('/') {
            report.warn("media.publicOrigin", "Origin should not include a path");
        }
    }

    if media.media_dir.as_deref().is_some_and(|d| d.trim().is_empty()) {
        report.error("media.mediaDir", "Media directory cannot be empty");
    }
}

fn validate_logging(config: &FolioConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if logging.level.as_deref().is_some_and(|l| l.trim().is_empty()) {
        report.warn("logging.level", "Empty level; falling back to 'info'");
    }
}
