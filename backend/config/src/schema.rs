//! Folio runtime configuration schema.
//!
//! Typed for serde YAML/JSON deserialization with camelCase keys. Every
//! section is optional; [`crate::defaults`] fills in what is missing.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolioConfig {
    /// Uploaded media and cleanup behavior
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaConfig {
    /// URL prefix uploads are served under, e.g. `/uploads/`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_prefix: Option<String>,

    /// The site's own origin (`https://me.dev`), so absolute links to our
    /// uploads still count as managed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_origin: Option<String>,

    /// Directory holding uploaded files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_dir: Option<String>,

    /// Upper bound on background deletions in flight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_deletions: Option<u32>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for rolling NDJSON log files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// JSON console output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

impl FolioConfig {
    pub fn media(&self) -> MediaConfig {
        self.media.clone().unwrap_or_default()
    }

    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r#"
media:
  uploadPrefix: /media/
  publicOrigin: https://me.dev
  maxConcurrentDeletions: 4
logging:
  level: debug
  json: true
"#;
        let config: FolioConfig = serde_yaml::from_str(yaml).unwrap();
        let media = config.media();
        assert_eq!(media.upload_prefix.as_deref(), Some("/media/"));
        assert_eq!(media.public_origin.as_deref(), Some("https://me.dev"));
        assert_eq!(media.max_concurrent_deletions, Some(4));
        assert!(media.media_dir.is_none());
        assert_eq!(config.logging().json, Some(true));
    }

    #[test]
    fn empty_sections_serialize_away() {
        let json = serde_json::to_string(&FolioConfig::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
