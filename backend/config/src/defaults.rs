//! Config defaults: fills in values the config file left out.

use crate::schema::{FolioConfig, LoggingConfig, MediaConfig};

/// Directory uploaded files are stored in, relative to the working directory.
pub const DEFAULT_MEDIA_DIR: &str = "public/uploads";

/// Default bound on background deletions in flight.
pub const DEFAULT_MAX_CONCURRENT_DELETIONS: u32 = 8;

/// Default log filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: FolioConfig) -> FolioConfig {
    let config = apply_media_defaults(config);
    apply_logging_defaults(config)
}

fn apply_media_defaults(mut config: FolioConfig) -> FolioConfig {
    // `uploadPrefix` stays unset; the media layer owns its default.
    let media = config.media.get_or_insert_with(MediaConfig::default);
    if media.media_dir.is_none() {
        media.media_dir = Some(DEFAULT_MEDIA_DIR.to_string());
    }
    if media.max_concurrent_deletions.is_none() {
        media.max_concurrent_deletions = Some(DEFAULT_MAX_CONCURRENT_DELETIONS);
    }
    config
}

fn apply_logging_defaults(mut config: FolioConfig) -> FolioConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}
