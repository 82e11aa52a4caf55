use std::path::PathBuf;

use folio_config::FolioConfig;
use folio_logging::LogOptions;
use folio_media::{AssetCleaner, LocalAssetStore, ManagedAssets};
use std::sync::Arc;

/// Runtime settings resolved from the loaded config.
#[derive(Debug, Clone)]
pub struct Settings {
    pub assets: ManagedAssets,
    pub media_dir: PathBuf,
    pub max_concurrent_deletions: usize,
    pub log: LogOptions,
}

impl Settings {
    /// Expects a config that already went through `apply_all_defaults`.
    pub fn from_config(config: &FolioConfig) -> Self {
        let media = config.media();
        let logging = config.logging();

        let mut assets = match media.upload_prefix {
            Some(prefix) => ManagedAssets::new(prefix),
            None => ManagedAssets::default(),
        };
        if let Some(origin) = media.public_origin {
            assets = assets.with_origin(origin);
        }

        let defaults = LogOptions::default();
        Self {
            assets,
            media_dir: PathBuf::from(
                media
                    .media_dir
                    .unwrap_or_else(|| folio_config::defaults::DEFAULT_MEDIA_DIR.to_string()),
            ),
            max_concurrent_deletions: media
                .max_concurrent_deletions
                .unwrap_or(folio_config::defaults::DEFAULT_MAX_CONCURRENT_DELETIONS)
                .max(1) as usize,
            log: LogOptions {
                level: logging
                    .level
                    .filter(|l| !l.trim().is_empty())
                    .unwrap_or(defaults.level),
                json: logging.json.unwrap_or(defaults.json),
                dir: logging.dir.map(PathBuf::from),
            },
        }
    }

    pub fn cleaner(&self) -> AssetCleaner {
        let store = LocalAssetStore::new(self.media_dir.clone(), self.assets.clone());
        AssetCleaner::new(Arc::new(store)).with_concurrency_limit(self.max_concurrent_deletions)
    }
}
