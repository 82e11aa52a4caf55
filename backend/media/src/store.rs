//! Local filesystem asset store.
//!
//! Uploads live in a single media directory and are served under the
//! managed prefix, so `/uploads/2024/a.png` maps to `<media_dir>/2024/a.png`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use folio_core::{AssetStore, DeleteOutcome, FolioError};
use tokio::fs;
use tracing::{debug, info};

use crate::managed::ManagedAssets;

#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    media_dir: PathBuf,
    assets: ManagedAssets,
}

impl LocalAssetStore {
    pub fn new(media_dir: impl Into<PathBuf>, assets: ManagedAssets) -> Self {
        Self {
            media_dir: media_dir.into(),
            assets,
        }
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// File backing a managed reference.
    pub fn path_for(&self, reference: &str) -> Result<PathBuf, FolioError> {
        let relative = self.assets.relative_path(reference).ok_or_else(|| {
            FolioError::AssetRejected(format!("{reference} is not under {}", self.assets.prefix()))
        })?;
        Ok(self.media_dir.join(relative))
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn delete(&self, reference: &str) -> Result<DeleteOutcome, FolioError> {
        let path = self.path_for(reference)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "Deleted asset file");
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Asset file already gone");
                Ok(DeleteOutcome::Missing)
            }
            Err(e) => Err(FolioError::Storage(format!(
                "failed to delete {}: {e}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> LocalAssetStore {
        LocalAssetStore::new(dir, ManagedAssets::default())
    }

    #[tokio::test]
    async fn deletes_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("2024")).unwrap();
        let file = dir.path().join("2024/a.png");
        std::fs::write(&file, b"png").unwrap();

        let outcome = store(dir.path()).delete("/uploads/2024/a.png").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(!file.exists());
    }

    #[tokio::test]
    async fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = store(dir.path()).delete("/uploads/gone.png").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Missing);
    }

    #[tokio::test]
    async fn refuses_unmanaged_references() {
        let dir = tempfile::tempdir().unwrap();
        let outside = dir.path().join("keep.txt");
        std::fs::write(&outside, b"keep").unwrap();

        let store = LocalAssetStore::new(dir.path().join("uploads"), ManagedAssets::default());
        let err = store.delete("/uploads/../keep.txt").await.unwrap_err();
        assert!(matches!(err, FolioError::AssetRejected(_)));
        let err = store.delete("https://cdn.example.com/a.png").await.unwrap_err();
        assert!(matches!(err, FolioError::AssetRejected(_)));
        assert!(outside.exists());
    }

    #[tokio::test]
    async fn directory_in_place_of_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("folder")).unwrap();
        let err = store(dir.path()).delete("/uploads/folder").await.unwrap_err();
        assert!(matches!(err, FolioError::Storage(_)));
    }

    #[test]
    fn maps_references_to_media_dir() {
        let store = LocalAssetStore::new("/srv/media", ManagedAssets::default());
        assert_eq!(
            store.path_for("/uploads/x/y.png?v=1").unwrap(),
            PathBuf::from("/srv/media/x/y.png")
        );
        assert_eq!(store.media_dir(), Path::new("/srv/media"));
    }
}
