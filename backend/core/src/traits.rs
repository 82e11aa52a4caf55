use async_trait::async_trait;

use crate::error::FolioError;
use crate::types::DeleteOutcome;

/// Storage backend that owns the lifecycle of uploaded assets.
///
/// Implementations must treat a missing asset as success
/// ([`DeleteOutcome::Missing`]) so repeated cleanups stay harmless.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Human-readable name of this store (e.g., "local").
    fn name(&self) -> &str;

    /// Remove the asset identified by a managed reference such as `/uploads/a.png`.
    async fn delete(&self, reference: &str) -> Result<DeleteOutcome, FolioError>;
}
