//! Ties reference tracking to background cleanup for one document.

use folio_richtext::Doc;
use tracing::debug;

use crate::cleanup::{AssetCleaner, CleanupBatch};
use crate::managed::ManagedAssets;
use crate::tracker::{removed_managed_references, AssetTracker};

/// Deletes managed images that `next` dropped relative to `previous`.
///
/// Returns as soon as the deletions are spawned.
pub fn diff_and_react(
    previous: &Doc,
    next: &Doc,
    assets: &ManagedAssets,
    cleaner: &AssetCleaner,
) -> CleanupBatch {
    cleaner.dispatch(removed_managed_references(previous, next, assets))
}

/// Observes successive versions of one document. Versions must be applied
/// in order; `on_update` takes `&mut self` for that reason.
pub struct AssetWatcher {
    tracker: AssetTracker,
    cleaner: AssetCleaner,
}

impl AssetWatcher {
    pub fn new(initial: &Doc, assets: ManagedAssets, cleaner: AssetCleaner) -> Self {
        Self {
            tracker: AssetTracker::new(initial, assets),
            cleaner,
        }
    }

    pub fn tracker(&self) -> &AssetTracker {
        &self.tracker
    }

    pub fn on_update(&mut self, next: &Doc) -> CleanupBatch {
        let removed = self.tracker.observe(next);
        if !removed.is_empty() {
            debug!(removed = ?removed, "Document version dropped managed images");
        }
        self.cleaner.dispatch(removed)
    }
}
