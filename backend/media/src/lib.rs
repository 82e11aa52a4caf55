//! Lifecycle tracking for images embedded in rich documents.
//!
//! When an edit removes an uploaded image from a document, the stored file
//! becomes an orphan. [`AssetTracker`] computes which managed references an
//! edit removed, [`AssetCleaner`] deletes them in the background, and
//! [`AssetWatcher`] ties the two together for one document's edit stream.

pub mod cleanup;
pub mod managed;
pub mod store;
pub mod tracker;
pub mod watcher;

pub use cleanup::{AssetCleaner, CleanupBatch, CleanupEvent};
pub use managed::ManagedAssets;
pub use store::LocalAssetStore;
pub use tracker::{removed_managed_references, removed_references, AssetTracker};
pub use watcher::{diff_and_react, AssetWatcher};
