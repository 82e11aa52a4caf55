//! Asset reference diffing.
//!
//! Pure set arithmetic over the image references of two document versions.
//! Nothing here performs I/O; see [`crate::cleanup`] for the side effects.

use std::collections::BTreeSet;

use folio_richtext::{image_sources, Doc};

use crate::managed::ManagedAssets;

/// References present in `previous` but absent from `next`, sorted.
pub fn removed_references(previous: &Doc, next: &Doc) -> Vec<String> {
    let before = image_sources(previous);
    let after = image_sources(next);
    before.difference(&after).cloned().collect()
}

/// Managed references whose stored file `next` no longer uses, sorted.
///
/// References are compared by storage key, so `https://me.dev/uploads/a.png`
/// and `/uploads/a.png?v=2` both count as still using `a.png`. At most one
/// reference is reported per key.
pub fn removed_managed_references(
    previous: &Doc,
    next: &Doc,
    assets: &ManagedAssets,
) -> Vec<String> {
    dropped_managed(&image_sources(previous), &image_sources(next), assets)
}

fn dropped_managed(
    before: &BTreeSet<String>,
    after: &BTreeSet<String>,
    assets: &ManagedAssets,
) -> Vec<String> {
    let kept: BTreeSet<&str> = after
        .iter()
        .filter_map(|reference| assets.relative_path(reference.as_str()))
        .collect();
    let mut reported = BTreeSet::new();
    before
        .iter()
        .filter(|reference| match assets.relative_path(reference.as_str()) {
            Some(key) => !kept.contains(key) && reported.insert(key),
            None => false,
        })
        .cloned()
        .collect()
}

/// Remembers the reference set of the last observed document version.
#[derive(Debug, Clone)]
pub struct AssetTracker {
    known: BTreeSet<String>,
    assets: ManagedAssets,
}

impl AssetTracker {
    pub fn new(initial: &Doc, assets: ManagedAssets) -> Self {
        Self {
            known: image_sources(initial),
            assets,
        }
    }

    pub fn known(&self) -> &BTreeSet<String> {
        &self.known
    }

    pub fn assets(&self) -> &ManagedAssets {
        &self.assets
    }

    /// Records `next` as the current version and returns the managed
    /// references it dropped relative to the previous one.
    pub fn observe(&mut self, next: &Doc) -> Vec<String> {
        let current = image_sources(next);
        let removed = dropped_managed(&self.known, &current, &self.assets);
        self.known = current;
        removed
    }
}
