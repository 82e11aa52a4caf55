//! Background asset cleanup.
//!
//! Deletions run as detached Tokio tasks so the save that triggered them
//! never waits. A failed deletion is logged and reported, never retried.

use std::sync::Arc;

use folio_core::{AssetStore, DeleteOutcome};
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Outcome of one background deletion, surfaced to whoever is listening
/// (e.g. to show a non-blocking warning to the editing user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CleanupEvent {
    Deleted {
        reference: String,
        outcome: DeleteOutcome,
    },
    Failed {
        reference: String,
        error: String,
    },
}

impl CleanupEvent {
    pub fn reference(&self) -> &str {
        match self {
            CleanupEvent::Deleted { reference, .. } | CleanupEvent::Failed { reference, .. } => {
                reference
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CleanupEvent::Failed { .. })
    }
}

#[derive(Clone)]
pub struct AssetCleaner {
    store: Arc<dyn AssetStore>,
    limit: Option<Arc<Semaphore>>,
    events: Option<mpsc::Sender<CleanupEvent>>,
}

impl AssetCleaner {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self {
            store,
            limit: None,
            events: None,
        }
    }

    /// Bound the number of deletions in flight across every batch of this cleaner.
    pub fn with_concurrency_limit(mut self, max: usize) -> Self {
        self.limit = Some(Arc::new(Semaphore::new(max.max(1))));
        self
    }

    pub fn with_events(mut self, events: mpsc::Sender<CleanupEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Spawns one deletion task per reference and returns immediately.
    ///
    /// Must be called from within a Tokio runtime; otherwise nothing is
    /// deleted and a warning is logged.
    pub fn dispatch(&self, references: Vec<String>) -> CleanupBatch {
        if references.is_empty() {
            return CleanupBatch::default();
        }
        let Ok(runtime) = Handle::try_current() else {
            warn!(count = references.len(), "No async runtime available; skipping asset cleanup");
            return CleanupBatch::default();
        };

        debug!(count = references.len(), store = self.store.name(), "Dispatching asset cleanup");
        let handles = references
            .into_iter()
            .map(|reference| {
                let store = Arc::clone(&self.store);
                let limit = self.limit.clone();
                let events = self.events.clone();
                runtime.spawn(async move {
                    // Held until the deletion finishes.
                    let _permit = match limit {
                        Some(semaphore) => semaphore.acquire_owned().await.ok(),
                        None => None,
                    };
                    let event = delete_one(store.as_ref(), reference).await;
                    if let Some(events) = events {
                        if events.send(event.clone()).await.is_err() {
                            debug!("Cleanup event receiver dropped");
                        }
                    }
                    event
                })
            })
            .collect();
        CleanupBatch { handles }
    }
}

async fn delete_one(store: &dyn AssetStore, reference: String) -> CleanupEvent {
    match store.delete(&reference).await {
        Ok(outcome) => {
            info!(reference = %reference, outcome = outcome.as_str(), "Cleaned up removed asset");
            CleanupEvent::Deleted { reference, outcome }
        }
        Err(e) => {
            warn!(reference = %reference, error = %e, "Failed to clean up removed asset");
            CleanupEvent::Failed {
                reference,
                error: e.to_string(),
            }
        }
    }
}

/// Handles to the deletions of one dispatch. Dropping the batch detaches
/// the tasks; they keep running.
#[derive(Default)]
pub struct CleanupBatch {
    handles: Vec<JoinHandle<CleanupEvent>>,
}

impl CleanupBatch {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for every deletion in the batch and returns their outcomes.
    pub async fn join(self) -> Vec<CleanupEvent> {
        let mut events = Vec::with_capacity(self.handles.len());
        for handle in self.handles {
            match handle.await {
                Ok(event) => events.push(event),
                Err(e) => warn!(error = %e, "Asset cleanup task did not complete"),
            }
        }
        events
    }
}
