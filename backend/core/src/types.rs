use serde::{Deserialize, Serialize};

/// Result of a successful asset deletion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The asset existed and was removed.
    Deleted,
    /// Nothing was stored under the reference; treated as success.
    Missing,
}

impl DeleteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteOutcome::Deleted => "deleted",
            DeleteOutcome::Missing => "missing",
        }
    }
}
