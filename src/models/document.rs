//! The persisted document: every record plus the batch counter table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Alumni, BatchCounters};

/// Whole-store snapshot written to disk on every mutation.
///
/// Records keep insertion order, matching the order of the JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub alumni: IndexMap<String, Alumni>,
    #[serde(default)]
    pub batch_counts: BatchCounters,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.alumni.is_empty() && self.batch_counts.is_empty()
    }
}
