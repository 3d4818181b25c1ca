//! Logical index label resolution.

use std::collections::BTreeMap;

/// Read-only mapping from logical index labels to the physical index names
/// understood by the daemon. Built once at construction (usually from
/// [`crate::config::Config`]) and never mutated afterward.
#[derive(Debug, Clone, Default)]
pub struct IndexMap {
    labels: BTreeMap<String, String>,
}

impl IndexMap {
    pub fn new(labels: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            labels: labels.into_iter().collect(),
        }
    }

    /// The physical index name for a label, if configured.
    #[must_use]
    pub fn physical(&self, label: &str) -> Option<&str> {
        self.labels.get(label).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Build the space-separated physical index list for a query, keeping
    /// input order and skipping labels with no configured physical index.
    /// An empty return means no label resolved.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, labels: &[S]) -> String {
        labels
            .iter()
            .filter_map(|label| self.physical(label.as_ref()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
