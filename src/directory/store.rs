//! In-memory holder for the currently loaded directory.
//!
//! The store is only ever replaced wholesale: a successful load swaps in a
//! new snapshot and recomputes the category set, a failed load clears both.
//! There is no API for patching individual records.

use crate::directory::collation::sort_es;
use crate::directory::model::DirectoryRecord;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Ordered records from the last successful load.
pub type DirectorySnapshot = Arc<[DirectoryRecord]>;

#[derive(Clone, Debug)]
/// Current snapshot plus its derived, collated category list.
pub struct DirectoryStore {
    snapshot: DirectorySnapshot,
    categories: Vec<String>,
}

impl Default for DirectoryStore {
    fn default() -> Self {
        Self {
            snapshot: Arc::from(Vec::new()),
            categories: Vec::new(),
        }
    }
}

impl DirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new ordered snapshot and rebuild the category set.
    pub fn replace_snapshot(&mut self, records: Vec<DirectoryRecord>) {
        self.categories = unique_categories(&records);
        self.snapshot = Arc::from(records);
    }

    /// Drop all records, e.g. after a failed load.
    pub fn clear(&mut self) {
        self.replace_snapshot(Vec::new());
    }

    /// Cheap handle to the current snapshot; later replacements do not affect it.
    pub fn current_snapshot(&self) -> DirectorySnapshot {
        Arc::clone(&self.snapshot)
    }

    pub fn current_categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|known| known == category)
    }
}

/// Unique non-empty categories in Spanish collation order.
pub fn unique_categories(records: &[DirectoryRecord]) -> Vec<String> {
    let unique: BTreeSet<&str> = records
        .iter()
        .map(DirectoryRecord::category)
        .filter(|category| !category.is_empty())
        .collect();
    let mut categories: Vec<String> = unique.into_iter().map(str::to_string).collect();
    sort_es(&mut categories);
    categories
}
