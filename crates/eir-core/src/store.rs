//! Store: the published [`SearchIndex`] snapshot.
//!
//! Readers take an `Arc` snapshot and query it without holding any lock.
//! Rebuilds publish a complete new index with one reference swap, so a reader
//! sees either the old catalog or the new one, never a mixture.

use std::sync::{Arc, RwLock};

use crate::search::SearchIndex;

#[derive(Debug)]
pub struct IndexHandle {
    current: RwLock<Arc<SearchIndex>>,
}

impl Default for IndexHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexHandle {
    /// A handle holding the never-built index.
    pub fn new() -> Self {
        Self::with_index(SearchIndex::empty())
    }

    pub fn with_index(index: SearchIndex) -> Self {
        Self { current: RwLock::new(Arc::new(index)) }
    }

    /// The currently published index.
    pub fn snapshot(&self) -> Arc<SearchIndex> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the published index, returning the previous one.
    pub fn publish(&self, index: SearchIndex) -> Arc<SearchIndex> {
        let next = Arc::new(index);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, next)
    }
}
