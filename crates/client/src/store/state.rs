//! The aggregate, read-only snapshot of every slice.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::reducer::SliceState;

/// Mapping of slice key to slice state.
///
/// Snapshots are immutable: the store publishes a fresh `Arc<RootState>`
/// after each dispatch that changed something, and unchanged slices are
/// shared between consecutive snapshots.
#[derive(Clone, Default)]
pub struct RootState {
    slices: HashMap<String, SliceState>,
}

impl RootState {
    /// Typed access to a slice. `None` when the key is unknown or the slice
    /// holds a different type.
    pub fn get<S: Any + Send + Sync>(&self, key: &str) -> Option<Arc<S>> {
        Arc::clone(self.slices.get(key)?).downcast::<S>().ok()
    }

    pub fn raw(&self, key: &str) -> Option<&SliceState> {
        self.slices.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slices.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub(crate) fn insert(&mut self, key: String, state: SliceState) {
        self.slices.insert(key, state);
    }
}

impl fmt::Debug for RootState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("RootState").field("slices", &keys).finish()
    }
}
