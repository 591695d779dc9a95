//! Generation-tagged memo of resolved property values.

use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;

use tracing::trace;

/// Maps a property code to the last value computed for it, tagged with
/// the registry generation it was computed at. An entry whose
/// generation differs from the caller's is stale and recomputed.
///
/// Lookups go through `&self`; the internal borrow is released before
/// the compute closure runs, so a computation may itself read other
/// entries.
#[derive(Debug)]
pub struct DerivedCache<K, V> {
    entries: RefCell<HashMap<K, (V, u64)>>,
}

impl<K, V> Default for DerivedCache<K, V> {
    fn default() -> Self {
        Self { entries: RefCell::new(HashMap::new()) }
    }
}

impl<K, V> DerivedCache<K, V>
where
    K: Copy + Eq + Hash + std::fmt::Debug,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key` if it was computed at
    /// `generation`, otherwise run `compute`, store and return its
    /// result. Errors are returned as-is and never stored.
    pub fn get_or_compute<E>(
        &self,
        key: K,
        generation: u64,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(v) = self.get(key, generation) {
            trace!(?key, generation, "cache hit");
            return Ok(v);
        }
        trace!(?key, generation, "cache miss");
        let value = compute()?;
        self.entries.borrow_mut().insert(key, (value.clone(), generation));
        Ok(value)
    }

    /// The cached value for `key`, only if it is current.
    pub fn get(&self, key: K, generation: u64) -> Option<V> {
        self.entries
            .borrow()
            .get(&key)
            .filter(|(_, g)| *g == generation)
            .map(|(v, _)| v.clone())
    }

    /// Number of entries current at `generation`.
    pub fn live(&self, generation: u64) -> usize {
        self.entries.borrow().values().filter(|(_, g)| *g == generation).count()
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl<K: Clone, V: Clone> Clone for DerivedCache<K, V> {
    fn clone(&self) -> Self {
        Self { entries: RefCell::new(self.entries.borrow().clone()) }
    }
}
