//! Per-model-id reconciliation of model result sets.

use std::collections::HashMap;

use super::types::AppModelSource;

/// Records keyed by `definition_id`, kept in first-insertion order.
///
/// Replacing an entry keeps its original position.
#[derive(Debug, Clone)]
pub struct ModelIndex<T> {
    entries: Vec<T>,
    positions: HashMap<i64, usize>,
}

impl<T> Default for ModelIndex<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<T: AppModelSource> ModelIndex<T> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the record unless its id is already present.
    ///
    /// Returns whether the record was inserted.
    pub fn insert_if_absent(&mut self, record: T) -> bool {
        let id = record.definition_id();
        if self.positions.contains_key(&id) {
            return false;
        }
        self.push(id, record);
        true
    }

    /// Inserts the record when its id is new, or replaces the present record when
    /// this one has a strictly greater version.
    ///
    /// Returns whether the record was stored.
    pub fn insert_if_newer(&mut self, record: T) -> bool {
        let id = record.definition_id();
        match self.positions.get(&id) {
            Some(&pos) => {
                if record.version() > self.entries[pos].version() {
                    self.entries[pos] = record;
                    true
                } else {
                    false
                }
            }
            None => {
                self.push(id, record);
                true
            }
        }
    }

    /// Looks up the record stored for an id.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&T> {
        self.positions.get(&id).map(|&pos| &self.entries[pos])
    }

    /// Number of distinct ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the index, yielding the records in first-insertion order.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.entries
    }

    fn push(&mut self, id: i64, record: T) {
        self.positions.insert(id, self.entries.len());
        self.entries.push(record);
    }
}
