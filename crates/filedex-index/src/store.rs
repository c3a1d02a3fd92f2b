//! The core [`IndexStore`] holding one record per file path.
//!
//! Records live in a `Vec` in scan/insertion order; a `HashMap` maps each
//! path to its slot in that `Vec`. Every mutation goes through a slot, so the
//! store stays the single owner of its records.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use filedex_scan::{FileSystem, Scanner};
use filedex_types::{FileRecord, MetaValue};
use tracing::{debug, warn};

use crate::error::{IndexError, IndexResult};

/// In-memory index of file metadata records, keyed by path.
#[derive(Clone, Debug, Default)]
pub struct IndexStore {
    records: Vec<FileRecord>,
    slots: HashMap<String, usize>,
}

impl IndexStore {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a record sequence, replacing nothing.
    ///
    /// The first record seen for a path wins; later repeats and records with
    /// an empty path are dropped with a diagnostic.
    pub fn from_records(records: impl IntoIterator<Item = FileRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            if record.path.is_empty() {
                warn!(name = %record.name, "dropping record with empty path");
                continue;
            }
            if store.slots.contains_key(&record.path) {
                debug!(path = %record.path, "dropping repeated path");
                continue;
            }
            store.push(record);
        }
        store
    }

    /// Skeleton build: scan `root_paths` from scratch.
    pub fn build<F: FileSystem, P: AsRef<Path>>(scanner: &Scanner<F>, root_paths: &[P]) -> Self {
        Self::from_records(scanner.scan(root_paths).records)
    }

    /// Number of records in the index.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the index has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.slots.contains_key(path)
    }

    /// Get a record by path.
    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.slots.get(path).map(|&slot| &self.records[slot])
    }

    /// Mutable access for in-crate updates that never touch `path`.
    pub(crate) fn get_mut(&mut self, path: &str) -> Option<&mut FileRecord> {
        match self.slots.get(path) {
            Some(&slot) => Some(&mut self.records[slot]),
            None => None,
        }
    }

    fn record_mut(&mut self, path: &str) -> IndexResult<&mut FileRecord> {
        self.get_mut(path)
            .ok_or_else(|| IndexError::PathNotFound(path.to_string()))
    }

    /// Records in scan/insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<FileRecord> {
        self.records
    }

    /// Insert a record, or replace the record already held for its path.
    ///
    /// Returns the replaced record, if any. A replaced record keeps its slot.
    pub fn upsert(&mut self, record: FileRecord) -> IndexResult<Option<FileRecord>> {
        if record.path.is_empty() {
            return Err(IndexError::InvalidPath("empty path".to_string()));
        }
        match self.slots.get(&record.path) {
            Some(&slot) => Ok(Some(std::mem::replace(&mut self.records[slot], record))),
            None => {
                self.push(record);
                Ok(None)
            }
        }
    }

    /// Add a label to a record. Returns `false` if it was already present.
    pub fn tag(&mut self, path: &str, tag: &str) -> IndexResult<bool> {
        let record = self.record_mut(path)?;
        if record.tags.iter().any(|t| t == tag) {
            return Ok(false);
        }
        record.tags.push(tag.to_string());
        Ok(true)
    }

    /// Remove a label from a record. Returns `false` if it was not present.
    pub fn untag(&mut self, path: &str, tag: &str) -> IndexResult<bool> {
        let record = self.record_mut(path)?;
        let before = record.tags.len();
        record.tags.retain(|t| t != tag);
        Ok(record.tags.len() != before)
    }

    /// Set or clear a record's content hash.
    pub fn set_hash(&mut self, path: &str, hash: Option<String>) -> IndexResult<()> {
        self.record_mut(path)?.hash = hash;
        Ok(())
    }

    pub fn set_preview_text(&mut self, path: &str, preview: Option<String>) -> IndexResult<()> {
        self.record_mut(path)?.preview_text = preview;
        Ok(())
    }

    pub fn set_owner(&mut self, path: &str, owner: Option<String>) -> IndexResult<()> {
        self.record_mut(path)?.owner = owner;
        Ok(())
    }

    /// Insert an extension value, returning the one it replaced.
    pub fn insert_metadata(
        &mut self,
        path: &str,
        key: impl Into<String>,
        value: impl Into<MetaValue>,
    ) -> IndexResult<Option<MetaValue>> {
        Ok(self.record_mut(path)?.metadata.insert(key.into(), value.into()))
    }

    /// Remove a record from the index entirely.
    pub fn remove(&mut self, path: &str) -> IndexResult<FileRecord> {
        let slot = self
            .slots
            .remove(path)
            .ok_or_else(|| IndexError::PathNotFound(path.to_string()))?;
        let removed = self.records.remove(slot);
        self.reslot_from(slot);
        Ok(removed)
    }

    /// Remove every listed path that is present. Returns how many were removed.
    pub fn prune<S: AsRef<str>>(&mut self, paths: &[S]) -> usize {
        let doomed: HashSet<&str> = paths
            .iter()
            .map(AsRef::as_ref)
            .filter(|p| self.slots.contains_key(*p))
            .collect();
        if doomed.is_empty() {
            return 0;
        }
        let before = self.records.len();
        self.records.retain(|r| !doomed.contains(r.path.as_str()));
        let removed = before - self.records.len();
        self.slots.clear();
        self.reslot_from(0);
        removed
    }

    pub(crate) fn slot_of(&self, path: &str) -> Option<usize> {
        self.slots.get(path).copied()
    }

    pub(crate) fn record_at_mut(&mut self, slot: usize) -> &mut FileRecord {
        &mut self.records[slot]
    }

    pub(crate) fn push(&mut self, record: FileRecord) {
        self.slots.insert(record.path.clone(), self.records.len());
        self.records.push(record);
    }

    fn reslot_from(&mut self, start: usize) {
        for (slot, record) in self.records.iter().enumerate().skip(start) {
            self.slots.insert(record.path.clone(), slot);
        }
    }
}

impl<'a> IntoIterator for &'a IndexStore {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<FileRecord> for IndexStore {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}
