//! Incremental refresh: reconcile an index against a fresh scan.
//!
//! New paths are appended. Known paths get their volatile fields (`size`,
//! `modified`, `accessed`) from the scan, and their derived fields (`tags`,
//! `preview_text`, `hash`) according to a [`DerivedFieldPolicy`]. Refresh
//! never removes a record on its own; paths the scan did not observe are
//! reported as stale and only removed when [`RefreshPolicy::prune_stale`] is
//! set.

use std::collections::HashSet;
use std::path::Path;

use filedex_scan::{FileSystem, ScanConfig, Scanner};
use filedex_types::FileRecord;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::report::RefreshReport;
use crate::store::IndexStore;

/// What a refresh does with `tags`, `preview_text` and `hash` of a known file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedFieldPolicy {
    /// Replace them with the scan's values, even when those are empty.
    Overwrite,
    /// Keep them unless the scan supplies a non-empty value.
    #[default]
    Preserve,
}

/// Options for [`IndexStore::refresh`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshPolicy {
    pub derived_fields: DerivedFieldPolicy,
    /// Remove stale paths after merging. Skipped when the scan was incomplete.
    pub prune_stale: bool,
}

impl RefreshPolicy {
    /// Overwrite derived fields and never prune.
    pub fn overwrite() -> Self {
        Self {
            derived_fields: DerivedFieldPolicy::Overwrite,
            prune_stale: false,
        }
    }
}

/// Copy `size`, `modified` and `accessed`. Returns `true` if any differed.
fn apply_volatile(existing: &mut FileRecord, fresh: &FileRecord) -> bool {
    let changed = existing.size != fresh.size
        || existing.modified != fresh.modified
        || existing.accessed != fresh.accessed;
    existing.size = fresh.size;
    existing.modified.clone_from(&fresh.modified);
    existing.accessed.clone_from(&fresh.accessed);
    changed
}

fn apply_derived(existing: &mut FileRecord, fresh: FileRecord, policy: DerivedFieldPolicy) {
    match policy {
        DerivedFieldPolicy::Overwrite => {
            existing.tags = fresh.tags;
            existing.preview_text = fresh.preview_text;
            existing.hash = fresh.hash;
        }
        DerivedFieldPolicy::Preserve => {
            if !fresh.tags.is_empty() {
                existing.tags = fresh.tags;
            }
            if fresh.preview_text.is_some() {
                existing.preview_text = fresh.preview_text;
            }
            if fresh.hash.is_some() {
                existing.hash = fresh.hash;
            }
        }
    }
}

impl IndexStore {
    /// Merge a scanned snapshot into the index.
    ///
    /// Fills `added`, `updated` and `unchanged` of the returned report.
    pub fn merge(&mut self, snapshot: Vec<FileRecord>, policy: DerivedFieldPolicy) -> RefreshReport {
        let mut report = RefreshReport::new();
        for fresh in snapshot {
            match self.slot_of(&fresh.path) {
                None => {
                    report.added.push(fresh.path.clone());
                    self.push(fresh);
                }
                Some(slot) => {
                    let existing = self.record_at_mut(slot);
                    if apply_volatile(existing, &fresh) {
                        report.updated.push(fresh.path.clone());
                    } else {
                        report.unchanged.push(fresh.path.clone());
                    }
                    apply_derived(existing, fresh, policy);
                }
            }
        }
        report
    }

    /// Rescan `root_paths` and reconcile the index with the result.
    ///
    /// Stale paths are limited to records under the scanned roots, so
    /// refreshing one root never flags records that belong to another.
    pub fn refresh<F: FileSystem, P: AsRef<Path>>(
        &mut self,
        scanner: &Scanner<F>,
        root_paths: &[P],
        policy: &RefreshPolicy,
    ) -> RefreshReport {
        let outcome = scanner.scan(root_paths);
        let observed: HashSet<String> = outcome.records.iter().map(|r| r.path.clone()).collect();

        let mut report = self.merge(outcome.records, policy.derived_fields);
        report.skipped = outcome.skipped;
        report.stale = self
            .iter()
            .filter(|r| !observed.contains(&r.path))
            .filter(|r| {
                let path = Path::new(&r.path);
                root_paths.iter().any(|root| path.starts_with(root))
            })
            .map(|r| r.path.clone())
            .collect();

        if policy.prune_stale && !report.stale.is_empty() {
            if report.skipped.is_empty() {
                self.prune(&report.stale);
                report.removed = report.stale.clone();
            } else {
                warn!(
                    stale = report.stale.len(),
                    skipped = report.skipped.len(),
                    "scan incomplete; not pruning stale records"
                );
            }
        }

        info!(
            added = report.added.len(),
            updated = report.updated.len(),
            unchanged = report.unchanged.len(),
            stale = report.stale.len(),
            removed = report.removed.len(),
            "refresh complete"
        );
        report
    }
}

/// Refresh `existing` against the local filesystem under `root_paths`.
///
/// New files are appended; known files get fresh `modified`, `accessed` and
/// `size`, and their `tags`, `preview_text` and `hash` are overwritten by the
/// scan's values (which are empty, since no content hook is installed).
/// Records for vanished files are kept. The index is updated in place and
/// returned.
pub fn refresh_index<'a, P: AsRef<Path>>(
    existing: &'a mut IndexStore,
    root_paths: &[P],
) -> &'a mut IndexStore {
    let scanner = Scanner::local(&ScanConfig::default());
    existing.refresh(&scanner, root_paths, &RefreshPolicy::overwrite());
    existing
}
