//! Read-only views over an [`IndexStore`].

use std::collections::{BTreeMap, BTreeSet};

use filedex_types::{parse_timestamp, FileRecord};
use serde::Serialize;

use crate::store::IndexStore;

/// A `(name, path)` pair identifying a file in listings.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FileRef {
    pub name: String,
    pub path: String,
}

/// Distinct `(name, path)` pairs across all records.
pub fn get_all_files(index: &IndexStore) -> BTreeSet<FileRef> {
    index
        .iter()
        .map(|r| FileRef {
            name: r.name.clone(),
            path: r.path.clone(),
        })
        .collect()
}

/// One folder per record, repeats included.
pub fn get_all_folders(index: &IndexStore) -> Vec<&str> {
    index.iter().map(FileRecord::folder_key).collect()
}

/// Records grouped by folder, each group in scan order.
///
/// Records without a folder are grouped under `""`.
pub fn group_by_folder(index: &IndexStore) -> BTreeMap<&str, Vec<&FileRecord>> {
    let mut groups: BTreeMap<&str, Vec<&FileRecord>> = BTreeMap::new();
    for record in index {
        groups.entry(record.folder_key()).or_default().push(record);
    }
    groups
}

/// Aggregate figures for an index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IndexSummary {
    pub files: usize,
    pub total_bytes: u64,
    /// Number of distinct folders.
    pub folders: usize,
    /// Latest `modified` timestamp among records whose timestamp parses.
    pub newest_modified: Option<String>,
}

pub fn summarize(index: &IndexStore) -> IndexSummary {
    let folders: BTreeSet<&str> = index.iter().map(FileRecord::folder_key).collect();
    let newest_modified = index
        .iter()
        .filter_map(|r| parse_timestamp(&r.modified).ok().map(|t| (t, &r.modified)))
        .max_by_key(|(t, _)| *t)
        .map(|(_, text)| text.clone());

    IndexSummary {
        files: index.len(),
        total_bytes: index.iter().map(|r| r.size).sum(),
        folders: folders.len(),
        newest_modified,
    }
}
