//! JSON index file.
//!
//! On-disk format: a pretty-printed JSON array with one object per record,
//! fields named as on [`FileRecord`]. Saves go through a temporary file in
//! the destination directory and are renamed into place, so an interrupted
//! save leaves the previous file intact.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use filedex_index::IndexStore;
use filedex_types::FileRecord;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::{PersistError, PersistResult};

/// Index file used when the caller does not name one, relative to the
/// working directory.
pub const DEFAULT_INDEX_FILE: &str = "file_index.json";

/// An array element that could not be decoded as a record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedRecord {
    /// Zero-based position in the array.
    pub position: usize,
    pub reason: String,
}

/// What a load found.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// No index file existed; the returned index is empty.
    pub missing_file: bool,
    /// Records in the returned index.
    pub loaded: usize,
    pub skipped: Vec<MalformedRecord>,
}

fn write_failure(path: &Path, source: io::Error) -> PersistError {
    PersistError::WriteFailure {
        path: path.to_path_buf(),
        source,
    }
}

/// Write every record of `index` to `destination`.
///
/// When `destination` already exists its permissions carry over to the new
/// file. A fresh file is created with the temporary file's owner-only mode.
pub fn save_index(index: &IndexStore, destination: impl AsRef<Path>) -> PersistResult<()> {
    let path = destination.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| write_failure(path, e))?;
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| write_failure(path, e))?;
    }
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, index.records())
            .map_err(|e| write_failure(path, e.into()))?;
        writer.write_all(b"\n").map_err(|e| write_failure(path, e))?;
        writer.flush().map_err(|e| write_failure(path, e))?;
    }
    tmp.persist(path).map_err(|e| write_failure(path, e.error))?;

    info!(path = %path.display(), records = index.len(), "index saved");
    Ok(())
}

/// Read an index file, reporting missing files and skipped entries.
pub fn load_index_report(source: impl AsRef<Path>) -> PersistResult<(IndexStore, LoadReport)> {
    let path = source.as_ref();
    let mut report = LoadReport::default();

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no index file; starting with an empty index");
            report.missing_file = true;
            return Ok((IndexStore::new(), report));
        }
        Err(e) => {
            return Err(PersistError::Read {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let entries: Vec<serde_json::Value> =
        serde_json::from_str(&text).map_err(|e| PersistError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut records = Vec::with_capacity(entries.len());
    for (position, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<FileRecord>(entry) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(path = %path.display(), position, error = %e, "skipping malformed record");
                report.skipped.push(MalformedRecord {
                    position,
                    reason: e.to_string(),
                });
            }
        }
    }

    let index = IndexStore::from_records(records);
    report.loaded = index.len();
    info!(
        path = %path.display(),
        records = report.loaded,
        skipped = report.skipped.len(),
        "index loaded"
    );
    Ok((index, report))
}

/// Read an index file. A missing file yields an empty index.
pub fn load_index(source: impl AsRef<Path>) -> PersistResult<IndexStore> {
    load_index_report(source).map(|(index, _)| index)
}
