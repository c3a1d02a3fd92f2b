//! Turns filesystem walks into metadata records.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use filedex_types::{format_timestamp, FileRecord, DEFAULT_SOURCE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::error::{ScanError, ScanResult};
use crate::local::LocalFileSystem;
use crate::traits::{ContentHook, FileSystem, RawEntry};

/// A path the scanner gave up on, and why.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPath {
    pub path: PathBuf,
    pub reason: String,
}

impl SkippedPath {
    fn from_error(err: &ScanError) -> Self {
        Self {
            path: err.path().to_path_buf(),
            reason: err.to_string(),
        }
    }
}

/// Result of one scan: the records produced plus every skipped path.
#[derive(Clone, Debug, Default)]
pub struct ScanOutcome {
    pub records: Vec<FileRecord>,
    pub skipped: Vec<SkippedPath>,
}

impl ScanOutcome {
    /// Returns `true` if every root and entry was readable.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Walks root paths and builds one [`FileRecord`] per regular file.
///
/// Unreadable roots and entries are skipped with a warning; the scan always
/// runs to completion. A path reached from more than one root yields a single
/// record.
pub struct Scanner<F = LocalFileSystem> {
    fs: F,
    hook: Option<Box<dyn ContentHook>>,
    source: String,
}

impl Scanner<LocalFileSystem> {
    /// A scanner over the local filesystem.
    pub fn local(config: &ScanConfig) -> Self {
        Self::new(LocalFileSystem::new(config)).with_source(config.source.clone())
    }
}

impl<F: FileSystem> Scanner<F> {
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            hook: None,
            source: DEFAULT_SOURCE.to_string(),
        }
    }

    /// Install a hook that fills `hash` and `preview_text`.
    pub fn with_hook(mut self, hook: impl ContentHook + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    pub fn filesystem_mut(&mut self) -> &mut F {
        &mut self.fs
    }

    /// Scan every root in order.
    pub fn scan<P: AsRef<Path>>(&self, roots: &[P]) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        let mut seen: HashSet<String> = HashSet::new();

        for root in roots {
            let root = root.as_ref();
            let entries = match self.fs.walk(root) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(root = %root.display(), error = %e, "skipping unreadable root");
                    outcome.skipped.push(SkippedPath::from_error(&e));
                    continue;
                }
            };

            for entry in entries {
                match entry {
                    Ok(entry) if entry.is_file => {
                        let record = match self.record_for(&entry) {
                            Ok(record) => record,
                            Err(e) => {
                                warn!(path = %e.path().display(), error = %e, "skipping unindexable file");
                                outcome.skipped.push(SkippedPath::from_error(&e));
                                continue;
                            }
                        };
                        if !seen.insert(record.path.clone()) {
                            debug!(path = %record.path, "already scanned from another root");
                            continue;
                        }
                        outcome.records.push(record);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(path = %e.path().display(), error = %e, "skipping unreadable entry");
                        outcome.skipped.push(SkippedPath::from_error(&e));
                    }
                }
            }
        }

        info!(
            roots = roots.len(),
            files = outcome.records.len(),
            skipped = outcome.skipped.len(),
            "scan complete"
        );
        outcome
    }

    /// Build the record for one file. The path is the record key, so it must
    /// convert to text without loss.
    fn record_for(&self, entry: &RawEntry) -> ScanResult<FileRecord> {
        let path = entry
            .path
            .to_str()
            .ok_or_else(|| ScanError::NonUtf8Path(entry.path.clone()))?;
        let mut record = FileRecord::new(
            entry.name(),
            path,
            entry.suffix(),
            entry.size,
            format_timestamp(entry.created),
            format_timestamp(entry.modified),
        )
        .with_source(self.source.clone());
        record.accessed = entry.accessed.map(format_timestamp);
        record.folder = entry.parent_name();
        if let Some(hook) = &self.hook {
            record.hash = hook.hash(entry);
            record.preview_text = hook.preview(entry);
        }
        Ok(record)
    }
}

/// Build a skeleton: one record per file under `root_paths`, local
/// filesystem, default options.
pub fn create_skeleton<P: AsRef<Path>>(root_paths: &[P]) -> Vec<FileRecord> {
    Scanner::local(&ScanConfig::default()).scan(root_paths).records
}
