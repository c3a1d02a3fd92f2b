use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::ScanResult;

/// One filesystem entry with its stat-like attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEntry {
    /// Full path of the entry as produced by the walk.
    pub path: PathBuf,
    /// `true` for regular files; directories and other kinds are `false`.
    pub is_file: bool,
    pub size: u64,
    pub created: SystemTime,
    pub modified: SystemTime,
    /// Absent on filesystems that do not track access time.
    pub accessed: Option<SystemTime>,
}

impl RawEntry {
    /// Base name of the entry.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Suffix without the leading dot, as given; empty when there is none.
    pub fn suffix(&self) -> String {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Base name of the immediate parent directory.
    pub fn parent_name(&self) -> Option<String> {
        self.path
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
    }
}

/// Iterator over the entries below one root.
pub type EntryIter<'a> = Box<dyn Iterator<Item = ScanResult<RawEntry>> + 'a>;

/// The filesystem walk primitive consumed by the scanner.
///
/// Implementations must satisfy:
/// - `walk` fails up front (`PathNotFound` / `AccessDenied`) when the root
///   itself cannot be opened.
/// - Failures below the root are yielded as `Err` items; the walk continues
///   past them.
/// - The iterator is finite. Restarting a walk means calling `walk` again.
/// - Walking never mutates the filesystem.
pub trait FileSystem {
    /// Start a recursive walk of `root`.
    fn walk<'a>(&'a self, root: &Path) -> ScanResult<EntryIter<'a>>;
}

/// Content hook for derived fields the scanner cannot compute itself.
///
/// The scanner stores whatever the hook returns. Both methods default to
/// `None`, which is also what a scan without a hook produces.
pub trait ContentHook {
    /// Content hash for the entry.
    fn hash(&self, _entry: &RawEntry) -> Option<String> {
        None
    }

    /// Short preview text for the entry.
    fn preview(&self, _entry: &RawEntry) -> Option<String> {
        None
    }
}
