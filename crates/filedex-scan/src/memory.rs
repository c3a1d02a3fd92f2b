use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{ScanError, ScanResult};
use crate::traits::{EntryIter, FileSystem, RawEntry};

/// Creation time given to files added without an explicit time.
const BASE_TIME_SECS: u64 = 1_700_000_000;

#[derive(Clone, Debug)]
struct MemFile {
    size: u64,
    created: SystemTime,
    modified: SystemTime,
    accessed: Option<SystemTime>,
}

/// In-memory filesystem for tests and embedding.
///
/// Holds a table of file paths and attributes. Directories exist implicitly
/// as prefixes of file paths. Paths marked with [`deny`](Self::deny) behave
/// like unreadable directories.
#[derive(Clone, Debug, Default)]
pub struct InMemoryFileSystem {
    files: BTreeMap<PathBuf, MemFile>,
    denied: BTreeSet<PathBuf>,
}

impl InMemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a file with the given size.
    pub fn add_file(&mut self, path: impl Into<PathBuf>, size: u64) {
        let t = UNIX_EPOCH + Duration::from_secs(BASE_TIME_SECS);
        self.files.insert(
            path.into(),
            MemFile {
                size,
                created: t,
                modified: t,
                accessed: Some(t),
            },
        );
    }

    /// Change a file's size, advancing its modification time by one second.
    pub fn set_size(&mut self, path: impl AsRef<Path>, size: u64) -> ScanResult<()> {
        let file = self.file_mut(path.as_ref())?;
        file.size = size;
        file.modified += Duration::from_secs(1);
        Ok(())
    }

    /// Set a file's modification time to `secs` after the epoch.
    pub fn touch(&mut self, path: impl AsRef<Path>, secs: u64) -> ScanResult<()> {
        let file = self.file_mut(path.as_ref())?;
        file.modified = UNIX_EPOCH + Duration::from_secs(secs);
        Ok(())
    }

    /// Drop the access time, as on filesystems mounted without atime.
    pub fn clear_accessed(&mut self, path: impl AsRef<Path>) -> ScanResult<()> {
        self.file_mut(path.as_ref())?.accessed = None;
        Ok(())
    }

    /// Remove a file. Returns `true` if it existed.
    pub fn remove(&mut self, path: impl AsRef<Path>) -> bool {
        self.files.remove(path.as_ref()).is_some()
    }

    /// Make a directory (and everything below it) unreadable.
    pub fn deny(&mut self, dir: impl Into<PathBuf>) {
        self.denied.insert(dir.into());
    }

    /// Number of files held.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn file_mut(&mut self, path: &Path) -> ScanResult<&mut MemFile> {
        self.files
            .get_mut(path)
            .ok_or_else(|| ScanError::PathNotFound(path.to_path_buf()))
    }

    fn denied_ancestor(&self, path: &Path) -> Option<&PathBuf> {
        self.denied.iter().find(|d| path.starts_with(d))
    }
}

impl FileSystem for InMemoryFileSystem {
    fn walk<'a>(&'a self, root: &Path) -> ScanResult<EntryIter<'a>> {
        if self.denied_ancestor(root).is_some() {
            return Err(ScanError::AccessDenied(root.to_path_buf()));
        }
        let root = root.to_path_buf();
        if !self.files.keys().any(|p| p.starts_with(&root)) {
            return Err(ScanError::PathNotFound(root));
        }

        let mut items: Vec<ScanResult<RawEntry>> = Vec::new();
        let mut reported: BTreeSet<&PathBuf> = BTreeSet::new();
        for (path, file) in self.files.iter().filter(|(p, _)| p.starts_with(&root)) {
            if let Some(dir) = self.denied_ancestor(path) {
                if reported.insert(dir) {
                    items.push(Err(ScanError::AccessDenied(dir.clone())));
                }
                continue;
            }
            items.push(Ok(RawEntry {
                path: path.clone(),
                is_file: true,
                size: file.size,
                created: file.created,
                modified: file.modified,
                accessed: file.accessed,
            }));
        }

        Ok(Box::new(items.into_iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_yields_files_below_root_only() {
        let mut fs = InMemoryFileSystem::new();
        fs.add_file("/data/a.txt", 1);
        fs.add_file("/data/sub/b.txt", 2);
        fs.add_file("/other/c.txt", 3);

        let names: Vec<String> = fs
            .walk(Path::new("/data"))
            .unwrap()
            .map(|e| e.unwrap().name())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn unknown_root_is_not_found() {
        let fs = InMemoryFileSystem::new();
        assert!(matches!(
            fs.walk(Path::new("/nothing")),
            Err(ScanError::PathNotFound(_))
        ));
    }

    #[test]
    fn denied_subdirectory_is_reported_once() {
        let mut fs = InMemoryFileSystem::new();
        fs.add_file("/data/ok.txt", 1);
        fs.add_file("/data/secret/x.txt", 1);
        fs.add_file("/data/secret/y.txt", 1);
        fs.deny("/data/secret");

        let items: Vec<_> = fs.walk(Path::new("/data")).unwrap().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items.iter().filter(|r| r.is_err()).count(), 1);
    }

    #[test]
    fn set_size_advances_mtime() {
        let mut fs = InMemoryFileSystem::new();
        fs.add_file("/d/a", 1);
        let before = fs.walk(Path::new("/d")).unwrap().next().unwrap().unwrap();
        fs.set_size("/d/a", 9).unwrap();
        let after = fs.walk(Path::new("/d")).unwrap().next().unwrap().unwrap();
        assert_eq!(after.size, 9);
        assert!(after.modified > before.modified);
        assert!(fs.set_size("/d/missing", 1).is_err());
    }
}
