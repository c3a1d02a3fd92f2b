//! `walkdir`-backed access to the local filesystem.

use std::fs;
use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;
use crate::error::{ScanError, ScanResult};
use crate::traits::{EntryIter, FileSystem, RawEntry};

/// The real filesystem, walked with `walkdir`.
#[derive(Clone, Debug, Default)]
pub struct LocalFileSystem {
    follow_links: bool,
    include_hidden: bool,
    max_depth: Option<usize>,
}

impl LocalFileSystem {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            follow_links: config.follow_links,
            include_hidden: config.include_hidden,
            max_depth: config.max_depth,
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn to_raw_entry(entry: DirEntry) -> ScanResult<RawEntry> {
    let meta = entry.metadata().map_err(ScanError::from)?;
    let path = entry.into_path();
    let modified = meta.modified().map_err(|e| ScanError::from_io(&path, e))?;
    // Birth time is missing on some platforms and filesystems.
    let created = meta.created().unwrap_or(modified);
    Ok(RawEntry {
        is_file: meta.is_file(),
        size: meta.len(),
        created,
        modified,
        accessed: meta.accessed().ok(),
        path,
    })
}

impl FileSystem for LocalFileSystem {
    fn walk<'a>(&'a self, root: &Path) -> ScanResult<EntryIter<'a>> {
        fs::metadata(root).map_err(|e| ScanError::from_io(root, e))?;

        let mut walker = WalkDir::new(root).follow_links(self.follow_links);
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let include_hidden = self.include_hidden;
        let entries = walker
            .into_iter()
            .filter_entry(move |e| include_hidden || e.depth() == 0 || !is_hidden(e))
            .map(|res| res.map_err(ScanError::from).and_then(to_raw_entry));

        Ok(Box::new(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn file_paths(fs: &LocalFileSystem, root: &Path) -> Vec<String> {
        let mut paths: Vec<String> = fs
            .walk(root)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.is_file)
            .map(|e| e.name())
            .collect();
        paths.sort();
        paths
    }

    #[test]
    fn walks_nested_files_with_sizes() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("a.txt")).unwrap().write_all(b"hello").unwrap();
        File::create(dir.path().join("sub/b.md")).unwrap();

        let local = LocalFileSystem::new(&ScanConfig::default());
        let entries: Vec<RawEntry> = local.walk(dir.path()).unwrap().map(Result::unwrap).collect();

        let a = entries.iter().find(|e| e.name() == "a.txt").unwrap();
        assert!(a.is_file);
        assert_eq!(a.size, 5);
        assert!(entries.iter().any(|e| e.name() == "sub" && !e.is_file));
        assert!(entries.iter().any(|e| e.name() == "b.md"));
    }

    #[test]
    fn missing_root_fails_up_front() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalFileSystem::default();
        let err = local.walk(&dir.path().join("missing")).err().unwrap();
        assert!(matches!(err, ScanError::PathNotFound(_)));
    }

    #[test]
    fn hidden_entries_can_be_pruned() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        File::create(dir.path().join(".git/HEAD")).unwrap();
        File::create(dir.path().join(".env")).unwrap();
        File::create(dir.path().join("main.rs")).unwrap();

        let all = LocalFileSystem::new(&ScanConfig::default());
        assert_eq!(file_paths(&all, dir.path()), vec![".env", "HEAD", "main.rs"]);

        let visible = LocalFileSystem::new(&ScanConfig {
            include_hidden: false,
            ..Default::default()
        });
        assert_eq!(file_paths(&visible, dir.path()), vec!["main.rs"]);
    }

    #[test]
    fn max_depth_limits_the_walk() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        File::create(dir.path().join("top.txt")).unwrap();
        File::create(dir.path().join("a/b/deep.txt")).unwrap();

        let shallow = LocalFileSystem::new(&ScanConfig {
            max_depth: Some(1),
            ..Default::default()
        });
        assert_eq!(file_paths(&shallow, dir.path()), vec!["top.txt"]);
    }
}
