//! Refresh result types.
//!
//! A [`RefreshReport`] records what one refresh did to the index, path by
//! path.

use filedex_scan::SkippedPath;
use serde::{Deserialize, Serialize};

/// Outcome of reconciling an index against a fresh scan.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshReport {
    /// Paths seen for the first time; appended to the index.
    pub added: Vec<String>,
    /// Known paths whose size or timestamps changed.
    pub updated: Vec<String>,
    /// Known paths whose volatile fields were identical.
    pub unchanged: Vec<String>,
    /// Indexed paths under the scanned roots that the scan did not observe.
    pub stale: Vec<String>,
    /// Stale paths that were removed from the index.
    pub removed: Vec<String>,
    /// Roots and entries the scan could not read.
    pub skipped: Vec<SkippedPath>,
}

impl RefreshReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the index already matched the filesystem.
    pub fn is_clean(&self) -> bool {
        self.added.is_empty()
            && self.updated.is_empty()
            && self.stale.is_empty()
            && self.removed.is_empty()
    }

    /// Number of records added, updated or removed.
    pub fn total_changes(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_clean() {
        let report = RefreshReport::new();
        assert!(report.is_clean());
        assert_eq!(report.total_changes(), 0);
    }

    #[test]
    fn unchanged_paths_keep_report_clean() {
        let mut report = RefreshReport::new();
        report.unchanged.push("/a".to_string());
        assert!(report.is_clean());
    }

    #[test]
    fn stale_paths_are_not_clean_but_not_changes() {
        let mut report = RefreshReport::new();
        report.stale.push("/gone".to_string());
        assert!(!report.is_clean());
        assert_eq!(report.total_changes(), 0);
    }

    #[test]
    fn changes_are_counted() {
        let mut report = RefreshReport::new();
        report.added.push("/new".to_string());
        report.updated.push("/edited".to_string());
        report.removed.push("/gone".to_string());
        assert_eq!(report.total_changes(), 3);
    }
}
