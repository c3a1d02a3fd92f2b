use serde::{Deserialize, Serialize};

use filedex_types::DEFAULT_SOURCE;

/// Options for a scan of the local filesystem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Follow symbolic links while walking.
    pub follow_links: bool,
    /// Include entries whose base name starts with `.`. When `false`, hidden
    /// directories are pruned along with their contents.
    pub include_hidden: bool,
    /// Maximum depth below each root; `None` walks the whole tree.
    pub max_depth: Option<usize>,
    /// Value written to every scanned record's `source` field.
    pub source: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_links: false,
            include_hidden: true,
            max_depth: None,
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}
