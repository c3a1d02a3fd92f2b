use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use filedex_index::RefreshPolicy;
use filedex_persist::DEFAULT_INDEX_FILE;
use filedex_scan::ScanConfig;
use serde::{Deserialize, Serialize};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "filedex.toml";

/// Settings for the `filedex` binary.
///
/// ```toml
/// index_path = "file_index.json"
/// roots = ["/home/sam/Documents"]
///
/// [scan]
/// include_hidden = false
///
/// [refresh]
/// derived_fields = "preserve"
/// prune_stale = false
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiledexConfig {
    pub index_path: PathBuf,
    /// Roots used when a command is given none.
    pub roots: Vec<PathBuf>,
    pub scan: ScanConfig,
    pub refresh: RefreshPolicy,
}

impl Default for FiledexConfig {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from(DEFAULT_INDEX_FILE),
            roots: Vec::new(),
            scan: ScanConfig::default(),
            refresh: RefreshPolicy::default(),
        }
    }
}

impl FiledexConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid filedex configuration")
    }

    /// Load `explicit`, else `./filedex.toml` if it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Path::new(DEFAULT_CONFIG_FILE),
            None => return Ok(Self::default()),
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filedex_index::DerivedFieldPolicy;

    #[test]
    fn default_config() {
        let c = FiledexConfig::default();
        assert_eq!(c.index_path, PathBuf::from("file_index.json"));
        assert!(c.roots.is_empty());
        assert_eq!(c.scan, ScanConfig::default());
        assert_eq!(c.refresh.derived_fields, DerivedFieldPolicy::Preserve);
        assert!(!c.refresh.prune_stale);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(FiledexConfig::from_toml("").unwrap(), FiledexConfig::default());
    }

    #[test]
    fn full_toml() {
        let c = FiledexConfig::from_toml(
            r#"
            index_path = "/var/lib/filedex/index.json"
            roots = ["/home/sam/Documents", "/home/sam/Desktop"]

            [scan]
            include_hidden = false
            max_depth = 4
            source = "laptop"

            [refresh]
            derived_fields = "overwrite"
            prune_stale = true
            "#,
        )
        .unwrap();
        assert_eq!(c.index_path, PathBuf::from("/var/lib/filedex/index.json"));
        assert_eq!(c.roots.len(), 2);
        assert!(!c.scan.include_hidden);
        assert_eq!(c.scan.max_depth, Some(4));
        assert_eq!(c.scan.source, "laptop");
        assert!(!c.scan.follow_links);
        assert_eq!(c.refresh.derived_fields, DerivedFieldPolicy::Overwrite);
        assert!(c.refresh.prune_stale);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(FiledexConfig::from_toml("[refresh]\nderived_fields = \"merge\"").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FiledexConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filedex.toml");
        fs::write(&path, "roots = [\"/srv\"]\n").unwrap();
        let c = FiledexConfig::load(Some(&path)).unwrap();
        assert_eq!(c.roots, vec![PathBuf::from("/srv")]);
    }
}
