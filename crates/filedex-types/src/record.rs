//! The per-file metadata record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::MetaValue;

/// Source tag applied to records produced by a local scan.
pub const DEFAULT_SOURCE: &str = "local";

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

/// Metadata describing a single file.
///
/// `path` is the record's identity: two records with the same path describe
/// the same logical file across time, and an index never holds two records
/// for one path. The six fields without `#[serde(default)]` are required when
/// decoding; everything else falls back to its default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Base name of the file (`resume.pdf`).
    pub name: String,
    /// Full path as seen at scan time.
    pub path: String,
    /// Suffix without the leading dot; empty when the file has none.
    pub file_type: String,
    /// Size in bytes.
    pub size: u64,
    pub created_at: String,
    pub modified: String,
    #[serde(default)]
    pub accessed: Option<String>,
    /// Base name of the immediate parent directory.
    #[serde(default)]
    pub folder: Option<String>,
    /// User- or tool-assigned labels.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub preview_text: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    /// Where the file came from (`local`, `gdrive`, ...).
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub owner: Option<String>,
    /// Extension fields.
    #[serde(default)]
    pub metadata: BTreeMap<String, MetaValue>,
}

impl FileRecord {
    /// Create a record from its required fields; every optional field takes
    /// its default.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        file_type: impl Into<String>,
        size: u64,
        created_at: impl Into<String>,
        modified: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            file_type: file_type.into(),
            size,
            created_at: created_at.into(),
            modified: modified.into(),
            accessed: None,
            folder: None,
            tags: Vec::new(),
            preview_text: None,
            hash: None,
            source: default_source(),
            owner: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_accessed(mut self, accessed: impl Into<String>) -> Self {
        self.accessed = Some(accessed.into());
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_preview_text(mut self, preview: impl Into<String>) -> Self {
        self.preview_text = Some(preview.into());
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns `true` if both records describe the same file.
    pub fn same_file(&self, other: &FileRecord) -> bool {
        self.path == other.path
    }

    /// Folder used for grouping; records without one group under `""`.
    pub fn folder_key(&self) -> &str {
        self.folder.as_deref().unwrap_or("")
    }

    /// Returns `true` if any of `tags`, `preview_text`, `hash` carries a value.
    pub fn has_derived_fields(&self) -> bool {
        !self.tags.is_empty() || self.preview_text.is_some() || self.hash.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileRecord {
        FileRecord::new(
            "a.txt",
            "/tmp/a.txt",
            "txt",
            10,
            "2024-01-01T00:00:00",
            "2024-01-01T00:00:00",
        )
    }

    #[test]
    fn new_record_has_documented_defaults() {
        let r = sample();
        assert_eq!(r.accessed, None);
        assert_eq!(r.folder, None);
        assert!(r.tags.is_empty());
        assert_eq!(r.preview_text, None);
        assert_eq!(r.hash, None);
        assert_eq!(r.source, "local");
        assert_eq!(r.owner, None);
        assert!(r.metadata.is_empty());
        assert!(!r.has_derived_fields());
    }

    #[test]
    fn identity_is_path_only() {
        let a = sample();
        let b = sample().with_tags(["work"]).with_owner("sam");
        assert!(a.same_file(&b));
        assert_ne!(a, b);

        let mut c = sample();
        c.path = "/tmp/other/a.txt".into();
        assert!(!a.same_file(&c));
    }

    #[test]
    fn folder_key_defaults_to_empty() {
        assert_eq!(sample().folder_key(), "");
        assert_eq!(sample().with_folder("tmp").folder_key(), "tmp");
    }

    #[test]
    fn decode_applies_defaults_for_missing_optionals() {
        let json = r#"{
            "name": "a.txt",
            "path": "/tmp/a.txt",
            "file_type": "txt",
            "size": 10,
            "created_at": "2024-01-01T00:00:00",
            "modified": "2024-01-01T00:00:00"
        }"#;
        let r: FileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r, sample());
    }

    #[test]
    fn decode_rejects_missing_required_field() {
        let json = r#"{"name": "a.txt", "path": "/tmp/a.txt", "file_type": "txt", "size": 10,
                       "created_at": "2024-01-01T00:00:00"}"#;
        assert!(serde_json::from_str::<FileRecord>(json).is_err());
    }

    #[test]
    fn decode_ignores_unknown_fields() {
        let json = r#"{"name": "a.txt", "path": "/tmp/a.txt", "file_type": "txt", "size": 10,
                       "created_at": "2024-01-01T00:00:00", "modified": "2024-01-01T00:00:00",
                       "colour": "blue"}"#;
        assert_eq!(serde_json::from_str::<FileRecord>(json).unwrap(), sample());
    }

    #[test]
    fn decode_accepts_null_and_large_metadata_values() {
        let json = r#"{"name": "a.txt", "path": "/tmp/a.txt", "file_type": "txt", "size": 10,
                       "created_at": "2024-01-01T00:00:00", "modified": "2024-01-01T00:00:00",
                       "metadata": {"x": null, "inode": 18446744073709551615}}"#;
        let r: FileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.metadata["x"], MetaValue::Null);
        assert_eq!(r.metadata["inode"], MetaValue::Unsigned(u64::MAX));
    }

    #[test]
    fn full_record_roundtrip() {
        let r = sample()
            .with_accessed("2024-02-01T00:00:00")
            .with_folder("tmp")
            .with_tags(["a", "b"])
            .with_preview_text("hello")
            .with_hash("abc")
            .with_source("gdrive")
            .with_owner("sam")
            .with_metadata("pages", 3_i64);
        let back: FileRecord = serde_json::from_str(&serde_json::to_string(&r).unwrap()).unwrap();
        assert_eq!(back, r);
    }
}
