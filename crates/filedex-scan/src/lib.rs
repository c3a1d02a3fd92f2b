//! Filesystem scanner for filedex.
//!
//! Walks a set of root paths and produces one [`FileRecord`] per regular
//! file. The walk itself sits behind the [`FileSystem`] trait; content-derived
//! fields (hash, preview) come from an optional [`ContentHook`].
//!
//! # Error policy
//!
//! Scanning never aborts. A root or nested entry that cannot be read is
//! skipped with a `warn!` diagnostic and reported in
//! [`ScanOutcome::skipped`]; the remaining roots are still scanned. Files
//! whose path is not valid UTF-8 are skipped the same way, since the path
//! text is the record key.
//!
//! # Backends
//!
//! - [`LocalFileSystem`] -- the real filesystem via `walkdir`
//! - [`InMemoryFileSystem`] -- path table for tests and embedding
//!
//! [`FileRecord`]: filedex_types::FileRecord

pub mod config;
pub mod error;
pub mod local;
pub mod memory;
pub mod scanner;
pub mod traits;

pub use config::ScanConfig;
pub use error::{ScanError, ScanResult};
pub use local::LocalFileSystem;
pub use memory::InMemoryFileSystem;
pub use scanner::{create_skeleton, ScanOutcome, Scanner, SkippedPath};
pub use traits::{ContentHook, EntryIter, FileSystem, RawEntry};
