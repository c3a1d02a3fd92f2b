//! In-memory file index for filedex.
//!
//! Holds one [`FileRecord`](filedex_types::FileRecord) per path, built from a
//! scan (skeleton) and kept current by incremental refresh, plus read-only
//! folder queries.
//!
//! # Key Types
//!
//! - [`IndexStore`] -- Path-keyed record store (insertion ordered)
//! - [`RefreshPolicy`] -- How refresh treats derived fields and stale paths
//! - [`RefreshReport`] -- Added/updated/unchanged/stale paths of one refresh
//! - [`FileRef`] / [`IndexSummary`] -- Query results

pub mod error;
pub mod query;
pub mod refresh;
pub mod report;
pub mod store;

pub use error::{IndexError, IndexResult};
pub use query::{get_all_files, get_all_folders, group_by_folder, summarize, FileRef, IndexSummary};
pub use refresh::{refresh_index, DerivedFieldPolicy, RefreshPolicy};
pub use report::RefreshReport;
pub use store::IndexStore;
