//! Persistence for filedex.
//!
//! Saves an [`IndexStore`](filedex_index::IndexStore) as a JSON array of
//! records and loads it back. Loading is forgiving: a missing file is an empty
//! index, and entries that do not decode as records are skipped with a
//! warning. Only an unreadable or non-array file fails the load.

pub mod error;
pub mod json;

pub use error::{PersistError, PersistResult};
pub use json::{
    load_index, load_index_report, save_index, LoadReport, MalformedRecord, DEFAULT_INDEX_FILE,
};
