//! Foundation types for filedex.
//!
//! Every other filedex crate depends on `filedex-types`.
//!
//! # Key Types
//!
//! - [`FileRecord`] -- Metadata describing one file, keyed by its path
//! - [`MetaValue`] -- Tagged value for the open-ended `metadata` map
//! - [`format_timestamp`] / [`parse_timestamp`] -- Sortable timestamp text

pub mod error;
pub mod record;
pub mod temporal;
pub mod value;

pub use error::TypeError;
pub use record::{FileRecord, DEFAULT_SOURCE};
pub use temporal::{format_timestamp, parse_timestamp, TIMESTAMP_FORMAT};
pub use value::MetaValue;
