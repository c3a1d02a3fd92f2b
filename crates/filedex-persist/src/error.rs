use std::io;
use std::path::PathBuf;

/// Errors produced while saving or loading an index file.
///
/// A missing index file is not an error: loading it yields an empty index.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The destination could not be written.
    #[error("failed to write index to {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The index file exists but could not be read.
    #[error("failed to read index from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not a JSON array of records.
    #[error("malformed index file {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

/// Convenience alias used throughout the persist crate.
pub type PersistResult<T> = std::result::Result<T, PersistError>;
