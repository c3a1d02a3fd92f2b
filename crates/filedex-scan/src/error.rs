//! Error types for the scan crate.

use std::io;
use std::path::{Path, PathBuf};

/// Errors raised while walking a root or reading an entry's attributes.
///
/// The scanner recovers from all of these locally: the offending path is
/// skipped and scanning continues with its siblings.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The path does not exist.
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// The path exists but cannot be listed or stat'd.
    #[error("access denied: {}", .0.display())]
    AccessDenied(PathBuf),

    /// Any other I/O failure on a specific path.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The directory walker reported a non-I/O failure (e.g. a symlink loop).
    #[error("walk error at {}: {reason}", path.display())]
    Walk { path: PathBuf, reason: String },

    /// The path is not valid UTF-8 and cannot be used as a record key.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
}

impl ScanError {
    /// Classify an I/O error raised for `path`.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::PathNotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::AccessDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// The path this error refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::PathNotFound(p) | Self::AccessDenied(p) | Self::NonUtf8Path(p) => p,
            Self::Io { path, .. } | Self::Walk { path, .. } => path,
        }
    }
}

impl From<walkdir::Error> for ScanError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        match err.io_error().map(io::Error::kind) {
            Some(io::ErrorKind::NotFound) => Self::PathNotFound(path),
            Some(io::ErrorKind::PermissionDenied) => Self::AccessDenied(path),
            _ => Self::Walk {
                path,
                reason: err.to_string(),
            },
        }
    }
}

/// Convenience alias for scan results.
pub type ScanResult<T> = Result<T, ScanError>;
