use std::fs::File;
use std::io;

use filedex_scan::{ContentHook, RawEntry};
use tracing::debug;

/// Content hook that hashes file contents with BLAKE3.
pub struct Blake3Hook;

impl ContentHook for Blake3Hook {
    fn hash(&self, entry: &RawEntry) -> Option<String> {
        let mut hasher = blake3::Hasher::new();
        let result = File::open(&entry.path).and_then(|mut file| io::copy(&mut file, &mut hasher));
        match result {
            Ok(_) => Some(hasher.finalize().to_hex().to_string()),
            Err(e) => {
                debug!(path = %entry.path.display(), error = %e, "could not hash file");
                None
            }
        }
    }
}
