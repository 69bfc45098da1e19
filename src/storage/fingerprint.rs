//! Content fingerprinting for cache keys
//!
//! Cache validity is decided by full content hashes, not modification times.
//! A dataset restored from backup or copied between machines still hits the
//! cache, and a touched-but-identical file doesn't miss it.

use crate::error::{PipelineError, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::path::Path;

/// Streaming sha256 of a file's content, as lowercase hex.
///
/// # Errors
/// Returns `MissingInput` if the path is not a readable file.
pub fn file_sha256(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let mut file =
        File::open(path).map_err(|_| PipelineError::MissingInput(path.to_path_buf()))?;

    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;

    Ok(format!("{:x}", hasher.finalize()))
}

/// Derive a cache key for a conversion over a set of input files.
///
/// The key hashes a tag (format + configuration) together with every input's
/// path and content hash, with inputs sorted by path so argument order does
/// not produce distinct keys. Two calls share a key only when the tag, the
/// path set, and every file's content are identical.
pub fn cache_key(tag: &str, inputs: &[(String, String)]) -> String {
    let mut inputs: Vec<&(String, String)> = inputs.iter().collect();
    inputs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut hasher = Sha256::new();
    hasher.update(tag.as_bytes());
    for (path, content_hash) in inputs {
        hasher.update(b"\n");
        hasher.update(path.as_bytes());
        hasher.update(b"\n");
        hasher.update(content_hash.as_bytes());
    }

    format!("{:x}", hasher.finalize())
}
