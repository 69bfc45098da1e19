//! Fetch manifest management
//!
//! After a successful fetch, the acquirer records what it wrote: every file's
//! name, size, and content hash, plus a label for the source it came from.
//! The manifest is the validity check for the fetch cache: a later call with
//! `force = false` short-circuits only when every listed file is still present
//! and byte-identical.

use crate::error::Result;
use crate::storage::fingerprint::file_sha256;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Manifest file name inside a destination directory.
pub const MANIFEST_FILENAME: &str = ".fetch-manifest.json";

/// One fetched file, identified by name relative to the destination directory.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ManifestEntry {
    pub name: String,
    pub size: u64,
    pub sha256: String,
}

/// Record of a completed fetch into a destination directory.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FetchManifest {
    /// Label of the source the files came from (URL base, directory, ...)
    pub source: String,
    pub files: Vec<ManifestEntry>,
}

impl FetchManifest {
    /// Build a manifest by hashing files already present in `dir`.
    ///
    /// `names` are file names relative to `dir`, typically the files a fetch
    /// just wrote.
    pub fn from_files(source: &str, dir: &Path, names: &[String]) -> Result<Self> {
        let mut files = Vec::with_capacity(names.len());

        for name in names {
            let path = dir.join(name);
            let size = std::fs::metadata(&path)?.len();
            let sha256 = file_sha256(&path)?;
            files.push(ManifestEntry {
                name: name.clone(),
                size,
                sha256,
            });
        }

        Ok(Self {
            source: source.to_string(),
            files,
        })
    }

    /// Read the manifest from a destination directory, if one exists.
    ///
    /// An unparsable manifest is a cache-validation failure, handled here:
    /// it reads as `None` (with a warning) so the caller refetches instead
    /// of erroring on its own cache.
    pub fn read(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(MANIFEST_FILENAME);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        match serde_json::from_str(&content) {
            Ok(manifest) => Ok(Some(manifest)),
            Err(error) => {
                log::warn!(
                    "Discarding unreadable fetch manifest {}: {}",
                    path.display(),
                    error
                );
                Ok(None)
            }
        }
    }

    /// Write the manifest into a destination directory.
    ///
    /// Written to a temp file and renamed into place, so a crash mid-write
    /// cannot leave a truncated manifest at the final path.
    pub fn write(&self, dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        let final_path = dir.join(MANIFEST_FILENAME);
        let temp_path = dir.join(format!("{}.tmp", MANIFEST_FILENAME));
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &final_path)?;

        Ok(())
    }

    /// Check that every listed file is still present and byte-identical.
    ///
    /// Size is compared first so most stale results are rejected without
    /// rehashing; matching sizes fall through to the content hash.
    pub fn is_valid(&self, dir: &Path) -> bool {
        for entry in &self.files {
            let path = dir.join(&entry.name);

            let Ok(metadata) = std::fs::metadata(&path) else {
                log::debug!("Manifest entry missing: {}", entry.name);
                return false;
            };
            if metadata.len() != entry.size {
                log::debug!("Manifest entry size mismatch: {}", entry.name);
                return false;
            }
            match file_sha256(&path) {
                Ok(hash) if hash == entry.sha256 => {}
                _ => {
                    log::debug!("Manifest entry hash mismatch: {}", entry.name);
                    return false;
                }
            }
        }

        true
    }

    /// Absolute paths of the listed files, in manifest order.
    pub fn paths(&self, dir: &Path) -> Vec<PathBuf> {
        self.files.iter().map(|e| dir.join(&e.name)).collect()
    }

    pub fn count(&self) -> usize {
        self.files.len()
    }
}
