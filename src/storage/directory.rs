//! Output directory lifecycle management
//!
//! Every acquirer and converter owns exactly one output directory for its
//! lifetime. Construction guarantees the directory exists before the first
//! write; nothing here deletes it except an explicit [`OutputDir::clear`].

use crate::error::Result;
use globset::GlobBuilder;
use std::path::{Path, PathBuf};

/// A directory owned by a single acquirer or converter instance.
///
/// Created (with any missing parents) on construction, so callers never have
/// to check for existence before writing into it.
///
/// # Example
/// ```
/// use corral::storage::OutputDir;
///
/// # fn example() -> corral::error::Result<()> {
/// let dir = OutputDir::new("data/raw/weather")?;
/// assert!(dir.path().is_dir());
///
/// // Drop stale CSVs before a forced re-fetch
/// let removed = dir.clear("*.csv")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OutputDir {
    path: PathBuf,
}

impl OutputDir {
    /// Create the directory (and missing parents) if absent. Idempotent.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a path for a named entry inside the directory.
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }

    /// Delete top-level files matching a glob pattern.
    ///
    /// Matching is against file names only, so `*` clears every top-level
    /// file. Subdirectories are never entered and never removed, even when
    /// their names match the pattern.
    ///
    /// Returns the number of files removed.
    ///
    /// # Errors
    /// Returns an error if the pattern is not a valid glob or a removal fails.
    pub fn clear(&self, pattern: &str) -> Result<usize> {
        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()?
            .compile_matcher();

        let mut removed = 0;

        for entry in std::fs::read_dir(&self.path)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            if let Some(name) = path.file_name().and_then(|n| n.to_str())
                && matcher.is_match(name)
            {
                log::debug!("Removing {}", path.display());
                std::fs::remove_file(&path)?;
                removed += 1;
            }
        }

        Ok(removed)
    }

    /// List top-level files, sorted by name for deterministic ordering.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();

        files.sort();
        Ok(files)
    }
}
