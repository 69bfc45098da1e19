//! Materialized table cache
//!
//! Converted tables are persisted as parquet, one artifact per cache key.
//! Writes go to a temp file first and are renamed into place, so a reader
//! never observes a half-written artifact: the rename either happened or it
//! didn't.

use crate::error::{PipelineError, Result};
use crate::storage::OutputDir;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Parquet-backed cache of converted tables, keyed by content fingerprint.
pub struct TableCache {
    dir: OutputDir,
}

impl TableCache {
    /// Open a cache rooted at `path`, creating the directory if absent.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            dir: OutputDir::new(path)?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the artifact for a cache key.
    pub fn artifact_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.parquet", key))
    }

    pub fn has(&self, key: &str) -> bool {
        self.artifact_path(key).exists()
    }

    /// Persist a table under `key`, replacing any existing artifact.
    ///
    /// The parquet writer needs `&mut DataFrame` to rechunk before encoding;
    /// the table's content is not changed.
    ///
    /// # Errors
    /// Returns an error if the temp file cannot be written or renamed.
    pub fn store(&self, key: &str, table: &mut DataFrame) -> Result<PathBuf> {
        let final_path = self.artifact_path(key);
        let temp_path = self.dir.join(format!(".{}.parquet.tmp", key));

        let file = File::create(&temp_path)?;
        if let Err(error) = ParquetWriter::new(file).finish(table) {
            // Don't leave a broken temp file behind
            let _ = std::fs::remove_file(&temp_path);
            return Err(error.into());
        }

        std::fs::rename(&temp_path, &final_path)?;
        log::debug!("Cached table artifact: {}", final_path.display());

        Ok(final_path)
    }

    /// Load the table persisted under `key`, if any.
    ///
    /// # Errors
    /// Returns `CacheCorruption` when an artifact exists but cannot be read
    /// back as parquet. Callers are expected to treat that as a cache miss
    /// and recompute, not to propagate it.
    pub fn load(&self, key: &str) -> Result<Option<DataFrame>> {
        let path = self.artifact_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)?;
        match ParquetReader::new(file).finish() {
            Ok(table) => Ok(Some(table)),
            Err(error) => Err(PipelineError::CacheCorruption(format!(
                "{}: {}",
                path.display(),
                error
            ))),
        }
    }

    /// Drop every cached artifact, leaving other files untouched.
    pub fn clear(&self) -> Result<usize> {
        self.dir.clear("*.parquet")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_table() -> DataFrame {
        df!(
            "city" => ["pdx", "sea"],
            "high" => [31i64, 28],
        )
        .unwrap()
    }

    #[test]
    fn test_store_then_load() {
        let temp = TempDir::new().unwrap();
        let cache = TableCache::new(temp.path().join("cache")).unwrap();

        let mut table = sample_table();
        cache.store("abc123", &mut table).unwrap();
        assert!(cache.has("abc123"));

        let loaded = cache.load("abc123").unwrap().unwrap();
        assert!(loaded.equals(&table));
    }

    #[test]
    fn test_load_missing_key() {
        let temp = TempDir::new().unwrap();
        let cache = TableCache::new(temp.path()).unwrap();

        assert!(cache.load("nothing").unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_artifact() {
        let temp = TempDir::new().unwrap();
        let cache = TableCache::new(temp.path()).unwrap();

        std::fs::write(cache.artifact_path("bad"), "not parquet").unwrap();

        let err = cache.load("bad").unwrap_err();
        assert!(matches!(err, PipelineError::CacheCorruption(_)));
    }

    #[test]
    fn test_store_overwrites() {
        let temp = TempDir::new().unwrap();
        let cache = TableCache::new(temp.path()).unwrap();

        let mut first = sample_table();
        cache.store("key", &mut first).unwrap();

        let mut second = df!("city" => ["lax"], "high" => [39i64]).unwrap();
        cache.store("key", &mut second).unwrap();

        let loaded = cache.load("key").unwrap().unwrap();
        assert_eq!(loaded.height(), 1);
    }

    #[test]
    fn test_clear_removes_artifacts_only() {
        let temp = TempDir::new().unwrap();
        let cache = TableCache::new(temp.path()).unwrap();

        let mut table = sample_table();
        cache.store("key", &mut table).unwrap();
        std::fs::write(temp.path().join("notes.txt"), "keep me").unwrap();

        assert_eq!(cache.clear().unwrap(), 1);
        assert!(!cache.has("key"));
        assert!(temp.path().join("notes.txt").exists());
    }
}
