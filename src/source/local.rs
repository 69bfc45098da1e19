//! Local directory dataset source
//!
//! Copies files matching a glob from a local directory (a mounted share, an
//! unpacked archive) into the destination directory. Mostly useful when the
//! dataset is already on disk but the pipeline still wants the caching and
//! atomicity discipline of a real source.

use crate::error::{PipelineError, Result};
use crate::etl::Acquirer;
use crate::storage::{FetchManifest, OutputDir};
use globset::GlobBuilder;
use std::path::{Path, PathBuf};

const STAGING_DIR: &str = ".staging";

/// Acquirer that copies matching files from a local directory.
pub struct LocalSource {
    source: PathBuf,
    pattern: String,
    dest: OutputDir,
}

impl LocalSource {
    /// Create a source reading from `source`, creating the destination
    /// directory (parents included) if absent.
    ///
    /// `pattern` is a glob matched against top-level file names in `source`.
    pub fn try_new(
        source: impl AsRef<Path>,
        pattern: &str,
        dest: impl AsRef<Path>,
    ) -> Result<Self> {
        Ok(Self {
            source: source.as_ref().to_path_buf(),
            pattern: pattern.to_string(),
            dest: OutputDir::new(dest)?,
        })
    }

    pub fn dest(&self) -> &Path {
        self.dest.path()
    }

    fn source_label(&self) -> String {
        format!("{}::{}", self.source.display(), self.pattern)
    }

    /// Top-level files in the source directory matching the glob, sorted.
    fn matching_files(&self) -> Result<Vec<PathBuf>> {
        if !self.source.is_dir() {
            return Err(PipelineError::SourceUnavailable(format!(
                "not a directory: {}",
                self.source.display()
            )));
        }

        let matcher = GlobBuilder::new(&self.pattern)
            .literal_separator(true)
            .build()?
            .compile_matcher();

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.source)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            // A name that can't be matched must not silently shrink the
            // match set
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                return Err(PipelineError::Config(format!(
                    "file name is not valid UTF-8: {}",
                    path.display()
                )));
            };

            if matcher.is_match(name) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

impl Acquirer for LocalSource {
    async fn fetch(&self, force: bool) -> Result<Vec<PathBuf>> {
        if !force
            && let Some(manifest) = FetchManifest::read(self.dest.path())?
            && manifest.source == self.source_label()
            && manifest.is_valid(self.dest.path())
        {
            let mut paths = manifest.paths(self.dest.path());
            paths.sort();
            log::info!(
                "Destination holds a valid prior fetch ({} files), skipping copy",
                paths.len()
            );
            return Ok(paths);
        }

        let files = self.matching_files()?;

        // Stage, then promote, same as the HTTP source
        let staging = self.dest.join(STAGING_DIR);
        std::fs::create_dir_all(&staging)?;

        let mut names = Vec::with_capacity(files.len());
        for file in &files {
            let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
                let _ = std::fs::remove_dir_all(&staging);
                return Err(PipelineError::Config(format!(
                    "file name is not valid UTF-8: {}",
                    file.display()
                )));
            };
            if let Err(error) = std::fs::copy(file, staging.join(name)) {
                let _ = std::fs::remove_dir_all(&staging);
                return Err(PipelineError::SourceUnavailable(format!(
                    "copy failed for {}: {}",
                    file.display(),
                    error
                )));
            }
            names.push(name.to_string());
        }

        self.dest.clear("*")?;
        for name in &names {
            std::fs::rename(staging.join(name), self.dest.join(name))?;
        }
        let _ = std::fs::remove_dir_all(&staging);

        let manifest = FetchManifest::from_files(&self.source_label(), self.dest.path(), &names)?;
        manifest.write(self.dest.path())?;

        let mut paths: Vec<PathBuf> = names.iter().map(|n| self.dest.join(n)).collect();
        paths.sort();

        log::info!("Copied {} files to {}", paths.len(), self.dest.path().display());
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seed_source(dir: &Path) {
        std::fs::write(dir.join("a.csv"), "x,y\n1,2\n").unwrap();
        std::fs::write(dir.join("b.csv"), "x,y\n3,4\n").unwrap();
        std::fs::write(dir.join("readme.txt"), "not data").unwrap();
    }

    #[tokio::test]
    async fn test_fetch_copies_matching_files() {
        let temp = TempDir::new().unwrap();
        let source_dir = temp.path().join("source");
        std::fs::create_dir(&source_dir).unwrap();
        seed_source(&source_dir);

        let source =
            LocalSource::try_new(&source_dir, "*.csv", temp.path().join("dest")).unwrap();

        let paths = source.fetch(false).await.unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.exists()));
        assert!(!source.dest().join("readme.txt").exists());
    }

    #[tokio::test]
    async fn test_second_fetch_skips_source() {
        let temp = TempDir::new().unwrap();
        let source_dir = temp.path().join("source");
        std::fs::create_dir(&source_dir).unwrap();
        seed_source(&source_dir);

        let source =
            LocalSource::try_new(&source_dir, "*.csv", temp.path().join("dest")).unwrap();
        let first = source.fetch(false).await.unwrap();

        // Removing the source proves the cached result is served without
        // touching it
        std::fs::remove_dir_all(&source_dir).unwrap();

        let second = source.fetch(false).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_force_refetches_and_clears_stale_files() {
        let temp = TempDir::new().unwrap();
        let source_dir = temp.path().join("source");
        std::fs::create_dir(&source_dir).unwrap();
        seed_source(&source_dir);

        let source =
            LocalSource::try_new(&source_dir, "*.csv", temp.path().join("dest")).unwrap();
        source.fetch(false).await.unwrap();

        // A file from some earlier run that the new fetch doesn't produce
        std::fs::write(source.dest().join("stale.csv"), "old").unwrap();
        std::fs::remove_file(source_dir.join("b.csv")).unwrap();

        let paths = source.fetch(true).await.unwrap();
        assert_eq!(paths.len(), 1);
        assert!(!source.dest().join("stale.csv").exists());
        assert!(!source.dest().join("b.csv").exists());
    }

    #[tokio::test]
    async fn test_corrupt_manifest_triggers_refetch() {
        let temp = TempDir::new().unwrap();
        let source_dir = temp.path().join("source");
        std::fs::create_dir(&source_dir).unwrap();
        seed_source(&source_dir);

        let source =
            LocalSource::try_new(&source_dir, "*.csv", temp.path().join("dest")).unwrap();
        let first = source.fetch(false).await.unwrap();

        // A truncated manifest is an invalid cache, not an error
        std::fs::write(
            source.dest().join(crate::storage::MANIFEST_FILENAME),
            "{ not json",
        )
        .unwrap();

        let second = source.fetch(false).await.unwrap();
        assert_eq!(first, second);
        assert!(
            crate::storage::FetchManifest::read(source.dest())
                .unwrap()
                .unwrap()
                .is_valid(source.dest())
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_file_name_is_an_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        let source_dir = temp.path().join("source");
        std::fs::create_dir(&source_dir).unwrap();
        seed_source(&source_dir);
        std::fs::write(source_dir.join(OsStr::from_bytes(b"bad\xff.csv")), "x,y\n").unwrap();

        let source =
            LocalSource::try_new(&source_dir, "*.csv", temp.path().join("dest")).unwrap();

        let err = source.fetch(false).await.unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[tokio::test]
    async fn test_missing_source_directory() {
        let temp = TempDir::new().unwrap();
        let source =
            LocalSource::try_new(temp.path().join("nope"), "*", temp.path().join("dest"))
                .unwrap();

        let err = source.fetch(false).await.unwrap_err();
        assert!(matches!(err, PipelineError::SourceUnavailable(_)));
    }
}
