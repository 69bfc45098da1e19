//! Pipeline error taxonomy
//!
//! Errors are split along a retryability boundary: `SourceUnavailable` is
//! worth retrying as-is, `PartialFetch` needs a forced re-fetch, and the
//! format/conversion errors need the input fixed first. `CacheCorruption`
//! never reaches callers of `convert`, since a corrupt artifact falls back
//! to recomputation, but it is surfaced by the storage layer so the
//! converter can log what it recovered from.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The remote source could not be reached. Retryable by the caller.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// The remote returned incomplete or mismatched data and the destination
    /// directory was left without a valid result. Recover with `force = true`.
    #[error("partial fetch: {0} (re-run with --force to recover)")]
    PartialFetch(String),

    /// An input file's format is not recognized by any converter.
    #[error("unsupported format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// An input file parsed as its claimed format but the content is
    /// malformed, or the inputs' schemas cannot be unioned into one table.
    #[error("conversion failed: {0}")]
    Conversion(#[from] polars::error::PolarsError),

    /// A persisted cache artifact failed validation on read.
    #[error("cache corruption: {0}")]
    CacheCorruption(String),

    /// A pipeline stage received a carrier holding the wrong variant.
    #[error("carrier mismatch: expected {expected}, got {actual}")]
    CarrierMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// An input path does not exist or is not a readable file.
    #[error("missing input: {}", .0.display())]
    MissingInput(PathBuf),

    /// A client or source was constructed with unusable settings
    /// (malformed URL, credentials that don't form a valid header, ...).
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Whether the caller can meaningfully retry the same call without
    /// changing anything (transient remote failures only).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_))
    }
}
