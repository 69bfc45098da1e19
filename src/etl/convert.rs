//! Converter trait for cache-aware file-to-table conversion

use crate::error::Result;
use polars::prelude::DataFrame;
use std::path::PathBuf;

/// Converter trait for turning raw local files into one columnar table.
///
/// The output table is the row union of the converted inputs. Like
/// [`Acquirer`](crate::etl::Acquirer), the caching discipline is part of the
/// contract: a converter persists a materialized copy of its result in its
/// output directory, keyed so that two calls share a cached artifact only
/// when the input path set, every file's content, and the conversion
/// configuration are all identical. Collision resistance of that key is
/// load-bearing: serving a stale table is a contract violation, not a
/// performance bug.
///
/// - `force = false`: a valid cached artifact for the exact inputs is
///   returned without re-parsing anything. An artifact that fails validation
///   on read is treated as a miss and recomputed, never propagated.
/// - `force = true`: always re-parse and overwrite the artifact.
///
/// Artifact writes must be atomic from the perspective of future reads; a
/// partially converted table must never be visible as a cached artifact.
pub trait Converter: Send + Sync {
    /// Convert input files into a single table.
    ///
    /// Every input path must exist and be readable.
    ///
    /// # Errors
    /// Returns `UnsupportedFormat` when an input's format is not recognized,
    /// `Conversion` for malformed content, and `MissingInput` for paths that
    /// cannot be read.
    fn convert(&self, inputs: &[PathBuf], force: bool) -> Result<DataFrame>;
}
