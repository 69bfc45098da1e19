//! Acquirer trait for cache-aware data acquisition

use crate::error::Result;
use std::path::PathBuf;

/// Acquirer trait for fetching raw data into a local destination directory.
///
/// Implementors own their destination directory for the lifetime of the
/// instance and are expected to guarantee it exists at construction time
/// (see [`crate::storage::OutputDir`]).
///
/// The caching discipline is part of the contract, not an optimization:
/// - `force = false`: when the directory already holds a complete, valid
///   prior result, return the existing file paths without contacting the
///   source at all. Validity is implementation-defined; this crate's sources
///   use a content-hashed fetch manifest. A stale result must never be
///   silently returned.
/// - `force = true`: ignore and clear any conflicting prior contents before
///   fetching, so old and new artifacts are never mixed.
///
/// On failure the destination must be left either fully the old valid result
/// or fully cleared, never partially overwritten.
///
/// # Example
/// ```no_run
/// use corral::etl::Acquirer;
/// use corral::error::Result;
/// use std::path::PathBuf;
///
/// struct FixtureSource {
///     dest: PathBuf,
/// }
///
/// impl Acquirer for FixtureSource {
///     async fn fetch(&self, _force: bool) -> Result<Vec<PathBuf>> {
///         // Populate self.dest and return the resulting paths
///         Ok(vec![])
///     }
/// }
/// ```
pub trait Acquirer: Send + Sync {
    /// Fetch raw data into the destination directory.
    ///
    /// Returns the paths of the resulting files. Ordering is only stable
    /// across calls when the implementation sorts deterministically.
    ///
    /// # Errors
    /// Returns `SourceUnavailable` when the source cannot be reached and
    /// `PartialFetch` when it returned incomplete data.
    fn fetch(&self, force: bool) -> impl std::future::Future<Output = Result<Vec<PathBuf>>> + Send;
}
