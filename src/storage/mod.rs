//! File system storage operations
//!
//! This module handles the on-disk side of the pipeline:
//! - Output directory lifecycle (creation, glob-based clearing)
//! - Content fingerprinting for cache keys
//! - Fetch manifest management
//! - Materialized table caching (parquet)

mod directory;
mod fingerprint;
mod manifest;
mod table_cache;

pub use directory::OutputDir;
pub use fingerprint::{cache_key, file_sha256};
pub use manifest::{FetchManifest, ManifestEntry, MANIFEST_FILENAME};
pub use table_cache::TableCache;
