//! Corral
//!
//! A cache-aware ETL tool for wrangling remote datasets into local columnar tables

pub mod cli;
pub mod client;
pub mod error;
pub mod etl;
pub mod format;
pub mod source;
pub mod storage;

// Re-exports for convenience
pub use client::{Auth, AuthType, RemoteClient};
pub use error::PipelineError;
pub use etl::{Acquirer, Converter, DataCarrier, Pipeline};
pub use format::{FileConverter, Format};
pub use source::{HttpSource, LocalSource};
pub use storage::{FetchManifest, OutputDir, TableCache};
