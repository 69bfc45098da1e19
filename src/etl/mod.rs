//! Core ETL (Extract, Transform, Load) abstractions
//!
//! This module provides the cache-aware contracts the pipeline is built on:
//! acquirers fetch raw data into a destination directory, converters turn
//! raw files into a columnar table, and carriers move stage output between
//! them without either stage knowing the other's concrete type.

mod acquire;
mod carrier;
mod convert;
mod pipeline;

pub use acquire::Acquirer;
pub use carrier::DataCarrier;
pub use convert::Converter;
pub use pipeline::Pipeline;
