//! Data carrier passed between pipeline stages
//!
//! Stage outputs are heterogeneous: an acquirer produces file paths, a
//! converter produces a table. The carrier is the one type that flows across
//! every stage boundary, as a sum type so each stage can validate its input
//! variant exhaustively instead of downcasting a loosely-typed payload.

use crate::error::{PipelineError, Result};
use polars::prelude::DataFrame;
use std::path::PathBuf;

/// Output of one pipeline stage, input of the next.
///
/// Exactly one variant is active. Value semantics: the carrier has no
/// identity beyond its payload.
///
/// # Example
/// ```
/// use corral::etl::DataCarrier;
/// use std::path::PathBuf;
///
/// let carrier = DataCarrier::Paths(vec![PathBuf::from("raw/a.csv")]);
/// assert!(carrier.is_paths());
/// assert_eq!(carrier.as_paths().unwrap().len(), 1);
/// assert_eq!(carrier.to_string(), "paths (1 file)");
/// ```
#[derive(Debug, Default)]
pub enum DataCarrier {
    /// No stage has produced output yet.
    #[default]
    Empty,
    /// File paths produced by an acquisition stage.
    Paths(Vec<PathBuf>),
    /// A materialized table produced by a conversion stage.
    Table(DataFrame),
}

impl DataCarrier {
    /// Name of the active variant, for diagnostics and mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Paths(_) => "paths",
            Self::Table(_) => "table",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn is_paths(&self) -> bool {
        matches!(self, Self::Paths(_))
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table(_))
    }

    /// The path list, if that variant is active.
    pub fn as_paths(&self) -> Option<&[PathBuf]> {
        match self {
            Self::Paths(paths) => Some(paths),
            _ => None,
        }
    }

    /// The table, if that variant is active.
    pub fn as_table(&self) -> Option<&DataFrame> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Unwrap the path list, erroring on any other variant.
    ///
    /// This is the precondition check a conversion stage runs on its input.
    ///
    /// # Errors
    /// Returns `CarrierMismatch` naming the actual variant.
    pub fn expect_paths(&self) -> Result<&[PathBuf]> {
        self.as_paths().ok_or(PipelineError::CarrierMismatch {
            expected: "paths",
            actual: self.kind(),
        })
    }

    /// Consume the carrier and take the table out.
    ///
    /// # Errors
    /// Returns `CarrierMismatch` naming the actual variant.
    pub fn into_table(self) -> Result<DataFrame> {
        match self {
            Self::Table(table) => Ok(table),
            other => Err(PipelineError::CarrierMismatch {
                expected: "table",
                actual: other.kind(),
            }),
        }
    }
}

/// Lightweight summary for logs: variant plus payload shape, without
/// materializing the payload itself.
impl std::fmt::Display for DataCarrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Paths(paths) => {
                let plural = if paths.len() == 1 { "file" } else { "files" };
                write!(f, "paths ({} {})", paths.len(), plural)
            }
            Self::Table(table) => {
                write!(f, "table ({} rows x {} columns)", table.height(), table.width())
            }
        }
    }
}
