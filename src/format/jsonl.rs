//! NDJSON (Newline Delimited JSON) file reading

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Parse an NDJSON file into a table, one row per line.
pub fn read(path: &Path) -> Result<DataFrame> {
    let file =
        File::open(path).map_err(|_| PipelineError::MissingInput(path.to_path_buf()))?;

    let table = JsonLineReader::new(file).finish()?;

    log::debug!("Parsed {}: {} rows", path.display(), table.height());
    Ok(table)
}
