//! CSV file reading

use crate::error::Result;
use polars::prelude::*;
use std::path::Path;

/// Parse a headered CSV file into a table, inferring column types.
pub fn read(path: &Path) -> Result<DataFrame> {
    let table = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    log::debug!("Parsed {}: {} rows", path.display(), table.height());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_csv() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.csv");
        std::fs::write(&path, "city,high\npdx,31\nsea,28\n").unwrap();

        let table = read(&path).unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(table.width(), 2);
    }

    #[test]
    fn test_read_malformed_csv() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ragged.csv");
        std::fs::write(&path, "a,b\n1,2\n3,4,5,6,7\n").unwrap();

        assert!(read(&path).is_err());
    }
}
