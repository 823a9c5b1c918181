//! CSV output for flattened rows

use std::collections::BTreeSet;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::ColumnPolicy;
use crate::core::{CodilityError, FileOperation, Result};
use crate::export::flatten::{FlatRow, cell_text};

/// Sorted column set for the rows under the given policy
pub fn select_columns(rows: &[FlatRow], policy: ColumnPolicy) -> Vec<String> {
    match policy {
        ColumnPolicy::Union => rows
            .iter()
            .flat_map(|row| row.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
        // BTreeMap keys are already sorted
        ColumnPolicy::FirstRow => rows.first().map(|row| row.keys().cloned().collect()).unwrap_or_default(),
    }
}

/// Keys present in some row but absent from `columns`
pub fn dropped_columns(rows: &[FlatRow], columns: &[String]) -> BTreeSet<String> {
    rows.iter()
        .flat_map(|row| row.keys())
        .filter(|key| !columns.contains(*key))
        .cloned()
        .collect()
}

/// Write a header line then one line per row
///
/// Cells for columns a row lacks are left empty. The file is staged next to
/// `path` and only moved into place once every row is written.
pub fn write_csv(path: &Path, columns: &[String], rows: &[FlatRow]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut staged = NamedTempFile::new_in(dir).map_err(|source| CodilityError::FileSystem {
        path: dir.to_path_buf(),
        operation: FileOperation::Create,
        source,
    })?;

    {
        let csv_error = |source: csv::Error| CodilityError::Csv { path: path.to_path_buf(), source };
        let mut writer = csv::Writer::from_writer(staged.as_file_mut());

        writer.write_record(columns).map_err(csv_error)?;
        for row in rows {
            let record = columns.iter().map(|column| row.get(column).map(cell_text).unwrap_or_default());
            writer.write_record(record).map_err(csv_error)?;
        }

        writer.flush().map_err(|source| CodilityError::FileSystem {
            path: path.to_path_buf(),
            operation: FileOperation::Write,
            source,
        })?;
    }

    staged.persist(path).map_err(|e| CodilityError::FileSystem {
        path: path.to_path_buf(),
        operation: FileOperation::Persist,
        source: e.error,
    })?;

    debug!("Wrote {} rows with {} columns to {}", rows.len(), columns.len(), path.display());
    Ok(())
}
