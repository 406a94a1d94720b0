//! Cached Intermediate State
//! Binary snapshot of the normalized table between runs, stored as an
//! Arrow IPC file. Not a stable cross-version contract.

use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot error: {0}")]
    Polars(#[from] PolarsError),
}

/// Write a snapshot of the normalized table to `path`.
pub fn write_cache(df: &mut DataFrame, path: &Path) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    IpcWriter::new(file).finish(df)?;
    log::debug!("Snapshot written to {}", path.display());
    Ok(())
}

/// Read a previously written snapshot.
pub fn read_cache(path: &Path) -> Result<DataFrame, CacheError> {
    let file = File::open(path)?;
    Ok(IpcReader::new(file).finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_from_reader;
    use crate::data::normalizer::Normalizer;
    use crate::data::test_support::{csv_row, nested_zip};
    use std::io::Cursor;

    #[test]
    fn snapshot_round_trips_typed_columns() {
        let archive = nested_zip(&[(
            "data-2020.zip",
            vec![(
                "00.csv",
                [csv_row("1", "2020-01-01"), csv_row("2", "2020-02-01")].join("\n"),
            )],
        )]);
        let raw = load_from_reader(Cursor::new(archive)).unwrap();
        let mut normalized = Normalizer::normalize(&raw, false).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshots").join("accidents.arrow");
        write_cache(&mut normalized, &path).unwrap();

        let restored = read_cache(&path).unwrap();
        assert_eq!(restored.shape(), normalized.shape());
        assert_eq!(
            restored.column("date").unwrap().dtype(),
            &polars::prelude::DataType::Date
        );
        assert!(matches!(
            restored.column("k").unwrap().dtype(),
            DataType::Categorical(_, _)
        ));
        for name in ["p1", "date", "region"] {
            let a = restored.column(name).unwrap().as_materialized_series();
            let b = normalized.column(name).unwrap().as_materialized_series();
            assert!(a.equals_missing(b), "column {name} differs");
        }
    }

    #[test]
    fn missing_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_cache(&dir.path().join("nope.arrow")).unwrap_err();
        assert!(matches!(err, CacheError::Io(_)));
    }
}
