//! Archive Loader Module
//! Unpacks the nested per-year ZIPs and concatenates every regional CSV
//! into one raw DataFrame, tagging each row with its region.

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use polars::prelude::*;
use thiserror::Error;
use ::zip::ZipArchive;

use crate::data::regions::Region;
use crate::data::schema::{EXCLUDED_FILE, RAW_COLUMNS, REGION_COLUMN};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to open archive: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive error: {0}")]
    Zip(#[from] ::zip::result::ZipError),
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Unrecognized region prefix in entry '{0}'")]
    UnknownRegion(String),
    #[error("Entry '{file}' has {found} columns, expected {expected}")]
    ColumnCount {
        file: String,
        found: usize,
        expected: usize,
    },
    #[error("Archive contains no accident data")]
    NoData,
}

/// Load the outer archive at `path` and return the row-wise union of all
/// eligible inner CSV files.
pub fn load_archive(path: &Path) -> Result<DataFrame, LoaderError> {
    log::info!("Loading accident archive {}", path.display());
    let file = File::open(path)?;
    load_from_reader(file)
}

/// Same as [`load_archive`] but over any seekable reader. The outer archive
/// holds one inner ZIP per year; each inner ZIP holds one CSV per region.
pub fn load_from_reader<R: Read + Seek>(reader: R) -> Result<DataFrame, LoaderError> {
    let mut outer = ZipArchive::new(reader)?;
    let mut acc: Option<DataFrame> = None;

    for outer_idx in 0..outer.len() {
        let mut year_entry = outer.by_index(outer_idx)?;
        if !year_entry.is_file() {
            continue;
        }
        log::debug!("Reading year archive '{}'", year_entry.name());

        let mut buf = Vec::with_capacity(year_entry.size() as usize);
        year_entry.read_to_end(&mut buf)?;
        let mut inner = ZipArchive::new(Cursor::new(buf))?;

        for inner_idx in 0..inner.len() {
            let mut entry = inner.by_index(inner_idx)?;
            if !entry.is_file() {
                continue;
            }
            let name = entry
                .name()
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string();
            if name == EXCLUDED_FILE || entry.size() == 0 {
                log::debug!("  skipping '{}'", name);
                continue;
            }

            let region = name
                .get(0..2)
                .and_then(Region::from_code)
                .ok_or_else(|| LoaderError::UnknownRegion(name.clone()))?;

            let mut raw = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut raw)?;

            let df = parse_entry(&raw, &name, region)?;
            log::debug!(
                "  {} rows from '{}' ({})",
                df.height(),
                name,
                region.as_str()
            );

            match acc.as_mut() {
                Some(all) => {
                    all.vstack_mut(&df)?;
                }
                None => acc = Some(df),
            }
        }
    }

    let df = acc.ok_or(LoaderError::NoData)?;
    log::info!("Loaded {} raw accident records", df.height());
    Ok(df)
}

/// Parse one regional CSV entry. The files are Windows-1250 encoded,
/// semicolon separated and carry no header row; every column is read as a
/// string so that decimal commas survive until numeric coercion.
fn parse_entry(raw: &[u8], name: &str, region: Region) -> Result<DataFrame, LoaderError> {
    let (text, _, _) = encoding_rs::WINDOWS_1250.decode(raw);

    let mut df = CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_separator(b';'))
        .into_reader_with_file_handle(Cursor::new(text.as_bytes()))
        .finish()?;

    if df.width() != RAW_COLUMNS.len() {
        return Err(LoaderError::ColumnCount {
            file: name.to_string(),
            found: df.width(),
            expected: RAW_COLUMNS.len(),
        });
    }
    df.set_column_names(RAW_COLUMNS)?;

    let tags = vec![region.as_str(); df.height()];
    df.with_column(Column::new(REGION_COLUMN.into(), tags))?;

    Ok(df)
}
