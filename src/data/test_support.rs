//! Shared helpers for building synthetic archives in unit tests.

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::data::schema::RAW_COLUMNS;

/// A full 64-field raw CSV record with harmless defaults.
pub fn csv_fields(id: &str, date: &str) -> Vec<String> {
    let mut fields: Vec<String> = vec!["1".to_string(); RAW_COLUMNS.len()];
    set_field(&mut fields, "p1", id);
    set_field(&mut fields, "p2a", date);
    set_field(&mut fields, "h", "Hlavni");
    set_field(&mut fields, "i", "most");
    set_field(&mut fields, "a", "1,5");
    fields
}

pub fn set_field(fields: &mut [String], name: &str, value: &str) {
    let idx = RAW_COLUMNS
        .iter()
        .position(|c| *c == name)
        .unwrap_or_else(|| panic!("no such column {name}"));
    fields[idx] = value.to_string();
}

pub fn row_from(fields: &[String]) -> String {
    fields.join(";")
}

pub fn csv_row(id: &str, date: &str) -> String {
    row_from(&csv_fields(id, date))
}

/// A flat ZIP from (name, bytes) pairs, stored uncompressed.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut zw = ZipWriter::new(Cursor::new(&mut buf));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, data) in entries {
            zw.start_file(*name, options).unwrap();
            zw.write_all(data).unwrap();
        }
        zw.finish().unwrap();
    }
    buf
}

/// An outer archive of per-year inner archives, each a list of
/// (file name, CSV text) entries.
pub fn nested_zip(years: &[(&str, Vec<(&str, String)>)]) -> Vec<u8> {
    let inner: Vec<(&str, Vec<u8>)> = years
        .iter()
        .map(|(year_name, files)| {
            let entries: Vec<(&str, &[u8])> = files
                .iter()
                .map(|(name, content)| (*name, content.as_bytes()))
                .collect();
            (*year_name, zip_bytes(&entries))
        })
        .collect();

    let outer: Vec<(&str, &[u8])> = inner
        .iter()
        .map(|(name, bytes)| (*name, bytes.as_slice()))
        .collect();
    zip_bytes(&outer)
}
