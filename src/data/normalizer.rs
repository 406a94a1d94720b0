//! Normalizer Module
//! Turns the raw all-string table into a semantically typed, deduplicated
//! one: date parsing, categorical marking, numeric coercion, id dedup.

use polars::prelude::*;
use thiserror::Error;

use crate::data::schema::{
    CATEGORICAL_COLUMNS, DATE_COLUMN, ID_COLUMN, RAW_DATE_COLUMN, REGION_COLUMN, TEXT_COLUMNS,
};

#[derive(Error, Debug)]
pub enum NormalizerError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("{0} date values could not be parsed")]
    UnparseableDates(usize),
}

/// Handles the typing and deduplication pass over the loader's output.
pub struct Normalizer;

impl Normalizer {
    /// Normalize the raw unified table.
    ///
    /// With `verbose` set, logs a before/after memory-footprint summary;
    /// diagnostic only, no behavioral effect.
    pub fn normalize(df: &DataFrame, verbose: bool) -> Result<DataFrame, NormalizerError> {
        let orig_size = df.estimated_size();

        let mut out = df.clone();
        out.rename(RAW_DATE_COLUMN, DATE_COLUMN.into())?;
        // polars 0.46's rename leaves the cached schema stale, so a later
        // lazy() would still resolve the old column name.
        out.clear_schema();

        let out = Self::parse_dates(out)?;
        let out = Self::mark_categorical(out)?;
        let out = Self::coerce_numeric(out)?;

        let out = out
            .lazy()
            .unique_stable(Some(vec![ID_COLUMN.into()]), UniqueKeepStrategy::First)
            .collect()?;

        if verbose {
            log::info!("orig_size={:.1} MB", orig_size as f64 / 1e6);
            log::info!("new_size={:.1} MB", out.estimated_size() as f64 / 1e6);
        }

        Ok(out)
    }

    /// Parse the date column from its string form into a Date column.
    ///
    /// Accepts ISO dates with a compact `YYYYMMDD` fallback. A value that is
    /// present but parses under neither format fails the whole operation;
    /// silently dropping dates would skew every time-based chart.
    fn parse_dates(df: DataFrame) -> Result<DataFrame, NormalizerError> {
        let raw_nulls = df.column(DATE_COLUMN)?.null_count();

        let iso = StrptimeOptions {
            format: Some("%Y-%m-%d".into()),
            strict: false,
            ..Default::default()
        };
        let compact = StrptimeOptions {
            format: Some("%Y%m%d".into()),
            strict: false,
            ..Default::default()
        };

        let out = df
            .lazy()
            .with_column(
                coalesce(&[
                    col(DATE_COLUMN).str().to_date(iso),
                    col(DATE_COLUMN).str().to_date(compact),
                ])
                .alias(DATE_COLUMN),
            )
            .collect()?;

        let parsed_nulls = out.column(DATE_COLUMN)?.null_count();
        if parsed_nulls > raw_nulls {
            return Err(NormalizerError::UnparseableDates(parsed_nulls - raw_nulls));
        }
        Ok(out)
    }

    /// Cast the fixed categorical columns. Label remapping stays in the
    /// chart generators; the stored values are untouched.
    fn mark_categorical(df: DataFrame) -> Result<DataFrame, NormalizerError> {
        let casts: Vec<Expr> = CATEGORICAL_COLUMNS
            .iter()
            .map(|c| col(*c).cast(DataType::Categorical(None, Default::default())))
            .collect();
        Ok(df.lazy().with_columns(casts).collect()?)
    }

    /// Coerce every column outside the known non-numeric set to Float64.
    /// Unparseable cells become null rather than failing the batch.
    /// Already-numeric columns are left as they are, so the pass is
    /// idempotent.
    pub(crate) fn coerce_numeric(df: DataFrame) -> Result<DataFrame, NormalizerError> {
        let mut casts: Vec<Expr> = Vec::new();

        for column in df.get_columns() {
            let name = column.name().as_str();
            if Self::is_exempt(name) {
                continue;
            }
            if matches!(column.dtype(), DataType::String) {
                // Source files use decimal commas.
                casts.push(
                    col(name)
                        .str()
                        .replace_all(lit(","), lit("."), true)
                        .cast(DataType::Float64)
                        .alias(name),
                );
            }
        }

        Ok(df.lazy().with_columns(casts).collect()?)
    }

    fn is_exempt(name: &str) -> bool {
        name == DATE_COLUMN
            || name == REGION_COLUMN
            || TEXT_COLUMNS.contains(&name)
            || CATEGORICAL_COLUMNS.contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_from_reader;
    use crate::data::test_support::{csv_fields, csv_row, nested_zip, row_from, set_field};
    use std::io::Cursor;

    fn raw_frame(rows: Vec<String>) -> DataFrame {
        let archive = nested_zip(&[("data-2020.zip", vec![("00.csv", rows.join("\n"))])]);
        load_from_reader(Cursor::new(archive)).unwrap()
    }

    #[test]
    fn parses_dates_and_renames() {
        let df = raw_frame(vec![csv_row("1", "2020-01-01"), csv_row("2", "2020-12-31")]);
        let out = Normalizer::normalize(&df, false).unwrap();

        assert!(df.column("p2a").is_ok());
        assert!(out.column("p2a").is_err());

        let dates = out.column(DATE_COLUMN).unwrap();
        assert_eq!(dates.dtype(), &DataType::Date);
        assert_eq!(dates.null_count(), 0);

        let days = dates.cast(&DataType::Int32).unwrap();
        let days = days.i32().unwrap();
        let epoch = chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        let expect = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(days.get(0), Some((expect - epoch).num_days() as i32));
    }

    #[test]
    fn accepts_compact_date_encoding() {
        let df = raw_frame(vec![csv_row("1", "20200315")]);
        let out = Normalizer::normalize(&df, false).unwrap();
        assert_eq!(out.column(DATE_COLUMN).unwrap().null_count(), 0);
    }

    #[test]
    fn unparseable_date_fails_loudly() {
        let df = raw_frame(vec![csv_row("1", "2020-01-01"), csv_row("2", "not a date")]);
        let err = Normalizer::normalize(&df, false).unwrap_err();
        assert!(matches!(err, NormalizerError::UnparseableDates(1)));
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut second = csv_fields("1", "2021-06-01");
        set_field(&mut second, "p36", "9");
        let df = raw_frame(vec![
            csv_row("1", "2020-01-01"),
            row_from(&second),
            csv_row("2", "2020-02-01"),
        ]);

        let out = Normalizer::normalize(&df, false).unwrap();
        assert_eq!(out.height(), 2);

        // the surviving row for id 1 is the first one
        let p36 = out.column("p36").unwrap().f64().unwrap();
        assert_eq!(p36.get(0), Some(1.0));
    }

    #[test]
    fn coerces_decimal_commas_and_garbage() {
        let mut fields = csv_fields("1", "2020-01-01");
        set_field(&mut fields, "a", "12,75");
        set_field(&mut fields, "b", "oops");
        let df = raw_frame(vec![row_from(&fields)]);

        let out = Normalizer::normalize(&df, false).unwrap();
        let a = out.column("a").unwrap().f64().unwrap();
        assert_eq!(a.get(0), Some(12.75));
        let b = out.column("b").unwrap();
        assert_eq!(b.dtype(), &DataType::Float64);
        assert_eq!(b.null_count(), 1);
    }

    #[test]
    fn coercion_is_idempotent() {
        let df = raw_frame(vec![csv_row("1", "2020-01-01"), csv_row("2", "2020-01-02")]);
        let once = Normalizer::coerce_numeric(df).unwrap();
        let twice = Normalizer::coerce_numeric(once.clone()).unwrap();
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn categorical_columns_keep_their_values() {
        let mut fields = csv_fields("1", "2020-01-01");
        set_field(&mut fields, "k", "zvodidlo");
        let df = raw_frame(vec![row_from(&fields)]);

        let out = Normalizer::normalize(&df, false).unwrap();
        let k = out.column("k").unwrap();
        assert!(matches!(k.dtype(), DataType::Categorical(_, _)));
        let k_str = k.cast(&DataType::String).unwrap();
        assert_eq!(k_str.str().unwrap().get(0), Some("zvodidlo"));
    }

    #[test]
    fn text_and_region_columns_stay_strings() {
        let df = raw_frame(vec![csv_row("1", "2020-01-01")]);
        let out = Normalizer::normalize(&df, false).unwrap();
        for name in ["h", "i", REGION_COLUMN] {
            assert_eq!(out.column(name).unwrap().dtype(), &DataType::String);
        }
    }
}
