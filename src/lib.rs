//! accident_stats - Traffic Accident Dataset Loader & Chart Generator
//!
//! Loads a multi-year, multi-region accident dataset from nested ZIP
//! archives, normalizes it into a single polars DataFrame and renders
//! descriptive statistical charts.

pub mod charts;
pub mod data;
