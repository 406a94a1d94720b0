//! Charts module - the three descriptive chart generators

mod consequences;
mod direction;
mod renderer;
mod visibility;

pub use consequences::plot_consequences;
pub use direction::{plot_direction, CollisionManner};
pub use visibility::{plot_visibility, Visibility};

use polars::prelude::*;
use thiserror::Error;

use crate::data::regions::Region;
use crate::data::schema::REGION_COLUMN;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Chart rendering failed: {0}")]
    Render(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The fixed region subset shown by all three generators.
pub const SELECTED_REGIONS: [Region; 4] = [Region::PHA, Region::STC, Region::PLK, Region::JHM];

/// Lazy view of the table restricted to [`SELECTED_REGIONS`]. The caller's
/// frame is never mutated; every generator works on its own copy.
fn selected_regions_lazy(df: &DataFrame) -> LazyFrame {
    let filter = SELECTED_REGIONS.iter().skip(1).fold(
        col(REGION_COLUMN).eq(lit(SELECTED_REGIONS[0].as_str())),
        |acc, r| acc.or(col(REGION_COLUMN).eq(lit(r.as_str()))),
    );
    df.clone().lazy().filter(filter)
}
