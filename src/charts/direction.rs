//! Collision Direction Chart
//! Counts of collisions between moving vehicles by manner and calendar
//! month, one bar panel per region.

use std::collections::BTreeMap;
use std::path::Path;

use plotters::prelude::*;
use polars::prelude::*;

use crate::charts::renderer::{
    draw_bar_panel, render_target, to_render, BarPanel, FIGURE_SIZE, PALETTE,
};
use crate::charts::{selected_regions_lazy, ChartError, SELECTED_REGIONS};
use crate::data::regions::Region;
use crate::data::schema::{DATE_COLUMN, ID_COLUMN, REGION_COLUMN};

/// Raw `p7` code for "not applicable": no collision between moving
/// vehicles. Excluded from all aggregates.
const NOT_APPLICABLE: i64 = 0;

/// Manner of collision between moving vehicles, collapsed from the raw
/// `p7` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CollisionManner {
    HeadOn,
    Side,
    RearEnd,
}

impl CollisionManner {
    pub const ALL: [CollisionManner; 3] = [
        CollisionManner::HeadOn,
        CollisionManner::Side,
        CollisionManner::RearEnd,
    ];

    /// Collapse a raw `p7` code; code 0 and anything outside the dictionary
    /// map to `None`.
    pub fn from_code(code: i64) -> Option<CollisionManner> {
        match code {
            1 => Some(CollisionManner::HeadOn),
            2 | 3 => Some(CollisionManner::Side),
            4 => Some(CollisionManner::RearEnd),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CollisionManner::HeadOn => "head-on",
            CollisionManner::Side => "side",
            CollisionManner::RearEnd => "rear-end",
        }
    }
}

/// Render the collision-direction chart, writing it to `fig_location`
/// and/or opening it with the system viewer.
pub fn plot_direction(
    df: &DataFrame,
    fig_location: Option<&Path>,
    show_figure: bool,
) -> Result<(), ChartError> {
    let counts = direction_counts(df)?;
    let Some(target) = render_target(fig_location, show_figure, "02_direction.png")? else {
        return Ok(());
    };

    render(&counts, &target)?;
    log::info!("Collision direction chart written to {}", target.display());
    if show_figure {
        open::that(&target)?;
    }
    Ok(())
}

/// Collision counts per (region, calendar month, manner) across the
/// selected regions, with "not applicable" rows excluded.
fn direction_counts(
    df: &DataFrame,
) -> Result<BTreeMap<(Region, u32, CollisionManner), i64>, ChartError> {
    let grouped = selected_regions_lazy(df)
        .filter(col("p7").neq(lit(NOT_APPLICABLE)))
        .with_column(col(DATE_COLUMN).dt().month().alias("month"))
        .group_by([col(REGION_COLUMN), col("month"), col("p7")])
        .agg([col(ID_COLUMN).count().alias("n")])
        .collect()?;

    let regions = grouped.column(REGION_COLUMN)?.str()?;
    let months = grouped.column("month")?.cast(&DataType::Int64)?;
    let months = months.i64()?;
    let codes = grouped.column("p7")?.cast(&DataType::Int64)?;
    let codes = codes.i64()?;
    let counts = grouped.column("n")?.cast(&DataType::Int64)?;
    let counts = counts.i64()?;

    let mut out = BTreeMap::new();
    for i in 0..grouped.height() {
        let (Some(tag), Some(month), Some(code), Some(n)) =
            (regions.get(i), months.get(i), codes.get(i), counts.get(i))
        else {
            continue;
        };
        let Some(region) = Region::from_tag(tag) else {
            continue;
        };
        match CollisionManner::from_code(code) {
            Some(manner) => *out.entry((region, month as u32, manner)).or_insert(0) += n,
            None => log::warn!("ignoring unknown collision code {code}"),
        }
    }
    Ok(out)
}

fn render(
    counts: &BTreeMap<(Region, u32, CollisionManner), i64>,
    path: &Path,
) -> Result<(), ChartError> {
    let y_max = counts.values().copied().max().unwrap_or(0).max(1) as f64 * 1.15;

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(to_render)?;
    let areas = root.split_evenly((2, 2));

    for (area, region) in areas.iter().zip(SELECTED_REGIONS) {
        let series = CollisionManner::ALL
            .iter()
            .zip(PALETTE)
            .map(|(manner, color)| {
                let values: Vec<f64> = (1..=12u32)
                    .map(|m| counts.get(&(region, m, *manner)).copied().unwrap_or(0) as f64)
                    .collect();
                (manner.label().to_string(), color, values)
            })
            .collect();

        let panel = BarPanel {
            title: format!("Region: {}", region.as_str()),
            categories: (1..=12).map(|m| m.to_string()).collect(),
            series,
            x_desc: "Month".to_string(),
            y_desc: "Accidents".to_string(),
            legend: true,
        };
        draw_bar_panel(area, &panel, y_max)?;
    }

    root.present().map_err(to_render)?;
    Ok(())
}
