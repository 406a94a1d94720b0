//! Consequences Chart
//! Monthly time series of fatality and injury outcomes per region, one
//! line panel per region with a series per severity.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::NaiveDate;
use plotters::prelude::*;
use polars::prelude::*;

use crate::charts::renderer::{
    draw_line_panel, render_target, to_render, LinePanel, FIGURE_SIZE, PALETTE,
};
use crate::charts::{selected_regions_lazy, ChartError, SELECTED_REGIONS};
use crate::data::regions::Region;
use crate::data::schema::{DATE_COLUMN, REGION_COLUMN};

/// Data past this year is incomplete in the source and is cut off.
const YEAR_CUTOFF: i32 = 2022;

/// Severity sums for one (region, month) bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Casualties {
    pub killed: f64,
    pub severe: f64,
    pub slight: f64,
}

/// Render the consequences chart, writing it to `fig_location` and/or
/// opening it with the system viewer.
pub fn plot_consequences(
    df: &DataFrame,
    fig_location: Option<&Path>,
    show_figure: bool,
) -> Result<(), ChartError> {
    let sums = consequence_series(df)?;
    let Some(target) = render_target(fig_location, show_figure, "03_consequences.png")? else {
        return Ok(());
    };

    render(&sums, &target)?;
    log::info!("Consequences chart written to {}", target.display());
    if show_figure {
        open::that(&target)?;
    }
    Ok(())
}

/// Sum the three severity fields per (region, month bucket) across the
/// selected regions, restricted to years before the cutoff.
fn consequence_series(
    df: &DataFrame,
) -> Result<BTreeMap<(Region, NaiveDate), Casualties>, ChartError> {
    let grouped = selected_regions_lazy(df)
        .filter(col(DATE_COLUMN).dt().year().lt(lit(YEAR_CUTOFF)))
        .with_column(col(DATE_COLUMN).dt().truncate(lit("1mo")).alias("month"))
        .group_by([col(REGION_COLUMN), col("month")])
        .agg([
            col("p13a").sum().alias("killed"),
            col("p13b").sum().alias("severe"),
            col("p13c").sum().alias("slight"),
        ])
        .collect()?;

    let regions = grouped.column(REGION_COLUMN)?.str()?;
    let months = grouped.column("month")?.cast(&DataType::Int32)?;
    let months = months.i32()?;
    let killed = grouped.column("killed")?.cast(&DataType::Float64)?;
    let killed = killed.f64()?;
    let severe = grouped.column("severe")?.cast(&DataType::Float64)?;
    let severe = severe.f64()?;
    let slight = grouped.column("slight")?.cast(&DataType::Float64)?;
    let slight = slight.f64()?;

    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch");

    let mut out = BTreeMap::new();
    for i in 0..grouped.height() {
        let (Some(tag), Some(days)) = (regions.get(i), months.get(i)) else {
            continue;
        };
        let Some(region) = Region::from_tag(tag) else {
            continue;
        };
        let month = epoch + chrono::Duration::days(days as i64);
        out.insert(
            (region, month),
            Casualties {
                killed: killed.get(i).unwrap_or(0.0),
                severe: severe.get(i).unwrap_or(0.0),
                slight: slight.get(i).unwrap_or(0.0),
            },
        );
    }
    Ok(out)
}

fn render(
    sums: &BTreeMap<(Region, NaiveDate), Casualties>,
    path: &Path,
) -> Result<(), ChartError> {
    // shared month axis so the panels are comparable
    let months: BTreeSet<NaiveDate> = sums.keys().map(|(_, m)| *m).collect();
    let months: Vec<NaiveDate> = months.into_iter().collect();

    let y_max = sums
        .values()
        .flat_map(|c| [c.killed, c.severe, c.slight])
        .fold(1.0f64, f64::max)
        * 1.15;

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(to_render)?;
    let areas = root.split_evenly((2, 2));

    for (area, region) in areas.iter().zip(SELECTED_REGIONS) {
        let pick = |f: fn(&Casualties) -> f64| -> Vec<f64> {
            months
                .iter()
                .map(|m| sums.get(&(region, *m)).map(f).unwrap_or(0.0))
                .collect()
        };

        let panel = LinePanel {
            title: format!("Region: {}", region.as_str()),
            categories: months.iter().map(|m| m.format("%Y-%m").to_string()).collect(),
            series: vec![
                ("fatalities".to_string(), PALETTE[0], pick(|c| c.killed)),
                ("severe injuries".to_string(), PALETTE[3], pick(|c| c.severe)),
                ("light injuries".to_string(), PALETTE[2], pick(|c| c.slight)),
            ],
            x_desc: "Month".to_string(),
            y_desc: "Casualties".to_string(),
        };
        draw_line_panel(area, &panel, y_max)?;
    }

    root.present().map_err(to_render)?;
    Ok(())
}
