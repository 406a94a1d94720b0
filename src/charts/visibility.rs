//! Visibility Chart
//! Accident counts by region and lighting/visibility condition, rendered
//! as a 2x2 grid of bar panels, one panel per condition.

use std::collections::BTreeMap;
use std::path::Path;

use plotters::prelude::*;
use polars::prelude::*;

use crate::charts::renderer::{
    draw_bar_panel, render_target, to_render, BarPanel, FIGURE_SIZE, PALETTE,
};
use crate::charts::{selected_regions_lazy, ChartError, SELECTED_REGIONS};
use crate::data::regions::Region;
use crate::data::schema::{ID_COLUMN, REGION_COLUMN};

/// Lighting/visibility condition, collapsed from the 7-valued raw `p19`
/// code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Visibility {
    DayClear,
    DayDegraded,
    NightClear,
    NightDegraded,
}

impl Visibility {
    pub const ALL: [Visibility; 4] = [
        Visibility::DayClear,
        Visibility::DayDegraded,
        Visibility::NightClear,
        Visibility::NightDegraded,
    ];

    /// Collapse a raw `p19` code. The dataset dictionary only defines
    /// codes 1 through 7.
    pub fn from_code(code: i64) -> Option<Visibility> {
        match code {
            1 => Some(Visibility::DayClear),
            2 | 3 => Some(Visibility::DayDegraded),
            4 | 6 => Some(Visibility::NightClear),
            5 | 7 => Some(Visibility::NightDegraded),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Visibility::DayClear => "day: good visibility",
            Visibility::DayDegraded => "day: reduced visibility",
            Visibility::NightClear => "night: good visibility",
            Visibility::NightDegraded => "night: reduced visibility",
        }
    }
}

/// Render the visibility chart, writing it to `fig_location` and/or opening
/// it with the system viewer.
pub fn plot_visibility(
    df: &DataFrame,
    fig_location: Option<&Path>,
    show_figure: bool,
) -> Result<(), ChartError> {
    let counts = visibility_counts(df)?;
    let Some(target) = render_target(fig_location, show_figure, "01_visibility.png")? else {
        return Ok(());
    };

    render(&counts, &target)?;
    log::info!("Visibility chart written to {}", target.display());
    if show_figure {
        open::that(&target)?;
    }
    Ok(())
}

/// Accident counts per (region, visibility bucket) across the selected
/// regions.
fn visibility_counts(df: &DataFrame) -> Result<BTreeMap<(Region, Visibility), i64>, ChartError> {
    let grouped = selected_regions_lazy(df)
        .group_by([col(REGION_COLUMN), col("p19")])
        .agg([col(ID_COLUMN).count().alias("n")])
        .collect()?;

    let regions = grouped.column(REGION_COLUMN)?.str()?;
    let codes = grouped.column("p19")?.cast(&DataType::Int64)?;
    let codes = codes.i64()?;
    let counts = grouped.column("n")?.cast(&DataType::Int64)?;
    let counts = counts.i64()?;

    let mut out = BTreeMap::new();
    for i in 0..grouped.height() {
        let (Some(tag), Some(code), Some(n)) = (regions.get(i), codes.get(i), counts.get(i))
        else {
            continue;
        };
        let Some(region) = Region::from_tag(tag) else {
            continue;
        };
        match Visibility::from_code(code) {
            Some(bucket) => *out.entry((region, bucket)).or_insert(0) += n,
            None => log::warn!("ignoring unknown visibility code {code}"),
        }
    }
    Ok(out)
}

fn render(counts: &BTreeMap<(Region, Visibility), i64>, path: &Path) -> Result<(), ChartError> {
    let y_max = counts.values().copied().max().unwrap_or(0).max(1) as f64 * 1.15;

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(to_render)?;
    let areas = root.split_evenly((2, 2));

    for ((area, bucket), color) in areas.iter().zip(Visibility::ALL).zip(PALETTE) {
        let values: Vec<f64> = SELECTED_REGIONS
            .iter()
            .map(|r| counts.get(&(*r, bucket)).copied().unwrap_or(0) as f64)
            .collect();
        let panel = BarPanel {
            title: bucket.label().to_string(),
            categories: SELECTED_REGIONS
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
            series: vec![("accidents".to_string(), color, values)],
            x_desc: "Region".to_string(),
            y_desc: "Accidents".to_string(),
            legend: false,
        };
        draw_bar_panel(area, &panel, y_max)?;
    }

    root.present().map_err(to_render)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(rows: &[(&str, i64)]) -> DataFrame {
        let ids: Vec<f64> = (0..rows.len()).map(|i| i as f64).collect();
        let regions: Vec<&str> = rows.iter().map(|(r, _)| *r).collect();
        let codes: Vec<f64> = rows.iter().map(|(_, c)| *c as f64).collect();
        df!(
            ID_COLUMN => ids,
            REGION_COLUMN => regions,
            "p19" => codes,
        )
        .unwrap()
    }

    #[test]
    fn collapses_raw_codes_into_four_buckets() {
        assert_eq!(Visibility::from_code(1), Some(Visibility::DayClear));
        assert_eq!(Visibility::from_code(2), Some(Visibility::DayDegraded));
        assert_eq!(Visibility::from_code(3), Some(Visibility::DayDegraded));
        assert_eq!(Visibility::from_code(4), Some(Visibility::NightClear));
        assert_eq!(Visibility::from_code(6), Some(Visibility::NightClear));
        assert_eq!(Visibility::from_code(5), Some(Visibility::NightDegraded));
        assert_eq!(Visibility::from_code(7), Some(Visibility::NightDegraded));
        assert_eq!(Visibility::from_code(0), None);
        assert_eq!(Visibility::from_code(8), None);
    }

    #[test]
    fn one_row_per_code_yields_mapping_sizes() {
        // one row per (selected region, raw code 1..=7)
        let mut rows = Vec::new();
        for region in SELECTED_REGIONS {
            for code in 1..=7 {
                rows.push((region.as_str(), code));
            }
        }
        let counts = visibility_counts(&frame(&rows)).unwrap();

        for region in SELECTED_REGIONS {
            assert_eq!(counts[&(region, Visibility::DayClear)], 1);
            assert_eq!(counts[&(region, Visibility::DayDegraded)], 2);
            assert_eq!(counts[&(region, Visibility::NightClear)], 2);
            assert_eq!(counts[&(region, Visibility::NightDegraded)], 2);
        }
    }

    #[test]
    fn other_regions_are_filtered_out() {
        let counts = visibility_counts(&frame(&[("PHA", 1), ("MSK", 1), ("KVK", 1)])).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&(Region::PHA, Visibility::DayClear)], 1);
    }

    #[test]
    fn unknown_codes_are_skipped() {
        let counts = visibility_counts(&frame(&[("PHA", 1), ("PHA", 42)])).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&(Region::PHA, Visibility::DayClear)], 1);
    }
}
