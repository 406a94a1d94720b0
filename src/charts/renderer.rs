//! Chart Renderer Module
//! Shared plotters scaffolding for the chart generators: output target
//! resolution, the color palette and the bar/line panel primitives.

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::charts::ChartError;

/// Color palette for chart series
pub const PALETTE: [RGBColor; 4] = [
    RGBColor(231, 76, 60),  // Red
    RGBColor(52, 152, 219), // Blue
    RGBColor(46, 204, 113), // Green
    RGBColor(243, 156, 18), // Orange
];

/// Rendered image size for the 2x2 grids.
pub const FIGURE_SIZE: (u32, u32) = (1100, 800);

pub(crate) fn to_render<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Render(err.to_string())
}

/// Resolve where a chart should be written: the explicit location when
/// given, a temp file when only interactive display was requested, nothing
/// otherwise.
pub(crate) fn render_target(
    fig_location: Option<&Path>,
    show_figure: bool,
    default_name: &str,
) -> Result<Option<PathBuf>, ChartError> {
    if let Some(path) = fig_location {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Some(path.to_path_buf()))
    } else if show_figure {
        Ok(Some(std::env::temp_dir().join(default_name)))
    } else {
        Ok(None)
    }
}

/// One panel of grouped bars: `categories` on the x-axis, one colored bar
/// per series within each category.
pub(crate) struct BarPanel {
    pub title: String,
    pub categories: Vec<String>,
    pub series: Vec<(String, RGBColor, Vec<f64>)>,
    pub x_desc: String,
    pub y_desc: String,
    pub legend: bool,
}

pub(crate) fn draw_bar_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    panel: &BarPanel,
    y_max: f64,
) -> Result<(), ChartError> {
    let n_cat = panel.categories.len().max(1);
    let n_series = panel.series.len().max(1);

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 16))
        .margin(8)
        .x_label_area_size(32)
        .y_label_area_size(52)
        .build_cartesian_2d(-0.5f64..(n_cat as f64 - 0.5), 0f64..y_max)
        .map_err(to_render)?;

    let labels = panel.categories.clone();
    let fmt = move |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() > 0.01 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n_cat)
        .x_label_formatter(&fmt)
        .x_desc(&panel.x_desc)
        .y_desc(&panel.y_desc)
        .label_style(("sans-serif", 12))
        .draw()
        .map_err(to_render)?;

    let slot = 0.8 / n_series as f64;
    for (si, (name, color, values)) in panel.series.iter().enumerate() {
        let color = *color;
        let anno = chart
            .draw_series(values.iter().enumerate().map(|(ci, v)| {
                let x0 = ci as f64 - 0.4 + si as f64 * slot;
                Rectangle::new([(x0, 0.0), (x0 + slot, *v)], color.filled())
            }))
            .map_err(to_render)?;
        if panel.legend {
            anno.label(name.clone()).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
        }
    }

    if panel.legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", 12))
            .draw()
            .map_err(to_render)?;
    }

    Ok(())
}

/// One panel of line series over an ordered category axis (month buckets).
pub(crate) struct LinePanel {
    pub title: String,
    pub categories: Vec<String>,
    pub series: Vec<(String, RGBColor, Vec<f64>)>,
    pub x_desc: String,
    pub y_desc: String,
}

pub(crate) fn draw_line_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    panel: &LinePanel,
    y_max: f64,
) -> Result<(), ChartError> {
    let n_cat = panel.categories.len().max(2);

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 16))
        .margin(8)
        .x_label_area_size(32)
        .y_label_area_size(52)
        .build_cartesian_2d(0f64..(n_cat as f64 - 1.0), 0f64..y_max)
        .map_err(to_render)?;

    let labels = panel.categories.clone();
    let fmt = move |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() > 0.01 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(6)
        .x_label_formatter(&fmt)
        .x_desc(&panel.x_desc)
        .y_desc(&panel.y_desc)
        .label_style(("sans-serif", 12))
        .draw()
        .map_err(to_render)?;

    for (name, color, values) in &panel.series {
        let color = *color;
        chart
            .draw_series(LineSeries::new(
                values.iter().enumerate().map(|(i, v)| (i as f64, *v)),
                color.stroke_width(2),
            ))
            .map_err(to_render)?
            .label(name.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 12))
        .draw()
        .map_err(to_render)?;

    Ok(())
}
