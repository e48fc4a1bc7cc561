//! Image rendering via the plotters bitmap backend.

use super::{BarChartConfig, BinnedSeries, HistogramConfig, YScale};
use crate::error::ReportError;
use log::info;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::ranged1d::Ranged;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::path::Path;

const CHART_SIZE: (u32, u32) = (1000, 500);
const LABEL_FONT: (&str, u32) = ("sans-serif", 18);

fn render_err<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Render(e.to_string())
}

/// Draw a (possibly multi-series) histogram to `path`, overwriting it if
/// present. The bars of each bucket are laid out side by side, one per series.
pub fn draw_histogram(
    path: &Path,
    edges: &[f64],
    binned: &[BinnedSeries],
    cfg: &HistogramConfig,
) -> Result<(), ReportError> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let x_range = edges[0]..edges[edges.len() - 1];
    let max_count = binned
        .iter()
        .flat_map(|b| b.counts.iter())
        .copied()
        .max()
        .unwrap_or(0) as f64;
    let y_max = cfg.y_limit.unwrap_or((max_count * 1.1).max(1.0));

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(10)
        .margin_top(40)
        .x_label_area_size(45)
        .y_label_area_size(60);
    if !cfg.title.is_empty() {
        builder.caption(&cfg.title, ("sans-serif", 22));
    }

    match cfg.y_scale {
        YScale::Linear => {
            let mut chart = builder
                .build_cartesian_2d(x_range, 0f64..y_max)
                .map_err(render_err)?;
            chart
                .configure_mesh()
                .disable_x_mesh()
                .light_line_style(WHITE)
                .x_desc(cfg.x_label.as_str())
                .y_desc(cfg.y_label.as_str())
                .axis_desc_style(LABEL_FONT.into_font())
                .y_label_formatter(&|y| format!("{y:.0}"))
                .draw()
                .map_err(render_err)?;
            draw_binned_bars(&mut chart, edges, binned, 0.0)?;
        }
        YScale::Log => {
            let mut chart = builder
                .build_cartesian_2d(x_range, (1f64..y_max).log_scale())
                .map_err(render_err)?;
            chart
                .configure_mesh()
                .disable_x_mesh()
                .light_line_style(WHITE)
                .x_desc(cfg.x_label.as_str())
                .y_desc(cfg.y_label.as_str())
                .axis_desc_style(LABEL_FONT.into_font())
                .y_label_formatter(&|y| format!("{y:.0}"))
                .draw()
                .map_err(render_err)?;
            // Log axes cannot represent zero; empty buckets sit at the floor.
            draw_binned_bars(&mut chart, edges, binned, 1.0)?;
        }
    }

    root.present().map_err(render_err)?;
    info!("wrote {}", path.display());
    Ok(())
}

fn draw_binned_bars<'a, DB, YR>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, YR>>,
    edges: &[f64],
    binned: &[BinnedSeries],
    y_floor: f64,
) -> Result<(), ReportError>
where
    DB: DrawingBackend + 'a,
    YR: Ranged<ValueType = f64>,
{
    let slots = binned.len() as f64;
    for (idx, series) in binned.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let bars = series.counts.iter().enumerate().map(|(bucket, &count)| {
            let lo = edges[bucket];
            let hi = edges[bucket + 1];
            // 10% bucket padding, remaining width split between the series.
            let pad = (hi - lo) * 0.05;
            let slot_w = (hi - lo - 2.0 * pad) / slots;
            let x0 = lo + pad + idx as f64 * slot_w;
            let x1 = x0 + slot_w;
            let top = (count as f64).max(y_floor);
            Rectangle::new([(x0, y_floor), (x1, top)], color.filled())
        });
        chart
            .draw_series(bars)
            .map_err(render_err)?
            .label(series.label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 10, y + 4)], color.filled()));

        // Black bar outlines, drawn on top of the fills.
        let outlines = series.counts.iter().enumerate().map(|(bucket, &count)| {
            let lo = edges[bucket];
            let hi = edges[bucket + 1];
            let pad = (hi - lo) * 0.05;
            let slot_w = (hi - lo - 2.0 * pad) / slots;
            let x0 = lo + pad + idx as f64 * slot_w;
            let x1 = x0 + slot_w;
            let top = (count as f64).max(y_floor);
            Rectangle::new([(x0, y_floor), (x1, top)], BLACK.stroke_width(1))
        });
        chart.draw_series(outlines).map_err(render_err)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(LABEL_FONT.into_font())
        .draw()
        .map_err(render_err)?;
    Ok(())
}

/// Draw a vertical bar chart, one unit-wide bar per value. The first
/// `highlight` bars are drawn in red, the rest in blue.
pub fn draw_bar_chart(
    values: &[f64],
    highlight: usize,
    cfg: &BarChartConfig,
) -> Result<(), ReportError> {
    let root = BitMapBackend::new(&cfg.out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let data_max = values.iter().cloned().fold(0.0f64, f64::max);
    let y_max = cfg.y_limit.unwrap_or((data_max * 1.1).max(1.0));

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(10)
        .x_label_area_size(20)
        .y_label_area_size(50);
    if !cfg.title.is_empty() {
        builder.caption(&cfg.title, ("sans-serif", 22));
    }
    let mut chart = builder
        .build_cartesian_2d(0f64..values.len() as f64, 0f64..y_max)
        .map_err(render_err)?;

    // The x axis carries no meaning beyond tenant order; hide its labels.
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_x_axis()
        .light_line_style(WHITE)
        .x_desc(cfg.x_label.as_str())
        .y_desc(cfg.y_label.as_str())
        .axis_desc_style(LABEL_FONT.into_font())
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(values.iter().enumerate().map(|(i, &v)| {
            let fill = if i < highlight { RED } else { BLUE };
            Rectangle::new([(i as f64, 0.0), (i as f64 + 1.0, v)], fill.filled())
        }))
        .map_err(render_err)?;
    chart
        .draw_series(values.iter().enumerate().map(|(i, &v)| {
            Rectangle::new(
                [(i as f64, 0.0), (i as f64 + 1.0, v)],
                BLACK.stroke_width(1),
            )
        }))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    info!("wrote {}", cfg.out.display());
    Ok(())
}

/// Draw a horizontal grouped bar chart: one row per category, one bar per
/// series within the row.
pub fn draw_grouped_hbar_chart(
    categories: &[String],
    series: &[Vec<f64>],
    legend: &[String],
    cfg: &BarChartConfig,
) -> Result<(), ReportError> {
    let root = BitMapBackend::new(&cfg.out, (600, 300)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let data_max = series
        .iter()
        .flatten()
        .cloned()
        .fold(0.0f64, f64::max);
    let x_max = cfg.y_limit.unwrap_or((data_max * 1.1).max(1.0));

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(10)
        .margin_top(40)
        .x_label_area_size(45)
        .y_label_area_size(60);
    if !cfg.title.is_empty() {
        builder.caption(&cfg.title, ("sans-serif", 22));
    }
    let mut chart = builder
        .build_cartesian_2d(0f64..x_max, 0f64..categories.len() as f64)
        .map_err(render_err)?;

    let cats = categories.to_vec();
    chart
        .configure_mesh()
        .disable_y_mesh()
        .light_line_style(WHITE)
        .x_desc(cfg.x_label.as_str())
        .y_desc(cfg.y_label.as_str())
        .axis_desc_style(LABEL_FONT.into_font())
        .y_labels(categories.len())
        .y_label_formatter(&move |y| {
            let idx = *y as usize;
            if (*y - idx as f64 - 0.5).abs() < 0.26 {
                cats.get(idx).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .draw()
        .map_err(render_err)?;

    let rows = series.len() as f64;
    for (idx, values) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let bars = values.iter().enumerate().map(|(cat, &v)| {
            // 20% row padding, remaining height split between the series.
            let pad = 0.1;
            let slot_h = (1.0 - 2.0 * pad) / rows;
            let y0 = cat as f64 + pad + idx as f64 * slot_h;
            let y1 = y0 + slot_h;
            Rectangle::new([(0.0, y0), (v, y1)], color.filled())
        });
        chart
            .draw_series(bars)
            .map_err(render_err)?
            .label(legend[idx].as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 10, y + 4)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(LABEL_FONT.into_font())
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    info!("wrote {}", cfg.out.display());
    Ok(())
}
