//! Chart configuration, histogram binning and render dispatch.
//!
//! Configuration is validated before any backend is touched, so an invalid
//! chart never leaves a partially-written image behind.

mod png;
#[cfg(feature = "tui")]
mod tui;

use crate::error::ReportError;
use std::path::PathBuf;

/// How histogram buckets are laid out.
#[derive(Debug, Clone)]
pub enum Bins {
    /// Explicit bucket edges, strictly increasing. Values past the last edge
    /// are clamped into the final bucket.
    Edges(Vec<f64>),
    /// Equal-width buckets spanning the data range.
    Count(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YScale {
    Linear,
    Log,
}

/// Where a histogram goes: an image file (overwritten if present) or an
/// interactive terminal view.
#[derive(Debug, Clone)]
pub enum Output {
    Png(PathBuf),
    Interactive,
}

/// Display parameters for a (possibly multi-series) histogram.
#[derive(Debug, Clone)]
pub struct HistogramConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bins: Bins,
    /// One legend label per series.
    pub legend: Vec<String>,
    pub y_limit: Option<f64>,
    pub y_scale: YScale,
    pub output: Output,
}

/// Display parameters for the single-series bar charts (per-tenant rates,
/// grouped CPU bars). These are always written as images.
#[derive(Debug, Clone)]
pub struct BarChartConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y_limit: Option<f64>,
    pub out: PathBuf,
}

/// Counts per bucket for one series, shared by both backends.
#[derive(Debug, Clone)]
pub struct BinnedSeries {
    pub label: String,
    pub counts: Vec<u64>,
}

/// Render a histogram of one or more series.
pub fn render_histogram(series: &[Vec<f64>], cfg: &HistogramConfig) -> Result<(), ReportError> {
    let edges = validate_histogram(series, cfg)?;
    let binned: Vec<BinnedSeries> = series
        .iter()
        .zip(&cfg.legend)
        .map(|(values, label)| BinnedSeries {
            label: label.clone(),
            counts: bin_counts(values, &edges),
        })
        .collect();

    match &cfg.output {
        Output::Png(path) => png::draw_histogram(path, &edges, &binned, cfg),
        #[cfg(feature = "tui")]
        Output::Interactive => tui::show_histogram(&edges, &binned, cfg),
        #[cfg(not(feature = "tui"))]
        Output::Interactive => Err(ReportError::Render(
            "interactive output requires the `tui` feature".into(),
        )),
    }
}

/// Render a vertical bar chart with one bar per value, highlighting the first
/// `highlight` bars (the greedy tenants).
pub fn render_bar_chart(
    values: &[f64],
    highlight: usize,
    cfg: &BarChartConfig,
) -> Result<(), ReportError> {
    if values.is_empty() {
        return Err(ReportError::EmptyInput);
    }
    validate_y_limit(cfg.y_limit)?;
    png::draw_bar_chart(values, highlight, cfg)
}

/// Render a horizontal grouped bar chart: one category per row, one bar per
/// series within each category.
pub fn render_grouped_hbar_chart(
    categories: &[String],
    series: &[Vec<f64>],
    legend: &[String],
    cfg: &BarChartConfig,
) -> Result<(), ReportError> {
    if series.is_empty() || categories.is_empty() {
        return Err(ReportError::EmptyInput);
    }
    if legend.len() != series.len() {
        return Err(ReportError::Render(format!(
            "{} legend labels for {} series",
            legend.len(),
            series.len()
        )));
    }
    for values in series {
        if values.len() != categories.len() {
            return Err(ReportError::Render(format!(
                "series has {} values for {} categories",
                values.len(),
                categories.len()
            )));
        }
    }
    png::draw_grouped_hbar_chart(categories, series, legend, cfg)
}

/// Check a histogram configuration and resolve its bucket edges.
fn validate_histogram(
    series: &[Vec<f64>],
    cfg: &HistogramConfig,
) -> Result<Vec<f64>, ReportError> {
    if series.is_empty() || series.iter().any(|s| s.is_empty()) {
        return Err(ReportError::EmptyInput);
    }
    if cfg.legend.len() != series.len() {
        return Err(ReportError::Render(format!(
            "{} legend labels for {} series",
            cfg.legend.len(),
            series.len()
        )));
    }
    validate_y_limit(cfg.y_limit)?;
    if cfg.y_scale == YScale::Log {
        if let Some(limit) = cfg.y_limit {
            if limit <= 1.0 {
                return Err(ReportError::Render(
                    "log-scale y limit must be greater than 1".into(),
                ));
            }
        }
    }

    match &cfg.bins {
        Bins::Edges(edges) => {
            if edges.len() < 2 {
                return Err(ReportError::Render(
                    "at least two bucket edges are required".into(),
                ));
            }
            if edges.windows(2).any(|w| w[1] <= w[0]) {
                return Err(ReportError::Render(
                    "bucket edges must be strictly increasing".into(),
                ));
            }
            Ok(edges.clone())
        }
        Bins::Count(0) => Err(ReportError::Render("bin count must be non-zero".into())),
        Bins::Count(n) => Ok(equal_width_edges(series, *n)),
    }
}

fn validate_y_limit(limit: Option<f64>) -> Result<(), ReportError> {
    match limit {
        Some(l) if !l.is_finite() || l <= 0.0 => Err(ReportError::Render(format!(
            "y limit must be positive and finite, got {l}"
        ))),
        _ => Ok(()),
    }
}

/// Equal-width edges spanning the combined range of all series. A degenerate
/// range (all values equal) widens to a single unit-wide bucket.
fn equal_width_edges(series: &[Vec<f64>], bins: usize) -> Vec<f64> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in series.iter().flatten() {
        lo = lo.min(*v);
        hi = hi.max(*v);
    }
    if (hi - lo).abs() < f64::EPSILON {
        return vec![lo - 0.5, lo + 0.5];
    }
    let width = (hi - lo) / bins as f64;
    (0..=bins).map(|i| lo + i as f64 * width).collect()
}

/// Count values per bucket. Out-of-range values are clamped into the first or
/// last bucket, so the final bucket doubles as an overflow bucket.
fn bin_counts(values: &[f64], edges: &[f64]) -> Vec<u64> {
    let buckets = edges.len() - 1;
    let mut counts = vec![0u64; buckets];
    for &v in values {
        let idx = edges[..buckets]
            .iter()
            .rposition(|&e| v >= e)
            .unwrap_or(0)
            .min(buckets - 1);
        counts[idx] += 1;
    }
    counts
}
