//! SVG chart rendering.
//!
//! Charts are written with the plotters SVG backend so no system fonts or
//! image codecs are needed.

use anyhow::{Result, bail};
use plotters::data::Quartiles;
use plotters::element::Boxplot;
use plotters::prelude::*;
use std::path::Path;

const CHART_SIZE: (u32, u32) = (1000, 600);
const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);

/// Number of bins used for numeric histograms.
pub const HISTOGRAM_BINS: usize = 30;

/// One bar per label.
pub(crate) fn bar_chart(
    path: &Path,
    title: &str,
    labels: &[String],
    values: &[f64],
    y_desc: &str,
) -> Result<()> {
    if labels.is_empty() || labels.len() != values.len() {
        bail!("bar chart '{}' needs one value per label", title);
    }

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = values.iter().copied().fold(0.0_f64, f64::max).max(1.0) * 1.1;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, CAPTION_FONT)
        .margin(10)
        .x_label_area_size(80)
        .y_label_area_size(60)
        .build_cartesian_2d((0..labels.len() as i32).into_segmented(), 0f64..y_max)?;

    let label_of = |v: &SegmentValue<i32>| segment_label(v, labels);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&label_of)
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.mix(0.7).filled())
            .margin(5)
            .data(values.iter().enumerate().map(|(i, v)| (i as i32, *v))),
    )?;

    root.present()?;
    Ok(())
}

/// Equal-width histogram of `values` with `bins` bins.
pub(crate) fn histogram(path: &Path, title: &str, values: &[f64], bins: usize) -> Result<()> {
    if values.is_empty() || bins == 0 {
        bail!("histogram '{}' has no values", title);
    }

    let counts = bin_counts(values, bins);
    let (lo, hi) = value_range(values);
    let width = (hi - lo) / bins as f64;
    let y_max = counts.iter().copied().max().unwrap_or(0).max(1) as f64 * 1.1;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, CAPTION_FONT)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, 0f64..y_max)?;

    chart.configure_mesh().x_desc("value").y_desc("count").draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, count)| {
        let x0 = lo + i as f64 * width;
        Rectangle::new([(x0, 0.0), (x0 + width, *count as f64)], BLUE.mix(0.7).filled())
    }))?;

    root.present()?;
    Ok(())
}

/// One vertical box per named column.
pub(crate) fn boxplot(path: &Path, title: &str, columns: &[(String, Vec<f64>)]) -> Result<()> {
    let columns: Vec<&(String, Vec<f64>)> = columns.iter().filter(|(_, v)| !v.is_empty()).collect();
    if columns.is_empty() {
        bail!("boxplot '{}' has no values", title);
    }

    let all: Vec<f64> = columns.iter().flat_map(|(_, v)| v.iter().copied()).collect();
    let (lo, hi) = value_range(&all);
    let pad = (hi - lo) * 0.05;
    let labels: Vec<String> = columns.iter().map(|(name, _)| name.clone()).collect();

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, CAPTION_FONT)
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(
            (0..labels.len() as i32).into_segmented(),
            (lo - pad) as f32..(hi + pad) as f32,
        )?;

    let label_of = |v: &SegmentValue<i32>| segment_label(v, &labels);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&label_of)
        .draw()?;

    chart.draw_series(columns.iter().enumerate().map(|(i, (_, values))| {
        Boxplot::new_vertical(SegmentValue::CenterOf(i as i32), &Quartiles::new(values))
    }))?;

    root.present()?;
    Ok(())
}

fn segment_label(value: &SegmentValue<i32>, labels: &[String]) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

/// `(min, max)` of `values`, widened when all values are equal.
pub(crate) fn value_range(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) }
}

/// Counts per equal-width bin; the maximum falls in the last bin.
pub(crate) fn bin_counts(values: &[f64], bins: usize) -> Vec<u32> {
    let mut counts = vec![0u32; bins];
    if bins == 0 {
        return counts;
    }
    let (lo, hi) = value_range(values);
    let width = (hi - lo) / bins as f64;
    for v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}

/// File-name-safe form of a dataset or column name.
pub(crate) fn file_stem_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if cleaned.is_empty() { "_".to_string() } else { cleaned }
}
