//! Plain-text utilization summary for the terminal.

use super::report::UtilizationReport;
use crate::aggregator::calculate_histogram_stats;
use colored::*;

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render a report as one sparkline row per location plus the aggregate
///
/// Rows are compressed to at most `width` columns by averaging adjacent bins.
pub fn render_text_summary(report: &UtilizationReport, width: usize) -> String {
    let mut out = String::new();

    out.push_str(&"Utilization Summary".bold().to_string());
    out.push('\n');
    out.push_str(&format!(
        "Window: [{}, {})  Bins: {}  Mode: {}\n",
        report.begin, report.end, report.bins, report.mode
    ));
    if let Some(label) = &report.label {
        out.push_str(&format!("Label: {}\n", label));
    }
    out.push('\n');

    let peak = report
        .locations
        .iter()
        .flat_map(|row| row.histogram.iter())
        .fold(0.0_f64, |acc, v| acc.max(*v));

    let name_width = report
        .locations
        .iter()
        .map(|row| row.location.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max("total".len());

    for row in &report.locations {
        out.push_str(&format!(
            "{:>w$} {}\n",
            row.location.as_str(),
            sparkline(&row.histogram, width, peak).cyan(),
            w = name_width
        ));
    }

    let stats = calculate_histogram_stats(&report.aggregate);
    out.push_str(&format!(
        "{:>w$} {}\n",
        "total".bold(),
        sparkline(&report.aggregate, width, stats.peak).green(),
        w = name_width
    ));
    out.push('\n');
    out.push_str(&stats.summary());
    out.push('\n');

    for (name, series) in &report.metrics {
        let metric_stats = calculate_histogram_stats(series);
        out.push_str(&format!("{} {}\n", name.yellow(), metric_stats.summary()));
    }

    out
}

/// Compress `values` to at most `width` columns and map them onto block glyphs
fn sparkline(values: &[f64], width: usize, peak: f64) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let chunk = values.len().div_ceil(width);

    values
        .chunks(chunk)
        .map(|c| {
            let mean = c.iter().sum::<f64>() / c.len() as f64;
            if peak <= 0.0 || mean <= 0.0 {
                ' '
            } else {
                let level = ((mean / peak) * (SPARK.len() - 1) as f64).round() as usize;
                SPARK[level.min(SPARK.len() - 1)]
            }
        })
        .collect()
}
