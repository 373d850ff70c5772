//! Metric series and summary statistics over histograms.
//!
//! Metric step functions hold rates rather than counts, so they are
//! reported per location (concatenated) instead of summed.

use crate::utilization::{UtilizationProfile, Window};
use crate::utils::error::UtilizationError;
use log::debug;
use std::collections::BTreeMap;

/// Calculate the concatenated cumulative series of every metric
///
/// **Public** - main entry point for metric reporting
///
/// # Arguments
/// * `profile` - Built utilization profile
/// * `bins` - Bins per location
/// * `window` - Time window to resample over
///
/// # Returns
/// Map from metric name to its series, `bins` values per location that
/// carried the metric
pub fn calculate_metric_utilization(
    profile: &UtilizationProfile,
    bins: usize,
    window: Window,
) -> Result<BTreeMap<String, Vec<f64>>, UtilizationError> {
    let mut series = BTreeMap::new();

    for name in profile.metric_names() {
        let values = profile.metric(name)?.concat_across_locations(bins, window)?;
        debug!("Metric {}: {} values", name, values.len());
        series.insert(name.to_string(), values);
    }

    Ok(series)
}

/// Calculate summary statistics of a histogram
///
/// **Public** - provides summary statistics
pub fn calculate_histogram_stats(histogram: &[f64]) -> HistogramStats {
    if histogram.is_empty() {
        return HistogramStats::default();
    }

    let (peak_bin, peak) = histogram
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, v)| if v > best.1 { (i, v) } else { best });

    let total: f64 = histogram.iter().sum();
    let idle_bins = histogram.iter().filter(|v| **v == 0.0).count();

    HistogramStats {
        bins: histogram.len(),
        peak,
        peak_bin,
        mean: total / histogram.len() as f64,
        total,
        idle_bins,
    }
}

/// Histogram summary statistics
///
/// **Public** - returned from calculate_histogram_stats
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramStats {
    /// Number of bins
    pub bins: usize,

    /// Largest bin value
    pub peak: f64,

    /// Index of the first bin holding `peak`
    pub peak_bin: usize,

    /// Mean bin value
    pub mean: f64,

    /// Sum of all bins
    pub total: f64,

    /// Bins with exactly zero value
    pub idle_bins: usize,
}

impl HistogramStats {
    /// Fraction of bins with any activity
    pub fn busy_fraction(&self) -> f64 {
        if self.bins == 0 {
            0.0
        } else {
            (self.bins - self.idle_bins) as f64 / self.bins as f64
        }
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Bins: {} | Peak: {:.3} (bin {}) | Mean: {:.3} | Busy: {:.1}%",
            self.bins,
            self.peak,
            self.peak_bin,
            self.mean,
            self.busy_fraction() * 100.0
        )
    }
}
