//! Aggregation of per-location histograms.
//!
//! This module combines resampled step functions into:
//! - A cross-location sum (aggregate utilization)
//! - Per-location rows (Gantt breakdown)
//! - Concatenated metric series
//! - Summary statistics

pub mod histogram;
pub mod metrics;

// Re-export main types and functions
pub use histogram::LocationHistogram;
pub use metrics::{calculate_histogram_stats, calculate_metric_utilization, HistogramStats};
