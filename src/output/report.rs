//! Output report schema.
//!
//! This module defines the structure of the JSON reports we write to disk.
//! Schema is versioned to allow future evolution.

use crate::aggregator::{calculate_metric_utilization, LocationHistogram};
use crate::utilization::{BinMode, UtilizationProfile, Window};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::UtilizationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Label of the trace that was analyzed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Number of bins per histogram
    pub bins: usize,

    /// Mode of `aggregate` and `locations`
    pub mode: BinMode,

    /// Resampled window start
    pub begin: i64,

    /// Resampled window end
    pub end: i64,

    /// Sum across all locations
    pub aggregate: Vec<f64>,

    /// One histogram per location (Gantt rows)
    pub locations: Vec<LocationHistogram>,

    /// Concatenated cumulative series per metric
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, Vec<f64>>,

    /// Timestamp when report was generated
    pub generated_at: String,
}

impl UtilizationReport {
    /// Resample a profile into a report
    ///
    /// Either every histogram is computed or an error is returned.
    pub fn from_profile(
        profile: &UtilizationProfile,
        label: Option<String>,
        bins: usize,
        window: Window,
        mode: BinMode,
    ) -> Result<Self, UtilizationError> {
        use chrono::Utc;

        let intervals = profile.intervals();
        let aggregate = intervals.utilization_histogram(bins, window, mode)?;

        let locations = match mode {
            BinMode::Rate => intervals.per_location_breakdown(bins, window)?,
            BinMode::Cumulative => intervals
                .locations()
                .map(|location| {
                    Ok(LocationHistogram {
                        location: location.clone(),
                        histogram: intervals.calc_utilization_for_location(bins, window, location, mode)?,
                    })
                })
                .collect::<Result<_, UtilizationError>>()?,
        };

        Ok(Self {
            version: SCHEMA_VERSION.to_string(),
            label,
            bins,
            mode,
            begin: window.begin(),
            end: window.end(),
            aggregate,
            locations,
            metrics: calculate_metric_utilization(profile, bins, window)?,
            generated_at: Utc::now().to_rfc3339(),
        })
    }

    /// Check internal consistency of a report read back from disk
    pub fn validate(&self) -> Result<(), UtilizationError> {
        if self.bins == 0 {
            return Err(UtilizationError::InvalidArgument("report has zero bins".to_string()));
        }
        Window::new(self.begin, self.end)?;

        if self.aggregate.len() != self.bins {
            return Err(UtilizationError::InvalidArgument(format!(
                "aggregate has {} values, expected {}",
                self.aggregate.len(),
                self.bins
            )));
        }

        if let Some(row) = self.locations.iter().find(|row| row.histogram.len() != self.bins) {
            return Err(UtilizationError::InvalidArgument(format!(
                "location '{}' has {} values, expected {}",
                row.location,
                row.histogram.len(),
                self.bins
            )));
        }

        if let Some((name, _)) = self.metrics.iter().find(|(_, series)| series.len() % self.bins != 0) {
            return Err(UtilizationError::InvalidArgument(format!(
                "metric '{}' is not a whole number of {}-bin rows",
                name, self.bins
            )));
        }

        Ok(())
    }
}
