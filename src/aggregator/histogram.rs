//! Cross-location combination of per-location histograms.
//!
//! Three shapes are offered:
//! - Elementwise sum (one aggregate row)
//! - Concatenation (metric series listed location after location)
//! - Breakdown (one row per location, for Gantt rendering)

use crate::utilization::{BinMode, Location, SparseUtilizationList, Window};
use crate::utils::error::UtilizationError;
use log::debug;
use serde::{Deserialize, Serialize};

/// Histogram of one location
///
/// **Public** - one Gantt row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationHistogram {
    pub location: Location,
    pub histogram: Vec<f64>,
}

impl SparseUtilizationList {
    /// Sum the per-location histograms elementwise
    ///
    /// An empty list sums to `bins` zeros.
    pub fn utilization_histogram(
        &self,
        bins: usize,
        window: Window,
        mode: BinMode,
    ) -> Result<Vec<f64>, UtilizationError> {
        if bins == 0 {
            return Err(UtilizationError::InvalidArgument(
                "bin count must be at least 1".to_string(),
            ));
        }

        let mut total = vec![0.0; bins];

        for location in self.locations() {
            let histogram = self.calc_utilization_for_location(bins, window, location, mode)?;
            for (sum, value) in total.iter_mut().zip(histogram) {
                *sum += value;
            }
        }

        debug!(
            "Summed {} locations into {} {} bins",
            self.len(),
            bins,
            mode
        );

        Ok(total)
    }

    /// Rate-mode sum across all locations
    pub fn sum_across_locations(&self, bins: usize, window: Window) -> Result<Vec<f64>, UtilizationError> {
        self.utilization_histogram(bins, window, BinMode::Rate)
    }

    /// Cumulative-mode histograms laid end to end in location order
    pub fn concat_across_locations(&self, bins: usize, window: Window) -> Result<Vec<f64>, UtilizationError> {
        let mut series = Vec::with_capacity(bins * self.len());

        for location in self.locations() {
            series.extend(self.calc_utilization_for_location(
                bins,
                window,
                location,
                BinMode::Cumulative,
            )?);
        }

        Ok(series)
    }

    /// Rate-mode histogram for each location, uncombined
    pub fn per_location_breakdown(
        &self,
        bins: usize,
        window: Window,
    ) -> Result<Vec<LocationHistogram>, UtilizationError> {
        self.locations()
            .map(|location| {
                Ok(LocationHistogram {
                    location: location.clone(),
                    histogram: self.calc_utilization_for_location(bins, window, location, BinMode::Rate)?,
                })
            })
            .collect()
    }
}
