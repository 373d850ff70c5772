//! Per-label utilization result.
//!
//! Owns the interval step functions of every location and, for each metric
//! name, a second set of per-location rate step functions.

use super::resample::Window;
use super::store::SparseUtilizationList;
use super::sweep::LocationSweep;
use crate::utils::error::UtilizationError;
use log::debug;
use std::collections::BTreeMap;

/// Finalized sparse utilization data for one trace
#[derive(Debug, Clone)]
pub struct UtilizationProfile {
    domain: Window,
    window: Window,
    intervals: SparseUtilizationList,
    metrics: BTreeMap<String, SparseUtilizationList>,
}

impl UtilizationProfile {
    /// Empty profile for a source `domain`, swept over `window`
    pub fn new(domain: Window, window: Window) -> Self {
        Self {
            domain,
            window,
            intervals: SparseUtilizationList::new(),
            metrics: BTreeMap::new(),
        }
    }

    /// Publish a completed location sweep
    ///
    /// Checked up front so a rejected sweep leaves nothing behind.
    pub fn commit(&mut self, sweep: LocationSweep) -> Result<(), UtilizationError> {
        let conflict = self.intervals.contains(&sweep.location)
            || sweep.metrics.keys().any(|name| {
                self.metrics
                    .get(name)
                    .is_some_and(|list| list.contains(&sweep.location))
            });

        if conflict {
            return Err(UtilizationError::InvalidArgument(format!(
                "location '{}' was already built",
                sweep.location
            )));
        }

        debug!(
            "Committing location {} ({} edges, {} metrics)",
            sweep.location,
            sweep.intervals.len(),
            sweep.metrics.len()
        );

        for (name, step) in sweep.metrics {
            self.metrics
                .entry(name)
                .or_default()
                .insert(sweep.location.clone(), step)?;
        }
        self.intervals.insert(sweep.location, sweep.intervals)
    }

    /// Time domain reported by the interval source
    pub fn domain(&self) -> Window {
        self.domain
    }

    /// Window the intervals were gathered over
    pub fn window(&self) -> Window {
        self.window
    }

    pub fn intervals(&self) -> &SparseUtilizationList {
        &self.intervals
    }

    /// Rate step functions of one metric
    pub fn metric(&self, name: &str) -> Result<&SparseUtilizationList, UtilizationError> {
        self.metrics
            .get(name)
            .ok_or_else(|| UtilizationError::NotFound(format!("metric '{}'", name)))
    }

    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }
}
