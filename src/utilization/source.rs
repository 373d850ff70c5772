//! Interval source contract consumed by the sweep-line builder.
//!
//! The interval database and its overlap index live outside this crate.
//! Anything that can list locations, iterate the intervals overlapping a
//! window, and resolve an interval's data handle can feed the builder.

use super::resample::Window;
use super::store::Location;
use crate::utils::error::SourceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A half-open interval `[begin, end)` on one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    #[serde(alias = "start")]
    pub begin: i64,

    #[serde(alias = "stop")]
    pub end: i64,

    /// Opaque handle resolvable through [`IntervalSource::record`]
    #[serde(default)]
    pub data: Option<String>,
}

impl Interval {
    pub fn new(begin: i64, end: i64) -> Self {
        Self {
            begin,
            end,
            data: None,
        }
    }

    pub fn with_data(mut self, handle: impl Into<String>) -> Self {
        self.data = Some(handle.into());
        self
    }

    /// Whether this interval intersects `window`
    ///
    /// Zero-width intervals count when they sit inside the window.
    pub fn overlaps(&self, window: &Window) -> bool {
        if self.begin == self.end {
            return window.begin() <= self.begin && self.begin < window.end();
        }
        self.begin < window.end() && self.end > window.begin()
    }
}

/// Entry or exit boundary of an interval record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    #[serde(default, rename = "Timestamp", alias = "timestamp")]
    pub timestamp: Option<i64>,

    /// Samples taken at this boundary only
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, f64>,
}

/// Payload attached to an interval
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    #[serde(default)]
    pub enter: Option<Boundary>,

    #[serde(default)]
    pub leave: Option<Boundary>,

    /// Samples applying to both boundaries
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, f64>,
}

impl IntervalRecord {
    pub fn enter_timestamp(&self, fallback: i64) -> i64 {
        self.enter.as_ref().and_then(|b| b.timestamp).unwrap_or(fallback)
    }

    pub fn leave_timestamp(&self, fallback: i64) -> i64 {
        self.leave.as_ref().and_then(|b| b.timestamp).unwrap_or(fallback)
    }

    pub fn enter_samples(&self) -> BTreeMap<&str, f64> {
        self.boundary_samples(self.enter.as_ref())
    }

    pub fn leave_samples(&self) -> BTreeMap<&str, f64> {
        self.boundary_samples(self.leave.as_ref())
    }

    fn boundary_samples<'a>(&'a self, boundary: Option<&'a Boundary>) -> BTreeMap<&'a str, f64> {
        let mut samples: BTreeMap<&str, f64> =
            self.metrics.iter().map(|(k, v)| (k.as_str(), *v)).collect();

        if let Some(boundary) = boundary {
            for (k, v) in &boundary.metrics {
                samples.insert(k.as_str(), *v);
            }
        }

        samples
    }

    pub fn has_metrics(&self) -> bool {
        !self.metrics.is_empty()
            || self.enter.as_ref().is_some_and(|b| !b.metrics.is_empty())
            || self.leave.as_ref().is_some_and(|b| !b.metrics.is_empty())
    }
}

/// Lazy stream of intervals; each item may fail independently
pub type IntervalIter<'a> = Box<dyn Iterator<Item = Result<Interval, SourceError>> + 'a>;

/// Interval database capability
pub trait IntervalSource {
    /// Full time domain covered by the data
    fn domain(&self) -> Window;

    /// Every location known to the source
    fn locations(&self) -> Vec<Location>;

    /// Intervals on `location` overlapping `window`
    fn iter_overlapping<'a>(
        &'a self,
        location: &Location,
        window: Window,
    ) -> Result<IntervalIter<'a>, SourceError>;

    /// Resolve an interval's data handle
    fn record(&self, handle: &str) -> Option<&IntervalRecord>;
}
