//! Critical-point resampling of step functions onto a fixed bin grid.
//!
//! `bins + 1` evenly spaced critical points are laid over the window; the
//! step function is evaluated at each one in a single merge pass, and
//! consecutive values become either per-bin average rates or cumulative
//! samples.

use super::store::{Location, SparseUtilizationList, StepFunction, StepPoint};
use crate::utils::error::UtilizationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Validated half-open time window `[begin, end)` with `end > begin`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    begin: i64,
    end: i64,
}

impl Window {
    pub fn new(begin: i64, end: i64) -> Result<Self, UtilizationError> {
        if end <= begin {
            return Err(UtilizationError::InvalidArgument(format!(
                "window end ({}) must be greater than begin ({})",
                end, begin
            )));
        }
        if end.checked_sub(begin).is_none() {
            return Err(UtilizationError::InvalidArgument(format!(
                "window [{}, {}) is too wide",
                begin, end
            )));
        }
        Ok(Self { begin, end })
    }

    /// Build from optional bounds; a missing bound is an error
    pub fn from_bounds(begin: Option<i64>, end: Option<i64>) -> Result<Self, UtilizationError> {
        match (begin, end) {
            (Some(begin), Some(end)) => Self::new(begin, end),
            _ => Err(UtilizationError::InvalidArgument(
                "window requires both begin and end".to_string(),
            )),
        }
    }

    pub fn begin(&self) -> i64 {
        self.begin
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn span(&self) -> i64 {
        self.end - self.begin
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

/// Output flavour of a histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinMode {
    /// Average rate between consecutive critical points
    #[default]
    Rate,

    /// Held cumulative value at each non-initial critical point
    Cumulative,
}

impl FromStr for BinMode {
    type Err = UtilizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rate" | "interval" => Ok(Self::Rate),
            "cumulative" | "raw" => Ok(Self::Cumulative),
            other => Err(UtilizationError::InvalidArgument(format!(
                "unknown bin mode '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for BinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rate => f.write_str("rate"),
            Self::Cumulative => f.write_str("cumulative"),
        }
    }
}

/// Position on the bin grid: an integer timestamp plus a fraction of one unit
///
/// Timestamps stay in integer space so epoch-scale nanosecond values keep
/// full precision; only the sub-unit remainder of `span / bins` is a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalPoint {
    /// Whole timestamp at or before the point
    pub index: i64,

    /// Fraction of a unit past `index`, in `[0, 1)`
    pub offset: f64,
}

impl CriticalPoint {
    /// Signed width from `self` to `later`
    pub fn distance_to(&self, later: &CriticalPoint) -> f64 {
        (later.index - self.index) as f64 + (later.offset - self.offset)
    }
}

/// `bins + 1` evenly spaced points over `[begin, end]`, the last exactly `end`
pub fn critical_points(window: Window, bins: usize) -> Result<Vec<CriticalPoint>, UtilizationError> {
    if bins == 0 {
        return Err(UtilizationError::InvalidArgument(
            "bin count must be at least 1".to_string(),
        ));
    }

    let span = window.span() as i128;
    let divisor = bins as i128;

    let mut points = Vec::with_capacity(bins + 1);
    points.extend((0..bins).map(|i| {
        let scaled = i as i128 * span;
        CriticalPoint {
            // quotient <= span, so it fits back into i64
            index: window.begin() + (scaled / divisor) as i64,
            offset: (scaled % divisor) as f64 / bins as f64,
        }
    }));
    points.push(CriticalPoint {
        index: window.end(),
        offset: 0.0,
    });

    Ok(points)
}

/// Resample one step function into exactly `bins` values
///
/// # Errors
/// * `UtilizationError::InvalidArgument` - `bins` is zero
pub fn resample(
    step: &StepFunction,
    bins: usize,
    window: Window,
    mode: BinMode,
) -> Result<Vec<f64>, UtilizationError> {
    let critical = critical_points(window, bins)?;
    let values = held_values(step.points(), &critical);

    let histogram = critical
        .windows(2)
        .zip(values.windows(2))
        .map(|(c, v)| match mode {
            // width is span / bins > 0 even when several points share an index
            BinMode::Rate => (v[1] - v[0]) / c[0].distance_to(&c[1]),
            BinMode::Cumulative => v[1],
        })
        .collect();

    Ok(histogram)
}

/// Value of the step function at every critical point
///
/// Both sequences are ascending, so one cursor walks the points once.
fn held_values(points: &[StepPoint], critical: &[CriticalPoint]) -> Vec<f64> {
    let mut cursor = 0;
    let mut held = StepPoint::ZERO;

    critical
        .iter()
        .map(|at| {
            // the next edge sits on a whole timestamp, never inside the offset
            while cursor < points.len() && points[cursor].index <= at.index {
                held = points[cursor];
                cursor += 1;
            }
            held.value_at(at.index) + at.offset * held.counter as f64
        })
        .collect()
}

impl SparseUtilizationList {
    /// Histogram for one location
    ///
    /// # Errors
    /// * `UtilizationError::NotFound` - location was never built
    /// * `UtilizationError::InvalidArgument` - `bins` is zero
    pub fn calc_utilization_for_location(
        &self,
        bins: usize,
        window: Window,
        location: &Location,
        mode: BinMode,
    ) -> Result<Vec<f64>, UtilizationError> {
        resample(self.get(location)?, bins, window, mode)
    }
}
