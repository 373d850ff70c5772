//! Sparse utilization step functions.
//!
//! This module turns interval data into:
//! - Per-location step functions of concurrent activity
//! - Per-location, per-metric rate series
//! - Fixed-bin histograms resampled from either of the above

pub mod profile;
pub mod resample;
pub mod source;
pub mod store;
pub mod sweep;

// Re-export main types and functions
pub use profile::UtilizationProfile;
pub use resample::{critical_points, resample, BinMode, CriticalPoint, Window};
pub use source::{Boundary, Interval, IntervalIter, IntervalRecord, IntervalSource};
pub use store::{EdgeEvent, Fold, Location, SparseUtilizationList, StepFunction, StepPoint};
pub use sweep::{sweep_location, BuildConfig, LocationSweep, SweepLineBuilder, ZeroWidthPolicy};
