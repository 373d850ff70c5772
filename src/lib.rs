//! Sparse Util Studio
//!
//! Time-varying utilization histograms for Gantt-style charts, computed
//! from sparse interval traces without materializing dense timelines.
//!
//! This crate provides the core implementation for the
//! `sparse-util` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! sparse-util analyze --input trace.json --bins 200 --summary
//! ```
//!
//! As a library:
//!
//! ```ignore
//! let trace = parse_trace(&raw)?;
//! let profile = SweepLineBuilder::new(BuildConfig::new()).build(&trace)?;
//! let rows = profile.intervals().per_location_breakdown(100, trace.domain())?;
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utilization;
pub mod utils;
