//! Interval trace parsing and schema definitions.
//!
//! This module handles:
//! - Parsing interval trace JSON documents
//! - Validating interval bounds and domains
//! - Serving parsed intervals through the `IntervalSource` trait

pub mod interval_trace;
pub mod schema;

// Re-export main types
pub use interval_trace::{load_trace, parse_trace, IntervalTrace};
pub use schema::TraceMeta;
