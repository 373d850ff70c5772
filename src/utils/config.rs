//! Configuration and constants for the CLI.

/// Default number of histogram bins
pub const DEFAULT_BINS: usize = 100;

/// Upper bound on bins accepted from the command line
pub const MAX_BINS: usize = 1_000_000;

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Field names for the location table (different exporters use different names)
pub const LOCATION_FIELD_NAMES: &[&str] = &["locations", "intervalIndexes", "interval_indexes"];

// Field names for the interval record table
pub const RECORD_FIELD_NAMES: &[&str] = &["intervals", "records"];
