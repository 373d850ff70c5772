//! Input document schema for interval traces.
//!
//! An interval trace is a JSON object with:
//! - `meta.intervalDomain`: `[begin, end]` of the recorded data
//! - `locations`: location id -> list of `{begin, end, data}` intervals
//! - `intervals`: data handle -> interval record (enter/leave boundaries, metrics)

use serde::{Deserialize, Serialize};

/// Trace-level metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceMeta {
    /// `[begin, end]` of the recorded data
    #[serde(default, rename = "intervalDomain", alias = "interval_domain")]
    pub interval_domain: Option<[i64; 2]>,

    /// Human-readable name of the trace
    #[serde(default)]
    pub label: Option<String>,
}
