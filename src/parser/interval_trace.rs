//! Interval trace parser and in-memory interval source.
//!
//! Parses raw JSON interval documents into an [`IntervalTrace`], which
//! answers overlap queries per location for the sweep-line builder.

use super::schema::TraceMeta;
use crate::utilization::{IntervalIter, IntervalRecord, IntervalSource, Interval, Location, Window};
use crate::utils::config::{LOCATION_FIELD_NAMES, RECORD_FIELD_NAMES};
use crate::utils::error::{ParseError, SourceError};
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Parsed interval trace
///
/// Intervals are kept sorted by `begin` per location so overlap queries
/// can stop at the window end.
#[derive(Debug, Clone)]
pub struct IntervalTrace {
    label: Option<String>,
    domain: Window,
    locations: BTreeMap<Location, Vec<Interval>>,
    records: HashMap<String, IntervalRecord>,
}

impl IntervalTrace {
    /// Empty trace over `domain`
    pub fn new(domain: Window) -> Self {
        Self {
            label: None,
            domain,
            locations: BTreeMap::new(),
            records: HashMap::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Register a location that may have no intervals
    pub fn add_location(&mut self, location: Location) {
        self.locations.entry(location).or_default();
    }

    /// Add an interval, keeping the location sorted by `begin`
    pub fn add_interval(&mut self, location: Location, interval: Interval) -> Result<(), ParseError> {
        if interval.end < interval.begin {
            return Err(ParseError::InvalidFormat(format!(
                "interval on location '{}' ends ({}) before it begins ({})",
                location, interval.end, interval.begin
            )));
        }

        let intervals = self.locations.entry(location).or_default();
        let pos = intervals.partition_point(|iv| iv.begin <= interval.begin);
        intervals.insert(pos, interval);
        Ok(())
    }

    pub fn add_record(&mut self, handle: impl Into<String>, record: IntervalRecord) {
        self.records.insert(handle.into(), record);
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn interval_count(&self) -> usize {
        self.locations.values().map(Vec::len).sum()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

impl IntervalSource for IntervalTrace {
    fn domain(&self) -> Window {
        self.domain
    }

    fn locations(&self) -> Vec<Location> {
        self.locations.keys().cloned().collect()
    }

    fn iter_overlapping<'a>(
        &'a self,
        location: &Location,
        window: Window,
    ) -> Result<IntervalIter<'a>, SourceError> {
        let intervals = self
            .locations
            .get(location)
            .ok_or_else(|| SourceError(format!("unknown location '{}'", location)))?;

        // Nothing starting at or after the window end can overlap it
        let upper = intervals.partition_point(|iv| iv.begin < window.end());

        Ok(Box::new(
            intervals[..upper]
                .iter()
                .filter(move |iv| iv.overlaps(&window))
                .cloned()
                .map(Ok),
        ))
    }

    fn record(&self, handle: &str) -> Option<&IntervalRecord> {
        self.records.get(handle)
    }
}

/// Load and parse an interval trace file
///
/// **Public** - entry point for the CLI
///
/// # Errors
/// * `ParseError::IoError` - File cannot be read
/// * `ParseError::JsonError` - Invalid JSON
/// * `ParseError::InvalidFormat` - Missing or inconsistent fields
pub fn load_trace(path: impl AsRef<Path>) -> Result<IntervalTrace, ParseError> {
    let path = path.as_ref();
    debug!("Reading interval trace from: {}", path.display());

    let contents = std::fs::read_to_string(path)?;
    let raw: serde_json::Value = serde_json::from_str(&contents)?;

    parse_trace(&raw)
}

/// Parse a raw interval trace document
///
/// **Public** - main entry point for parsing
///
/// # Arguments
/// * `raw` - JSON document with `meta`, `locations` and `intervals`
///
/// # Returns
/// Interval trace ready to be swept
///
/// # Errors
/// * `ParseError::JsonError` - A field has the wrong shape
/// * `ParseError::InvalidFormat` - Missing location table, inverted interval or domain
pub fn parse_trace(raw: &serde_json::Value) -> Result<IntervalTrace, ParseError> {
    let doc = raw.as_object().ok_or_else(|| {
        ParseError::InvalidFormat("Trace must be a JSON object".to_string())
    })?;

    let meta: TraceMeta = match doc.get("meta") {
        Some(value) => serde_json::from_value(value.clone())?,
        None => TraceMeta::default(),
    };

    let location_table = extract_location_table(doc)?;
    let mut locations = Vec::with_capacity(location_table.len());
    for (id, value) in location_table {
        locations.push((Location::new(id.as_str()), parse_intervals(id, value)?));
    }

    let records = extract_records(doc)?;

    let domain = match meta.interval_domain {
        Some([begin, end]) => Window::new(begin, end)
            .map_err(|e| ParseError::InvalidFormat(format!("intervalDomain: {}", e)))?,
        None => {
            warn!("No intervalDomain in trace meta, deriving it from intervals");
            derive_domain(&locations)?
        }
    };

    let mut trace = IntervalTrace::new(domain);
    trace.label = meta.label;

    for (location, intervals) in locations {
        trace.add_location(location.clone());
        for interval in intervals {
            trace.add_interval(location.clone(), interval)?;
        }
    }

    for (handle, record) in records {
        trace.add_record(handle, record);
    }

    info!(
        "Parsed trace: {} locations, {} intervals, {} records, domain {}",
        trace.locations.len(),
        trace.interval_count(),
        trace.record_count(),
        trace.domain
    );

    Ok(trace)
}

/// Find the location table under any accepted field name
///
/// **Private** - internal extraction logic
fn extract_location_table(
    doc: &serde_json::Map<String, serde_json::Value>,
) -> Result<&serde_json::Map<String, serde_json::Value>, ParseError> {
    for field in LOCATION_FIELD_NAMES {
        let Some(value) = doc.get(*field) else {
            continue;
        };

        // {"intervalIndexes": {"locations": {...}}}
        let table = value
            .get("locations")
            .filter(|nested| nested.is_object())
            .unwrap_or(value);

        if let Some(table) = table.as_object() {
            return Ok(table);
        }
    }

    Err(ParseError::InvalidFormat(format!(
        "No location table found (expected one of: {})",
        LOCATION_FIELD_NAMES.join(", ")
    )))
}

/// Parse the interval list of one location
///
/// **Private** - internal parsing logic
fn parse_intervals(location: &str, value: &serde_json::Value) -> Result<Vec<Interval>, ParseError> {
    let entries = value.as_array().ok_or_else(|| {
        ParseError::InvalidFormat(format!("Intervals of location '{}' must be an array", location))
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let mut entry = entry.clone();

            // Numeric handles are common; records are keyed by string
            if let Some(data) = entry.get_mut("data") {
                if data.is_number() {
                    *data = serde_json::Value::String(data.to_string());
                }
            }

            serde_json::from_value::<Interval>(entry).map_err(|e| {
                ParseError::InvalidFormat(format!(
                    "Interval {} of location '{}': {}",
                    index, location, e
                ))
            })
        })
        .collect()
}

/// Extract the interval record table, if any
///
/// **Private** - internal extraction logic
fn extract_records(
    doc: &serde_json::Map<String, serde_json::Value>,
) -> Result<Vec<(String, IntervalRecord)>, ParseError> {
    let Some(table) = RECORD_FIELD_NAMES.iter().find_map(|field| doc.get(*field)) else {
        debug!("Trace has no interval records");
        return Ok(Vec::new());
    };

    let table = table.as_object().ok_or_else(|| {
        ParseError::InvalidFormat("Interval records must be a JSON object".to_string())
    })?;

    table
        .iter()
        .map(|(handle, value)| {
            let record = serde_json::from_value::<IntervalRecord>(value.clone()).map_err(|e| {
                ParseError::InvalidFormat(format!("Interval record '{}': {}", handle, e))
            })?;
            Ok((handle.clone(), record))
        })
        .collect()
}

/// Smallest window covering every interval
///
/// **Private** - fallback when the trace carries no domain
fn derive_domain(locations: &[(Location, Vec<Interval>)]) -> Result<Window, ParseError> {
    let bounds = locations
        .iter()
        .flat_map(|(_, intervals)| intervals.iter())
        .fold(None, |acc: Option<(i64, i64)>, iv| match acc {
            None => Some((iv.begin, iv.end)),
            Some((lo, hi)) => Some((lo.min(iv.begin), hi.max(iv.end))),
        });

    let (begin, end) = bounds.ok_or_else(|| {
        ParseError::InvalidFormat("Cannot derive a domain from a trace without intervals".to_string())
    })?;

    Window::new(begin, end)
        .map_err(|e| ParseError::InvalidFormat(format!("derived domain: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_minimal_trace() {
        let raw = json!({
            "meta": {"intervalDomain": [0, 100]},
            "locations": {
                "cpu0": [{"begin": 10, "end": 20}],
                "cpu1": []
            }
        });

        let trace = parse_trace(&raw).unwrap();
        assert_eq!(trace.domain(), Window::new(0, 100).unwrap());
        assert_eq!(trace.locations().len(), 2);
        assert_eq!(trace.interval_count(), 1);
    }

    #[test]
    fn test_parse_nested_interval_indexes() {
        let raw = json!({
            "meta": {"intervalDomain": [0, 10]},
            "intervalIndexes": {"locations": {"7": [{"begin": 0, "end": 5, "data": 3}]}},
            "intervals": {"3": {"metrics": {"PAPI_TOT_INS": 12.0}}}
        });

        let trace = parse_trace(&raw).unwrap();
        let location = Location::new("7");
        let window = trace.domain();
        let intervals: Vec<Interval> = trace
            .iter_overlapping(&location, window)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(intervals[0].data.as_deref(), Some("3"));
        assert!(trace.record("3").is_some());
    }

    #[test]
    fn test_missing_location_table() {
        let raw = json!({"meta": {"intervalDomain": [0, 10]}});
        assert!(matches!(parse_trace(&raw), Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_inverted_interval_rejected() {
        let raw = json!({
            "meta": {"intervalDomain": [0, 10]},
            "locations": {"0": [{"begin": 8, "end": 2}]}
        });
        assert!(matches!(parse_trace(&raw), Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_domain_derived_from_intervals() {
        let raw = json!({
            "locations": {"0": [{"begin": 5, "end": 9}], "1": [{"start": 2, "stop": 7}]}
        });

        let trace = parse_trace(&raw).unwrap();
        assert_eq!(trace.domain(), Window::new(2, 9).unwrap());
    }

    #[test]
    fn test_overlap_query_respects_window() {
        let mut trace = IntervalTrace::new(Window::new(0, 100).unwrap());
        let location = Location::new("0");
        for (begin, end) in [(0, 5), (5, 10), (20, 30), (40, 40), (60, 70)] {
            trace.add_interval(location.clone(), Interval::new(begin, end)).unwrap();
        }

        let window = Window::new(5, 40).unwrap();
        let begins: Vec<i64> = trace
            .iter_overlapping(&location, window)
            .unwrap()
            .map(|iv| iv.unwrap().begin)
            .collect();

        // [0,5) ends at the window start; the point at 40 sits on the open end
        assert_eq!(begins, vec![5, 20]);
    }

    #[test]
    fn test_unknown_location_is_source_error() {
        let trace = IntervalTrace::new(Window::new(0, 1).unwrap());
        assert!(trace
            .iter_overlapping(&Location::new("x"), Window::new(0, 1).unwrap())
            .is_err());
    }
}
