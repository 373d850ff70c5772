//! Step-function storage keyed by sparse edge events.
//!
//! Each location owns a sequence of edge events that is appended to while
//! the sweep runs, then sealed exactly once into an immutable
//! [`StepFunction`]. Sealing sorts the events by timestamp and, for
//! interval lanes, folds the raw deltas into a running counter and its
//! time integral.

use crate::utils::error::UtilizationError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Identifier of one independent lane (CPU, thread, rank, ...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Location {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Location {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Raw edge event recorded during construction
///
/// `delta` is +1 on interval start and -1 on interval end. Metric samples
/// carry a zero delta and their rate in `value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeEvent {
    pub index: i64,
    pub delta: i64,
    pub value: f64,
}

impl EdgeEvent {
    /// Interval start edge
    pub fn open(index: i64) -> Self {
        Self {
            index,
            delta: 1,
            value: 0.0,
        }
    }

    /// Interval end edge
    pub fn close(index: i64) -> Self {
        Self {
            index,
            delta: -1,
            value: 0.0,
        }
    }

    /// Metric rate sample
    pub fn sample(index: i64, rate: f64) -> Self {
        Self {
            index,
            delta: 0,
            value: rate,
        }
    }
}

/// One finalized point of a step function
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepPoint {
    /// Timestamp of the edge
    pub index: i64,

    /// Running counter held from this edge until the next one
    pub counter: i64,

    /// Accumulated integral up to `index`
    pub util: f64,
}

impl StepPoint {
    /// State before the first edge of every step function
    pub const ZERO: StepPoint = StepPoint {
        index: 0,
        counter: 0,
        util: 0.0,
    };

    /// Value of the step function at `at`, holding this point's counter
    pub fn value_at(&self, at: i64) -> f64 {
        self.util + (at - self.index) as f64 * self.counter as f64
    }
}

/// How raw events turn into finalized points when a location is sealed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fold {
    /// Prefix-sum deltas into a running counter and integrate it over time
    Running,

    /// Keep each event's value as-is (metric rate series)
    None,
}

/// Immutable, sorted step function for one location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepFunction {
    points: Vec<StepPoint>,
}

impl StepFunction {
    /// Stable-sort `events` by timestamp and fold them into points
    pub fn from_events(mut events: Vec<EdgeEvent>, fold: Fold) -> Self {
        // sort_by_key is stable: equal timestamps keep insertion order
        events.sort_by_key(|e| e.index);

        let points = match fold {
            Fold::Running => fold_running(events),
            Fold::None => events
                .into_iter()
                .map(|e| StepPoint {
                    index: e.index,
                    counter: 0,
                    util: e.value,
                })
                .collect(),
        };

        Self { points }
    }

    pub fn points(&self) -> &[StepPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Evaluate at a single timestamp
    ///
    /// Uses the last point whose index is `<= at`, or the zero state when
    /// `at` precedes every edge.
    pub fn value_at(&self, at: i64) -> f64 {
        let held = match self.points.partition_point(|p| p.index <= at) {
            0 => StepPoint::ZERO,
            n => self.points[n - 1],
        };
        held.value_at(at)
    }
}

fn fold_running(events: Vec<EdgeEvent>) -> Vec<StepPoint> {
    let mut prev = StepPoint::ZERO;

    events
        .into_iter()
        .map(|event| {
            let elapsed = (event.index - prev.index) as f64;
            let point = StepPoint {
                index: event.index,
                counter: prev.counter + event.delta,
                util: prev.util + elapsed * prev.counter as f64,
            };
            prev = point;
            point
        })
        .collect()
}

/// Per-location step functions for one label or metric
///
/// Locations are created on first append. Once sealed, a location is
/// read-only; there is no deletion.
#[derive(Debug, Clone, Default)]
pub struct SparseUtilizationList {
    pending: HashMap<Location, Vec<EdgeEvent>>,
    sealed: BTreeMap<Location, StepFunction>,
}

impl SparseUtilizationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an edge event, creating the location on first use
    pub fn append(&mut self, location: &Location, event: EdgeEvent) -> Result<(), UtilizationError> {
        if self.sealed.contains_key(location) {
            return Err(UtilizationError::InvalidArgument(format!(
                "location '{}' is already sealed",
                location
            )));
        }

        self.pending.entry(location.clone()).or_default().push(event);
        Ok(())
    }

    /// Stable-sort a pending location by timestamp
    pub fn sort(&mut self, location: &Location) -> Result<(), UtilizationError> {
        let events = self
            .pending
            .get_mut(location)
            .ok_or_else(|| UtilizationError::NotFound(format!("pending location '{}'", location)))?;

        events.sort_by_key(|e| e.index);
        Ok(())
    }

    /// Sort, fold and freeze a pending location
    pub fn seal(&mut self, location: &Location, fold: Fold) -> Result<&StepFunction, UtilizationError> {
        let events = self
            .pending
            .remove(location)
            .ok_or_else(|| UtilizationError::NotFound(format!("pending location '{}'", location)))?;

        debug!("Sealing location {} with {} events", location, events.len());

        self.insert(location.clone(), StepFunction::from_events(events, fold))?;
        self.get(location)
    }

    /// Publish a step function built elsewhere
    pub fn insert(&mut self, location: Location, step: StepFunction) -> Result<(), UtilizationError> {
        if self.sealed.contains_key(&location) || self.pending.contains_key(&location) {
            return Err(UtilizationError::InvalidArgument(format!(
                "location '{}' already exists",
                location
            )));
        }

        self.sealed.insert(location, step);
        Ok(())
    }

    /// Finalized step function for a location
    pub fn get(&self, location: &Location) -> Result<&StepFunction, UtilizationError> {
        self.sealed
            .get(location)
            .ok_or_else(|| UtilizationError::NotFound(format!("location '{}'", location)))
    }

    pub fn contains(&self, location: &Location) -> bool {
        self.sealed.contains_key(location)
    }

    /// Sealed locations in ascending order
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.sealed.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Location, &StepFunction)> {
        self.sealed.iter()
    }

    pub fn len(&self) -> usize {
        self.sealed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sealed.is_empty()
    }

    /// Total number of finalized points across all locations
    pub fn event_count(&self) -> usize {
        self.sealed.values().map(StepFunction::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu(id: &str) -> Location {
        Location::new(id)
    }

    #[test]
    fn test_fold_running_counter_and_integral() {
        let events = vec![
            EdgeEvent::open(0),
            EdgeEvent::close(10),
            EdgeEvent::open(5),
            EdgeEvent::close(15),
        ];

        let step = StepFunction::from_events(events, Fold::Running);
        let counters: Vec<i64> = step.points().iter().map(|p| p.counter).collect();
        let utils: Vec<f64> = step.points().iter().map(|p| p.util).collect();

        assert_eq!(counters, vec![1, 2, 1, 0]);
        assert_eq!(utils, vec![0.0, 5.0, 15.0, 20.0]);
    }

    #[test]
    fn test_fold_none_keeps_values() {
        let events = vec![EdgeEvent::sample(10, 2.5), EdgeEvent::sample(4, 1.0)];
        let step = StepFunction::from_events(events, Fold::None);

        assert_eq!(step.points()[0].index, 4);
        assert_eq!(step.points()[0].util, 1.0);
        assert_eq!(step.points()[1].util, 2.5);
        assert!(step.points().iter().all(|p| p.counter == 0));
    }

    #[test]
    fn test_sort_is_stable_for_equal_indices() {
        // zero-width interval: open then close at the same timestamp
        let events = vec![EdgeEvent::open(7), EdgeEvent::close(7), EdgeEvent::open(3)];
        let step = StepFunction::from_events(events, Fold::Running);

        let counters: Vec<i64> = step.points().iter().map(|p| p.counter).collect();
        assert_eq!(counters, vec![1, 2, 1]);
        assert_eq!(step.len(), 3);
    }

    #[test]
    fn test_value_at_before_first_edge_is_zero() {
        let step = StepFunction::from_events(vec![EdgeEvent::open(10), EdgeEvent::close(20)], Fold::Running);

        assert_eq!(step.value_at(5), 0.0);
        assert_eq!(step.value_at(15), 5.0);
        assert_eq!(step.value_at(25), 10.0);
    }

    #[test]
    fn test_append_creates_location_on_first_use() {
        let mut list = SparseUtilizationList::new();
        list.append(&cpu("0"), EdgeEvent::open(1)).unwrap();
        list.append(&cpu("0"), EdgeEvent::close(4)).unwrap();

        assert!(list.get(&cpu("0")).is_err());
        list.seal(&cpu("0"), Fold::Running).unwrap();

        assert_eq!(list.get(&cpu("0")).unwrap().len(), 2);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_append_after_seal_is_rejected() {
        let mut list = SparseUtilizationList::new();
        list.append(&cpu("0"), EdgeEvent::open(1)).unwrap();
        list.seal(&cpu("0"), Fold::Running).unwrap();

        let err = list.append(&cpu("0"), EdgeEvent::close(2)).unwrap_err();
        assert!(matches!(err, UtilizationError::InvalidArgument(_)));
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut list = SparseUtilizationList::new();
        list.append(&cpu("1"), EdgeEvent::close(9)).unwrap();
        list.append(&cpu("1"), EdgeEvent::open(2)).unwrap();

        list.sort(&cpu("1")).unwrap();
        list.sort(&cpu("1")).unwrap();
        let step = list.seal(&cpu("1"), Fold::Running).unwrap();

        assert_eq!(step.points()[0].index, 2);
        assert_eq!(step.points()[1].counter, 0);
    }

    #[test]
    fn test_unknown_location_is_not_found() {
        let list = SparseUtilizationList::new();
        assert!(matches!(
            list.get(&cpu("missing")),
            Err(UtilizationError::NotFound(_))
        ));
    }
}
