//! Sweep-line construction of step functions from interval data.
//!
//! For every location the builder:
//! 1. Emits a +1 edge at each interval start and a -1 edge at each end
//! 2. Tracks metric samples at interval boundaries as rates of change
//! 3. Sorts and folds the edges into a [`StepFunction`]
//!
//! A location is committed to the profile only after its sweep completed.

use super::profile::UtilizationProfile;
use super::resample::Window;
use super::source::{Interval, IntervalRecord, IntervalSource};
use super::store::{EdgeEvent, Fold, Location, StepFunction};
use crate::utils::error::{SourceError, UtilizationError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;

/// What to do when two consecutive samples of a metric share a timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroWidthPolicy {
    /// Emit nothing for the sample but still remember it
    #[default]
    Skip,

    /// Fail the location with `MalformedSample`
    Error,
}

impl FromStr for ZeroWidthPolicy {
    type Err = UtilizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "error" | "strict" => Ok(Self::Error),
            other => Err(UtilizationError::InvalidArgument(format!(
                "unknown zero-width policy '{}'",
                other
            ))),
        }
    }
}

/// Builder configuration
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    pub zero_width: ZeroWidthPolicy,

    /// Overlap window; the source domain when unset
    pub window: Option<Window>,

    /// Restrict metric tracking to these names; all metrics when unset
    pub metrics: Option<BTreeSet<String>>,
}

impl BuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zero_width(mut self, policy: ZeroWidthPolicy) -> Self {
        self.zero_width = policy;
        self
    }

    pub fn with_window(mut self, window: Window) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics = Some(metrics.into_iter().map(Into::into).collect());
        self
    }

    fn tracks(&self, metric: &str) -> bool {
        self.metrics.as_ref().map_or(true, |set| set.contains(metric))
    }
}

/// Finished sweep of one location, not yet published
#[derive(Debug, Clone)]
pub struct LocationSweep {
    pub location: Location,
    pub intervals: StepFunction,
    pub metrics: BTreeMap<String, StepFunction>,
    pub interval_count: usize,
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    timestamp: i64,
    value: f64,
}

impl Sample {
    const ORIGIN: Sample = Sample {
        timestamp: 0,
        value: 0.0,
    };
}

/// Per-location metric state: last sample and emitted rate edges
struct MetricTracker<'a> {
    location: &'a Location,
    config: &'a BuildConfig,
    last: HashMap<String, Sample>,
    events: BTreeMap<String, Vec<EdgeEvent>>,
}

impl<'a> MetricTracker<'a> {
    fn new(location: &'a Location, config: &'a BuildConfig) -> Self {
        Self {
            location,
            config,
            last: HashMap::new(),
            events: BTreeMap::new(),
        }
    }

    fn observe_interval(&mut self, interval: &Interval, record: &IntervalRecord) -> Result<(), UtilizationError> {
        let enter = record.enter_timestamp(interval.begin);
        for (metric, value) in record.enter_samples() {
            self.observe(metric, enter, value)?;
        }

        let leave = record.leave_timestamp(interval.end);
        for (metric, value) in record.leave_samples() {
            self.observe(metric, leave, value)?;
        }

        Ok(())
    }

    fn observe(&mut self, metric: &str, timestamp: i64, value: f64) -> Result<(), UtilizationError> {
        if !self.config.tracks(metric) {
            return Ok(());
        }

        let last = self.last.get(metric).copied().unwrap_or(Sample::ORIGIN);
        let events = self.events.entry(metric.to_string()).or_default();

        if timestamp == last.timestamp {
            match self.config.zero_width {
                ZeroWidthPolicy::Skip => {
                    debug!(
                        "Skipping zero-width sample of {} on {} at {}",
                        metric, self.location, timestamp
                    );
                }
                ZeroWidthPolicy::Error => {
                    return Err(UtilizationError::MalformedSample {
                        metric: metric.to_string(),
                        location: self.location.to_string(),
                        timestamp,
                    });
                }
            }
        } else {
            let rate = (value - last.value) / (timestamp - last.timestamp) as f64;
            events.push(EdgeEvent::sample(timestamp, rate));
        }

        self.last.insert(metric.to_string(), Sample { timestamp, value });
        Ok(())
    }

    fn finish(self) -> BTreeMap<String, StepFunction> {
        self.events
            .into_iter()
            .map(|(metric, events)| (metric, StepFunction::from_events(events, Fold::None)))
            .collect()
    }
}

fn upstream(location: &Location, err: SourceError) -> UtilizationError {
    UtilizationError::UpstreamIteration {
        location: location.to_string(),
        reason: err.to_string(),
    }
}

/// Sweep one location without touching any shared state
///
/// Independent locations may be swept concurrently; the result is
/// published with [`UtilizationProfile::commit`].
///
/// # Errors
/// * `UtilizationError::UpstreamIteration` - the source failed or a data handle did not resolve
/// * `UtilizationError::MalformedSample` - zero-width sample gap under `ZeroWidthPolicy::Error`
pub fn sweep_location(
    source: &dyn IntervalSource,
    location: &Location,
    window: Window,
    config: &BuildConfig,
) -> Result<LocationSweep, UtilizationError> {
    let mut edges = Vec::new();
    let mut tracker = MetricTracker::new(location, config);
    let mut interval_count = 0;

    let intervals = source
        .iter_overlapping(location, window)
        .map_err(|e| upstream(location, e))?;

    for interval in intervals {
        let interval = interval.map_err(|e| upstream(location, e))?;

        edges.push(EdgeEvent::open(interval.begin));
        edges.push(EdgeEvent::close(interval.end));
        interval_count += 1;

        if let Some(handle) = interval.data.as_deref() {
            let record = source.record(handle).ok_or_else(|| {
                upstream(location, SourceError(format!("unresolved interval handle '{}'", handle)))
            })?;
            if record.has_metrics() {
                tracker.observe_interval(&interval, record)?;
            }
        }
    }

    debug!(
        "Swept location {}: {} intervals, {} edges",
        location,
        interval_count,
        edges.len()
    );

    Ok(LocationSweep {
        location: location.clone(),
        intervals: StepFunction::from_events(edges, Fold::Running),
        metrics: tracker.finish(),
        interval_count,
    })
}

/// Builds a [`UtilizationProfile`] from an interval source
#[derive(Debug, Clone, Default)]
pub struct SweepLineBuilder {
    config: BuildConfig,
}

impl SweepLineBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Sweep every location of `source`
    ///
    /// Returns the first error encountered; no partially built profile is
    /// ever returned.
    pub fn build(&self, source: &dyn IntervalSource) -> Result<UtilizationProfile, UtilizationError> {
        let domain = source.domain();
        let window = self.config.window.unwrap_or(domain);
        let locations = source.locations();

        info!(
            "Loading sparse utilization list: {} locations over {}",
            locations.len(),
            window
        );

        let mut profile = UtilizationProfile::new(domain, window);
        let mut total_intervals = 0;

        for location in &locations {
            let sweep = sweep_location(source, location, window, &self.config)?;
            total_intervals += sweep.interval_count;
            profile.commit(sweep)?;
        }

        info!(
            "Built {} interval step functions ({} intervals), {} metrics",
            profile.intervals().len(),
            total_intervals,
            profile.metric_names().count()
        );

        Ok(profile)
    }
}
