use sparse_util_studio::aggregator::{calculate_histogram_stats, calculate_metric_utilization};
use sparse_util_studio::parser::{parse_trace, IntervalTrace};
use sparse_util_studio::utilization::{BinMode, IntervalSource, SweepLineBuilder, Window};
use serde_json::json;

fn profile_fixture() -> IntervalTrace {
    let raw = json!({
        "meta": {"intervalDomain": [0, 40]},
        "locations": {
            "rank0": [{"begin": 0, "end": 20, "data": 1}, {"begin": 20, "end": 40, "data": 2}],
            "rank1": [{"begin": 10, "end": 30, "data": 3}]
        },
        "intervals": {
            "1": {"enter": {"Timestamp": 5}, "leave": {"Timestamp": 20}, "metrics": {"flops": 50.0}},
            "2": {"enter": {"Timestamp": 20}, "leave": {"Timestamp": 40}, "metrics": {"flops": 150.0}},
            "3": {"enter": {"Timestamp": 10}, "leave": {"Timestamp": 30}, "metrics": {"flops": 20.0}}
        }
    });
    parse_trace(&raw).unwrap()
}

#[test]
fn test_aggregate_rate_histogram() {
    let trace = profile_fixture();
    let profile = SweepLineBuilder::default().build(&trace).unwrap();

    let sum = profile.intervals().sum_across_locations(4, trace.domain()).unwrap();
    assert_eq!(sum, vec![1.0, 2.0, 2.0, 1.0]);
}

#[test]
fn test_aggregate_cumulative_histogram() {
    let trace = profile_fixture();
    let profile = SweepLineBuilder::default().build(&trace).unwrap();

    let sum = profile
        .intervals()
        .utilization_histogram(2, trace.domain(), BinMode::Cumulative)
        .unwrap();
    // rank0 busy all 40 units, rank1 busy 20
    assert_eq!(sum, vec![20.0 + 10.0, 40.0 + 20.0]);
}

#[test]
fn test_metric_utilization_concatenates_locations() {
    let trace = profile_fixture();
    let profile = SweepLineBuilder::default().build(&trace).unwrap();
    let window = Window::new(0, 40).unwrap();

    let metrics = calculate_metric_utilization(&profile, 4, window).unwrap();
    let flops = &metrics["flops"];

    assert_eq!(flops.len(), 8);
    // rank0: enter 5 -> 50/5 = 10, leave 20 -> 0, enter 20 skipped, leave 40 -> 0
    assert_eq!(&flops[..4], &[10.0, 0.0, 0.0, 0.0]);
    // rank1: enter 10 -> 20/10 = 2, leave 30 -> 0
    assert_eq!(&flops[4..], &[2.0, 2.0, 0.0, 0.0]);
}

#[test]
fn test_histogram_stats_of_aggregate() {
    let trace = profile_fixture();
    let profile = SweepLineBuilder::default().build(&trace).unwrap();
    let sum = profile.intervals().sum_across_locations(4, trace.domain()).unwrap();

    let stats = calculate_histogram_stats(&sum);
    assert_eq!(stats.peak, 2.0);
    assert_eq!(stats.peak_bin, 1);
    assert_eq!(stats.mean, 1.5);
    assert_eq!(stats.idle_bins, 0);
}
