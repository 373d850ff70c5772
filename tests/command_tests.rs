use sparse_util_studio::commands::{execute_analyze, validate_args, AnalyzeArgs};
use sparse_util_studio::output::read_report;
use sparse_util_studio::utilization::BinMode;
use std::fs;
use std::path::Path;

const TRACE: &str = r#"{
    "meta": {"intervalDomain": [0, 100], "label": "two-cpus"},
    "locations": {
        "cpu0": [{"begin": 0, "end": 50}, {"begin": 25, "end": 75}],
        "cpu1": [{"begin": 50, "end": 100, "data": "k"}]
    },
    "intervals": {
        "k": {"enter": {"Timestamp": 50}, "leave": {"Timestamp": 100}, "metrics": {"ins": 500.0}}
    }
}"#;

fn write_trace(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("trace.json");
    fs::write(&path, TRACE).unwrap();
    path
}

#[test]
fn test_validate_args_valid() {
    let args = AnalyzeArgs {
        input: "trace.json".into(),
        bins: Some(10),
        ..Default::default()
    };

    assert!(validate_args(&args).is_ok());
}

#[test]
fn test_validate_args_zero_bins() {
    let args = AnalyzeArgs {
        input: "trace.json".into(),
        bins: Some(0),
        ..Default::default()
    };

    assert!(validate_args(&args).is_err());
}

#[test]
fn test_analyze_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out/report.json");

    let args = AnalyzeArgs {
        input: write_trace(dir.path()),
        output_json: output.clone(),
        bins: Some(4),
        ..Default::default()
    };

    let report = execute_analyze(args).unwrap();
    let loaded = read_report(&output).unwrap();

    assert_eq!(loaded, report);
    assert_eq!(report.label.as_deref(), Some("two-cpus"));
    assert_eq!(report.mode, BinMode::Rate);
    assert_eq!(report.aggregate, vec![1.0, 2.0, 2.0, 1.0]);
    assert_eq!(report.locations.len(), 2);
    assert_eq!(report.locations[0].histogram, vec![1.0, 2.0, 1.0, 0.0]);
    assert_eq!(report.metrics["ins"], vec![0.0, 10.0, 10.0, 0.0]);
    assert!(report.validate().is_ok());
}

#[test]
fn test_analyze_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("analysis.toml");
    fs::write(&config, "bins = 2\nmode = \"cumulative\"\nbegin = 0\nend = 50\n").unwrap();

    let args = AnalyzeArgs {
        input: write_trace(dir.path()),
        output_json: dir.path().join("report.json"),
        config: Some(config),
        ..Default::default()
    };

    let report = execute_analyze(args).unwrap();

    assert_eq!(report.bins, 2);
    assert_eq!(report.mode, BinMode::Cumulative);
    assert_eq!((report.begin, report.end), (0, 50));
    // cpu0 integral at 25 and 50; cpu1 has no interval in the window
    assert_eq!(report.locations.len(), 2);
    assert_eq!(report.locations[0].histogram, vec![25.0, 75.0]);
    assert_eq!(report.locations[1].histogram, vec![0.0, 0.0]);
    assert!(report.metrics.is_empty());
}

#[test]
fn test_analyze_missing_trace_fails() {
    let dir = tempfile::tempdir().unwrap();
    let args = AnalyzeArgs {
        input: dir.path().join("absent.json"),
        output_json: dir.path().join("report.json"),
        ..Default::default()
    };

    assert!(execute_analyze(args).is_err());
    assert!(!dir.path().join("report.json").exists());
}

#[test]
fn test_analyze_strict_samples_fails_on_zero_width_gap() {
    let dir = tempfile::tempdir().unwrap();
    let trace = dir.path().join("trace.json");
    fs::write(
        &trace,
        r#"{
            "meta": {"intervalDomain": [0, 10]},
            "locations": {"0": [{"begin": 0, "end": 10, "data": 1}]},
            "intervals": {"1": {"metrics": {"ins": 3.0}}}
        }"#,
    )
    .unwrap();

    let args = AnalyzeArgs {
        input: trace,
        output_json: dir.path().join("report.json"),
        strict_samples: true,
        ..Default::default()
    };

    let err = execute_analyze(args).unwrap_err();
    assert!(format!("{:#}", err).contains("zero-width"));
}
