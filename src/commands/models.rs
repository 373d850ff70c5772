use crate::utilization::BinMode;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Interval trace JSON to analyze
    pub input: PathBuf,

    /// Output path for JSON report
    pub output_json: PathBuf,

    /// Number of histogram bins (None = config file or default)
    pub bins: Option<usize>,

    /// Window start (None = config file or trace domain)
    pub begin: Option<i64>,

    /// Window end (None = config file or trace domain)
    pub end: Option<i64>,

    /// Histogram mode (None = config file or rate)
    pub mode: Option<BinMode>,

    /// Optional TOML analysis config
    pub config: Option<PathBuf>,

    /// Fail on zero-width metric sample gaps instead of skipping them
    pub strict_samples: bool,

    /// Metrics to track (empty = config file or all)
    pub metrics: Vec<String>,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Column budget of the text summary
    pub summary_width: usize,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_json: PathBuf::from("utilization.json"),
            bins: None,
            begin: None,
            end: None,
            mode: None,
            config: None,
            strict_samples: false,
            metrics: Vec::new(),
            print_summary: false,
            summary_width: 80,
        }
    }
}
