//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads the analysis config and the interval trace
//! 2. Sweeps every location into step functions
//! 3. Resamples them into histograms
//! 4. Writes the JSON report

use super::models::AnalyzeArgs;
use crate::aggregator::calculate_histogram_stats;
use crate::output::{render_text_summary, write_report, UtilizationReport};
use crate::parser::load_trace;
use crate::utilization::{BinMode, BuildConfig, IntervalSource, SweepLineBuilder, Window, ZeroWidthPolicy};
use crate::utils::config::{DEFAULT_BINS, MAX_BINS};
use crate::utils::settings::{load_analysis_config, AnalysisConfig};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Effective settings after merging flags, config file and defaults
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAnalysis {
    pub bins: usize,
    pub mode: BinMode,
    pub window: Window,
    pub zero_width: ZeroWidthPolicy,
    pub metrics: Option<Vec<String>>,
}

impl ResolvedAnalysis {
    pub fn build_config(&self) -> BuildConfig {
        let config = BuildConfig::new()
            .with_zero_width(self.zero_width)
            .with_window(self.window);

        match &self.metrics {
            Some(metrics) => config.with_metrics(metrics.iter().cloned()),
            None => config,
        }
    }
}

/// Merge flags over config file values over defaults
///
/// **Public** - window bounds fall back to the trace `domain`
pub fn resolve_analysis(args: &AnalyzeArgs, config: &AnalysisConfig, domain: Window) -> Result<ResolvedAnalysis> {
    let begin = args.begin.or(config.begin).unwrap_or(domain.begin());
    let end = args.end.or(config.end).unwrap_or(domain.end());
    let window = Window::new(begin, end).context("Invalid analysis window")?;

    let zero_width = if args.strict_samples {
        ZeroWidthPolicy::Error
    } else {
        config.zero_width.unwrap_or_default()
    };

    let metrics = if args.metrics.is_empty() {
        config.metrics.clone()
    } else {
        Some(args.metrics.clone())
    };

    Ok(ResolvedAnalysis {
        bins: args.bins.or(config.bins).unwrap_or(DEFAULT_BINS),
        mode: args.mode.or(config.mode).unwrap_or_default(),
        window,
        zero_width,
        metrics,
    })
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The report that was written
///
/// # Errors
/// * Config or trace read/parse failures
/// * Build errors (malformed samples, unresolved handles)
/// * Query errors (invalid bins or window)
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<UtilizationReport> {
    let start_time = Instant::now();

    info!("Starting analysis of: {}", args.input.display());

    // Step 1: Load config and trace
    info!("Step 1/4: Loading interval trace...");
    let config = match &args.config {
        Some(path) => load_analysis_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let trace = load_trace(&args.input)
        .with_context(|| format!("Failed to load trace {}", args.input.display()))?;

    let resolved = resolve_analysis(&args, &config, trace.domain())?;
    debug!("Resolved analysis settings: {:?}", resolved);

    // Step 2: Sweep
    info!("Step 2/4: Building sparse utilization list...");
    let profile = SweepLineBuilder::new(resolved.build_config())
        .build(&trace)
        .context("Failed to build utilization step functions")?;

    debug!(
        "Built {} locations with {} edges",
        profile.intervals().len(),
        profile.intervals().event_count()
    );

    // Step 3: Resample
    info!(
        "Step 3/4: Resampling into {} {} bins over {}...",
        resolved.bins, resolved.mode, resolved.window
    );
    let report = UtilizationReport::from_profile(
        &profile,
        trace.label().map(str::to_string),
        resolved.bins,
        resolved.window,
        resolved.mode,
    )
    .context("Failed to compute utilization histograms")?;

    info!("Aggregate: {}", calculate_histogram_stats(&report.aggregate).summary());

    // Step 4: Write outputs
    info!("Step 4/4: Writing report...");
    write_report(&report, &args.output_json).context("Failed to write report JSON")?;

    info!("✓ Report written to: {}", args.output_json.display());

    if args.print_summary {
        println!("\n{}", render_text_summary(&report, args.summary_width));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input trace path cannot be empty");
    }

    if let Some(bins) = args.bins {
        if bins == 0 {
            anyhow::bail!("bins must be greater than 0");
        }

        if bins > MAX_BINS {
            anyhow::bail!("bins is too large (max {})", MAX_BINS);
        }
    }

    if let (Some(begin), Some(end)) = (args.begin, args.end) {
        if end <= begin {
            anyhow::bail!("end ({}) must be greater than begin ({})", end, begin);
        }
    }

    if args.summary_width == 0 {
        anyhow::bail!("summary width must be greater than 0");
    }

    Ok(())
}
