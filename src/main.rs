//! Sparse Util Studio CLI
//!
//! Builds utilization histograms from interval traces and writes them as
//! JSON reports for Gantt-style chart rendering.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use sparse_util_studio::commands::{
    display_schema, display_version, execute_analyze, validate_args, validate_report_file, AnalyzeArgs,
};
use sparse_util_studio::utilization::BinMode;

/// Sparse Util Studio - utilization histograms from interval traces
#[derive(Parser, Debug)]
#[command(name = "sparse-util")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build utilization histograms from an interval trace
    Analyze {
        /// Interval trace JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for JSON report
        #[arg(short, long, default_value = "utilization.json")]
        output: PathBuf,

        /// Number of histogram bins
        #[arg(short, long, env = "SUL_BINS")]
        bins: Option<usize>,

        /// Window start (defaults to the trace domain)
        #[arg(long, allow_hyphen_values = true)]
        begin: Option<i64>,

        /// Window end (defaults to the trace domain)
        #[arg(long, allow_hyphen_values = true)]
        end: Option<i64>,

        /// Histogram mode: rate or cumulative
        #[arg(short, long)]
        mode: Option<BinMode>,

        /// TOML analysis config
        #[arg(short, long, env = "SUL_CONFIG")]
        config: Option<PathBuf>,

        /// Fail on zero-width metric sample gaps instead of skipping them
        #[arg(long)]
        strict_samples: bool,

        /// Track only these metrics (repeatable)
        #[arg(long = "metric")]
        metrics: Vec<String>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Text summary width in columns
        #[arg(long, default_value = "80")]
        width: usize,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            input,
            output,
            bins,
            begin,
            end,
            mode,
            config,
            strict_samples,
            metrics,
            summary,
            width,
        } => {
            let args = AnalyzeArgs {
                input,
                output_json: output,
                bins,
                begin,
                end,
                mode,
                config,
                strict_samples,
                metrics,
                print_summary: summary,
                summary_width: width,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
