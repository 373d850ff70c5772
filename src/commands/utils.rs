use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;
    report.validate().context("Report is inconsistent")?;

    println!("✓ Valid utilization report");
    println!("  Version: {}", report.version);
    if let Some(label) = &report.label {
        println!("  Label: {}", label);
    }
    println!("  Window: [{}, {})", report.begin, report.end);
    println!("  Bins: {} ({})", report.bins, report.mode);
    println!("  Locations: {}", report.locations.len());
    println!("  Metrics: {}", report.metrics.len());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Sparse Util Studio Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  label: string?           - Trace label");
        println!("  bins: number             - Values per histogram");
        println!("  mode: string             - 'rate' or 'cumulative'");
        println!("  begin: number            - Window start");
        println!("  end: number              - Window end");
        println!("  aggregate: array         - Sum across all locations");
        println!("  locations: array         - One histogram per location");
        println!("    location: string       - Location id");
        println!("    histogram: array       - Bin values");
        println!("  metrics: object?         - Metric name -> concatenated cumulative series");
        println!("  generated_at: string     - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Sparse Util Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Utilization histograms for Gantt-style charts from interval traces.");
}
