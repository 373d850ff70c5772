//! Output writers for utilization reports.
//!
//! This module handles:
//! - The versioned JSON report schema
//! - Writing and reading JSON reports
//! - Text summaries for the terminal

pub mod json;
pub mod report;
pub mod text;

// Re-export main functions
pub use json::{read_report, report_to_string, write_report};
pub use report::UtilizationReport;
pub use text::render_text_summary;
