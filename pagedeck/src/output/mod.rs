//! Output formatting and display for pagedeck.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Upload and export summaries
//! - The dry-run plan
//!
//! Diagnostic logging goes through `tracing`; this module is for lines the
//! user asked to see.
//!
//! # Examples
//!
//! ```no_run
//! use pagedeck::output::OutputFormatter;
//! use pagedeck::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Loading files...");
//! formatter.success("Export completed");
//! # }
//! ```

pub mod formatter;
pub mod plan;

pub use formatter::{MessageLevel, OutputFormatter};
pub use plan::ExportPlan;

use crate::io::WriteStatistics;
use crate::session::{ExportedDocument, UploadReport};

/// Display the outcome of an upload.
///
/// Skipped files are listed in verbose mode only.
pub fn display_upload_report(formatter: &OutputFormatter, report: &UploadReport) {
    for name in &report.files_skipped {
        formatter.debug(&format!("Skipped unsupported file: {name}"));
    }

    formatter.info(&upload_summary(report));
}

fn upload_summary(report: &UploadReport) -> String {
    let mut line = format!(
        "Loaded {} file(s) in {:.2}s: {} page(s)",
        report.files_loaded,
        report.elapsed.as_secs_f64(),
        report.pages_added
    );
    if !report.files_skipped.is_empty() {
        line.push_str(&format!(", {} unsupported skipped", report.files_skipped.len()));
    }
    line
}

/// Display the dry-run plan as a numbered page list.
pub fn display_plan(formatter: &OutputFormatter, plan: &ExportPlan) {
    formatter.section(&format!("Output would be: {}", plan.output.display()));
    for (index, page) in plan.pages.iter().enumerate() {
        formatter.list_item(
            index + 1,
            &format!("{} page {} ({})", page.source, page.page, page.geometry),
        );
    }
    formatter.detail("Compression", &format!("{:?}", plan.compression));
    formatter.detail("Image sizing", &format!("{:?}", plan.image_sizing));
}

/// Display the result of an export that was written to disk.
pub fn display_export_summary(
    formatter: &OutputFormatter,
    exported: &ExportedDocument,
    written: &WriteStatistics,
) {
    formatter.success(&format!(
        "Created {} ({}, {})",
        written.output_path.display(),
        match exported.statistics.pages_copied {
            1 => "1 page".to_string(),
            n => format!("{n} pages"),
        },
        written.format_file_size()
    ));

    if formatter.is_verbose() {
        let stats = &exported.statistics;
        formatter.section("Statistics");
        formatter.detail("Pages", &stats.pages_copied.to_string());
        formatter.detail("Sources", &stats.sources_parsed.to_string());
        formatter.detail("Output size", &written.format_file_size());
        formatter.detail(
            "Assembly time",
            &format!("{:.2}s", stats.elapsed.as_secs_f64()),
        );
        formatter.detail(
            "Write time",
            &format!("{:.2}s", written.write_time.as_secs_f64()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn report(skipped: &[&str]) -> UploadReport {
        UploadReport {
            pages_added: 3,
            files_loaded: 2,
            files_skipped: skipped.iter().map(|s| s.to_string()).collect(),
            elapsed: Duration::from_millis(12),
        }
    }

    #[test]
    fn test_upload_summary_counts_skipped() {
        let summary = upload_summary(&report(&["notes.txt", "a.zip"]));
        assert_eq!(summary, "Loaded 2 file(s) in 0.01s: 3 page(s), 2 unsupported skipped");
        assert!(!summary.contains("notes.txt"));
    }

    #[test]
    fn test_upload_summary_without_skipped() {
        assert_eq!(
            upload_summary(&report(&[])),
            "Loaded 2 file(s) in 0.01s: 3 page(s)"
        );
    }
}
