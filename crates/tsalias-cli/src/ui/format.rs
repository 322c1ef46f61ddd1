//! Duration formatting and the end-of-run summary.

use std::time::Duration;

use console::Term;
use owo_colors::Style;
use tsalias_core::RunReport;

use super::paint;

/// Format a duration as `ms`, seconds, or minutes and seconds.
///
/// ```
/// use std::time::Duration;
/// use tsalias_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Label/value rows of the summary, uncolored.
pub fn summary_lines(report: &RunReport) -> Vec<(&'static str, String)> {
    let rewritten_label = if report.dry_run {
        "Would rewrite"
    } else {
        "Files rewritten"
    };

    vec![
        ("Files scanned", report.files_scanned().to_string()),
        (rewritten_label, report.files_rewritten().to_string()),
        ("Replacements", report.replacements().to_string()),
        ("Unresolved", report.unresolved().count().to_string()),
        (
            "Failures",
            (report.failures().count() + report.panics.len()).to_string(),
        ),
        ("Cache hits", format_cache(report)),
        ("Duration", format_duration(report.elapsed)),
    ]
}

fn format_cache(report: &RunReport) -> String {
    let stats = report.cache;
    format!(
        "{} of {} ({:.0}%)",
        stats.hits,
        stats.hits + stats.misses,
        stats.hit_rate() * 100.0
    )
}

/// Print the run summary, followed by unresolved imports and failures.
pub fn print_summary(report: &RunReport) {
    let width = (Term::stderr().size().1 as usize).min(60);
    let title = if report.dry_run {
        "Alias Rewrite Summary (dry run)"
    } else {
        "Alias Rewrite Summary"
    };

    eprintln!("\n{}", paint(title, Style::new().bold().underline()));
    eprintln!("{}", "─".repeat(width));

    for (label, value) in summary_lines(report) {
        let style = match label {
            "Unresolved" if value != "0" => Style::new().yellow(),
            "Failures" if value != "0" => Style::new().red(),
            _ => Style::new().green(),
        };
        eprintln!("  {:<16} {}", format!("{label}:"), paint(&value, style));
    }

    eprintln!("{}", "─".repeat(width));

    for (file, import) in report.unresolved() {
        super::warning(&format!(
            "Source file not found for module {} ({}, alias {})",
            import.specifier,
            file.display(),
            import.alias
        ));
    }
    for failure in report.failures() {
        super::error(&failure.to_string());
    }
    for panic in &report.panics {
        super::error(panic);
    }
}
