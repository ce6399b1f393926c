//! Report formatting and printing utilities.
//!
//! Issues are displayed in cargo-style format, followed by a one-line build
//! summary. Separate from the engine so themegen can be used as a library.

use std::{
    env,
    io::{self, Write},
    path::Path,
    time::Duration,
};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{BuildSummary, CommandResult, CommandSummary, InitSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::issues::{Issue, Report, ReportLocation, Severity};
use crate::sync::SyncOutcome;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Set to suppress the elapsed time in the summary line.
pub const DISABLE_TIMING_ENV: &str = "THEMEGEN_DISABLE_TIMING";

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Build(summary) => {
            let mut stdout = io::stdout().lock();
            if verbose {
                print_artifacts_to(summary, &mut stdout);
            }
            report_to(&result.issues, &mut stdout);
            let show_timing = env::var_os(DISABLE_TIMING_ENV).is_none();
            print_build_summary_to(summary, result.error_count, show_timing, &mut stdout);
        }
        CommandSummary::Init(summary) => print_init(summary),
    }
}

/// Print issues in cargo-style format to a writer, followed by a problem count.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    // Calculate max line number width for alignment
    let max_line_width = calculate_max_line_width(&sorted);

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

/// Per-artifact `Created:` / `Updated:` / `Deleted:` lines; unchanged files are not listed.
pub fn print_artifacts_to<W: Write>(summary: &BuildSummary, writer: &mut W) {
    for (path, outcome) in &summary.outcomes {
        let label = match outcome {
            SyncOutcome::Written { created: true } => "Created:".green(),
            SyncOutcome::Written { created: false } => "Updated:".yellow(),
            SyncOutcome::Unchanged => continue,
        };
        let _ = writeln!(
            writer,
            "{} {}",
            label,
            display_path(&summary.output_root, path)
        );
    }
    for path in &summary.deleted {
        let _ = writeln!(
            writer,
            "{} {}",
            "Deleted:".red(),
            display_path(&summary.output_root, path)
        );
    }
}

/// `✓ Generated N artifacts (W written, U unchanged, D deleted) [Xms]`
pub fn print_build_summary_to<W: Write>(
    summary: &BuildSummary,
    error_count: usize,
    show_timing: bool,
    writer: &mut W,
) {
    let total = summary.outcomes.len();
    let line = format!(
        "Generated {} {} ({} written, {} unchanged, {} deleted)",
        total,
        if total == 1 { "artifact" } else { "artifacts" },
        summary.written_count(),
        summary.unchanged_count(),
        summary.deleted.len()
    );
    let timing = if show_timing {
        format!(" {}", format_elapsed(summary.elapsed).dimmed())
    } else {
        String::new()
    };

    let _ = if error_count == 0 {
        writeln!(writer, "{} {}{}", SUCCESS_MARK.green(), line.green(), timing)
    } else {
        writeln!(writer, "{} {}{}", FAILURE_MARK.red(), line, timing)
    };
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
    if let Some(error) = &summary.error {
        eprintln!("{} {}", "error:".bold().red(), error);
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let loc = issue.location();
    let (file_path, line, col, source_line) = extract_location_info(&loc);

    // Print severity and message (cargo-style)
    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    // Print clickable location: --> path[:line:col]
    if line > 0 {
        let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), file_path, line, col);
    } else {
        let _ = writeln!(writer, "  {} {}", "-->".blue(), file_path);
    }

    // Print source context if available
    if let Some(source_line) = source_line {
        let caret_char = match severity {
            Severity::Error => "^".red(),
            Severity::Warning => "^".yellow(),
        };

        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        // Caret pointing to the column (col is 1-based)
        let prefix: String = source_line.chars().take(col.saturating_sub(1)).collect();
        let caret_padding = UnicodeWidthStr::width(prefix.as_str());
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret_char,
            width = max_line_width,
            padding = caret_padding
        );
    }

    // Print details if present (cargo-style note)
    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    // Print hint if present
    if let Some(hint) = issue.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues.len() - total_errors;
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} ({} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
            if total_problems == 1 {
                "problem"
            } else {
                "problems"
            },
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow()
        );
    }
}

fn extract_location_info<'a>(
    loc: &'a ReportLocation<'a>,
) -> (&'a str, usize, usize, Option<&'a str>) {
    match loc {
        ReportLocation::Source(location) => (
            &location.file_path,
            location.line,
            location.col,
            Some(&location.source_line),
        ),
        ReportLocation::File { path } => (path, 0, 0, None),
    }
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source(location) => Some(location.line),
            ReportLocation::File { .. } => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

fn display_path(output_root: &str, path: &Path) -> String {
    format!(
        "{}/{}",
        output_root.trim_end_matches('/'),
        path.to_string_lossy()
    )
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("[{}ms]", elapsed.as_millis())
}

// ============================================================
// Tests
// ============================================================
