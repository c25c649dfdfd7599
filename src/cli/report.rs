//! Report formatting and printing utilities.
//!
//! Issues are displayed in cargo-style format. Kept apart from the engine so the
//! crate can be used as a library without any terminal output.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::config::CONFIG_FILE_NAME;
use crate::core::marker::MARKER_TAG;
use crate::issues::{Report, ReportLocation, Severity, TransformIssue};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Outcome of a `convert` run, for the closing summary.
pub struct ConversionSummary {
    pub is_apply: bool,
    /// Files whose content changed (or would change), sorted.
    pub converted: Vec<String>,
    pub maps_written: usize,
}

/// Print issues in cargo-style format to stdout, followed by a problem count.
pub fn report(issues: &[TransformIssue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
pub fn report_to<W: Write>(issues: &[TransformIssue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    let max_line_width = calculate_max_line_width(&sorted);

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

/// Print a success message when there is nothing to convert.
pub fn print_success(files_checked: usize) {
    print_success_to(files_checked, &mut io::stdout().lock());
}

pub fn print_success_to<W: Write>(files_checked: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} source {} - nothing to convert",
            files_checked,
            if files_checked == 1 { "file" } else { "files" }
        )
        .green()
    );
}

/// Print a warning about files that could not be parsed.
pub fn print_parse_warning(count: usize, verbose: bool) {
    print_parse_warning_to(count, verbose, &mut io::stderr().lock());
}

/// Print a parse warning to a custom writer.
pub fn print_parse_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

/// Print a file that could not be read or written.
pub fn print_file_error(error: &anyhow::Error) {
    eprintln!("{} {:#}", "error:".bold().red(), error);
}

pub fn print_conversion(summary: &ConversionSummary) {
    print_conversion_to(summary, &mut io::stdout().lock());
}

pub fn print_conversion_to<W: Write>(summary: &ConversionSummary, writer: &mut W) {
    let count = summary.converted.len();
    if count == 0 {
        return;
    }

    if summary.is_apply {
        let _ = writeln!(
            writer,
            "{} {} file(s).",
            "Converted".green().bold(),
            count
        );
        if summary.maps_written > 0 {
            let _ = writeln!(
                writer,
                "  - source maps: {} file(s)",
                summary.maps_written
            );
        }
    } else {
        let _ = writeln!(
            writer,
            "{} {} file(s):",
            "Would convert".yellow().bold(),
            count
        );
        for path in &summary.converted {
            let _ = writeln!(writer, "  - {}", path);
        }
        let _ = writeln!(
            writer,
            "Run with {} to write these changes.",
            "--apply".cyan()
        );
    }
}

/// Print the files that still carry the marker.
pub fn print_listed(files: &[String], files_checked: usize) {
    print_listed_to(files, files_checked, &mut io::stdout().lock());
}

pub fn print_listed_to<W: Write>(files: &[String], files_checked: usize, writer: &mut W) {
    if files.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} source {} - no {} comments found",
                files_checked,
                if files_checked == 1 { "file" } else { "files" },
                MARKER_TAG
            )
            .green()
        );
        return;
    }

    for path in files {
        let _ = writeln!(writer, "{}", path);
    }
    let _ = writeln!(
        writer,
        "\n{} of {} file(s) contain {} comments.",
        files.len(),
        files_checked,
        MARKER_TAG.cyan()
    );
}

pub fn print_init_created() {
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", CONFIG_FILE_NAME).green()
    );
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &TransformIssue, writer: &mut W, max_line_width: usize) {
    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    match issue.location() {
        ReportLocation::File { path } => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
        }
        ReportLocation::Source {
            path,
            position,
            source_line,
        } => {
            let _ = writeln!(writer, "  {} {}:{}", "-->".blue(), path, position);

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
                position.line.to_string().blue(),
                "|".blue(),
                source_line,
                width = max_line_width
            );

            // Columns count bytes; the caret is padded by display width.
            let prefix = source_line
                .get(..position.column.saturating_sub(1))
                .unwrap_or(source_line);
            let caret_padding = UnicodeWidthStr::width(prefix);
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
    }

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

    let _ = writeln!(writer);
}

fn print_summary<W: Write>(issues: &[TransformIssue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Warning)
        .count();
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "{} {} problems ({} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
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

fn calculate_max_line_width(issues: &[TransformIssue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source { position, .. } => Some(position.line),
            ReportLocation::File { .. } => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

// ============================================================
// Tests
// ============================================================
