//! Issue types for migration results.
//!
//! Every problem the engine meets is collected as a [`TransformIssue`] instead of
//! being returned as an error, so a single bad file never stops a run. Each issue
//! carries what the reporter needs to display it.

use enum_dispatch::enum_dispatch;

use crate::core::resolve::UnresolvedReason;
use crate::core::syntax::Position;

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    UnresolvedAnnotation,
    ParseError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::UnresolvedAnnotation => write!(f, "unresolved-annotation"),
            Rule::ParseError => write!(f, "parse-error"),
        }
    }
}

// ============================================================
// Issue Types
// ============================================================

/// Marker comment with no function to receive the directive. The comment is left as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedAnnotationIssue {
    pub file_path: String,
    /// Start of the marker comment.
    pub position: Position,
    pub reason: UnresolvedReason,
    /// Full text of the line the comment starts on.
    pub source_line: String,
}

impl UnresolvedAnnotationIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::UnresolvedAnnotation
    }
}

/// File could not be parsed. Its content is returned untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// A problem found while migrating one file.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformIssue {
    UnresolvedAnnotation(UnresolvedAnnotationIssue),
    ParseError(ParseErrorIssue),
}

impl TransformIssue {
    pub fn severity(&self) -> Severity {
        match self {
            TransformIssue::UnresolvedAnnotation(_) => UnresolvedAnnotationIssue::severity(),
            TransformIssue::ParseError(_) => ParseErrorIssue::severity(),
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            TransformIssue::UnresolvedAnnotation(_) => UnresolvedAnnotationIssue::rule(),
            TransformIssue::ParseError(_) => ParseErrorIssue::rule(),
        }
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Position inside a file, with the line for context display.
    Source {
        path: &'a str,
        position: Position,
        source_line: &'a str,
    },
    /// File-level only (for ParseError - no line context).
    File { path: &'a str },
}

/// Trait for types that can be reported to CLI.
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

impl Report for UnresolvedAnnotationIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source {
            path: &self.file_path,
            position: self.position,
            source_line: &self.source_line,
        }
    }

    fn message(&self) -> String {
        "@ngInject does not annotate anything".to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(self.reason.to_string())
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

// ============================================================
// Ordering (for sorting in reports)
// ============================================================

impl TransformIssue {
    fn sort_key(&self) -> (&str, Position) {
        match self.location() {
            ReportLocation::Source { path, position, .. } => (path, position),
            ReportLocation::File { path } => (path, Position::default()),
        }
    }
}

impl Ord for TransformIssue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // file path, then position, then message
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.rule().cmp(&other.rule()))
            .then_with(|| self.message().cmp(&other.message()))
    }
}

impl PartialOrd for TransformIssue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
