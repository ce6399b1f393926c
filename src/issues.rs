//! Issue types reported by a generation pass.
//!
//! None of these abort a pass. Each issue carries everything the reporter
//! needs to display it: a location, a message and an optional hint.

use enum_dispatch::enum_dispatch;

use crate::core::extract::MalformedKind;

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
    MalformedSpan,
    MissingSchemaSource,
    MissingTemplateSource,
    DuplicateOutput,
    SyncFailure,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::MalformedSpan => write!(f, "malformed-span"),
            Rule::MissingSchemaSource => write!(f, "missing-schema"),
            Rule::MissingTemplateSource => write!(f, "missing-template"),
            Rule::DuplicateOutput => write!(f, "duplicate-output"),
            Rule::SyncFailure => write!(f, "sync-failure"),
        }
    }
}

// ============================================================
// Location
// ============================================================

/// A position inside a source file, with the line's text for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file_path: String,
    /// 1-based.
    pub line: usize,
    /// 1-based, in characters.
    pub col: usize,
    pub source_line: String,
}

impl SourceLocation {
    pub fn new(
        file_path: impl Into<String>,
        line: usize,
        col: usize,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
            source_line: source_line.into(),
        }
    }
}

// ============================================================
// Issue Types
// ============================================================

/// A `<t>` tag that could not be paired; the region was left verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedSpanIssue {
    pub location: SourceLocation,
    pub kind: MalformedKind,
}

impl MalformedSpanIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::MalformedSpan
    }
}

/// A section or app block whose `schema.json` is missing or unparseable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingSchemaSourceIssue {
    pub file_path: String,
    pub error: String,
}

impl MissingSchemaSourceIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::MissingSchemaSource
    }
}

/// A template body that is missing or unreadable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTemplateSourceIssue {
    pub file_path: String,
    pub error: String,
}

impl MissingTemplateSourceIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::MissingTemplateSource
    }
}

/// A template mapping to an output path another source already claimed.
/// The first source in walk order is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateOutputIssue {
    /// The skipped source.
    pub file_path: String,
    pub output_path: String,
    pub kept_path: String,
}

impl DuplicateOutputIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::DuplicateOutput
    }
}

/// An artifact that could not be read, written or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailureIssue {
    pub file_path: String,
    pub error: String,
}

impl SyncFailureIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::SyncFailure
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// A problem found during a generation pass.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    MalformedSpan(MalformedSpanIssue),
    MissingSchemaSource(MissingSchemaSourceIssue),
    MissingTemplateSource(MissingTemplateSourceIssue),
    DuplicateOutput(DuplicateOutputIssue),
    SyncFailure(SyncFailureIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::MalformedSpan(_) => MalformedSpanIssue::severity(),
            Issue::MissingSchemaSource(_) => MissingSchemaSourceIssue::severity(),
            Issue::MissingTemplateSource(_) => MissingTemplateSourceIssue::severity(),
            Issue::DuplicateOutput(_) => DuplicateOutputIssue::severity(),
            Issue::SyncFailure(_) => SyncFailureIssue::severity(),
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            Issue::MalformedSpan(_) => MalformedSpanIssue::rule(),
            Issue::MissingSchemaSource(_) => MissingSchemaSourceIssue::rule(),
            Issue::MissingTemplateSource(_) => MissingTemplateSourceIssue::rule(),
            Issue::DuplicateOutput(_) => DuplicateOutputIssue::rule(),
            Issue::SyncFailure(_) => SyncFailureIssue::rule(),
        }
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Position inside a file (has source_line for context display).
    Source(&'a SourceLocation),
    /// File-level only (no line context).
    File { path: &'a str },
}

/// Trait for types that can be reported to CLI.
///
/// Uses `enum_dispatch` for zero-cost dispatch on the `Issue` enum.
#[enum_dispatch]
pub trait Report {
    /// Get the location for this issue.
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<&str> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for MalformedSpanIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.location)
    }

    fn message(&self) -> String {
        match self.kind {
            MalformedKind::Unclosed => "unclosed <t> tag".to_string(),
            MalformedKind::Nested => "nested <t> tag".to_string(),
        }
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some(match self.kind {
            MalformedKind::Unclosed => "close the span with </t>",
            MalformedKind::Nested => "translatable spans cannot contain other spans",
        })
    }

    fn details(&self) -> Option<String> {
        Some("left as written, no translation was extracted".to_string())
    }
}

impl Report for MissingSchemaSourceIssue {
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

    fn details(&self) -> Option<String> {
        Some("skipped, the rest of the pass continued".to_string())
    }
}

impl Report for MissingTemplateSourceIssue {
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

    fn details(&self) -> Option<String> {
        Some("skipped, the rest of the pass continued".to_string())
    }
}

impl Report for DuplicateOutputIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        format!("{} is already generated from {}", self.output_path, self.kept_path)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("rename one of the templates")
    }

    fn details(&self) -> Option<String> {
        Some("skipped, the first source in walk order is kept".to_string())
    }
}

impl Report for SyncFailureIssue {
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

    fn hint(&self) -> Option<&str> {
        Some("fix the file permissions and run the build again")
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Issue {
    fn sort_file_path(&self) -> &str {
        match self.location() {
            ReportLocation::Source(location) => &location.file_path,
            ReportLocation::File { path } => path,
        }
    }

    fn sort_line(&self) -> usize {
        match self.location() {
            ReportLocation::Source(location) => location.line,
            ReportLocation::File { .. } => 0,
        }
    }

    fn sort_col(&self) -> usize {
        match self.location() {
            ReportLocation::Source(location) => location.col,
            ReportLocation::File { .. } => 0,
        }
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: file_path, line, col, rule, message
        self.sort_file_path()
            .cmp(other.sort_file_path())
            .then_with(|| self.sort_line().cmp(&other.sort_line()))
            .then_with(|| self.sort_col().cmp(&other.sort_col()))
            .then_with(|| self.rule().cmp(&other.rule()))
            .then_with(|| self.message().cmp(&other.message()))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================
// Tests
// ============================================================
