//! Issues: non-fatal diagnostics accumulated by transformation and semantics.
//!
//! Issues are owned by the list of the operation that raised them, never by a node.

use std::fmt;

use crate::base::Span;

/// The phase that raised an issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IssueType {
    Lexical,
    Syntactic,
    Semantic,
    Translation,
}

/// Severity level of an issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// A diagnostic with an optional source range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    pub issue_type: IssueType,
    pub severity: Severity,
    pub message: String,
    pub range: Option<Span>,
}

impl Issue {
    pub fn new(
        issue_type: IssueType,
        severity: Severity,
        message: impl Into<String>,
        range: Option<Span>,
    ) -> Self {
        Self {
            issue_type,
            severity,
            message: message.into(),
            range,
        }
    }

    pub fn lexical(message: impl Into<String>, severity: Severity, range: Option<Span>) -> Self {
        Self::new(IssueType::Lexical, severity, message, range)
    }

    pub fn syntactic(message: impl Into<String>, severity: Severity, range: Option<Span>) -> Self {
        Self::new(IssueType::Syntactic, severity, message, range)
    }

    pub fn semantic(message: impl Into<String>, severity: Severity, range: Option<Span>) -> Self {
        Self::new(IssueType::Semantic, severity, message, range)
    }

    pub fn translation(message: impl Into<String>, severity: Severity, range: Option<Span>) -> Self {
        Self::new(IssueType::Translation, severity, message, range)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.range {
            Some(range) => write!(f, "{} at {}: {}", self.severity.as_str(), range, self.message),
            None => write!(f, "{}: {}", self.severity.as_str(), self.message),
        }
    }
}
