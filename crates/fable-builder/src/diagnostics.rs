//! Validation diagnostics: stable codes, messages, and node references.

use std::fmt;

/// Severity level for diagnostics.
///
/// Errors block export and mark a story unplayable; warnings are purely
/// advisory and never alter control flow downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The story cannot be played or exported as-is.
    Error,
    /// Something looks off but nothing is blocked.
    Warning,
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity of the finding.
    pub severity: Severity,
    /// Stable identifier for the check that produced this finding,
    /// e.g. `dangling-goto` or `multiple-starts`.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
    /// The offending node or passage, when one can be named.
    pub node: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            node: None,
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            node: None,
        }
    }

    /// Attach the offending node or passage identifier.
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &self.node {
            Some(node) => write!(f, "{prefix}[{}]: {} ({node})", self.code, self.message),
            None => write!(f, "{prefix}[{}]: {}", self.code, self.message),
        }
    }
}

/// The outcome of validating a story document or builder graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Findings that block export, in check order.
    pub errors: Vec<Diagnostic>,
    /// Advisory findings, in check order.
    pub warnings: Vec<Diagnostic>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// File a diagnostic under the matching severity.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning => self.warnings.push(diagnostic),
        }
    }

    /// A story is valid exactly when it has no errors. Warnings never
    /// block anything.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// All findings, errors first.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().chain(self.warnings.iter())
    }
}
