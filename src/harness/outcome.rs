//! Outcome model and classification.
//!
//! Assertion atoms produce `CheckOutcome` values. The harness treats them
//! as opaque apart from the small query surface consumed by
//! `OutcomeKind::classify`, which maps every raw value to exactly one of
//! the five outcome classes.

use serde::Serialize;

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// The closed set of outcome classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Ok,
    Skip,
    Warning,
    Failure,
    Error,
}

impl OutcomeKind {
    /// Classify a raw check value. Total: every value maps to exactly one
    /// class. Pure: no side effects, same input gives the same class.
    pub fn classify(check: &CheckOutcome) -> OutcomeKind {
        if check.errored {
            OutcomeKind::Error
        } else if check.skipped {
            OutcomeKind::Skip
        } else if check.warned {
            OutcomeKind::Warning
        } else if check.passed {
            OutcomeKind::Ok
        } else {
            OutcomeKind::Failure
        }
    }

    /// Failure and Error both count toward the failed tally; they differ
    /// only in header text.
    pub fn is_failing(&self) -> bool {
        matches!(self, OutcomeKind::Failure | OutcomeKind::Error)
    }

    pub fn header_word(&self) -> &'static str {
        match self {
            OutcomeKind::Error => "Error",
            _ => "Failure",
        }
    }
}

// ============================================================================
// RAW CHECK VALUES
// ============================================================================

/// Reference to the source position a check was written at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRef {
    pub file: String,
    pub line: usize,
}

/// The raw result of evaluating one check expression.
///
/// Constructed only by the assertion atoms; the disposition flags are
/// private and queried only through [`OutcomeKind::classify`].
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    label: String,
    location: Option<SourceRef>,
    message: String,
    detail: Option<String>,
    passed: bool,
    skipped: bool,
    warned: bool,
    errored: bool,
}

impl CheckOutcome {
    pub fn pass(label: String, location: Option<SourceRef>) -> Self {
        Self {
            label,
            location,
            message: String::new(),
            detail: None,
            passed: true,
            skipped: false,
            warned: false,
            errored: false,
        }
    }

    pub fn fail(
        label: String,
        location: Option<SourceRef>,
        message: String,
        detail: Option<String>,
    ) -> Self {
        Self {
            label,
            location,
            message,
            detail,
            passed: false,
            skipped: false,
            warned: false,
            errored: false,
        }
    }

    pub fn error(
        label: String,
        location: Option<SourceRef>,
        message: String,
        detail: Option<String>,
    ) -> Self {
        Self {
            label,
            location,
            message,
            detail,
            passed: false,
            skipped: false,
            warned: false,
            errored: true,
        }
    }

    pub fn skip(label: String, location: Option<SourceRef>, reason: String) -> Self {
        Self {
            label,
            location,
            message: reason,
            detail: None,
            passed: false,
            skipped: true,
            warned: false,
            errored: false,
        }
    }

    pub fn warn(label: String, location: Option<SourceRef>, message: String) -> Self {
        Self {
            label,
            location,
            message,
            detail: None,
            passed: false,
            skipped: false,
            warned: true,
            errored: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn location(&self) -> Option<&SourceRef> {
        self.location.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

// ============================================================================
// REPORTED OUTCOMES
// ============================================================================

/// An outcome as the reporter sees it: classified and immutable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub label: String,
    pub location: Option<SourceRef>,
    pub message: String,
    pub detail: Option<String>,
}

impl Outcome {
    pub fn from_check(check: &CheckOutcome) -> Self {
        Self {
            kind: OutcomeKind::classify(check),
            label: check.label.clone(),
            location: check.location.clone(),
            message: check.message.clone(),
            detail: check.detail.clone(),
        }
    }

    /// A synthetic Error-class outcome for a file that could not be read,
    /// parsed, or finished.
    pub fn synthetic_error(label: String, location: Option<SourceRef>, message: String) -> Self {
        Self {
            kind: OutcomeKind::Error,
            label,
            location,
            message,
            detail: None,
        }
    }

    /// One-line failure header. The trailing space is intentional so a
    /// rule drawn after the header reads as a separator.
    pub fn failure_header(&self) -> String {
        let location = match &self.location {
            Some(loc) => format!(" (@{}#{})", loc.file, loc.line),
            None => String::new(),
        };
        format!("{}: {}{} ", self.kind.header_word(), self.label, location)
    }
}

/// A failure/error retained by a reporter for the end-of-suite index.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureRecord {
    pub context: String,
    pub outcome: Outcome,
}
