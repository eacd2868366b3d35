//! Tessera error handling.
//!
//! One crate-wide error type with a kind enum, source information for
//! miette rendering, and stable error codes. Suite-level abort is the
//! distinguished `ErrorKind::SuiteFailed` variant returned from suite
//! finalization; it is never raised mid-run.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Source context for error reporting: a named piece of script content.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from real file content.
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Create a fallback when real source is unavailable.
    pub fn fallback(context: &str) -> Self {
        Self {
            name: "fallback".to_string(),
            content: format!("; {}", context),
        }
    }

    /// Convert to NamedSource for use with miette error reporting.
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

impl Default for SourceContext {
    fn default() -> Self {
        Self::fallback("default context")
    }
}

// ============================================================================
// ERROR TYPE
// ============================================================================

/// The single error type: kind plus location plus diagnostic enhancement.
#[derive(Debug)]
pub struct TesseraError {
    pub kind: ErrorKind,
    pub source_info: SourceInfo,
    pub diagnostic_info: DiagnosticInfo,
}

/// All error kinds as a clean enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // Parse errors
    #[error("Parse error: {message}")]
    Syntax { message: String },
    #[error("Parse error: invalid {literal_type} '{value}'")]
    InvalidLiteral { literal_type: String, value: String },
    #[error("Parse error: missing {element}")]
    MissingElement { element: String },

    // Runtime errors
    #[error("Runtime error: undefined symbol '{symbol}'")]
    UndefinedSymbol { symbol: String },
    #[error("Type error: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },
    #[error("Runtime error: incorrect arity for '{name}', expected {expected}, got {actual}")]
    ArityMismatch {
        name: String,
        expected: String,
        actual: usize,
    },
    #[error("Runtime error: '{value}' is not callable")]
    NotCallable { value: String },
    #[error("Runtime error: division by zero")]
    DivisionByZero,
    #[error("Runtime error: recursion limit exceeded")]
    RecursionLimit,

    // Harness errors
    #[error("Harness error: {message} ({path})")]
    SuiteIo { path: String, message: String },
    #[error("Suite failed: {failures} failing, {warnings} warning(s)")]
    SuiteFailed { failures: usize, warnings: usize },
}

/// Context-specific source information.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
    pub phase: String,
}

/// Diagnostic enhancement data.
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

impl ErrorKind {
    /// Get the error category, used for phase labels and test assertions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Syntax { .. } | Self::InvalidLiteral { .. } | Self::MissingElement { .. } => {
                ErrorCategory::Parse
            }

            Self::UndefinedSymbol { .. }
            | Self::TypeMismatch { .. }
            | Self::ArityMismatch { .. }
            | Self::NotCallable { .. }
            | Self::DivisionByZero
            | Self::RecursionLimit => ErrorCategory::Runtime,

            Self::SuiteIo { .. } | Self::SuiteFailed { .. } => ErrorCategory::Harness,
        }
    }

    /// Get error code suffix for diagnostic codes.
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::Syntax { .. } => "syntax",
            Self::InvalidLiteral { .. } => "invalid_literal",
            Self::MissingElement { .. } => "missing_element",
            Self::UndefinedSymbol { .. } => "undefined_symbol",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::ArityMismatch { .. } => "arity_mismatch",
            Self::NotCallable { .. } => "not_callable",
            Self::DivisionByZero => "division_by_zero",
            Self::RecursionLimit => "recursion_limit",
            Self::SuiteIo { .. } => "suite_io",
            Self::SuiteFailed { .. } => "suite_failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Parse,
    Runtime,
    Harness,
}

impl std::error::Error for TesseraError {}

impl fmt::Display for TesseraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Diagnostic for TesseraError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.primary_label()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

impl TesseraError {
    fn primary_label(&self) -> String {
        match &self.kind {
            ErrorKind::Syntax { .. } => "invalid syntax".into(),
            ErrorKind::InvalidLiteral { .. } => "invalid literal".into(),
            ErrorKind::MissingElement { .. } => "missing here".into(),
            ErrorKind::UndefinedSymbol { .. } => "undefined symbol".into(),
            ErrorKind::TypeMismatch { .. } => "type mismatch".into(),
            ErrorKind::ArityMismatch { .. } => "arity mismatch".into(),
            ErrorKind::NotCallable { .. } => "not callable".into(),
            ErrorKind::DivisionByZero => "division by zero".into(),
            ErrorKind::RecursionLimit => "recursion limit exceeded".into(),
            ErrorKind::SuiteIo { .. } => "suite i/o failure".into(),
            ErrorKind::SuiteFailed { .. } => "suite failed".into(),
        }
    }

    /// Construct a harness-level error with no meaningful source location.
    pub fn harness(kind: ErrorKind) -> Self {
        let code = format!("tessera::harness::{}", kind.code_suffix());
        Self {
            kind,
            source_info: SourceInfo {
                source: SourceContext::fallback("harness").to_named_source(),
                primary_span: unspanned(),
                phase: "harness".into(),
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code: code,
            },
        }
    }

    /// The distinguished suite-abort signal, raised only at suite end.
    pub fn suite_failed(failures: usize, warnings: usize) -> Self {
        Self::harness(ErrorKind::SuiteFailed { failures, warnings })
    }

    pub fn is_suite_failure(&self) -> bool {
        matches!(self.kind, ErrorKind::SuiteFailed { .. })
    }
}

/// Context-aware error creation: each context knows how to build errors
/// carrying its own source.
pub trait ErrorReporting {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> TesseraError;

    fn type_mismatch(&self, expected: &str, actual: &str, span: SourceSpan) -> TesseraError {
        self.report(
            ErrorKind::TypeMismatch {
                expected: expected.into(),
                actual: actual.into(),
            },
            span,
        )
    }

    fn undefined_symbol(&self, symbol: &str, span: SourceSpan) -> TesseraError {
        self.report(
            ErrorKind::UndefinedSymbol {
                symbol: symbol.into(),
            },
            span,
        )
    }

    fn arity_mismatch(
        &self,
        name: &str,
        expected: &str,
        actual: usize,
        span: SourceSpan,
    ) -> TesseraError {
        self.report(
            ErrorKind::ArityMismatch {
                name: name.into(),
                expected: expected.into(),
                actual,
            },
            span,
        )
    }
}

/// Creates a placeholder span for errors not tied to a specific source
/// location, such as I/O errors or harness state failures.
pub fn unspanned() -> SourceSpan {
    SourceSpan::from(0..0)
}

/// Converts a tessera AST span to a miette SourceSpan.
pub fn to_source_span(span: crate::ast::Span) -> SourceSpan {
    SourceSpan::from(span.start..span.end)
}

/// Prints a TesseraError with full miette diagnostics to stderr.
pub fn print_error(error: TesseraError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}
