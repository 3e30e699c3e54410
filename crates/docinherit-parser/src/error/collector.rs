//! Collector for accumulating diagnostics while a file is processed.
//!
//! The [`DiagnosticCollector`] lets a phase report several problems
//! instead of failing on the first one.

use crate::error::{Diagnostic, ParseError};

/// A collector for accumulating diagnostics.
///
/// # Example
///
/// ```
/// # use docinherit_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode};
/// # use docinherit_parser::Span;
///
/// let mut collector = DiagnosticCollector::new();
///
/// collector.emit(
///     Diagnostic::warning("documentation for unknown type `Acme.Gone`")
///         .with_code(ErrorCode::E200)
///         .with_label(Span::new(0..10), "entry skipped"),
/// );
///
/// assert!(!collector.has_errors());
/// assert_eq!(collector.into_diagnostics().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    ///
    /// If it is an error the collector is marked as having errors.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Returns `true` once an error has been emitted.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Get all diagnostics emitted so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the collector and return every diagnostic, errors and warnings.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Finish collection and return a result.
    ///
    /// - If there are errors, returns `Err(ParseError)` with all diagnostics.
    /// - Otherwise returns the warnings, possibly none.
    pub fn finish(self) -> Result<Vec<Diagnostic>, ParseError> {
        if self.has_errors {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}
