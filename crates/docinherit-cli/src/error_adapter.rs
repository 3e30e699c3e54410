//! Error adapter for converting DocInherit errors and diagnostics to miette
//! reports.
//!
//! Fatal [`DocInheritError`]s are rendered without source snippets. The
//! per-file diagnostics of a [`RunReport`] are rendered one by one against
//! the text of the file they were raised for.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, Severity as MietteSeverity, SourceSpan};

use docinherit::{DocInheritError, FileDiagnostics, RunReport};
use docinherit_parser::error::{Diagnostic, ErrorCode, Severity};

/// Adapter for a single docinherit diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    /// Source text for displaying snippets
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        self.diag
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.diag.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for fatal [`DocInheritError`]s.
pub struct ErrorAdapter<'a>(pub &'a DocInheritError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            DocInheritError::Io { .. } => "docinherit::io",
            DocInheritError::Config(_) => "docinherit::config",
            DocInheritError::CyclicHierarchy { .. } => return Some(Box::new(ErrorCode::E300)),
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            DocInheritError::CyclicHierarchy { .. } => Some(Box::new(
                "a type must not inherit from itself; check `base` in the type manifests",
            )),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A fatal error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(_) => Some(MietteSeverity::Error),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a fatal [`DocInheritError`] into a list of reportable errors.
pub fn to_reportables(err: &DocInheritError) -> Vec<Reportable<'_>> {
    vec![Reportable::Error(ErrorAdapter(err))]
}

/// Convert a parser [`Span`](docinherit_parser::Span) to a miette [`SourceSpan`].
fn span_to_miette(span: docinherit_parser::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// The diagnostics of one file, each rendered against the file's text.
pub fn file_reportables(file: &FileDiagnostics) -> Vec<Reportable<'_>> {
    file.diagnostics()
        .iter()
        .map(|diag| Reportable::Diagnostic(DiagnosticAdapter::new(diag, file.source())))
        .collect()
}

/// All diagnostics of a run, paired with the file they belong to.
pub fn report_reportables(report: &RunReport) -> Vec<(&FileDiagnostics, Reportable<'_>)> {
    report
        .diagnostics()
        .iter()
        .flat_map(|file| {
            file_reportables(file)
                .into_iter()
                .map(move |reportable| (file, reportable))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use docinherit::identifier::Id;
    use docinherit_parser::Span;

    use super::*;

    #[test]
    fn test_file_diagnostics_share_source() {
        let file = FileDiagnostics::new(
            "Acme.xml",
            "<doc><members></doc>",
            vec![
                Diagnostic::error("mismatched closing tag")
                    .with_code(ErrorCode::E005)
                    .with_label(Span::new(14..20), "expected `</members>`"),
                Diagnostic::warning("second"),
            ],
        );

        let reportables = file_reportables(&file);

        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[0].to_string(), "mismatched closing tag");
        assert_eq!(reportables[0].code().map(|c| c.to_string()).as_deref(), Some("E005"));
        assert_eq!(reportables[0].severity(), Some(MietteSeverity::Error));
        assert_eq!(reportables[1].severity(), Some(MietteSeverity::Warning));
        assert!(reportables[1].labels().is_none());
    }

    #[test]
    fn test_all_labels_returned() {
        let diag = Diagnostic::error("error with labels")
            .with_label(Span::new(0..5), "primary")
            .with_secondary_label(Span::new(10..15), "secondary");

        let adapter = DiagnosticAdapter::new(&diag, "some source code");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label(), Some("primary"));
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
    }

    #[test]
    fn test_cycle_error_carries_code_and_help() {
        let err = DocInheritError::CyclicHierarchy {
            cycles: vec![vec![Id::new("Acme.Egg"), Id::new("Acme.Chicken")]],
        };
        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        let Reportable::Error(adapter) = &reportables[0] else {
            panic!("Expected Error");
        };

        assert_eq!(adapter.code().map(|c| c.to_string()).as_deref(), Some("E300"));
        assert!(adapter.help().is_some());
        assert_eq!(
            adapter.to_string(),
            "cyclic type hierarchy: Acme.Egg -> Acme.Chicken"
        );
    }

    #[test]
    fn test_rendered_report_mentions_code() {
        let diag = Diagnostic::warning("nothing to inherit from `T:Acme.Missing`").with_code(ErrorCode::E302);
        let adapter = DiagnosticAdapter::new(&diag, "");

        let mut out = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut out, &adapter)
            .unwrap();

        assert!(out.contains("E302"));
        assert!(out.contains("T:Acme.Missing"));
    }
}
