//! Run reports.

use std::path::{Path, PathBuf};

use docinherit_core::identifier::Id;
use docinherit_parser::error::Diagnostic;

/// Diagnostics raised for one documentation file.
#[derive(Debug, Clone)]
pub struct FileDiagnostics {
    path: PathBuf,
    source: String,
    diagnostics: Vec<Diagnostic>,
}

impl FileDiagnostics {
    pub fn new(path: impl Into<PathBuf>, source: impl Into<String>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
            diagnostics,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File text the diagnostic spans point into.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|diag| diag.severity().is_error())
    }
}

/// What a run did.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    replaced: usize,
    written: Vec<PathBuf>,
    changed_types: Vec<Id>,
    diagnostics: Vec<FileDiagnostics>,
}

impl RunReport {
    pub(crate) fn new(replaced: usize, changed_types: Vec<Id>, diagnostics: Vec<FileDiagnostics>) -> Self {
        Self {
            replaced,
            written: Vec::new(),
            changed_types,
            diagnostics,
        }
    }

    pub(crate) fn set_written(&mut self, written: Vec<PathBuf>) {
        self.written = written;
    }

    pub(crate) fn prepend_diagnostics(&mut self, diagnostics: Vec<FileDiagnostics>) {
        self.diagnostics.splice(0..0, diagnostics);
    }

    /// Number of `<inheritdoc/>` placeholders removed.
    pub fn replaced(&self) -> usize {
        self.replaced
    }

    /// Files written, relative to the base path when below it.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Types whose documentation received inherited content.
    pub fn changed_types(&self) -> &[Id] {
        &self.changed_types
    }

    pub fn diagnostics(&self) -> &[FileDiagnostics] {
        &self.diagnostics
    }

    /// Number of diagnostics across all files.
    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics.iter().map(|file| file.diagnostics().len()).sum()
    }
}
