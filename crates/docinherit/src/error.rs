//! Error types for inheritance runs.

use std::{io, path::PathBuf};

use thiserror::Error;

use docinherit_core::identifier::Id;

/// The main error type of a run.
///
/// Only conditions that make the whole run meaningless are errors;
/// problems confined to one file or one entry are reported as diagnostics
/// in the [`RunReport`](crate::RunReport).
#[derive(Debug, Error)]
pub enum DocInheritError {
    #[error("I/O error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cyclic type hierarchy: {}", format_cycles(.cycles))]
    CyclicHierarchy { cycles: Vec<Vec<Id>> },
}

impl DocInheritError {
    /// Create an `Io` error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn format_cycles(cycles: &[Vec<Id>]) -> String {
    cycles
        .iter()
        .map(|cycle| {
            cycle
                .iter()
                .map(Id::as_string)
                .collect::<Vec<_>>()
                .join(" -> ")
        })
        .collect::<Vec<_>>()
        .join("; ")
}
