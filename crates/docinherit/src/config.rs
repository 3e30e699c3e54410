//! Run configuration.
//!
//! [`AppConfig`] implements [`serde::Deserialize`] so the command line can
//! load it from a TOML file; every field is optional.
//!
//! # Example
//!
//! ```
//! # use docinherit::config::AppConfig;
//! let config: AppConfig = toml::from_str(r#"
//!     base_path = "build/bin"
//!     file_patterns = ["Acme.*.xml"]
//!     exclude_types = ["System.Object"]
//! "#).unwrap();
//!
//! assert!(!config.overwrite());
//! assert!(config.is_type_excluded("System.Object"));
//! ```

use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::Deserialize;

use crate::error::DocInheritError;

/// Settings of one inheritance run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Directory searched for documentation files; the current directory
    /// when unset.
    #[serde(default)]
    base_path: Option<PathBuf>,

    /// File-name wildcards selecting documentation files. Empty selects all.
    #[serde(default)]
    file_patterns: Vec<String>,

    /// Documentation files searched for inherited content but never written.
    #[serde(default)]
    reference_docs: Vec<PathBuf>,

    /// Type-name wildcards whose documentation is ignored.
    #[serde(default)]
    exclude_types: Vec<String>,

    /// Replace the input files instead of writing `.new.xml` siblings.
    #[serde(default)]
    overwrite: bool,
}

impl AppConfig {
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    pub fn with_file_patterns(mut self, patterns: Vec<String>) -> Self {
        self.file_patterns = patterns;
        self
    }

    pub fn with_reference_docs(mut self, docs: Vec<PathBuf>) -> Self {
        self.reference_docs = docs;
        self
    }

    pub fn with_exclude_types(mut self, patterns: Vec<String>) -> Self {
        self.exclude_types = patterns;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// The configured base path, if any.
    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }

    pub fn file_patterns(&self) -> &[String] {
        &self.file_patterns
    }

    pub fn reference_docs(&self) -> &[PathBuf] {
        &self.reference_docs
    }

    pub fn exclude_types(&self) -> &[String] {
        &self.exclude_types
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    /// Returns `true` if `type_name` matches an exclusion pattern.
    ///
    /// Invalid patterns never match; [`validate`](Self::validate) reports
    /// them.
    pub fn is_type_excluded(&self, type_name: &str) -> bool {
        self.exclude_types
            .iter()
            .any(|pattern| Pattern::new(pattern).is_ok_and(|p| p.matches(type_name)))
    }

    /// Check that every wildcard pattern compiles.
    ///
    /// # Errors
    ///
    /// Returns [`DocInheritError::Config`] naming the first invalid pattern.
    pub fn validate(&self) -> Result<(), DocInheritError> {
        for pattern in self.file_patterns.iter().chain(&self.exclude_types) {
            Pattern::new(pattern).map_err(|err| {
                DocInheritError::Config(format!("invalid pattern `{pattern}`: {err}"))
            })?;
        }
        Ok(())
    }
}
