//! Discovery of documentation files below a base directory.

use std::path::{Path, PathBuf};

use glob::Pattern;
use log::{debug, trace};
use walkdir::WalkDir;

use crate::error::DocInheritError;

/// Suffix of files written next to their input.
pub const OUTPUT_SUFFIX: &str = ".new.xml";

/// All `*.xml` files below `base` whose file name matches one of
/// `patterns`, sorted by path. No patterns select every file.
///
/// Previous outputs (`*.new.xml`) are never selected.
///
/// # Errors
///
/// Returns [`DocInheritError::Config`] for an invalid pattern and
/// [`DocInheritError::Io`] when `base` cannot be walked.
pub fn find_documentation(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, DocInheritError> {
    let patterns = patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern)
                .map_err(|err| DocInheritError::Config(format!("invalid pattern `{pattern}`: {err}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut files = Vec::new();
    for entry in WalkDir::new(base).follow_links(true) {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(base).to_path_buf();
            DocInheritError::io(path, err.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !is_candidate(&name) {
            continue;
        }
        if !patterns.is_empty() && !patterns.iter().any(|pattern| pattern.matches(&name)) {
            trace!(path:? = entry.path(); "File name does not match any pattern");
            continue;
        }
        files.push(entry.into_path());
    }

    files.sort();
    debug!(base:? = base, files = files.len(); "Found documentation files");
    Ok(files)
}

fn is_candidate(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    lower.ends_with(".xml") && !lower.ends_with(OUTPUT_SUFFIX)
}

/// Where the rewritten form of `path` goes.
pub fn output_path(path: &Path, overwrite: bool) -> PathBuf {
    if overwrite {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}{OUTPUT_SUFFIX}"))
}
