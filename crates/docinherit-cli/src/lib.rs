//! CLI logic for the DocInherit documentation tool.
//!
//! This module loads the configuration, layers the command-line options on
//! top of it, and hands the result to [`InheritDoc`].

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use log::info;

use docinherit::{DocInheritError, InheritDoc, RunReport};

/// Run the DocInherit CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `DocInheritError` for:
/// - Configuration loading errors
/// - File I/O errors
/// - A cyclic type hierarchy
pub fn run(args: &Args) -> Result<RunReport, DocInheritError> {
    info!(
        base_path:? = args.base_path,
        overwrite = args.overwrite;
        "Processing documentation"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let app_config = config::apply_args(app_config, args);

    let report = InheritDoc::new(app_config).run()?;

    info!(
        replaced = report.replaced(),
        written = report.written().len(),
        diagnostics = report.diagnostic_count();
        "Documentation processed"
    );

    Ok(report)
}
