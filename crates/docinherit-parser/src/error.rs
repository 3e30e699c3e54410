//! Diagnostics for documentation files and inheritance runs.
//!
//! The error system is built around the [`Diagnostic`] type: a single error
//! or warning with an optional [`ErrorCode`], labeled source spans and help
//! text. Syntax failures of one file are wrapped in [`ParseError`]; the
//! inheritance engine reuses the same diagnostics for recoverable problems
//! it reports while loading and merging.
//!
//! # Example
//!
//! ```
//! # use docinherit_parser::error::{Diagnostic, ErrorCode};
//! # use docinherit_parser::Span;
//!
//! let diag = Diagnostic::warning("documentation entry has no `name` attribute")
//!     .with_code(ErrorCode::E101)
//!     .with_label(Span::new(120..158), "entry kept as is")
//!     .with_help("add `name=\"T:Namespace.Type\"` to the `<member>` element");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
