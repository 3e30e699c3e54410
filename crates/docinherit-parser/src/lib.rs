//! # DocInherit Parser
//!
//! Reading and writing of XML documentation files.
//!
//! ## Usage
//!
//! ```
//! # use docinherit_parser::{parse, write, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"<doc>
//!     <members>
//!         <member name="T:Acme.ClassAB"><inheritdoc/></member>
//!     </members>
//! </doc>"#;
//!
//!     let doc = parse(source)?;
//!     assert_eq!(doc.entries().len(), 1);
//!     assert!(write(&doc).contains("<inheritdoc />"));
//!     Ok(())
//! }
//! ```

mod document;
pub mod error;
mod parser;
mod span;
mod writer;

pub use document::{DOC_ELEMENT, DocFile, Entry, MEMBERS_ELEMENT};
pub use span::Span;
pub use writer::write;

use log::trace;

use error::{Diagnostic, ErrorCode, ParseError};

/// Parse a documentation file.
///
/// # Errors
///
/// Returns a [`ParseError`] for malformed XML or when the root element is
/// not `<doc>`.
pub fn parse(source: &str) -> Result<DocFile, ParseError> {
    let doc = parser::parse_document(source)?;

    if doc.root().name() != DOC_ELEMENT {
        let diag = Diagnostic::error(format!(
            "root element must be `{DOC_ELEMENT}`, found `{}`",
            doc.root().name()
        ))
        .with_code(ErrorCode::E100)
        .with_label(doc.root_tag(), ErrorCode::E100.description())
        .with_help("documentation files start with `<doc>`");
        return Err(diag.into());
    }

    trace!(entries = doc.entries().len(); "Parsed documentation file");
    Ok(doc)
}
