//! Error codes, grouped by phase:
//! - `E0xx` - XML syntax errors
//! - `E1xx` - Documentation structure problems
//! - `E2xx` - Loading problems
//! - `E3xx` - Inheritance problems

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Syntax Errors (E0xx)
    // =========================================================================
    /// Unterminated comment.
    ///
    /// A `<!--` was never closed with `-->`.
    E001,

    /// Unterminated CDATA section.
    ///
    /// A `<![CDATA[` was never closed with `]]>`.
    E002,

    /// Unexpected character.
    ///
    /// A character was encountered that is not valid in this context.
    E003,

    /// Invalid entity reference.
    ///
    /// Only `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;` and numeric
    /// references such as `&#65;` or `&#x41;` are recognized.
    E004,

    /// Mismatched closing tag.
    ///
    /// A closing tag does not name the element it closes.
    E005,

    /// Unexpected end of input.
    ///
    /// The file ended before every element was closed.
    E006,

    /// Unterminated attribute value.
    ///
    /// A quoted attribute value was never closed.
    E007,

    /// Invalid text encoding.
    ///
    /// Documentation files are read as UTF-8.
    E008,

    // =========================================================================
    // Structure Errors (E1xx)
    // =========================================================================
    /// Unexpected root element.
    ///
    /// A documentation file must have a `<doc>` root element.
    E100,

    /// Documentation entry without a name.
    ///
    /// A `<member>` element has no `name` attribute.
    E101,

    /// Invalid documentation entry name.
    ///
    /// The `name` attribute of a `<member>` is not a valid reference.
    E102,

    // =========================================================================
    // Loading Errors (E2xx)
    // =========================================================================
    /// Documentation for an unknown type.
    ///
    /// An entry documents a type the module does not declare.
    E200,

    /// Invalid type manifest.
    ///
    /// The `.types.toml` next to a documentation file could not be parsed;
    /// the file is skipped.
    E201,

    /// Missing type manifest.
    ///
    /// A reference documentation file has no `.types.toml` next to it, so
    /// none of its types can be inherited from.
    E202,

    // =========================================================================
    // Inheritance Errors (E3xx)
    // =========================================================================
    /// Cyclic type hierarchy.
    ///
    /// A type is its own ancestor, directly or through other types.
    E300,

    /// Ambiguous member match.
    ///
    /// Several documentation entries carry the same key; the first is used.
    E301,

    /// Unresolved inheritance reference.
    ///
    /// A `cref` names a type or member without documentation.
    E302,

    /// Inheritance iteration limit.
    ///
    /// Placeholders kept reappearing, usually because references feed
    /// each other.
    E303,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            ErrorCode::E006 => "E006",
            ErrorCode::E007 => "E007",
            ErrorCode::E008 => "E008",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::E303 => "E303",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated comment",
            ErrorCode::E002 => "unterminated CDATA section",
            ErrorCode::E003 => "unexpected character",
            ErrorCode::E004 => "invalid entity reference",
            ErrorCode::E005 => "mismatched closing tag",
            ErrorCode::E006 => "unexpected end of input",
            ErrorCode::E007 => "unterminated attribute value",
            ErrorCode::E008 => "invalid text encoding",
            ErrorCode::E100 => "unexpected root element",
            ErrorCode::E101 => "documentation entry without a name",
            ErrorCode::E102 => "invalid documentation entry name",
            ErrorCode::E200 => "documentation for an unknown type",
            ErrorCode::E201 => "invalid type manifest",
            ErrorCode::E202 => "missing type manifest",
            ErrorCode::E300 => "cyclic type hierarchy",
            ErrorCode::E301 => "ambiguous member match",
            ErrorCode::E302 => "unresolved inheritance reference",
            ErrorCode::E303 => "inheritance iteration limit",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
