//! XML syntax for documentation files.
//!
//! Only the subset documentation generators emit is understood: an optional
//! declaration, comments, elements with quoted attributes, text with the
//! predefined and numeric entities, and CDATA sections. Whitespace is kept
//! exactly as written.

use docinherit_core::node::{Content, Element};
use winnow::{
    Parser as _,
    ascii::{multispace0, multispace1},
    combinator::{cut_err, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, one_of, take_until, take_while},
};

use crate::{
    document::{DocFile, MEMBERS_ELEMENT},
    error::{Diagnostic, ErrorCode},
    span::Span,
};

/// Diagnostic context attached to winnow errors.
///
/// The error span covers from `start` to the position where parsing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SyntaxDiagnostic {
    code: ErrorCode,
    message: String,
    help: Option<&'static str>,
    start: usize,
    /// Start tag of the element left open, if relevant.
    opened: Option<Span>,
}

impl SyntaxDiagnostic {
    fn new(code: ErrorCode, message: impl Into<String>, start: usize) -> Self {
        Self {
            code,
            message: message.into(),
            help: None,
            start,
            opened: None,
        }
    }

    fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    fn with_opened(mut self, opened: Span) -> Self {
        self.opened = Some(opened);
        self
    }
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<SyntaxDiagnostic>>;

/// Spans of the entries inside the first `<members>` element.
type EntrySpans = Option<Vec<Span>>;

/// Parse a whole documentation file.
///
/// Returns the document on success, or a diagnostic describing the first
/// syntax error.
pub(crate) fn parse_document(source: &str) -> Result<DocFile, Diagnostic> {
    let mut input = LocatingSlice::new(source);
    match document(&mut input) {
        Ok(doc) => Ok(doc),
        Err(err) => {
            let error_pos = input.current_token_start();
            Err(convert_err_mode(err, error_pos))
        }
    }
}

fn document(input: &mut Input<'_>) -> IResult<DocFile> {
    if input.starts_with('\u{feff}') {
        '\u{feff}'.parse_next(input)?;
    }

    let declaration = if input.starts_with("<?xml") {
        Some(declaration(input)?.to_string())
    } else {
        None
    };

    let prolog = misc(input)?;

    if input.is_empty() {
        return Err(cut(
            input,
            SyntaxDiagnostic::new(ErrorCode::E006, "missing root element", 0)
                .with_help("add a `<doc>` element"),
        ));
    }
    if !input.starts_with('<') {
        let start = input.current_token_start();
        return Err(cut(
            input,
            SyntaxDiagnostic::new(ErrorCode::E003, "text outside of the root element", start),
        ));
    }

    let root_start = input.current_token_start();
    let mut entries: EntrySpans = None;
    let root = element(input, 0, &mut entries)?;
    let root_tag = Span::new(root_start..root_start + 1 + root.name().len());

    let epilog = misc(input)?;
    if !input.is_empty() {
        let start = input.current_token_start();
        return Err(cut(
            input,
            SyntaxDiagnostic::new(
                ErrorCode::E003,
                "unexpected content after the root element",
                start,
            )
            .with_help("a documentation file has exactly one root element"),
        ));
    }

    Ok(DocFile::from_parts(
        declaration,
        prolog,
        root,
        root_tag,
        epilog,
        entries.unwrap_or_default(),
    ))
}

/// `<?xml ... ?>`, returned verbatim.
fn declaration<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    let start = input.current_token_start();
    (
        "<?xml",
        cut_err(terminated(take_until(0.., "?>"), "?>")).context(
            SyntaxDiagnostic::new(ErrorCode::E006, "unterminated XML declaration", start)
                .with_help("close the declaration with `?>`"),
        ),
    )
        .take()
        .parse_next(input)
}

/// Whitespace and comments around the root element.
fn misc(input: &mut Input<'_>) -> IResult<Vec<Content>> {
    let mut out = Vec::new();
    loop {
        if input.starts_with("<!--") {
            out.push(Content::Comment(comment(input)?));
        } else if input.starts_with(|c: char| c.is_whitespace()) {
            let ws: &str = multispace1.parse_next(input)?;
            out.push(Content::Text(ws.to_string()));
        } else {
            return Ok(out);
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == ':'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.')
}

/// Element or attribute name.
fn xml_name<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    (one_of(is_name_start), take_while(0.., is_name_char))
        .take()
        .parse_next(input)
}

fn comment(input: &mut Input<'_>) -> IResult<String> {
    let start = input.current_token_start();
    "<!--".parse_next(input)?;
    cut_err(terminated(take_until(0.., "-->"), "-->"))
        .context(
            SyntaxDiagnostic::new(ErrorCode::E001, "unterminated comment", start)
                .with_help("close the comment with `-->`"),
        )
        .map(str::to_string)
        .parse_next(input)
}

fn cdata(input: &mut Input<'_>) -> IResult<String> {
    let start = input.current_token_start();
    "<![CDATA[".parse_next(input)?;
    cut_err(terminated(take_until(0.., "]]>"), "]]>"))
        .context(
            SyntaxDiagnostic::new(ErrorCode::E002, "unterminated CDATA section", start)
                .with_help("close the section with `]]>`"),
        )
        .map(str::to_string)
        .parse_next(input)
}

/// `&name;` or `&#NN;` / `&#xHH;`.
fn entity(input: &mut Input<'_>) -> IResult<char> {
    let start = input.current_token_start();
    '&'.parse_next(input)?;

    let invalid = || {
        SyntaxDiagnostic::new(ErrorCode::E004, "invalid entity reference", start)
            .with_help("escape a literal `&` as `&amp;`")
    };

    let body: &str = cut_err(terminated(
        take_while(1..=8, |c: char| c.is_ascii_alphanumeric() || c == '#'),
        ';',
    ))
    .context(invalid())
    .parse_next(input)?;

    let decoded = match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => body
            .strip_prefix("#x")
            .map(|hex| u32::from_str_radix(hex, 16))
            .or_else(|| body.strip_prefix('#').map(str::parse::<u32>))
            .and_then(Result::ok)
            .and_then(char::from_u32),
    };

    match decoded {
        Some(c) => Ok(c),
        None => Err(cut(input, invalid())),
    }
}

/// Character data up to the next tag.
fn text(input: &mut Input<'_>) -> IResult<String> {
    let mut out = String::new();
    loop {
        let run: &str = take_while(0.., |c: char| c != '<' && c != '&').parse_next(input)?;
        out.push_str(run);
        if input.starts_with('&') {
            out.push(entity(input)?);
        } else {
            return Ok(out);
        }
    }
}

fn attribute_value(input: &mut Input<'_>) -> IResult<String> {
    let start = input.current_token_start();
    let quote = one_of(['"', '\'']).parse_next(input)?;

    let mut out = String::new();
    loop {
        let run: &str =
            take_while(0.., |c: char| c != quote && c != '&' && c != '<').parse_next(input)?;
        out.push_str(run);
        if input.starts_with('&') {
            out.push(entity(input)?);
        } else {
            break;
        }
    }

    cut_err(quote)
        .context(
            SyntaxDiagnostic::new(ErrorCode::E007, "unterminated attribute value", start)
                .with_help("close the value with a matching quote"),
        )
        .parse_next(input)?;
    Ok(out)
}

fn attribute(input: &mut Input<'_>) -> IResult<(String, String)> {
    let start = input.current_token_start();
    let name = cut_err(xml_name)
        .context(
            SyntaxDiagnostic::new(ErrorCode::E003, "unexpected character in tag", start)
                .with_help("expected an attribute name, `>` or `/>`"),
        )
        .parse_next(input)?;

    multispace0.parse_next(input)?;
    cut_err('=')
        .context(
            SyntaxDiagnostic::new(ErrorCode::E003, "expected `=` after attribute name", start)
                .with_help("attributes are written as `name=\"value\"`"),
        )
        .parse_next(input)?;
    multispace0.parse_next(input)?;

    let value = cut_err(attribute_value)
        .context(
            SyntaxDiagnostic::new(ErrorCode::E003, "expected a quoted attribute value", start)
                .with_help("attributes are written as `name=\"value\"`"),
        )
        .parse_next(input)?;

    Ok((name.to_string(), value))
}

/// An element with everything beneath it.
///
/// `depth` is zero for the root element. Spans of the children of the first
/// `<members>` element directly under the root are collected into `entries`.
fn element(input: &mut Input<'_>, depth: usize, entries: &mut EntrySpans) -> IResult<Element> {
    let start = input.current_token_start();
    '<'.parse_next(input)?;

    let name = cut_err(xml_name)
        .context(
            SyntaxDiagnostic::new(ErrorCode::E003, "expected an element name", start)
                .with_help("element names start with a letter or `_`"),
        )
        .parse_next(input)?;
    let mut element = Element::new(name);

    loop {
        multispace0.parse_next(input)?;
        if input.starts_with("/>") {
            literal("/>").parse_next(input)?;
            return Ok(element);
        }
        if input.starts_with('>') {
            '>'.parse_next(input)?;
            break;
        }
        if input.is_empty() {
            return Err(cut(
                input,
                SyntaxDiagnostic::new(ErrorCode::E006, "unexpected end of input", start)
                    .with_help("close the start tag with `>`"),
            ));
        }
        let (attribute, value) = attribute(input)?;
        element.set_attribute(attribute, value);
    }

    let opened = Span::new(start..input.current_token_start());
    let collect = depth == 1 && name == MEMBERS_ELEMENT && entries.is_none();
    let mut spans = Vec::new();

    loop {
        if input.is_empty() {
            return Err(cut(
                input,
                SyntaxDiagnostic::new(
                    ErrorCode::E006,
                    format!("unexpected end of input, `<{name}>` is not closed"),
                    opened.start(),
                )
                .with_help("add the missing closing tag")
                .with_opened(opened),
            ));
        }

        if input.starts_with("</") {
            closing_tag(input, name, opened)?;
            break;
        } else if input.starts_with("<!--") {
            element.push(Content::Comment(comment(input)?));
        } else if input.starts_with("<![CDATA[") {
            element.push(Content::CData(cdata(input)?));
        } else if input.starts_with('<') {
            let child_start = input.current_token_start();
            let child = self::element(input, depth + 1, entries)?;
            if collect {
                spans.push(Span::new(child_start..input.current_token_start()));
            }
            element.push(Content::Element(child));
        } else {
            element.push(Content::Text(text(input)?));
        }
    }

    if collect {
        *entries = Some(spans);
    }
    Ok(element)
}

fn closing_tag(input: &mut Input<'_>, expected: &str, opened: Span) -> IResult<()> {
    let start = input.current_token_start();
    let mismatched = || {
        SyntaxDiagnostic::new(
            ErrorCode::E005,
            format!("mismatched closing tag, expected `</{expected}>`"),
            start,
        )
        .with_opened(opened)
    };

    literal("</").parse_next(input)?;
    let name = cut_err(xml_name).context(mismatched()).parse_next(input)?;
    multispace0.parse_next(input)?;
    cut_err('>')
        .context(
            SyntaxDiagnostic::new(ErrorCode::E003, "expected `>`", start)
                .with_help("closing tags are written as `</name>`"),
        )
        .parse_next(input)?;

    if name != expected {
        return Err(cut(input, mismatched()));
    }
    Ok(())
}

/// A committed error carrying `diagnostic` as context.
fn cut(input: &Input<'_>, diagnostic: SyntaxDiagnostic) -> ErrMode<ContextError<SyntaxDiagnostic>> {
    ErrMode::Cut(ContextError::new().add_context(input, &input.checkpoint(), diagnostic))
}

/// Convert an ErrMode and error position to a Diagnostic.
///
/// Falls back to E003 (unexpected character) if no diagnostic context is
/// found.
fn convert_err_mode(err: ErrMode<ContextError<SyntaxDiagnostic>>, error_pos: usize) -> Diagnostic {
    let context_error = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    if let Some(SyntaxDiagnostic {
        code,
        message,
        help,
        start,
        opened,
    }) = context_error.context().next()
    {
        let span = Span::new(*start..error_pos.max(*start + 1));
        let mut diag = Diagnostic::error(message.clone())
            .with_code(*code)
            .with_label(span, code.description());
        if let Some(opened) = opened.filter(|opened| opened.start() != span.start()) {
            diag = diag.with_secondary_label(opened, "opened here");
        }
        if let Some(h) = help {
            diag = diag.with_help(*h);
        }
        return diag;
    }

    let span = Span::new(error_pos..error_pos.saturating_add(1));
    Diagnostic::error("unexpected character")
        .with_code(ErrorCode::E003)
        .with_label(span, ErrorCode::E003.description())
}
