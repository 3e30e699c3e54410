//! Serializer for documentation files.

use docinherit_core::node::{Content, Element};

use crate::document::DocFile;

/// Write `doc` back to text.
///
/// Whitespace is written exactly as stored; text and attribute values are
/// escaped, CDATA sections and comments are written raw. Elements without
/// children are written as `<name />`.
pub fn write(doc: &DocFile) -> String {
    let mut out = String::new();
    if let Some(declaration) = doc.declaration() {
        out.push_str(declaration);
        if doc.prolog().is_empty() {
            out.push('\n');
        }
    }
    write_contents(&mut out, doc.prolog());
    write_element(&mut out, doc.root());
    write_contents(&mut out, doc.epilog());
    out
}

fn write_contents(out: &mut String, contents: &[Content]) {
    for content in contents {
        match content {
            Content::Element(element) => write_element(out, element),
            Content::Text(text) => escape_into(out, text, false),
            Content::CData(text) => {
                out.push_str("<![CDATA[");
                out.push_str(text);
                out.push_str("]]>");
            }
            Content::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
        }
    }
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(element.name());
    for attribute in element.attributes() {
        out.push(' ');
        out.push_str(attribute.name());
        out.push_str("=\"");
        escape_into(out, attribute.value(), true);
        out.push('"');
    }

    if element.children().is_empty() {
        out.push_str(" />");
        return;
    }

    out.push('>');
    write_contents(out, element.children());
    out.push_str("</");
    out.push_str(element.name());
    out.push('>');
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
