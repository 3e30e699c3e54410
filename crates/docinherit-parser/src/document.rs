//! Parsed documentation files.

use docinherit_core::{
    node::{Content, Element, KEY_ATTRIBUTE},
    tree::MEMBER_ELEMENT,
};

use crate::span::Span;

/// Name of the root element of a documentation file.
pub const DOC_ELEMENT: &str = "doc";

/// Name of the element holding the documentation entries.
pub const MEMBERS_ELEMENT: &str = "members";

const ASSEMBLY_ELEMENT: &str = "assembly";
const ASSEMBLY_NAME_ELEMENT: &str = "name";

const DEFAULT_ENTRY_INDENT: &str = "\n        ";
const DEFAULT_CLOSING_INDENT: &str = "\n    ";

/// One child element of `<members>`, with its source location when the
/// file was parsed.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    element: &'a Element,
    span: Option<Span>,
}

impl<'a> Entry<'a> {
    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Returns `true` for `<member>` elements; anything else under
    /// `<members>` is foreign content.
    pub fn is_member(&self) -> bool {
        self.element.name() == MEMBER_ELEMENT
    }

    /// The raw `name` attribute.
    pub fn name(&self) -> Option<&'a str> {
        self.element.attribute(KEY_ATTRIBUTE)
    }
}

/// A documentation file: `<doc>` root with an optional `<assembly>` header
/// and a `<members>` list of entries.
///
/// Text outside the root element (declaration, comments, whitespace) is
/// kept so the file can be written back unchanged apart from its entries.
#[derive(Debug, Clone)]
pub struct DocFile {
    declaration: Option<String>,
    prolog: Vec<Content>,
    root: Element,
    root_tag: Span,
    epilog: Vec<Content>,
    entry_spans: Vec<Span>,
}

impl DocFile {
    /// A document without declaration or source locations.
    pub fn new(root: Element) -> Self {
        Self {
            declaration: None,
            prolog: Vec::new(),
            root,
            root_tag: Span::default(),
            epilog: Vec::new(),
            entry_spans: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        declaration: Option<String>,
        prolog: Vec<Content>,
        root: Element,
        root_tag: Span,
        epilog: Vec<Content>,
        entry_spans: Vec<Span>,
    ) -> Self {
        Self {
            declaration,
            prolog,
            root,
            root_tag,
            epilog,
            entry_spans,
        }
    }

    /// The XML declaration, verbatim.
    pub fn declaration(&self) -> Option<&str> {
        self.declaration.as_deref()
    }

    pub fn prolog(&self) -> &[Content] {
        &self.prolog
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Location of the root start tag name.
    pub fn root_tag(&self) -> Span {
        self.root_tag
    }

    pub fn epilog(&self) -> &[Content] {
        &self.epilog
    }

    /// Text of `<assembly><name>`, trimmed.
    pub fn assembly_name(&self) -> Option<String> {
        let name = self
            .root
            .child_elements()
            .find(|element| element.name() == ASSEMBLY_ELEMENT)?
            .child_elements()
            .find(|element| element.name() == ASSEMBLY_NAME_ELEMENT)?
            .text();
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    fn members(&self) -> Option<&Element> {
        self.root
            .child_elements()
            .find(|element| element.name() == MEMBERS_ELEMENT)
    }

    /// The child elements of the first `<members>` element in document
    /// order.
    pub fn entries(&self) -> Vec<Entry<'_>> {
        let Some(members) = self.members() else {
            return Vec::new();
        };
        members
            .child_elements()
            .enumerate()
            .map(|(index, element)| Entry {
                element,
                span: self.entry_spans.get(index).copied(),
            })
            .collect()
    }

    /// Replace the entries, one per line with the indentation the file
    /// already uses. A missing `<members>` element is created.
    ///
    /// Source locations no longer apply afterwards and are dropped.
    pub fn set_entries(&mut self, entries: Vec<Element>) {
        self.entry_spans.clear();

        let position = self
            .root
            .children()
            .iter()
            .position(|child| child.as_element().is_some_and(|e| e.name() == MEMBERS_ELEMENT));
        let index = match position {
            Some(index) => index,
            None => {
                self.root.push(Content::Text(DEFAULT_CLOSING_INDENT.to_string()));
                self.root.push(Content::Element(Element::new(MEMBERS_ELEMENT)));
                self.root.push(Content::Text("\n".to_string()));
                self.root.children().len() - 2
            }
        };
        let Content::Element(members) = &mut self.root.children_mut()[index] else {
            unreachable!("index points at the members element");
        };

        let existing = members.children();
        let (indent, closing) = if existing.len() > 1 {
            (
                existing.first().and_then(whitespace).unwrap_or(DEFAULT_ENTRY_INDENT),
                existing.last().and_then(whitespace).unwrap_or(DEFAULT_CLOSING_INDENT),
            )
        } else {
            (DEFAULT_ENTRY_INDENT, DEFAULT_CLOSING_INDENT)
        };
        let (indent, closing) = (indent.to_string(), closing.to_string());

        let mut children = Vec::with_capacity(entries.len() * 2 + 1);
        for entry in entries {
            children.push(Content::Text(indent.clone()));
            children.push(Content::Element(entry));
        }
        if !children.is_empty() {
            children.push(Content::Text(closing));
        }
        members.set_children(children);
    }
}

fn whitespace(content: &Content) -> Option<&str> {
    match content {
        Content::Text(text) if text.trim().is_empty() => Some(text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str) -> Element {
        Element::new(MEMBER_ELEMENT).with_attribute("name", name)
    }

    #[test]
    fn test_assembly_name() {
        let doc = DocFile::new(
            Element::new(DOC_ELEMENT).with_child(
                Element::new("assembly").with_child(Element::new("name").with_text(" Acme.Widgets\n")),
            ),
        );
        assert_eq!(doc.assembly_name().as_deref(), Some("Acme.Widgets"));

        let anonymous = DocFile::new(Element::new(DOC_ELEMENT));
        assert_eq!(anonymous.assembly_name(), None);
    }

    #[test]
    fn test_entries_without_members() {
        let doc = DocFile::new(Element::new(DOC_ELEMENT));
        assert!(doc.entries().is_empty());
    }

    #[test]
    fn test_entries_flag_foreign_content() {
        let doc = DocFile::new(
            Element::new(DOC_ELEMENT).with_child(
                Element::new(MEMBERS_ELEMENT)
                    .with_child(member("T:Acme.ClassA"))
                    .with_child(Element::new("include")),
            ),
        );
        let entries = doc.entries();

        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_member());
        assert_eq!(entries[0].name(), Some("T:Acme.ClassA"));
        assert!(!entries[1].is_member());
        assert_eq!(entries[1].span(), None);
    }

    #[test]
    fn test_set_entries_keeps_indentation() {
        let mut doc = DocFile::new(
            Element::new(DOC_ELEMENT).with_child(
                Element::new(MEMBERS_ELEMENT)
                    .with_text("\n    ")
                    .with_child(member("T:Acme.ClassA"))
                    .with_text("\n  "),
            ),
        );

        doc.set_entries(vec![member("T:Acme.ClassA"), member("T:Acme.ClassB")]);

        let members = doc.members().unwrap();
        assert_eq!(
            members.children(),
            &[
                Content::Text("\n    ".to_string()),
                Content::Element(member("T:Acme.ClassA")),
                Content::Text("\n    ".to_string()),
                Content::Element(member("T:Acme.ClassB")),
                Content::Text("\n  ".to_string()),
            ]
        );
    }

    #[test]
    fn test_set_entries_creates_members() {
        let mut doc = DocFile::new(Element::new(DOC_ELEMENT));

        doc.set_entries(vec![member("T:Acme.ClassA")]);

        let entries = doc.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name(), Some("T:Acme.ClassA"));
    }
}
