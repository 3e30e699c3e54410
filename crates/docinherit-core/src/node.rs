//! Documentation nodes.
//!
//! A documentation comment is an ordered tree of named elements with mixed
//! content: text runs, nested elements, CDATA sections and comments. Each
//! [`Element`] owns its children; there are no parent links.

/// Name of the inheritance placeholder element.
pub const PLACEHOLDER: &str = "inheritdoc";

/// Attribute carrying an explicit target reference on a placeholder.
pub const REFERENCE_ATTRIBUTE: &str = "cref";

/// Attribute that qualifies sibling elements sharing a name (`<param name="x">`).
pub const KEY_ATTRIBUTE: &str = "name";

/// One piece of element content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

impl Content {
    /// Returns the element if this is element content.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Content::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns `true` for whitespace-only text and for comments.
    pub fn is_blank(&self) -> bool {
        match self {
            Content::Element(_) | Content::CData(_) => false,
            Content::Text(text) => text.trim().is_empty(),
            Content::Comment(_) => true,
        }
    }
}

/// A name/value attribute pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A named documentation node.
///
/// # Examples
///
/// ```
/// use docinherit_core::node::{Content, Element};
///
/// let summary = Element::new("summary").with_text("ClassA-Class-Summary");
/// let root = Element::new("root").with_child(summary);
///
/// assert!(root.has_content());
/// assert_eq!(root.child_elements().count(), 1);
/// assert_eq!(root.text(), "ClassA-Class-Summary");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Content>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style [`set_attribute`](Self::set_attribute).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Append a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Content::Element(child));
        self
    }

    /// Append a text run.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Content::Text(text.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Value of the named attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(Attribute::value)
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|attribute| attribute.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    pub fn children(&self) -> &[Content] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Content> {
        &mut self.children
    }

    /// Replace all children.
    pub fn set_children(&mut self, children: Vec<Content>) {
        self.children = children;
    }

    pub fn push(&mut self, content: Content) {
        self.children.push(content);
    }

    /// Child elements in document order, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Content::as_element)
    }

    /// Returns `true` when the element holds a child element, CDATA or
    /// non-whitespace text.
    pub fn has_content(&self) -> bool {
        self.children.iter().any(|child| !child.is_blank())
    }

    /// Concatenated text of all descendant text and CDATA runs.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Content::Element(element) => element.collect_text(out),
                Content::Text(text) | Content::CData(text) => out.push_str(text),
                Content::Comment(_) => {}
            }
        }
    }

    /// Descendant elements (not including `self`) in pre-order.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        let mut stack: Vec<&Element> = self.child_elements().collect();
        stack.reverse();
        while let Some(element) = stack.pop() {
            out.push(element);
            let before = stack.len();
            stack.extend(element.child_elements());
            stack[before..].reverse();
        }
        out
    }
}
