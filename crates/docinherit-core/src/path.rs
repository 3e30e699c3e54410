//! Name paths addressing content inside a fragment.

use std::fmt;

use crate::node::{Element, KEY_ATTRIBUTE};

/// One step of a [`DocPath`]: an element name, optionally qualified by the
/// element's `name` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    name: String,
    key: Option<String>,
}

impl PathSegment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// The segment that addresses `element` among its siblings.
    pub fn of(element: &Element) -> Self {
        Self {
            name: element.name().to_string(),
            key: element.attribute(KEY_ATTRIBUTE).map(str::to_string),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns `true` if `element` is addressed by this segment.
    pub fn matches(&self, element: &Element) -> bool {
        element.name() == self.name
            && self
                .key
                .as_deref()
                .is_none_or(|key| element.attribute(KEY_ATTRIBUTE) == Some(key))
    }

    /// A fresh, empty element this segment would address.
    pub fn to_element(&self) -> Element {
        let element = Element::new(self.name.clone());
        match &self.key {
            Some(key) => element.with_attribute(KEY_ATTRIBUTE, key.clone()),
            None => element,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}[{}]", self.name, key),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Sequence of segments from a fragment root down to a node.
///
/// The empty path addresses the whole fragment.
///
/// # Examples
///
/// ```
/// use docinherit_core::path::{DocPath, PathSegment};
///
/// let path = DocPath::from(vec![
///     PathSegment::new("summary"),
///     PathSegment::new("para"),
/// ]);
/// assert_eq!(path.to_string(), "summary/para");
/// assert!(DocPath::root().is_root());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DocPath(Vec<PathSegment>);

impl DocPath {
    /// The empty path.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<PathSegment>> for DocPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for (idx, segment) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, "/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
