//! Path-addressed documentation fragments.
//!
//! A [`Fragment`] wraps the root [`Element`] of one documentation entry and
//! offers the operations the merger needs:
//!
//! - lookup of the node at a [`DocPath`]
//! - replacement (or creation) of the node content at a path
//! - pre-order search for the first inheritance placeholder
//! - placeholder removal with cleanup of parents left empty
//!
//! Nodes are addressed by explicit child-index lists while removing, and by
//! name paths while copying, so no node ever needs a link to its parent.

use log::trace;

use crate::{
    member::MemberKey,
    node::{Content, Element, PLACEHOLDER, REFERENCE_ATTRIBUTE},
    path::{DocPath, PathSegment},
};

/// An inheritance placeholder located inside a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Child indices from the fragment root to the placeholder element.
    location: Vec<usize>,
    /// Name path from the fragment root to the placeholder's parent.
    path: DocPath,
    /// Raw explicit target reference, if the placeholder carries one.
    reference: Option<String>,
}

impl Placeholder {
    pub fn location(&self) -> &[usize] {
        &self.location
    }

    /// Scope of the content to inherit.
    pub fn path(&self) -> &DocPath {
        &self.path
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// The explicit target reference parsed into a key, when present and
    /// well formed.
    pub fn target(&self) -> Option<MemberKey> {
        self.reference
            .as_deref()
            .and_then(|reference| MemberKey::parse(reference).ok())
    }

    /// Returns `true` when the placeholder sits directly under the fragment
    /// root and names no explicit target.
    pub fn is_unqualified(&self) -> bool {
        self.path.is_root() && self.reference.is_none()
    }
}

/// An owned documentation tree addressed by paths.
///
/// # Examples
///
/// ```
/// use docinherit_core::{
///     fragment::Fragment,
///     node::Element,
///     path::{DocPath, PathSegment},
/// };
///
/// let mut fragment = Fragment::new(
///     Element::new("member").with_child(Element::new("summary").with_child(Element::new("inheritdoc"))),
/// );
///
/// let placeholder = fragment.find_placeholder().expect("placeholder");
/// assert_eq!(placeholder.path().to_string(), "summary");
///
/// fragment.remove_placeholder(&placeholder);
/// assert!(!fragment.contains_placeholder());
/// assert!(!fragment.root().has_content());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    root: Element,
}

impl Fragment {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn into_root(self) -> Element {
        self.root
    }

    /// The node at `path`; the empty path yields the root.
    ///
    /// Every step follows the first child matching the segment.
    pub fn select(&self, path: &DocPath) -> Option<&Element> {
        let mut current = &self.root;
        for segment in path.segments() {
            current = current.child_elements().find(|child| segment.matches(child))?;
        }
        Some(current)
    }

    /// Returns `true` when the node at `path` exists and holds content.
    pub fn has_content_at(&self, path: &DocPath) -> bool {
        self.select(path).is_some_and(Element::has_content)
    }

    /// Replace the content of the node at `path`, creating missing nodes
    /// along the way. Anything previously beneath that node is discarded.
    pub fn replace_at(&mut self, path: &DocPath, children: Vec<Content>) {
        let mut current = &mut self.root;
        for segment in path.segments() {
            current = child_or_insert(current, segment);
        }
        current.set_children(children);
    }

    /// Copy the content found at `path` in `source` into `self` at the same
    /// path.
    ///
    /// Returns `false`, leaving `self` untouched, when `source` has no
    /// content there.
    pub fn copy_from(&mut self, source: &Fragment, path: &DocPath) -> bool {
        let Some(node) = source.select(path).filter(|node| node.has_content()) else {
            return false;
        };
        let children = node.children().to_vec();
        self.replace_at(path, children);
        true
    }

    /// Returns `true` if any descendant is a placeholder.
    pub fn contains_placeholder(&self) -> bool {
        self.root
            .descendants()
            .iter()
            .any(|element| element.name() == PLACEHOLDER)
    }

    /// Number of placeholders anywhere in the fragment.
    pub fn placeholder_count(&self) -> usize {
        self.root
            .descendants()
            .iter()
            .filter(|element| element.name() == PLACEHOLDER)
            .count()
    }

    /// The first placeholder in pre-order.
    pub fn find_placeholder(&self) -> Option<Placeholder> {
        let mut location = Vec::new();
        let mut path = DocPath::root();
        find_in(&self.root, &mut location, &mut path)
    }

    /// Remove a placeholder found by [`find_placeholder`](Self::find_placeholder).
    ///
    /// Parents left without elements and without non-whitespace text are
    /// removed as well, walking upwards but never removing the root.
    pub fn remove_placeholder(&mut self, placeholder: &Placeholder) {
        let mut location = placeholder.location.clone();
        while let Some(index) = location.pop() {
            let Some(parent) = element_at_mut(&mut self.root, &location) else {
                return;
            };
            if index < parent.children().len() {
                parent.children_mut().remove(index);
            }
            if location.is_empty() || parent.has_content() {
                return;
            }
            trace!(path:% = placeholder.path; "Pruning emptied documentation node");
        }
    }
}

/// First child matching `segment`, appended if there is none.
fn child_or_insert<'a>(element: &'a mut Element, segment: &PathSegment) -> &'a mut Element {
    let position = element
        .children()
        .iter()
        .position(|child| child.as_element().is_some_and(|e| segment.matches(e)));

    let index = match position {
        Some(index) => index,
        None => {
            element.push(Content::Element(segment.to_element()));
            element.children().len() - 1
        }
    };

    match &mut element.children_mut()[index] {
        Content::Element(child) => child,
        _ => unreachable!("index points at a matching element"),
    }
}

fn element_at_mut<'a>(root: &'a mut Element, location: &[usize]) -> Option<&'a mut Element> {
    let mut current = root;
    for &index in location {
        current = match current.children_mut().get_mut(index)? {
            Content::Element(child) => child,
            _ => return None,
        };
    }
    Some(current)
}

fn find_in(element: &Element, location: &mut Vec<usize>, path: &mut DocPath) -> Option<Placeholder> {
    for (index, child) in element.children().iter().enumerate() {
        let Content::Element(child) = child else {
            continue;
        };

        location.push(index);
        if child.name() == PLACEHOLDER {
            return Some(Placeholder {
                location: location.clone(),
                path: path.clone(),
                reference: child.attribute(REFERENCE_ATTRIBUTE).map(str::to_string),
            });
        }

        path.push(PathSegment::of(child));
        if let Some(found) = find_in(child, location, path) {
            return Some(found);
        }
        path.pop();
        location.pop();
    }
    None
}
