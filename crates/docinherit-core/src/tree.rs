//! Per-type documentation trees.

use crate::{
    fragment::Fragment,
    identifier::Id,
    member::MemberKey,
    node::{Content, Element, KEY_ATTRIBUTE},
};

/// Element name of a documentation entry.
pub const MEMBER_ELEMENT: &str = "member";

/// Element name wrapping type-level content.
const ROOT_ELEMENT: &str = "root";

/// Documentation of one member, keyed by its [`MemberKey`].
///
/// The fragment root is the `<member>` element itself; its `name` attribute
/// always spells the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberFragment {
    key: MemberKey,
    fragment: Fragment,
}

impl MemberFragment {
    /// Wrap an entry element, overwriting its `name` attribute with `key`.
    pub fn new(key: MemberKey, mut element: Element) -> Self {
        element.set_attribute(KEY_ATTRIBUTE, key.to_string());
        Self {
            key,
            fragment: Fragment::new(element),
        }
    }

    /// An empty entry for `key`.
    pub fn empty(key: MemberKey) -> Self {
        Self::new(key, Element::new(MEMBER_ELEMENT))
    }

    pub fn key(&self) -> &MemberKey {
        &self.key
    }

    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    pub fn fragment_mut(&mut self) -> &mut Fragment {
        &mut self.fragment
    }

    /// A copy of this entry re-keyed to `key`.
    pub fn rekeyed(&self, key: MemberKey) -> Self {
        Self::new(key, self.fragment.root().clone())
    }
}

/// All documentation of one type: the root fragment with type-level
/// content plus the member fragments in document order.
///
/// # Examples
///
/// ```
/// use docinherit_core::{node::Element, tree::DocumentationTree};
///
/// let mut tree = DocumentationTree::new("Acme.ClassA");
/// tree.append_root_content(vec![]);
/// assert!(tree.has_root_entry());
/// assert!(!tree.is_changed());
///
/// tree.mark_changed();
/// assert!(tree.is_changed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationTree {
    type_name: Id,
    root: Fragment,
    has_root_entry: bool,
    members: Vec<MemberFragment>,
    changed: bool,
}

impl DocumentationTree {
    pub fn new(type_name: impl Into<Id>) -> Self {
        Self {
            type_name: type_name.into(),
            root: Fragment::new(Element::new(ROOT_ELEMENT)),
            has_root_entry: false,
            members: Vec::new(),
            changed: false,
        }
    }

    pub fn type_name(&self) -> Id {
        self.type_name
    }

    pub fn root(&self) -> &Fragment {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Fragment {
        &mut self.root
    }

    /// Append the children of a type-level entry to the root fragment.
    pub fn append_root_content(&mut self, children: Vec<Content>) {
        self.has_root_entry = true;
        self.root.root_mut().children_mut().extend(children);
    }

    /// Returns `true` when the source had a type-level entry for this type.
    pub fn has_root_entry(&self) -> bool {
        self.has_root_entry
    }

    pub fn members(&self) -> &[MemberFragment] {
        &self.members
    }

    pub fn member(&self, index: usize) -> Option<&MemberFragment> {
        self.members.get(index)
    }

    pub fn member_mut(&mut self, index: usize) -> Option<&mut MemberFragment> {
        self.members.get_mut(index)
    }

    pub fn push_member(&mut self, member: MemberFragment) {
        self.members.push(member);
    }

    /// Indices of the member fragments whose key equals `key`.
    pub fn positions_of(&self, key: &MemberKey) -> Vec<usize> {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, member)| member.key() == key)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Returns `true` if any fragment of the tree still holds a placeholder.
    pub fn contains_placeholder(&self) -> bool {
        self.root.contains_placeholder()
            || self
                .members
                .iter()
                .any(|member| member.fragment().contains_placeholder())
    }
}
