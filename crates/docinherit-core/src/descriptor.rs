//! Type descriptors produced by the metadata reader.

use indexmap::IndexSet;

use crate::identifier::Id;

/// Shape of one type as declared in a compiled module.
///
/// Descriptors are immutable once built. Together they form a directed
/// graph through [`base`](Self::base) and [`interfaces`](Self::interfaces)
/// edges; the graph is expected to be acyclic along base edges.
///
/// # Examples
///
/// ```
/// use docinherit_core::{descriptor::TypeDescriptor, identifier::Id};
///
/// let descriptor = TypeDescriptor::new("Acme.ClassBAB")
///     .with_base("System.Object")
///     .with_interface("Acme.IInterfaceA")
///     .with_interface("Acme.IInterfaceB")
///     .with_interface("Acme.IInterfaceA");
///
/// assert_eq!(descriptor.base(), Some(Id::new("System.Object")));
/// assert_eq!(descriptor.interfaces().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    name: Id,
    base: Option<Id>,
    interfaces: IndexSet<Id>,
}

impl TypeDescriptor {
    /// Create a descriptor with no base type and no interfaces.
    pub fn new(name: impl Into<Id>) -> Self {
        Self {
            name: name.into(),
            base: None,
            interfaces: IndexSet::new(),
        }
    }

    /// Set the base type.
    pub fn with_base(mut self, base: impl Into<Id>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Append an implemented interface; duplicates are ignored.
    pub fn with_interface(mut self, interface: impl Into<Id>) -> Self {
        self.interfaces.insert(interface.into());
        self
    }

    /// The unique, fully qualified name.
    pub fn name(&self) -> Id {
        self.name
    }

    /// The direct base type, if any.
    pub fn base(&self) -> Option<Id> {
        self.base
    }

    /// Directly implemented interfaces in declaration order.
    pub fn interfaces(&self) -> impl Iterator<Item = Id> + '_ {
        self.interfaces.iter().copied()
    }
}
