//! Type registry built from the modules of a run.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, trace};

use docinherit_core::{descriptor::TypeDescriptor, identifier::Id};

/// The types declared by one compiled module.
#[derive(Debug, Clone, Default)]
pub struct Module {
    name: String,
    types: IndexMap<Id, TypeDescriptor>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: IndexMap::new(),
        }
    }

    /// Add a type; a later descriptor with the same name replaces the
    /// earlier one.
    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.add_type(descriptor);
        self
    }

    pub fn add_type(&mut self, descriptor: TypeDescriptor) {
        self.types.insert(descriptor.name(), descriptor);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the module declares `type_name`.
    pub fn declares(&self, type_name: Id) -> bool {
        self.types.contains_key(&type_name)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }
}

/// Type descriptors of all loaded modules, looked up by name.
///
/// Modules are registered in load order; on duplicate names the first
/// registration wins and later ones are ignored.
///
/// # Examples
///
/// ```
/// use docinherit::registry::{Module, TypeRegistry};
/// use docinherit_core::{descriptor::TypeDescriptor, identifier::Id};
///
/// let module = Module::new("Acme")
///     .with_type(TypeDescriptor::new("Acme.IShape"))
///     .with_type(TypeDescriptor::new("Acme.Shape").with_interface("Acme.IShape"))
///     .with_type(TypeDescriptor::new("Acme.Circle").with_base("Acme.Shape"));
///
/// let mut registry = TypeRegistry::new();
/// registry.register(&module);
///
/// let circle = registry.lookup(Id::new("Acme.Circle")).unwrap();
/// let chain: Vec<_> = registry.ancestor_chain(circle).iter().map(Id::as_string).collect();
/// assert_eq!(chain, vec!["Acme.IShape", "Acme.Shape"]);
/// ```
#[derive(Debug, Default)]
pub struct TypeRegistry {
    descriptors: IndexMap<Id, TypeDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every type of `module` not registered yet.
    pub fn register(&mut self, module: &Module) {
        let mut added = 0;
        for descriptor in module.types() {
            if self.descriptors.contains_key(&descriptor.name()) {
                trace!(type_name:% = descriptor.name(), module = module.name(); "Type already registered");
                continue;
            }
            self.descriptors.insert(descriptor.name(), descriptor.clone());
            added += 1;
        }
        debug!(module = module.name(), types = added; "Registered module types");
    }

    pub fn lookup(&self, name: Id) -> Option<&TypeDescriptor> {
        self.descriptors.get(&name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Base types and interfaces of `descriptor` known to the registry,
    /// outermost first.
    ///
    /// Walking up the base-type chain, each type contributes its registered
    /// interfaces followed by the type itself (except for `descriptor`,
    /// which contributes only its interfaces). Each contribution is placed
    /// before everything collected so far, so the nearest ancestor comes
    /// last. The walk stops at a type missing from the registry.
    ///
    /// A walk that comes back to a type already visited stops there; if
    /// that type is `descriptor` itself it is placed first, which makes the
    /// cycle visible to the resolver.
    pub fn ancestor_chain(&self, descriptor: &TypeDescriptor) -> Vec<Id> {
        let start = descriptor.name();
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(start);

        while let Some(name) = current {
            let Some(current_descriptor) = self.lookup(name) else {
                break;
            };
            if !visited.insert(name) {
                if name == start {
                    chain.insert(0, start);
                }
                break;
            }

            let mut batch: Vec<Id> = current_descriptor
                .interfaces()
                .filter(|interface| self.descriptors.contains_key(interface))
                .collect();
            if name != start {
                batch.push(name);
            }
            chain.splice(0..0, batch);

            current = current_descriptor.base();
        }
        chain
    }
}
