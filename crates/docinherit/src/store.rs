//! Documentation store: one [`DocumentationTree`] per documented type.
//!
//! Entries of every loaded module are grouped by the type they document.
//! Type-level (`T:`) entries of a type are concatenated into its root
//! fragment, all other entries become member fragments, both in document
//! order. Entries that cannot be attributed to a type are kept verbatim so
//! they survive a rewrite of their file.

use std::{collections::HashSet, path::PathBuf};

use indexmap::{IndexMap, map::Entry as MapEntry};
use log::{info, trace, warn};

use docinherit_core::{
    identifier::Id,
    member::{MemberKey, MemberKind},
    node::{Element, KEY_ATTRIBUTE},
    tree::{DocumentationTree, MEMBER_ELEMENT, MemberFragment},
};
use docinherit_parser::{
    DocFile, Entry,
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
};

use crate::{config::AppConfig, registry::Module};

/// A module together with its parsed documentation.
#[derive(Debug, Clone)]
pub struct DocumentedModule {
    module: Module,
    document: DocFile,
    files: Vec<PathBuf>,
    source: String,
    reference: bool,
}

impl DocumentedModule {
    /// A primary module: its documentation is resolved and written back.
    pub fn new(module: Module, document: DocFile) -> Self {
        Self {
            module,
            document,
            files: Vec::new(),
            source: String::new(),
            reference: false,
        }
    }

    /// Mark the module as reference documentation: searched for content,
    /// never written.
    pub fn into_reference(mut self) -> Self {
        self.reference = true;
        self
    }

    /// Bind the documentation file the document was parsed from.
    pub fn with_file(mut self, path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        self.files.push(path.into());
        self.source = source.into();
        self
    }

    /// Bind another documentation file of the same module; it is written
    /// with the same content.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) {
        self.files.push(path.into());
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn name(&self) -> &str {
        self.module.name()
    }

    pub fn document(&self) -> &DocFile {
        &self.document
    }

    pub(crate) fn document_mut(&mut self) -> &mut DocFile {
        &mut self.document
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Text of the first bound file, used to render diagnostics.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_reference(&self) -> bool {
        self.reference
    }
}

/// Position of an entry in its module's `<members>` list.
#[derive(Debug, Clone)]
enum Slot {
    /// All documentation of a type, at the place of its first entry.
    Type(Id),
    /// An entry the store does not own, written back unchanged.
    Verbatim(Element),
}

/// Documentation trees of all loaded modules, keyed by type name.
#[derive(Debug, Default)]
pub struct DocumentationStore {
    trees: IndexMap<Id, DocumentationTree>,
    owners: IndexMap<Id, usize>,
    layouts: Vec<Vec<Slot>>,
}

impl DocumentationStore {
    /// Group the entries of `modules` into trees.
    ///
    /// Returns the store and the diagnostics raised while loading, each
    /// tagged with the index of the module it belongs to.
    pub fn load(modules: &[DocumentedModule], config: &AppConfig) -> (Self, Vec<(usize, Diagnostic)>) {
        let mut store = Self::default();
        let mut diagnostics = Vec::new();

        for (index, module) in modules.iter().enumerate() {
            let mut collector = DiagnosticCollector::new();
            let layout = store.load_module(index, module, config, &mut collector);
            store.layouts.push(layout);
            diagnostics.extend(collector.into_diagnostics().into_iter().map(|diag| (index, diag)));
        }

        info!(types = store.trees.len(), modules = modules.len(); "Documentation loaded");
        (store, diagnostics)
    }

    fn load_module(
        &mut self,
        index: usize,
        module: &DocumentedModule,
        config: &AppConfig,
        collector: &mut DiagnosticCollector,
    ) -> Vec<Slot> {
        let mut layout = Vec::new();
        let mut placed = HashSet::new();

        for entry in module.document().entries() {
            let Some(key) = entry_key(module, &entry, config, collector) else {
                layout.push(Slot::Verbatim(entry.element().clone()));
                continue;
            };
            let type_name = key.type_name();

            match self.owners.entry(type_name) {
                MapEntry::Occupied(owner) if *owner.get() != index => {
                    trace!(type_name:%, module = module.name(); "Type documented by an earlier module");
                    layout.push(Slot::Verbatim(entry.element().clone()));
                    continue;
                }
                MapEntry::Occupied(_) => {}
                MapEntry::Vacant(vacant) => {
                    vacant.insert(index);
                }
            }

            if placed.insert(type_name) {
                layout.push(Slot::Type(type_name));
            }

            let tree = self
                .trees
                .entry(type_name)
                .or_insert_with(|| DocumentationTree::new(type_name));
            if key.kind() == MemberKind::Type {
                tree.append_root_content(entry.element().children().to_vec());
            } else {
                tree.push_member(MemberFragment::new(key, entry.element().clone()));
            }
        }
        layout
    }

    pub fn tree(&self, type_name: Id) -> Option<&DocumentationTree> {
        self.trees.get(&type_name)
    }

    pub fn tree_mut(&mut self, type_name: Id) -> Option<&mut DocumentationTree> {
        self.trees.get_mut(&type_name)
    }

    /// Documented types in load order.
    pub fn type_names(&self) -> Vec<Id> {
        self.trees.keys().copied().collect()
    }

    pub fn trees(&self) -> impl Iterator<Item = &DocumentationTree> {
        self.trees.values()
    }

    /// Index of the module whose documentation of `type_name` was loaded.
    pub fn owner(&self, type_name: Id) -> Option<usize> {
        self.owners.get(&type_name).copied()
    }

    /// Returns `true` if a type owned by module `index` was changed.
    pub fn is_module_changed(&self, index: usize) -> bool {
        self.slots(index).iter().any(|slot| match slot {
            Slot::Type(type_name) => self.trees.get(type_name).is_some_and(|t| t.is_changed()),
            Slot::Verbatim(_) => false,
        })
    }

    /// The `<member>` entries of module `index`, in first-appearance order.
    ///
    /// Each type contributes its type-level entry (when the source had one
    /// or it now has content) followed by its member entries.
    pub fn module_entries(&self, index: usize) -> Vec<Element> {
        let mut entries = Vec::new();
        for slot in self.slots(index) {
            match slot {
                Slot::Verbatim(element) => entries.push(element.clone()),
                Slot::Type(type_name) => {
                    let Some(tree) = self.trees.get(type_name) else {
                        continue;
                    };
                    let root = tree.root().root();
                    if tree.has_root_entry() || root.has_content() {
                        let mut element = Element::new(MEMBER_ELEMENT)
                            .with_attribute(KEY_ATTRIBUTE, MemberKey::for_type(*type_name).to_string());
                        element.set_children(root.children().to_vec());
                        entries.push(element);
                    }
                    entries.extend(
                        tree.members()
                            .iter()
                            .map(|member| member.fragment().root().clone()),
                    );
                }
            }
        }
        entries
    }

    fn slots(&self, index: usize) -> &[Slot] {
        self.layouts.get(index).map(Vec::as_slice).unwrap_or_default()
    }
}

/// The key of a loadable entry, or `None` for entries kept verbatim.
fn entry_key(
    module: &DocumentedModule,
    entry: &Entry<'_>,
    config: &AppConfig,
    collector: &mut DiagnosticCollector,
) -> Option<MemberKey> {
    if !entry.is_member() {
        return None;
    }

    let Some(name) = entry.name() else {
        warn!(module = module.name(); "Documentation entry without a name");
        collector.emit(labeled(
            Diagnostic::warning("documentation entry has no `name` attribute")
                .with_code(ErrorCode::E101)
                .with_help("add `name=\"T:Namespace.Type\"` to the `<member>` element"),
            entry,
            "entry kept as is",
        ));
        return None;
    };

    let key = match MemberKey::parse(name) {
        Ok(key) => key,
        Err(err) => {
            warn!(module = module.name(), name; "Invalid documentation entry name");
            collector.emit(labeled(
                Diagnostic::warning(err.to_string()).with_code(ErrorCode::E102),
                entry,
                "entry kept as is",
            ));
            return None;
        }
    };

    let type_name = key.type_name();
    if !module.module().declares(type_name) {
        warn!(type_name:%, module = module.name(); "Could not find type");
        collector.emit(labeled(
            Diagnostic::warning(format!("documentation for unknown type `{type_name}`"))
                .with_code(ErrorCode::E200)
                .with_help(format!("module `{}` does not declare this type", module.name())),
            entry,
            "entry kept as is",
        ));
        return None;
    }

    if config.is_type_excluded(&type_name.as_string()) {
        info!(type_name:%; "Excluded type");
        return None;
    }

    Some(key)
}

fn labeled(diagnostic: Diagnostic, entry: &Entry<'_>, label: &str) -> Diagnostic {
    match entry.span() {
        Some(span) => diagnostic.with_label(span, label),
        None => diagnostic,
    }
}
