//! DocInherit - resolves `<inheritdoc/>` tags in XML documentation files.
//!
//! Documentation entries that contain `<inheritdoc/>` receive the content of
//! the matching entries of their base types and interfaces, or of the type
//! or member named by the tag's `cref` attribute. Types are resolved in
//! hierarchy order so that inherited content is itself already resolved.

pub mod config;
pub mod registry;

mod discover;
mod error;
mod loader;
mod manifest;
mod merge;
mod output;
mod report;
mod resolver;
mod store;

pub use docinherit_core::{descriptor, identifier, member};

pub use error::DocInheritError;
pub use report::{FileDiagnostics, RunReport};
pub use store::DocumentedModule;

use std::{env, path::PathBuf};

use log::{debug, info};

use docinherit_core::{identifier::Id, tree::DocumentationTree};
use docinherit_parser::error::Diagnostic;

use config::AppConfig;
use loader::Loader;
use registry::TypeRegistry;
use store::DocumentationStore;

/// Runs documentation inheritance over a set of modules.
///
/// # Examples
///
/// ```rust
/// use docinherit::{
///     DocumentedModule, InheritDoc, config::AppConfig, descriptor::TypeDescriptor,
///     registry::Module,
/// };
///
/// let module = Module::new("Acme")
///     .with_type(TypeDescriptor::new("Acme.ClassA"))
///     .with_type(TypeDescriptor::new("Acme.ClassAB").with_base("Acme.ClassA"));
/// let document = docinherit_parser::parse(
///     r#"<doc><members>
///         <member name="T:Acme.ClassA"><summary>ClassA-Class-Summary</summary></member>
///         <member name="T:Acme.ClassAB"><inheritdoc/></member>
///     </members></doc>"#,
/// )
/// .expect("valid documentation");
///
/// let resolution = InheritDoc::new(AppConfig::default())
///     .resolve(vec![DocumentedModule::new(module, document)])
///     .expect("acyclic hierarchy");
///
/// assert_eq!(resolution.report().replaced(), 1);
/// let text = resolution.render("Acme").expect("module is loaded");
/// assert!(text.contains(r#"<member name="T:Acme.ClassAB"><summary>ClassA-Class-Summary</summary></member>"#));
/// ```
#[derive(Debug, Default)]
pub struct InheritDoc {
    config: AppConfig,
}

impl InheritDoc {
    /// Create a run with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Discover, resolve and write documentation files.
    ///
    /// Documentation files below the base path that have a type manifest
    /// are loaded as primary modules, followed by the configured reference
    /// files. Files of modules that received inherited content are written
    /// next to their input, or over it when `overwrite` is set. Nothing is
    /// written when no `<inheritdoc/>` tag was found.
    ///
    /// # Errors
    ///
    /// Returns `DocInheritError` for invalid configuration, unreadable
    /// files, a cyclic type hierarchy, or an output file that cannot be
    /// written. Files with a malformed manifest, files that are not UTF-8
    /// or fail to parse, and reference files without a manifest are not
    /// errors; they are skipped and listed in the report.
    pub fn run(&self) -> Result<RunReport, DocInheritError> {
        self.config.validate()?;

        let base = match self.config.base_path() {
            Some(base) => base.to_path_buf(),
            None => env::current_dir().map_err(|err| DocInheritError::io(".", err))?,
        };
        info!(base:?; "Searching for documentation files");

        let files = discover::find_documentation(&base, self.config.file_patterns())?;
        let mut loader = Loader::new();
        loader.load(&files, false)?;
        loader.load(self.config.reference_docs(), true)?;
        let (modules, failures) = loader.finish();

        let resolution = self.resolve(modules)?;
        let replaced = resolution.report().replaced();

        let written = if replaced == 0 {
            info!(
                "No <inheritdoc/> tags found; add <inheritdoc/> to a documentation entry to inherit from base types and interfaces"
            );
            Vec::new()
        } else {
            let written = output::write_modules(resolution.changed_modules(), &base, self.config.overwrite())?;
            info!(replaced, files = written.len(); "{replaced} <inheritdoc/> tag(s) replaced in {} file(s)", written.len());
            written
        };

        let mut report = resolution.into_report();
        report.set_written(written);
        report.prepend_diagnostics(failures);
        Ok(report)
    }

    /// Resolve documentation held in memory.
    ///
    /// Reference modules are registered after all primary modules, whatever
    /// their position in `modules`. The documents of primary modules that
    /// received inherited content are rewritten in the returned
    /// [`Resolution`].
    ///
    /// # Errors
    ///
    /// Returns `DocInheritError::CyclicHierarchy` when the documented types
    /// cannot be ordered, and `DocInheritError::Config` for invalid
    /// exclusion patterns.
    pub fn resolve(&self, mut modules: Vec<DocumentedModule>) -> Result<Resolution, DocInheritError> {
        self.config.validate()?;
        modules.sort_by_key(DocumentedModule::is_reference);

        let mut registry = TypeRegistry::new();
        for module in &modules {
            registry.register(module.module());
        }
        info!(types = registry.len(), modules = modules.len(); "Type registry built");

        let (mut store, load_diagnostics) = DocumentationStore::load(&modules, &self.config);
        let order = resolver::sort(&registry, &store.type_names())?;
        let outcome = merge::merge(&registry, &mut store, &order);

        let changed_types: Vec<Id> = store
            .trees()
            .filter(|tree| tree.is_changed())
            .map(DocumentationTree::type_name)
            .collect();
        debug!(replaced = outcome.replaced, changed = changed_types.len(); "Merge finished");

        let mut changed_modules = Vec::new();
        for (index, module) in modules.iter_mut().enumerate() {
            if module.is_reference() || !store.is_module_changed(index) {
                continue;
            }
            module.document_mut().set_entries(store.module_entries(index));
            changed_modules.push(index);
        }

        let mut grouped: Vec<Vec<Diagnostic>> = modules.iter().map(|_| Vec::new()).collect();
        let merge_diagnostics = outcome
            .diagnostics
            .into_iter()
            .filter_map(|(type_name, diag)| store.owner(type_name).map(|index| (index, diag)));
        for (index, diag) in load_diagnostics.into_iter().chain(merge_diagnostics) {
            if let Some(slot) = grouped.get_mut(index) {
                slot.push(diag);
            }
        }
        let diagnostics = modules
            .iter()
            .zip(grouped)
            .filter(|(_, diagnostics)| !diagnostics.is_empty())
            .map(|(module, diagnostics)| {
                let path = module
                    .files()
                    .first()
                    .cloned()
                    .unwrap_or_else(|| PathBuf::from(module.name()));
                FileDiagnostics::new(path, module.source(), diagnostics)
            })
            .collect();

        Ok(Resolution {
            report: RunReport::new(outcome.replaced, changed_types, diagnostics),
            modules,
            store,
            changed_modules,
        })
    }
}

/// Outcome of [`InheritDoc::resolve`].
#[derive(Debug)]
pub struct Resolution {
    modules: Vec<DocumentedModule>,
    store: DocumentationStore,
    changed_modules: Vec<usize>,
    report: RunReport,
}

impl Resolution {
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    pub fn into_report(self) -> RunReport {
        self.report
    }

    /// All modules, primary ones first.
    pub fn modules(&self) -> &[DocumentedModule] {
        &self.modules
    }

    pub fn module(&self, name: &str) -> Option<&DocumentedModule> {
        self.modules.iter().find(|module| module.name() == name)
    }

    /// Primary modules whose documents were rewritten.
    pub fn changed_modules(&self) -> impl Iterator<Item = &DocumentedModule> {
        self.changed_modules
            .iter()
            .filter_map(|&index| self.modules.get(index))
    }

    /// The resolved documentation of a type.
    pub fn tree(&self, type_name: &str) -> Option<&DocumentationTree> {
        self.store.tree(Id::new(type_name))
    }

    /// The document of module `name` as text.
    pub fn render(&self, name: &str) -> Option<String> {
        self.module(name)
            .map(|module| docinherit_parser::write(module.document()))
    }
}
