//! Loading documentation files together with their type manifests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, trace, warn};

use docinherit_parser::{
    Span,
    error::{Diagnostic, ErrorCode},
};

use crate::{
    error::DocInheritError,
    manifest::{self, ManifestError},
    report::FileDiagnostics,
    store::DocumentedModule,
};

/// Collects modules from documentation files.
///
/// A file is loaded only when it has a type manifest. Files naming a
/// module that is already loaded are bound to that module instead of being
/// parsed again.
#[derive(Debug, Default)]
pub struct Loader {
    modules: Vec<DocumentedModule>,
    failures: Vec<FileDiagnostics>,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `files` as primary modules, or as reference modules when
    /// `reference` is set.
    ///
    /// Files with a malformed manifest, files that are not UTF-8 and files
    /// that fail to parse are recorded as failures and skipped, as are
    /// reference files without a manifest.
    ///
    /// # Errors
    ///
    /// Returns an error when a file or its manifest cannot be read.
    pub fn load(&mut self, files: &[PathBuf], reference: bool) -> Result<(), DocInheritError> {
        for path in files {
            let module = match manifest::load_for(path) {
                Ok(Some(module)) => module,
                Ok(None) => {
                    if reference {
                        self.missing_manifest(path);
                    }
                    continue;
                }
                Err(ManifestError::Malformed { path: manifest, message }) => {
                    warn!(manifest:?, message = message.as_str(); "Invalid type manifest, skipping documentation file");
                    self.failures.push(FileDiagnostics::new(
                        &manifest,
                        String::new(),
                        vec![
                            Diagnostic::warning(format!("invalid type manifest: {message}"))
                                .with_code(ErrorCode::E201)
                                .with_help(format!("`{}` was skipped", path.display())),
                        ],
                    ));
                    continue;
                }
                Err(ManifestError::Io { path: manifest, source }) => {
                    return Err(DocInheritError::io(manifest, source));
                }
            };

            if let Some(existing) = self.modules.iter_mut().find(|m| m.name() == module.name()) {
                debug!(module = module.name(), path:?; "Module already loaded, binding file");
                if !reference && !existing.is_reference() && !existing.files().contains(path) {
                    existing.add_file(path);
                }
                continue;
            }

            let bytes = fs::read(path).map_err(|err| DocInheritError::io(path, err))?;
            let source = match String::from_utf8(bytes) {
                Ok(source) => source,
                Err(err) => {
                    warn!(path:?, err:%; "Documentation file is not UTF-8, skipping");
                    self.failures.push(not_utf8(path, err.as_bytes(), err.utf8_error().valid_up_to()));
                    continue;
                }
            };
            let document = match docinherit_parser::parse(&source) {
                Ok(document) => document,
                Err(err) => {
                    warn!(path:?, err:%; "Could not parse documentation file, skipping");
                    self.failures
                        .push(FileDiagnostics::new(path, source, err.into_diagnostics()));
                    continue;
                }
            };

            if let Some(assembly) = document.assembly_name().filter(|name| name.as_str() != module.name()) {
                trace!(path:?, assembly, module = module.name(); "Assembly name differs from manifest");
            }

            info!(module = module.name(), path:?, reference; "Loaded documentation");
            let mut documented = DocumentedModule::new(module, document).with_file(path, source);
            if reference {
                documented = documented.into_reference();
            }
            self.modules.push(documented);
        }
        Ok(())
    }

    fn missing_manifest(&mut self, path: &Path) {
        let manifest = manifest::manifest_path(path);
        warn!(path:?, manifest:?; "Reference documentation has no type manifest, skipping");
        self.failures.push(FileDiagnostics::new(
            path,
            String::new(),
            vec![
                Diagnostic::warning("reference documentation has no type manifest")
                    .with_code(ErrorCode::E202)
                    .with_help(format!(
                        "add `{}` declaring its types to inherit from them",
                        manifest.display()
                    )),
            ],
        ));
    }

    /// The loaded modules and the files that could not be used.
    pub fn finish(self) -> (Vec<DocumentedModule>, Vec<FileDiagnostics>) {
        (self.modules, self.failures)
    }
}

/// A failure for a file that is not valid UTF-8, pointing at the first
/// bad byte.
fn not_utf8(path: &Path, bytes: &[u8], valid_up_to: usize) -> FileDiagnostics {
    let source = String::from_utf8_lossy(bytes).into_owned();
    let end = source[valid_up_to..]
        .chars()
        .next()
        .map_or(valid_up_to, |c| valid_up_to + c.len_utf8());
    FileDiagnostics::new(
        path,
        source,
        vec![
            Diagnostic::warning("documentation file is not valid UTF-8")
                .with_code(ErrorCode::E008)
                .with_label(Span::new(valid_up_to..end), "invalid byte sequence")
                .with_help("save the file as UTF-8; it was skipped"),
        ],
    )
}
