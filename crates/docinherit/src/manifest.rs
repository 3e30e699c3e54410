//! Type manifests.
//!
//! The types declared by a compiled module are read from a TOML manifest
//! stored next to its documentation file (`Acme.xml` ↔ `Acme.types.toml`):
//!
//! ```toml
//! [module]
//! name = "Acme"
//!
//! [[types]]
//! name = "Acme.ClassAB"
//! base = "Acme.ClassA"
//! interfaces = ["Acme.IShape"]
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::trace;
use serde::Deserialize;
use thiserror::Error;

use docinherit_core::descriptor::TypeDescriptor;

use crate::registry::Module;

/// Suffix replacing `.xml` in a manifest file name.
pub const MANIFEST_SUFFIX: &str = ".types.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    module: ModuleSection,
    #[serde(default)]
    types: Vec<TypeEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModuleSection {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeEntry {
    name: String,
    #[serde(default)]
    base: Option<String>,
    #[serde(default)]
    interfaces: Vec<String>,
}

/// Path of the manifest belonging to a documentation file.
pub fn manifest_path(doc_path: &Path) -> PathBuf {
    let stem = doc_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    doc_path.with_file_name(format!("{stem}{MANIFEST_SUFFIX}"))
}

/// Why a manifest could not be used.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not read type manifest `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid type manifest `{path}`: {message}")]
    Malformed { path: PathBuf, message: String },
}

/// Load the manifest of a documentation file, if it has one.
///
/// # Errors
///
/// Returns [`ManifestError::Io`] when the manifest exists but cannot be
/// read and [`ManifestError::Malformed`] when it is not a valid manifest.
pub fn load_for(doc_path: &Path) -> Result<Option<Module>, ManifestError> {
    let path = manifest_path(doc_path);
    if !path.is_file() {
        trace!(path:? = doc_path; "No type manifest");
        return Ok(None);
    }

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(source) => return Err(ManifestError::Io { path, source }),
    };
    parse(&text)
        .map(Some)
        .map_err(|message| ManifestError::Malformed { path, message })
}

/// Parse manifest text into a module.
fn parse(text: &str) -> Result<Module, String> {
    let manifest: Manifest = toml::from_str(text).map_err(|err| err.to_string())?;

    let mut module = Module::new(manifest.module.name);
    for entry in manifest.types {
        if entry.name.trim().is_empty() {
            return Err("type entry with an empty name".to_string());
        }
        let mut descriptor = TypeDescriptor::new(entry.name.as_str());
        if let Some(base) = entry.base.as_deref() {
            descriptor = descriptor.with_base(base);
        }
        for interface in &entry.interfaces {
            descriptor = descriptor.with_interface(interface.as_str());
        }
        module.add_type(descriptor);
    }
    Ok(module)
}

#[cfg(test)]
mod tests {
    use docinherit_core::identifier::Id;

    use super::*;

    #[test]
    fn test_manifest_path_next_to_doc() {
        assert_eq!(
            manifest_path(Path::new("bin/Acme.Widgets.xml")),
            PathBuf::from("bin/Acme.Widgets.types.toml")
        );
    }

    #[test]
    fn test_parse_module() {
        let module = parse(
            r#"
            [module]
            name = "Acme"

            [[types]]
            name = "Acme.IShape"

            [[types]]
            name = "Acme.Circle"
            base = "Acme.Shape"
            interfaces = ["Acme.IShape", "System.IDisposable"]
            "#,
        )
        .unwrap();

        assert_eq!(module.name(), "Acme");
        assert!(module.declares(Id::new("Acme.IShape")));
        let circle = module.types().find(|t| t.name() == "Acme.Circle").unwrap();
        assert_eq!(circle.base(), Some(Id::new("Acme.Shape")));
        assert_eq!(circle.interfaces().count(), 2);
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = parse(
            r#"
            [module]
            name = "Acme"
            version = "1.0"
            "#,
        )
        .unwrap_err();

        assert!(err.contains("version"));
    }

    #[test]
    fn test_missing_manifest_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("Acme.xml");

        assert!(load_for(&doc).unwrap().is_none());
    }

    #[test]
    fn test_malformed_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("Acme.xml");
        fs::write(dir.path().join("Acme.types.toml"), "[module]\n").unwrap();

        let err = load_for(&doc).unwrap_err();
        assert!(matches!(err, ManifestError::Malformed { .. }));
        assert!(err.to_string().starts_with("invalid type manifest"));
    }
}
