//! Writing resolved documentation back to disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::{discover::output_path, error::DocInheritError, store::DocumentedModule};

/// Write the documents of `modules` to every file bound to them.
///
/// Files go next to their input as `*.new.xml`, or replace the input when
/// `overwrite` is set. Returns the written paths, relative to `base` when
/// below it.
///
/// # Errors
///
/// Returns [`DocInheritError::Io`] on the first file that cannot be
/// written.
pub fn write_modules<'a>(
    modules: impl IntoIterator<Item = &'a DocumentedModule>,
    base: &Path,
    overwrite: bool,
) -> Result<Vec<PathBuf>, DocInheritError> {
    let mut written = Vec::new();
    for module in modules {
        let text = docinherit_parser::write(module.document());
        for file in module.files() {
            let target = output_path(file, overwrite);
            fs::write(&target, &text).map_err(|err| DocInheritError::io(&target, err))?;
            debug!(module = module.name(), path:? = target; "Wrote documentation");
            written.push(relative_to(&target, base));
        }
    }
    info!(files = written.len(); "Documentation written");
    Ok(written)
}

fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use crate::registry::Module;

    use super::*;

    #[test]
    fn test_writes_every_bound_file() {
        let dir = tempfile::tempdir().unwrap();
        let document = docinherit_parser::parse("<doc><members/></doc>").unwrap();
        let mut module = DocumentedModule::new(Module::new("Acme"), document)
            .with_file(dir.path().join("Acme.xml"), "");
        module.add_file(dir.path().join("sub/Acme.xml"));
        fs::create_dir_all(dir.path().join("sub")).unwrap();

        let written = write_modules([&module], dir.path(), false).unwrap();

        assert_eq!(
            written,
            vec![PathBuf::from("Acme.new.xml"), PathBuf::from("sub/Acme.new.xml")]
        );
        let text = fs::read_to_string(dir.path().join("sub/Acme.new.xml")).unwrap();
        assert_eq!(text, "<doc><members /></doc>");
    }

    #[test]
    fn test_overwrite_replaces_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Acme.xml");
        fs::write(&path, "old").unwrap();
        let document = docinherit_parser::parse("<doc/>").unwrap();
        let module = DocumentedModule::new(Module::new("Acme"), document).with_file(&path, "old");

        let written = write_modules([&module], dir.path(), true).unwrap();

        assert_eq!(written, vec![PathBuf::from("Acme.xml")]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "<doc />");
    }
}
