//! Integration tests for `InheritDoc::run` on documentation files on disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use docinherit::{InheritDoc, config::AppConfig};
use docinherit_parser::error::ErrorCode;

const MANIFEST: &str = r#"
[module]
name = "Acme"

[[types]]
name = "Acme.ClassA"

[[types]]
name = "Acme.ClassAB"
base = "Acme.ClassA"
"#;

const DOCS: &str = r#"<?xml version="1.0"?>
<doc>
    <assembly>
        <name>Acme</name>
    </assembly>
    <members>
        <member name="T:Acme.ClassA">
            <summary>ClassA-Class-Summary</summary>
        </member>
        <member name="T:Acme.ClassAB">
            <inheritdoc/>
        </member>
    </members>
</doc>
"#;

fn write(dir: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create directory");
    }
    fs::write(&path, contents).expect("Failed to write file");
    path
}

#[test]
fn test_run_writes_new_file() {
    let dir = tempdir().expect("Failed to create temp directory");
    let input = write(dir.path(), "bin/Acme.xml", DOCS);
    write(dir.path(), "bin/Acme.types.toml", MANIFEST);

    let report = InheritDoc::new(AppConfig::default().with_base_path(dir.path()))
        .run()
        .expect("Run failed");

    assert_eq!(report.replaced(), 1);
    assert_eq!(report.written(), &[PathBuf::from("bin/Acme.new.xml")]);
    assert_eq!(fs::read_to_string(&input).expect("input is kept"), DOCS);

    let output = fs::read_to_string(dir.path().join("bin/Acme.new.xml")).expect("output is written");
    assert!(output.starts_with("<?xml version=\"1.0\"?>\n<doc>\n    <assembly>"));
    assert!(output.contains(
        "<member name=\"T:Acme.ClassAB\">\n            <summary>ClassA-Class-Summary</summary>\n        </member>"
    ));
    assert!(!output.contains("inheritdoc"));
}

#[test]
fn test_run_overwrites_input() {
    let dir = tempdir().expect("Failed to create temp directory");
    let input = write(dir.path(), "Acme.xml", DOCS);
    write(dir.path(), "Acme.types.toml", MANIFEST);

    let config = AppConfig::default()
        .with_base_path(dir.path())
        .with_overwrite(true);
    let report = InheritDoc::new(config).run().expect("Run failed");

    assert_eq!(report.written(), &[PathBuf::from("Acme.xml")]);
    assert!(!dir.path().join("Acme.new.xml").exists());
    assert!(!fs::read_to_string(&input).expect("input exists").contains("inheritdoc"));

    // A second pass finds nothing left to do.
    let report = InheritDoc::new(AppConfig::default().with_base_path(dir.path()))
        .run()
        .expect("Second run failed");
    assert_eq!(report.replaced(), 0);
    assert!(report.written().is_empty());
    assert!(!dir.path().join("Acme.new.xml").exists());
}

#[test]
fn test_run_without_placeholders_writes_nothing() {
    let dir = tempdir().expect("Failed to create temp directory");
    write(
        dir.path(),
        "Acme.xml",
        r#"<doc><members><member name="T:Acme.ClassA"><summary>s</summary></member></members></doc>"#,
    );
    write(dir.path(), "Acme.types.toml", MANIFEST);

    let report = InheritDoc::new(AppConfig::default().with_base_path(dir.path()))
        .run()
        .expect("Run failed");

    assert_eq!(report.replaced(), 0);
    assert!(report.written().is_empty());
}

#[test]
fn test_run_uses_reference_documentation() {
    let dir = tempdir().expect("Failed to create temp directory");
    let refs = tempdir().expect("Failed to create temp directory");
    write(
        dir.path(),
        "Acme.xml",
        r#"<doc><members><member name="T:Acme.Widget"><inheritdoc/></member></members></doc>"#,
    );
    write(
        dir.path(),
        "Acme.types.toml",
        "[module]\nname = \"Acme\"\n\n[[types]]\nname = \"Acme.Widget\"\nbase = \"Framework.Component\"\n",
    );
    let reference = write(
        refs.path(),
        "Framework.xml",
        r#"<doc><members><member name="T:Framework.Component"><summary>A component.</summary></member></members></doc>"#,
    );
    write(
        refs.path(),
        "Framework.types.toml",
        "[module]\nname = \"Framework\"\n\n[[types]]\nname = \"Framework.Component\"\n",
    );

    let config = AppConfig::default()
        .with_base_path(dir.path())
        .with_reference_docs(vec![reference]);
    let report = InheritDoc::new(config).run().expect("Run failed");

    assert_eq!(report.written(), &[PathBuf::from("Acme.new.xml")]);
    assert!(!refs.path().join("Framework.new.xml").exists());
    let output = fs::read_to_string(dir.path().join("Acme.new.xml")).expect("output is written");
    assert!(output.contains("<summary>A component.</summary>"));
}

#[test]
fn test_run_skips_unparsable_file() {
    let dir = tempdir().expect("Failed to create temp directory");
    write(dir.path(), "Acme.xml", DOCS);
    write(dir.path(), "Acme.types.toml", MANIFEST);
    write(dir.path(), "Broken.xml", "<doc><members><member name=\"T:Broken.A\"></members></doc>");
    write(dir.path(), "Broken.types.toml", "[module]\nname = \"Broken\"\n");

    let report = InheritDoc::new(AppConfig::default().with_base_path(dir.path()))
        .run()
        .expect("Run failed");

    assert_eq!(report.replaced(), 1);
    let broken = &report.diagnostics()[0];
    assert!(broken.path().ends_with("Broken.xml"));
    assert!(broken.has_errors());
    assert_eq!(broken.diagnostics()[0].code(), Some(ErrorCode::E005));
}

#[test]
fn test_run_filters_by_pattern() {
    let dir = tempdir().expect("Failed to create temp directory");
    write(dir.path(), "Acme.xml", DOCS);
    write(dir.path(), "Acme.types.toml", MANIFEST);

    let config = AppConfig::default()
        .with_base_path(dir.path())
        .with_file_patterns(vec!["Other.*.xml".to_string()]);
    let report = InheritDoc::new(config).run().expect("Run failed");

    assert_eq!(report.replaced(), 0);
    assert!(!dir.path().join("Acme.new.xml").exists());
}

#[test]
fn test_run_skips_module_with_malformed_manifest() {
    let dir = tempdir().expect("Failed to create temp directory");
    write(dir.path(), "a/Acme.xml", DOCS);
    write(dir.path(), "a/Acme.types.toml", MANIFEST);
    write(dir.path(), "b/Other.xml", "<doc><members/></doc>");
    write(dir.path(), "b/Other.types.toml", "[[types]]\nname = 1\n");

    let report = InheritDoc::new(AppConfig::default().with_base_path(dir.path()))
        .run()
        .expect("Run failed");

    assert_eq!(report.written(), &[PathBuf::from("a/Acme.new.xml")]);
    assert!(dir.path().join("a/Acme.new.xml").exists());
    let skipped = &report.diagnostics()[0];
    assert!(skipped.path().ends_with("b/Other.types.toml"));
    assert_eq!(skipped.diagnostics()[0].code(), Some(ErrorCode::E201));
}

#[test]
fn test_run_skips_file_that_is_not_utf8() {
    let dir = tempdir().expect("Failed to create temp directory");
    write(dir.path(), "a/Acme.xml", DOCS);
    write(dir.path(), "a/Acme.types.toml", MANIFEST);
    let other = write(dir.path(), "b/Other.types.toml", "[module]\nname = \"Other\"\n");
    fs::write(other.with_file_name("Other.xml"), b"\xff\xfe<\x00d\x00").expect("Failed to write file");

    let report = InheritDoc::new(AppConfig::default().with_base_path(dir.path()))
        .run()
        .expect("Run failed");

    assert_eq!(report.replaced(), 1);
    assert!(dir.path().join("a/Acme.new.xml").exists());
    let skipped = &report.diagnostics()[0];
    assert!(skipped.path().ends_with("b/Other.xml"));
    assert_eq!(skipped.diagnostics()[0].code(), Some(ErrorCode::E008));
}

#[test]
fn test_run_reports_reference_without_manifest() {
    let dir = tempdir().expect("Failed to create temp directory");
    let refs = tempdir().expect("Failed to create temp directory");
    write(
        dir.path(),
        "Acme.xml",
        r#"<doc><members><member name="T:Acme.Widget"><inheritdoc/></member></members></doc>"#,
    );
    write(
        dir.path(),
        "Acme.types.toml",
        "[module]\nname = \"Acme\"\n\n[[types]]\nname = \"Acme.Widget\"\nbase = \"Framework.Component\"\n",
    );
    let reference = write(
        refs.path(),
        "Framework.xml",
        r#"<doc><members><member name="T:Framework.Component"><summary>A component.</summary></member></members></doc>"#,
    );

    let config = AppConfig::default()
        .with_base_path(dir.path())
        .with_reference_docs(vec![reference.clone()]);
    let report = InheritDoc::new(config).run().expect("Run failed");

    let missing = report
        .diagnostics()
        .iter()
        .find(|file| file.path() == reference.as_path())
        .expect("reference file is reported");
    assert_eq!(missing.diagnostics()[0].code(), Some(ErrorCode::E202));
    assert!(!missing.has_errors());
}
