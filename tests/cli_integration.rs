//! CLI integration tests for roscompile.
//!
//! Each test builds a small catkin workspace in a temporary directory and
//! runs the binary against it.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the roscompile binary command, isolated from the user's environment.
fn roscompile(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("roscompile").unwrap();
    cmd.env("HOME", home)
        .env_remove("ROS_PACKAGE_PATH")
        .env_remove("RUST_LOG");
    cmd
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A workspace with package `foo` depending on `bar` (code) and `baz` (launch).
fn workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let foo = tmp.path().join("src/foo");
    write(
        &foo,
        "package.xml",
        r#"<?xml version="1.0"?>
<package format="2">
  <name>foo</name>
  <version>0.0.1</version>
  <description>foo</description>
  <maintainer email="jane@example.com">Jane Doe</maintainer>
  <license>BSD</license>
  <buildtool_depend>catkin</buildtool_depend>
</package>
"#,
    );
    write(&foo, "CMakeLists.txt", "project(foo)\n");
    write(&foo, "scripts/node.py", "#!/usr/bin/env python\nimport bar\n");
    write(
        &foo,
        "launch/demo.launch",
        r#"<launch><node pkg="baz" type="baz_node" name="baz"/></launch>"#,
    );
    write(&foo, "notes.txt~", "scratch\n");
    write(&foo, "README.md", "# foo\n");
    tmp
}

// ============================================================================
// roscompile depends
// ============================================================================

#[test]
fn test_depends_build() {
    let tmp = workspace();

    roscompile(tmp.path())
        .args(["depends"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("foo: bar"))
        .stdout(predicate::str::contains("baz").not());
}

#[test]
fn test_depends_run() {
    let tmp = workspace();

    roscompile(tmp.path())
        .args(["depends", "--run", "src/foo"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("foo: baz"));
}

#[test]
fn test_depends_json() {
    let tmp = workspace();

    let output = roscompile(tmp.path())
        .args(["depends", "--message-format", "json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let line = String::from_utf8(output.stdout).unwrap();
    let event: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(event["reason"], "package-dependencies");
    assert_eq!(event["package"], "foo");
    assert_eq!(event["kind"], "build");
    assert_eq!(event["dependencies"], serde_json::json!(["bar"]));
}

#[test]
fn test_no_packages_found() {
    let tmp = TempDir::new().unwrap();

    roscompile(tmp.path())
        .args(["depends"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no ROS packages found"));
}

// ============================================================================
// roscompile files
// ============================================================================

#[test]
fn test_files_lists_categories() {
    let tmp = workspace();

    roscompile(tmp.path())
        .args(["files"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("  source\n    scripts/node.py"))
        .stdout(predicate::str::contains("  launch\n    launch/demo.launch"))
        .stdout(predicate::str::contains("notes.txt~").not());
}

#[test]
fn test_files_unclassified_only() {
    let tmp = workspace();

    roscompile(tmp.path())
        .args(["files", "--unclassified"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("README.md"))
        .stdout(predicate::str::contains("node.py").not());
}

// ============================================================================
// roscompile update
// ============================================================================

#[test]
fn test_update_adds_dependencies() {
    let tmp = workspace();

    roscompile(tmp.path())
        .args(["update"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Added bar to foo (build)"));

    let manifest = fs::read_to_string(tmp.path().join("src/foo/package.xml")).unwrap();
    assert!(manifest.contains("<build_depend>bar</build_depend>"));
    assert!(manifest.contains("<exec_depend>bar</exec_depend>"));
    assert!(manifest.contains("<exec_depend>baz</exec_depend>"));
    assert!(!manifest.contains("<build_depend>baz</build_depend>"));

    // second run changes nothing
    roscompile(tmp.path())
        .args(["update"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("foo is up to date"));
    assert_eq!(
        fs::read_to_string(tmp.path().join("src/foo/package.xml")).unwrap(),
        manifest
    );
}

#[test]
fn test_update_extras_reports_unclassified() {
    let tmp = workspace();

    roscompile(tmp.path())
        .args(["update", "--extras"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("unclassified file README.md"));
}

#[test]
fn test_update_setup() {
    let tmp = workspace();
    write(&tmp.path().join("src/foo"), "src/foo/__init__.py", "");

    roscompile(tmp.path())
        .args(["update", "--setup"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let setup = fs::read_to_string(tmp.path().join("src/foo/setup.py")).unwrap();
    assert!(setup.contains("packages=['foo'],"));
}

#[test]
fn test_broken_package_is_skipped() {
    let tmp = workspace();
    write(&tmp.path().join("src/broken"), "package.xml", "<package><name>");

    roscompile(tmp.path())
        .args(["update"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken"))
        .stderr(predicate::str::contains("1 package could not be processed"));

    // the healthy package was still updated
    let manifest = fs::read_to_string(tmp.path().join("src/foo/package.xml")).unwrap();
    assert!(manifest.contains("<build_depend>bar</build_depend>"));
}

#[test]
fn test_known_packages_filter() {
    let tmp = workspace();
    write(&tmp.path().join("src/foo"), "src/extra.py", "import os\nimport rospy\n");
    write(
        tmp.path(),
        ".roscompile/config.toml",
        "[index]\nknown_packages = [\"rospy\", \"bar\"]\n",
    );

    roscompile(tmp.path())
        .args(["depends"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("foo: bar rospy"));
}

// ============================================================================
// roscompile plugins
// ============================================================================

#[test]
fn test_plugins_creates_description() {
    let tmp = workspace();
    write(
        &tmp.path().join("src/foo"),
        "src/foo_controller.cpp",
        "#include <pluginlib/class_list_macros.h>\nPLUGINLIB_EXPORT_CLASS(foo::FooNode, bar::Controller)\n",
    );

    roscompile(tmp.path())
        .args(["plugins"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Created plugins.xml"));

    let plugins = fs::read_to_string(tmp.path().join("src/foo/plugins.xml")).unwrap();
    assert!(plugins.contains(r#"type="foo::FooNode""#));
    assert!(plugins.contains(r#"base_class_type="bar::Controller""#));

    let manifest = fs::read_to_string(tmp.path().join("src/foo/package.xml")).unwrap();
    assert!(manifest.contains(r#"<bar plugin="${prefix}/plugins.xml""#));
}

// ============================================================================
// roscompile people
// ============================================================================

#[test]
fn test_people_lists_and_renames() {
    let tmp = workspace();

    roscompile(tmp.path())
        .args(["people"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Jane Doe <jane@example.com>"));

    roscompile(tmp.path())
        .args(["people", "--replace", "Jane Doe=Jane Roe", "--write"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Jane Roe <jane@example.com>"));

    let manifest = fs::read_to_string(tmp.path().join("src/foo/package.xml")).unwrap();
    assert!(manifest.contains(r#"<maintainer email="jane@example.com">Jane Roe</maintainer>"#));
}

#[test]
fn test_people_rejects_bad_replacement() {
    let tmp = workspace();

    roscompile(tmp.path())
        .args(["people", "--replace", "nobody"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected OLD=NEW"));
}

// ============================================================================
// roscompile completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();

    roscompile(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("roscompile"));
}
