//! Reconcile `package.xml` with the dependencies found in the package.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::Package;

/// What `update_manifest` added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateSummary {
    /// Packages added as build dependencies
    pub build: Vec<String>,

    /// Packages added as run dependencies
    pub run: Vec<String>,

    /// Whether `package.xml` was rewritten
    pub written: bool,
}

impl UpdateSummary {
    pub fn is_empty(&self) -> bool {
        self.build.is_empty() && self.run.is_empty()
    }
}

/// Add every discovered dependency the manifest does not list yet.
///
/// Build dependencies are required at run time too, so they are added under
/// both keys; launch file references only as run dependencies. Existing
/// entries are never touched and the manifest is only written when something
/// was added.
pub fn update_manifest(package: &mut Package) -> Result<UpdateSummary> {
    let build = package.get_dependencies(true)?;
    let run = package.get_dependencies(false)?;

    let manifest = package.manifest_mut();
    let mut summary = UpdateSummary {
        build: manifest.add_packages(&build, true),
        run: manifest.add_packages(&build, false),
        written: false,
    };
    summary.run.extend(manifest.add_packages(&run, false));

    for name in &summary.build {
        tracing::debug!("{}: new build dependency `{}`", package.name(), name);
    }
    for name in &summary.run {
        tracing::debug!("{}: new run dependency `{}`", package.name(), name);
    }

    summary.written = package
        .write_manifest()
        .with_context(|| format!("failed to update manifest of `{}`", package.name()))?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_format_one_uses_run_depend() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("foo");
        write(&root, "package.xml", "<package><name>foo</name></package>\n");
        write(&root, "src/a.cpp", "#include <roscpp/ros.h>\n");

        let mut package = Package::new(&root).unwrap();
        let summary = update_manifest(&mut package).unwrap();
        assert_eq!(summary.build, vec!["roscpp"]);
        assert_eq!(summary.run, vec!["roscpp"]);

        let text = fs::read_to_string(root.join("package.xml")).unwrap();
        assert!(text.contains("<build_depend>roscpp</build_depend>"));
        assert!(text.contains("<run_depend>roscpp</run_depend>"));
        assert!(!text.contains("exec_depend"));
    }

    #[test]
    fn test_existing_depend_is_respected() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("foo");
        write(
            &root,
            "package.xml",
            "<package format=\"2\"><name>foo</name><depend>rospy</depend></package>\n",
        );
        write(&root, "scripts/n.py", "import rospy\n");
        let before = fs::read_to_string(root.join("package.xml")).unwrap();

        let mut package = Package::new(&root).unwrap();
        let summary = update_manifest(&mut package).unwrap();
        assert!(summary.is_empty());
        assert!(!summary.written);
        assert_eq!(fs::read_to_string(root.join("package.xml")).unwrap(), before);
    }

    #[test]
    fn test_broken_launch_file_aborts_update() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("foo");
        write(&root, "package.xml", "<package><name>foo</name></package>\n");
        write(&root, "src/a.py", "import bar\n");
        write(&root, "launch/x.launch", "<launch>");
        let before = fs::read_to_string(root.join("package.xml")).unwrap();

        let mut package = Package::new(&root).unwrap();
        assert!(update_manifest(&mut package).is_err());
        assert_eq!(fs::read_to_string(root.join("package.xml")).unwrap(), before);
    }
}
