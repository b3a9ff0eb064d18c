//! Generator for the catkin `setup.py`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::Source;
use crate::util::fs;

pub const SETUP_PY: &str = "setup.py";

/// A python package found in the sources.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct PyPackage {
    /// Directory holding the top-level package, relative to the package root
    base: PathBuf,
    /// Dotted package name (`foo`, `foo.sub`)
    name: String,
}

/// A `setup.py` describing the python packages of a ROS package.
#[derive(Debug, Clone)]
pub struct SetupPy {
    name: String,
    root: PathBuf,
    packages: Vec<PyPackage>,
}

impl SetupPy {
    /// Collect the python packages (directories holding `__init__.py`) among
    /// `sources`.
    pub fn new(name: &str, root: &Path, sources: &[&Source]) -> Self {
        let package_dirs: BTreeSet<PathBuf> = sources
            .iter()
            .filter(|s| s.is_python() && s.file_name() == "__init__.py")
            .filter_map(|s| s.path().parent())
            .map(|dir| fs::relative_path(root, dir))
            .filter(|rel| !rel.as_os_str().is_empty())
            .collect();

        let mut packages = BTreeSet::new();
        for dir in &package_dirs {
            // walk up to the outermost directory that is still a package
            let mut top = dir.clone();
            while let Some(parent) = top.parent() {
                if parent.as_os_str().is_empty() || !package_dirs.contains(parent) {
                    break;
                }
                top = parent.to_path_buf();
            }
            let base = top.parent().map(Path::to_path_buf).unwrap_or_default();
            let name = dir
                .strip_prefix(&base)
                .unwrap_or(dir)
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(".");
            packages.insert(PyPackage { base, name });
        }

        SetupPy {
            name: name.to_string(),
            root: root.to_path_buf(),
            packages: packages.into_iter().collect(),
        }
    }

    /// A setup script is only useful when there is something to install.
    pub fn is_valid(&self) -> bool {
        !self.packages.is_empty()
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(SETUP_PY)
    }

    /// Dotted names of the python packages, sorted.
    pub fn packages(&self) -> Vec<&str> {
        self.packages.iter().map(|p| p.name.as_str()).collect()
    }

    /// Render the script.
    pub fn render(&self) -> String {
        let packages = self
            .packages
            .iter()
            .map(|p| format!("'{}'", p.name))
            .collect::<Vec<_>>()
            .join(", ");

        let bases: BTreeSet<&Path> = self.packages.iter().map(|p| p.base.as_path()).collect();
        let package_dir = match bases.iter().next() {
            Some(base) if bases.len() == 1 && base.as_os_str().is_empty() => None,
            Some(base) if bases.len() == 1 => Some(format!("{{'': '{}'}}", posix(base))),
            _ => {
                let entries = self
                    .packages
                    .iter()
                    .map(|p| {
                        let dir = p.base.join(p.name.replace('.', "/"));
                        format!("'{}': '{}'", p.name, posix(&dir))
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                Some(format!("{{{}}}", entries))
            }
        };

        let mut out = String::new();
        out.push_str("#!/usr/bin/env python\n\n");
        out.push_str("from distutils.core import setup\n");
        out.push_str("from catkin_pkg.python_setup import generate_distutils_setup\n\n");
        out.push_str("package_info = generate_distutils_setup(\n");
        out.push_str(&format!("    packages=[{}],\n", packages));
        if let Some(package_dir) = package_dir {
            out.push_str(&format!("    package_dir={},\n", package_dir));
        }
        out.push_str(")\n\n");
        out.push_str("setup(**package_info)\n");
        out
    }

    /// Write `setup.py` at the package root.
    pub fn write(&self) -> Result<()> {
        let path = self.path();
        fs::write_string(&path, &self.render())?;
        tracing::debug!("wrote {} for {}", path.display(), self.name);
        Ok(())
    }
}

fn posix(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn py(root: &Path, rel: &str) -> Source {
        Source::from_contents(&root.join(rel), "")
    }

    #[test]
    fn test_src_layout() {
        let root = Path::new("/ws/src/foo");
        let sources = vec![
            py(root, "src/foo/__init__.py"),
            py(root, "src/foo/core.py"),
            py(root, "src/foo/sub/__init__.py"),
            py(root, "scripts/node.py"),
        ];
        let refs: Vec<&Source> = sources.iter().collect();

        let setup = SetupPy::new("foo", root, &refs);
        assert!(setup.is_valid());
        assert_eq!(setup.packages(), vec!["foo", "foo.sub"]);

        let text = setup.render();
        assert!(text.contains("packages=['foo', 'foo.sub'],"));
        assert!(text.contains("package_dir={'': 'src'},"));
        assert!(text.contains("generate_distutils_setup"));
    }

    #[test]
    fn test_top_level_package() {
        let root = Path::new("/ws/src/bar");
        let sources = vec![py(root, "bar/__init__.py")];
        let refs: Vec<&Source> = sources.iter().collect();

        let text = SetupPy::new("bar", root, &refs).render();
        assert!(text.contains("packages=['bar'],"));
        assert!(!text.contains("package_dir"));
    }

    #[test]
    fn test_mixed_bases() {
        let root = Path::new("/ws/src/baz");
        let sources = vec![py(root, "src/baz/__init__.py"), py(root, "tools/helpers/__init__.py")];
        let refs: Vec<&Source> = sources.iter().collect();

        let text = SetupPy::new("baz", root, &refs).render();
        assert!(text.contains("package_dir={'baz': 'src/baz', 'helpers': 'tools/helpers'},"));
    }

    #[test]
    fn test_scripts_only_is_invalid() {
        let root = Path::new("/ws/src/qux");
        let sources = vec![py(root, "scripts/node.py")];
        let refs: Vec<&Source> = sources.iter().collect();

        assert!(!SetupPy::new("qux", root, &refs).is_valid());
    }
}
