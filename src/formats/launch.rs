//! roslaunch XML files.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use xmltree::Element;

use super::{child_elements, read_xml, FormatError};
use crate::core::dependency::{DependencySet, PackageIndex};

static FIND_SUBST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\(\s*find\s+([A-Za-z0-9_]+)\s*\)").unwrap());

/// A parsed launch file.
#[derive(Debug, Clone)]
pub struct Launch {
    path: PathBuf,
    root: Element,
}

impl Launch {
    /// Parse a launch file. Malformed XML is an error.
    pub fn load(path: &Path) -> Result<Self, FormatError> {
        let root = read_xml(path)?;
        Ok(Launch {
            path: path.to_path_buf(),
            root,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Packages referenced through `pkg="..."` attributes and `$(find ...)`.
    pub fn dependencies(&self, index: Option<&PackageIndex>) -> DependencySet {
        let mut deps = DependencySet::new();
        collect(&self.root, &mut deps);
        deps.filtered(index)
    }
}

fn collect(el: &Element, deps: &mut DependencySet) {
    for (name, value) in &el.attributes {
        if name == "pkg" {
            let pkg = value.trim();
            if !pkg.is_empty() && !pkg.contains('$') {
                deps.insert(pkg);
            }
        }
        for cap in FIND_SUBST.captures_iter(value) {
            deps.insert(&cap[1]);
        }
    }
    for child in child_elements(el) {
        collect(child, deps);
    }
}
