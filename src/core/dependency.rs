//! Dependency facts reported by source and launch files.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::util::fs::walk;

/// A deduplicated set of package names.
///
/// Iteration order is ascending, so listings are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DependencySet {
    names: BTreeSet<String>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a name. Returns `false` if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Keep only the names accepted by the index, if one is given.
    pub fn filtered(self, index: Option<&PackageIndex>) -> Self {
        match index {
            Some(index) => DependencySet {
                names: self.names.into_iter().filter(|n| index.contains(n)).collect(),
            },
            None => self,
        }
    }

    /// Consume the set, returning the names sorted ascending.
    pub fn into_sorted_vec(self) -> Vec<String> {
        self.names.into_iter().collect()
    }
}

impl Extend<String> for DependencySet {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.names.extend(iter);
    }
}

impl Extend<DependencySet> for DependencySet {
    fn extend<T: IntoIterator<Item = DependencySet>>(&mut self, iter: T) {
        for set in iter {
            self.names.extend(set.names);
        }
    }
}

impl FromIterator<String> for DependencySet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        DependencySet {
            names: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for DependencySet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

/// A plugin declared in a source file:
/// `package::symbol` implements `target_package::target_interface`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PluginBinding {
    /// Package exporting the plugin
    pub package: String,
    /// Exported class, possibly namespaced further (`a::B`)
    pub symbol: String,
    /// Package owning the base class
    pub target_package: String,
    /// Base class inside the target package
    pub target_interface: String,
}

impl PluginBinding {
    pub fn new(
        package: impl Into<String>,
        symbol: impl Into<String>,
        target_package: impl Into<String>,
        target_interface: impl Into<String>,
    ) -> Self {
        PluginBinding {
            package: package.into(),
            symbol: symbol.into(),
            target_package: target_package.into(),
            target_interface: target_interface.into(),
        }
    }

    /// Split two qualified names (`pkg::Symbol`) into a binding.
    ///
    /// The first `::` separates the package from the rest.
    pub fn from_qualified(implementation: &str, interface: &str) -> Option<Self> {
        let (package, symbol) = implementation.trim().split_once("::")?;
        let (target_package, target_interface) = interface.trim().split_once("::")?;
        if [package, symbol, target_package, target_interface]
            .iter()
            .any(|s| s.is_empty())
        {
            return None;
        }
        Some(PluginBinding::new(
            package,
            symbol,
            target_package,
            target_interface,
        ))
    }

    /// The implementing class, `package::symbol`.
    pub fn implementation(&self) -> String {
        format!("{}::{}", self.package, self.symbol)
    }

    /// The base class, `target_package::target_interface`.
    pub fn interface(&self) -> String {
        format!("{}::{}", self.target_package, self.target_interface)
    }
}

impl fmt::Display for PluginBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.implementation(), self.interface())
    }
}

/// The set of package names known to exist.
///
/// Used to drop imports and includes that do not name a package (`os`,
/// `boost`, ...).
#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    names: BTreeSet<String>,
}

impl PackageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the directory names of every package found below the roots.
    ///
    /// Roots that do not exist are skipped.
    pub fn discover(roots: &[PathBuf]) -> Self {
        let mut index = PackageIndex::new();
        for root in roots {
            index.add_root(root);
        }
        index
    }

    /// Add every package found below `root`.
    pub fn add_root(&mut self, root: &Path) {
        if !root.is_dir() {
            tracing::debug!("skipping missing package root {}", root.display());
            return;
        }
        for entry in walk(root) {
            if entry.file_type().is_file() && entry.file_name() == "package.xml" {
                if let Some(name) = entry
                    .path()
                    .parent()
                    .and_then(|p| p.file_name())
                    .and_then(|n| n.to_str())
                {
                    self.names.insert(name.to_string());
                }
            }
        }
    }

    /// Parse a `ROS_PACKAGE_PATH` style list of roots.
    pub fn roots_from_path_var(value: &str) -> Vec<PathBuf> {
        std::env::split_paths(value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect()
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PackageIndex {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        PackageIndex {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dependency_set_dedup_and_order() {
        let mut deps = DependencySet::new();
        assert!(deps.insert("rospy"));
        assert!(deps.insert("geometry_msgs"));
        assert!(!deps.insert("rospy"));

        assert_eq!(deps.into_sorted_vec(), vec!["geometry_msgs", "rospy"]);
    }

    #[test]
    fn test_dependency_set_filter() {
        let deps: DependencySet = ["os", "rospy", "std_msgs"].into_iter().collect();
        let index: PackageIndex = ["rospy", "std_msgs"].into_iter().collect();

        let filtered = deps.clone().filtered(Some(&index));
        assert_eq!(filtered.into_sorted_vec(), vec!["rospy", "std_msgs"]);
        assert_eq!(deps.filtered(None).len(), 3);
    }

    #[test]
    fn test_binding_from_qualified() {
        let b = PluginBinding::from_qualified("foo::FooNode", " bar::Controller").unwrap();
        assert_eq!(b.package, "foo");
        assert_eq!(b.symbol, "FooNode");
        assert_eq!(b.implementation(), "foo::FooNode");
        assert_eq!(b.interface(), "bar::Controller");

        let nested = PluginBinding::from_qualified("foo::detail::Node", "bar::Base").unwrap();
        assert_eq!(nested.symbol, "detail::Node");

        assert!(PluginBinding::from_qualified("FooNode", "bar::Controller").is_none());
        assert!(PluginBinding::from_qualified("foo::", "bar::Controller").is_none());
    }

    #[test]
    fn test_index_discover() {
        let tmp = TempDir::new().unwrap();
        for pkg in ["src/alpha", "src/nested/beta"] {
            let dir = tmp.path().join(pkg);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("package.xml"), "<package/>").unwrap();
        }
        let hidden = tmp.path().join(".git/gamma");
        std::fs::create_dir_all(&hidden).unwrap();
        std::fs::write(hidden.join("package.xml"), "<package/>").unwrap();

        let index = PackageIndex::discover(&[tmp.path().to_path_buf(), tmp.path().join("missing")]);
        assert!(index.contains("alpha"));
        assert!(index.contains("beta"));
        assert!(!index.contains("gamma"));
        assert_eq!(index.len(), 2);
    }
}
