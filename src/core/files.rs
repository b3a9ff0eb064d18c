//! Classified view of every file inside a package.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::category::{Category, PathClassifier};
use crate::formats::package_xml::PluginExport;
use crate::util::fs::{same_file, walk};

/// A plugin description file found during the scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginFile {
    /// Where the walk found the file
    pub path: PathBuf,
    /// The path as declared in the manifest
    pub declared: PathBuf,
    /// The export tag it was declared under
    pub plugin_type: String,
}

/// Files of a package grouped by category.
///
/// Every scanned file appears under exactly one category. Plugin files are
/// listed under [`Category::Plugins`] like any other; [`plugins`] carries the
/// matching manifest declaration, in the same order.
///
/// [`plugins`]: ClassifiedFiles::plugins
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassifiedFiles {
    files: BTreeMap<Category, Vec<PathBuf>>,
    #[serde(skip)]
    plugins: Vec<PluginFile>,
}

impl ClassifiedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files in a category, in walk order.
    pub fn files(&self, category: Category) -> &[PathBuf] {
        self.files.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Plugin description files with their declared types.
    pub fn plugins(&self) -> &[PluginFile] {
        &self.plugins
    }

    /// Files nothing claimed.
    pub fn unclassified(&self) -> &[PathBuf] {
        self.files(Category::Unclassified)
    }

    /// Categories that hold at least one file, in display order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.files.keys().copied()
    }

    /// Every `(category, file)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &Path)> {
        self.files
            .iter()
            .flat_map(|(c, files)| files.iter().map(move |f| (*c, f.as_path())))
    }

    /// The category a file was placed in.
    pub fn category_of(&self, path: &Path) -> Option<Category> {
        self.iter().find(|(_, f)| *f == path).map(|(c, _)| c)
    }

    /// Total number of files.
    pub fn len(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, category: Category, path: PathBuf) {
        self.files.entry(category).or_default().push(path);
    }
}

/// Walk `root` and classify every file.
///
/// Version-control directories and backup files (trailing `~`) are skipped,
/// as are entries that cannot be read.
/// Files the classifier cannot place are compared against the declared plugin
/// files by filesystem identity before landing in
/// [`Category::Unclassified`].
pub fn scan(
    root: &Path,
    declared_plugins: &[PluginExport],
    classifier: &PathClassifier,
) -> ClassifiedFiles {
    let mut files = ClassifiedFiles::new();

    for entry in walk(root) {
        let path = entry.path();

        let is_file = entry.file_type().is_file()
            || (entry.file_type().is_symlink() && path.is_file());
        if !is_file {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            tracing::warn!("skipping non UTF-8 file name: {}", path.display());
            continue;
        };
        if name.ends_with('~') {
            continue;
        }

        if let Some(category) = classifier.classify(name) {
            files.push(category, path.to_path_buf());
            continue;
        }

        match declared_plugins.iter().find(|p| same_file(&p.path, path)) {
            Some(plugin) => {
                files.push(Category::Plugins, path.to_path_buf());
                files.plugins.push(PluginFile {
                    path: path.to_path_buf(),
                    declared: plugin.path.clone(),
                    plugin_type: plugin.plugin_type.clone(),
                });
            }
            None => files.push(Category::Unclassified, path.to_path_buf()),
        }
    }

    tracing::debug!("classified {} files under {}", files.len(), root.display());
    files
}
