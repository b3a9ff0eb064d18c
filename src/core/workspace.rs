//! Workspace - the packages found below a directory.
//!
//! Any directory holding a `package.xml` is a package root. Package roots may
//! nest; each is loaded as its own package.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::package::{Package, PackageOptions};
use crate::formats::package_xml::MANIFEST_NAME;
use crate::util::fs::walk;

/// Every directory below `root` (inclusive) that holds a manifest, sorted.
///
/// Version-control directories are not searched. Directories that cannot be
/// read are skipped with a warning.
pub fn find_package_roots(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("`{}` is not a directory", root.display());
    }

    Ok(walk(root)
        .filter(|e| e.file_type().is_dir() && e.path().join(MANIFEST_NAME).is_file())
        .map(|e| e.into_path())
        .collect())
}

/// Load every package below `root`, in path order.
pub fn get_packages(root: &Path) -> Result<Vec<Package>> {
    get_packages_with(root, &PackageOptions::default())
}

/// Like [`get_packages`], loading each package with `options`.
///
/// Fails on the first package that cannot be loaded. Callers that want to
/// carry on past broken packages use [`find_package_roots`] and load each
/// root themselves.
pub fn get_packages_with(root: &Path, options: &PackageOptions) -> Result<Vec<Package>> {
    find_package_roots(root)?
        .into_iter()
        .map(|dir| {
            Package::with_options(&dir, options.clone())
                .with_context(|| format!("failed to load package at {}", dir.display()))
        })
        .collect()
}
