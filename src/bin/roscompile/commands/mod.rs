//! Command implementations

pub mod completions;
pub mod depends;
pub mod files;
pub mod people;
pub mod plugins;
pub mod update;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use roscompile::core::{find_package_roots, Package};
use roscompile::util::fs::relative_path;
use roscompile::util::{GlobalContext, Shell};

/// Load every package under `path` (or the working directory).
///
/// A package that fails to load is reported through the shell and skipped;
/// [`finish`] turns those reports into a failing exit status.
pub fn load_packages(path: Option<&Path>, shell: &Shell) -> Result<Vec<Package>> {
    let ctx = GlobalContext::new()?;
    let root = ctx.resolve_path(path);

    let roots = find_package_roots(&root)?;
    if roots.is_empty() {
        bail!(
            "no ROS packages found in {}\n\
             help: a package is a directory containing package.xml",
            root.display()
        );
    }

    let options = ctx.package_options(&root);
    let mut packages = Vec::with_capacity(roots.len());
    for dir in roots {
        match Package::with_options(&dir, options.clone()) {
            Ok(package) => packages.push(package),
            Err(e) => shell.error(format!("{:#}", e)),
        }
    }
    Ok(packages)
}

/// Fail when any error was reported along the way.
pub fn finish(shell: &Shell) -> Result<()> {
    match shell.error_count() {
        0 => Ok(()),
        1 => bail!("1 package could not be processed"),
        n => bail!("{} packages could not be processed", n),
    }
}

/// A path inside `package`, for display.
pub fn display_path(package: &Package, path: &Path) -> PathBuf {
    relative_path(package.root(), path)
}
