//! Build and run dependencies of a package.
//!
//! Build dependencies come from the sources, run dependencies from the launch
//! files. A package never depends on itself.

use anyhow::{Context, Result};

use crate::core::{Category, DependencySet, Package};
use crate::formats::Launch;

/// Union of the packages imported or included by every source.
pub fn build_dependencies(package: &Package) -> Result<Vec<String>> {
    let sets = package
        .sources()
        .iter()
        .map(|source| Ok(source.dependencies(package.index())));
    aggregate(package.name(), sets)
}

/// Union of the packages referenced by every launch file.
///
/// A launch file that cannot be parsed fails the whole query.
pub fn run_dependencies(package: &Package) -> Result<Vec<String>> {
    let sets = package.files().files(Category::Launch).iter().map(|path| {
        let launch = Launch::load(path).with_context(|| {
            format!("failed to read launch file of package `{}`", package.name())
        })?;
        Ok(launch.dependencies(package.index()))
    });
    aggregate(package.name(), sets)
}

/// Union the reported sets, drop `own_name`, and sort.
pub fn aggregate<I>(own_name: &str, sets: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = Result<DependencySet>>,
{
    let mut all = DependencySet::new();
    for set in sets {
        all.extend([set?]);
    }
    all.remove(own_name);
    Ok(all.into_sorted_vec())
}
