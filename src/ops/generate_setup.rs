//! Generate `setup.py` for packages that ship python modules.

use anyhow::Result;

use crate::core::Package;
use crate::formats::setup_py::SETUP_PY;
use crate::formats::{SetupPy, Source};

/// Write a `setup.py` describing the python packages among the sources.
///
/// Nothing is written when any source is already a `setup.py`, or there is no
/// importable python package (scripts alone are not installed through
/// setuptools). Returns whether the file was written.
pub fn generate_setup(package: &Package) -> Result<bool> {
    if let Some(existing) = package.sources().iter().find(|s| s.file_name() == SETUP_PY) {
        tracing::debug!(
            "{}: keeping existing {}",
            package.name(),
            existing.path().display()
        );
        return Ok(false);
    }

    let python: Vec<&Source> = package
        .sources()
        .iter()
        .filter(|s| s.is_python() && s.file_name() != SETUP_PY)
        .collect();
    if python.is_empty() {
        return Ok(false);
    }

    let setup = SetupPy::new(package.name(), package.root(), &python);
    if !setup.is_valid() {
        tracing::debug!("{}: no python packages to install", package.name());
        return Ok(false);
    }
    setup.write()?;
    Ok(true)
}
