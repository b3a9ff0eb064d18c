//! Readers and writers for the files a package is made of.
//!
//! - [`source::Source`]: python and C++ sources (imports, includes, plugin macros)
//! - [`launch::Launch`]: roslaunch XML files
//! - [`package_xml::PackageXml`]: the package manifest
//! - [`plugin_xml::PluginXml`]: pluginlib description files
//! - [`setup_py::SetupPy`]: the catkin `setup.py` generator

pub mod launch;
pub mod package_xml;
pub mod plugin_xml;
pub mod setup_py;
pub mod source;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;
use xmltree::{Element, EmitterConfig};

pub use launch::Launch;
pub use package_xml::{PackageXml, People, Person, Role};
pub use plugin_xml::PluginXml;
pub use setup_py::SetupPy;
pub use source::Source;

/// Errors reading or writing package files.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to open `{}`", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse `{}`: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("`{}` has no <{element}> element", path.display())]
    MissingElement { path: PathBuf, element: &'static str },

    #[error("failed to write `{}`: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

/// Parse an XML document from disk.
pub(crate) fn read_xml(path: &Path) -> Result<Element, FormatError> {
    let file = File::open(path).map_err(|source| FormatError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Element::parse(BufReader::new(file)).map_err(|e| FormatError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Serialize an XML document with two-space indentation.
pub(crate) fn render_xml(root: &Element, path: &Path) -> Result<String, FormatError> {
    let config = EmitterConfig::new()
        .perform_indent(true)
        .indent_string("  ");
    let mut out = Vec::new();
    root.write_with_config(&mut out, config)
        .map_err(|e| FormatError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let mut text = String::from_utf8(out).map_err(|e| FormatError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    text.push('\n');
    Ok(text)
}

/// Iterate over the element children of an element.
pub(crate) fn child_elements(el: &Element) -> impl Iterator<Item = &Element> {
    el.children.iter().filter_map(|n| n.as_element())
}

/// Text content of an element, trimmed.
pub(crate) fn element_text(el: &Element) -> String {
    el.get_text()
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}
