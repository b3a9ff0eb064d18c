//! pluginlib description files.
//!
//! A description is either a single `<library>` or a `<class_libraries>`
//! wrapper around several of them; each library lists `<class>` entries.

use std::path::{Path, PathBuf};

use anyhow::Result;
use xmltree::{Element, XMLNode};

use super::{child_elements, read_xml, render_xml, FormatError};
use crate::util::fs;

/// Default file name for plugin descriptions created by roscompile.
pub const DEFAULT_PLUGIN_FILE: &str = "plugins.xml";

/// An editable plugin description file.
#[derive(Debug, Clone)]
pub struct PluginXml {
    path: PathBuf,
    /// `None` until the first class is inserted into a file that did not exist.
    root: Option<Element>,
    changed: bool,
}

impl PluginXml {
    /// Open a description file. A missing file yields an empty description.
    pub fn open(path: &Path) -> Result<Self, FormatError> {
        let root = if path.exists() {
            let root = read_xml(path)?;
            if root.name != "library" && root.name != "class_libraries" {
                return Err(FormatError::MissingElement {
                    path: path.to_path_buf(),
                    element: "library",
                });
            }
            Some(root)
        } else {
            None
        };
        Ok(PluginXml {
            path: path.to_path_buf(),
            root,
            changed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// All `(type, base_class_type)` pairs, in document order.
    pub fn classes(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            collect_classes(root, &mut out);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.classes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `implementation` is already registered for `interface`.
    pub fn contains(&self, implementation: &str, interface: &str) -> bool {
        self.classes()
            .iter()
            .any(|(t, base)| t == implementation && base == interface)
    }

    /// Register `implementation` as a plugin for `interface` unless it is
    /// already listed. Returns whether a class was inserted.
    pub fn insert_if_needed(&mut self, implementation: &str, interface: &str) -> bool {
        if self.contains(implementation, interface) {
            return false;
        }

        let package = implementation
            .split_once("::")
            .map(|(pkg, _)| pkg)
            .unwrap_or(implementation);
        let Some(library) = self.library_mut(package) else {
            return false;
        };

        let mut class = Element::new("class");
        class
            .attributes
            .insert("type".to_string(), implementation.to_string());
        class
            .attributes
            .insert("base_class_type".to_string(), interface.to_string());
        let mut description = Element::new("description");
        description
            .children
            .push(XMLNode::Text(implementation.to_string()));
        class.children.push(XMLNode::Element(description));
        library.children.push(XMLNode::Element(class));

        tracing::debug!(
            "{}: registered {} for {}",
            self.path.display(),
            implementation,
            interface
        );
        self.changed = true;
        true
    }

    /// Write the file if it changed. Returns whether it was written.
    pub fn write(&mut self) -> Result<bool> {
        let Some(root) = self.root.as_ref().filter(|_| self.changed) else {
            return Ok(false);
        };
        let text = render_xml(root, &self.path)?;
        fs::write_string(&self.path, &text)?;
        tracing::debug!("wrote {}", self.path.display());
        self.changed = false;
        Ok(true)
    }

    /// The library new classes go into, created when missing.
    fn library_mut(&mut self, package: &str) -> Option<&mut Element> {
        let root = self
            .root
            .get_or_insert_with(|| new_library(package));
        if root.name == "library" {
            return Some(root);
        }

        if !child_elements(root).any(|el| el.name == "library") {
            root.children.push(XMLNode::Element(new_library(package)));
        }
        root.children
            .iter_mut()
            .filter_map(|n| n.as_mut_element())
            .find(|el| el.name == "library")
    }
}

fn new_library(package: &str) -> Element {
    let mut lib = Element::new("library");
    lib.attributes
        .insert("path".to_string(), format!("lib/lib{}", package));
    lib
}

fn collect_classes(el: &Element, out: &mut Vec<(String, String)>) {
    for child in child_elements(el) {
        if child.name == "class" {
            let attr = |k: &str| child.attributes.get(k).cloned().unwrap_or_default();
            let ty = child
                .attributes
                .get("type")
                .or_else(|| child.attributes.get("name"))
                .cloned()
                .unwrap_or_default();
            out.push((ty, attr("base_class_type")));
        } else {
            collect_classes(child, out);
        }
    }
}
