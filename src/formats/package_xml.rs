//! The `package.xml` manifest.
//!
//! Only the parts needed to keep dependencies, plugin exports and people in
//! sync are interpreted; everything else is carried through untouched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use xmltree::{Element, XMLNode};

use super::{child_elements, element_text, read_xml, render_xml, FormatError};
use crate::util::fs;

/// File name of the manifest at a package root.
pub const MANIFEST_NAME: &str = "package.xml";

/// Dependency tags in the order they are laid out in a manifest.
const DEPEND_ORDER: &[&str] = &[
    "buildtool_depend",
    "depend",
    "build_depend",
    "build_export_depend",
    "run_depend",
    "exec_depend",
    "test_depend",
    "doc_depend",
];

/// Placeholder for the install prefix in plugin export paths.
const PREFIX: &str = "${prefix}";

/// A person listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Person {
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Person {
            name: name.into(),
            email,
        }
    }
}

/// Maintainers and authors of a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct People {
    pub maintainers: Vec<Person>,
    pub authors: Vec<Person>,
}

/// Role of a person in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Maintainer,
    Author,
}

impl Role {
    fn tag(&self) -> &'static str {
        match self {
            Role::Maintainer => "maintainer",
            Role::Author => "author",
        }
    }
}

/// A plugin description file exported by the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginExport {
    /// Package whose plugin loader reads the file (the export tag name)
    pub plugin_type: String,
    /// Location of the file, resolved against the package root
    pub path: PathBuf,
}

/// An editable `package.xml`.
#[derive(Debug, Clone)]
pub struct PackageXml {
    path: PathBuf,
    root: Element,
    changed: bool,
}

impl PackageXml {
    /// Load and parse a manifest.
    pub fn load(path: &Path) -> Result<Self, FormatError> {
        let root = read_xml(path)?;
        if root.name != "package" {
            return Err(FormatError::MissingElement {
                path: path.to_path_buf(),
                element: "package",
            });
        }
        Ok(PackageXml {
            path: path.to_path_buf(),
            root,
            changed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The declared package name, if any.
    pub fn name(&self) -> Option<String> {
        self.root
            .get_child("name")
            .map(element_text)
            .filter(|n| !n.is_empty())
    }

    /// The manifest format version (1 when unspecified).
    pub fn format(&self) -> u32 {
        self.root
            .attributes
            .get("format")
            .and_then(|f| f.trim().parse().ok())
            .unwrap_or(1)
    }

    /// Whether the document was modified since it was loaded or written.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Plugin description files declared in `<export>`.
    ///
    /// `${prefix}` is taken to be the package root.
    pub fn plugin_xmls(&self, package_root: &Path) -> Vec<PluginExport> {
        let Some(export) = self.root.get_child("export") else {
            return Vec::new();
        };
        child_elements(export)
            .filter_map(|el| {
                let value = el.attributes.get("plugin")?;
                Some(PluginExport {
                    plugin_type: el.name.clone(),
                    path: resolve_plugin_path(package_root, value),
                })
            })
            .collect()
    }

    /// Names of all dependencies declared with one of the given tags.
    pub fn dependencies_with(&self, tags: &[&str]) -> Vec<String> {
        child_elements(&self.root)
            .filter(|el| tags.contains(&el.name.as_str()))
            .map(element_text)
            .collect()
    }

    /// Check whether `name` is declared as a build (or run) dependency.
    pub fn has_dependency(&self, name: &str, build: bool) -> bool {
        let tags = self.dependency_tags(build);
        child_elements(&self.root)
            .any(|el| tags.contains(&el.name.as_str()) && element_text(el) == name)
    }

    /// Add dependencies as build or run entries.
    ///
    /// Names already declared are skipped, so repeated calls never produce
    /// duplicate nodes. Returns the names that were added.
    pub fn add_packages<S: AsRef<str>>(&mut self, names: &[S], build: bool) -> Vec<String> {
        let tag = self.insert_tag(build);
        let mut added = Vec::new();
        for name in names {
            let name = name.as_ref();
            if name.is_empty() || self.has_dependency(name, build) {
                continue;
            }
            let mut el = Element::new(tag);
            el.children.push(XMLNode::Text(name.to_string()));
            let pos = self.insert_position(tag);
            self.root.children.insert(pos, XMLNode::Element(el));
            tracing::debug!("{}: added <{}>{}</{}>", self.path.display(), tag, name, tag);
            added.push(name.to_string());
        }
        if !added.is_empty() {
            self.changed = true;
        }
        added
    }

    /// Export a plugin description file for `plugin_type`.
    ///
    /// `export_path` is relative to the package root. An existing export of
    /// the type that resolves to the same file counts, however it is spelled.
    /// Returns whether the export was added.
    pub fn add_plugin_export(&mut self, export_path: &str, plugin_type: &str) -> bool {
        let value = format!("{}/{}", PREFIX, export_path.trim_start_matches('/'));
        let package_root = self.path.parent().map(Path::to_path_buf).unwrap_or_default();
        let target = resolve_plugin_path(&package_root, &value);

        if self.root.get_child("export").is_none() {
            self.root
                .children
                .push(XMLNode::Element(Element::new("export")));
        }
        let Some(export) = self.root.get_mut_child("export") else {
            return false;
        };

        let exists = child_elements(export).any(|el| {
            el.name == plugin_type
                && el
                    .attributes
                    .get("plugin")
                    .is_some_and(|v| resolve_plugin_path(&package_root, v) == target)
        });
        if exists {
            return false;
        }

        let mut el = Element::new(plugin_type);
        el.attributes.insert("plugin".to_string(), value);
        export.children.push(XMLNode::Element(el));
        self.changed = true;
        true
    }

    /// People listed under a role, in document order.
    pub fn people(&self, role: Role) -> Vec<Person> {
        child_elements(&self.root)
            .filter(|el| el.name == role.tag())
            .map(|el| Person {
                name: element_text(el),
                email: el
                    .attributes
                    .get("email")
                    .map(|e| e.trim().to_string())
                    .filter(|e| !e.is_empty()),
            })
            .collect()
    }

    /// Rewrite the people listed under a role.
    ///
    /// Each existing name is first mapped through `replace`; then, if a person
    /// of that name appears in `people` with an email, that email is used.
    /// People are never added or removed. Returns the number of entries
    /// changed.
    pub fn update_people(
        &mut self,
        role: Role,
        people: &[Person],
        replace: &BTreeMap<String, String>,
    ) -> usize {
        let mut updated = 0;
        for node in self.root.children.iter_mut() {
            let Some(el) = node.as_mut_element() else {
                continue;
            };
            if el.name != role.tag() {
                continue;
            }

            let mut modified = false;
            let mut name = element_text(el);
            if let Some(new_name) = replace.get(&name) {
                if *new_name != name {
                    name = new_name.clone();
                    el.children = vec![XMLNode::Text(name.clone())];
                    modified = true;
                }
            }

            let email = people
                .iter()
                .find(|p| p.name == name)
                .and_then(|p| p.email.as_ref());
            if let Some(email) = email {
                if el.attributes.get("email") != Some(email) {
                    el.attributes.insert("email".to_string(), email.clone());
                    modified = true;
                }
            }

            if modified {
                updated += 1;
            }
        }
        if updated > 0 {
            self.changed = true;
        }
        updated
    }

    /// Write the manifest back if it changed. Returns whether it was written.
    pub fn output(&mut self) -> Result<bool> {
        if !self.changed {
            return Ok(false);
        }
        let text = render_xml(&self.root, &self.path)?;
        fs::write_string(&self.path, &text)?;
        tracing::debug!("wrote {}", self.path.display());
        self.changed = false;
        Ok(true)
    }

    fn dependency_tags(&self, build: bool) -> &'static [&'static str] {
        if build {
            &["build_depend", "depend"]
        } else {
            &["run_depend", "exec_depend", "depend"]
        }
    }

    fn insert_tag(&self, build: bool) -> &'static str {
        match (build, self.format()) {
            (true, _) => "build_depend",
            (false, 1) => "run_depend",
            (false, _) => "exec_depend",
        }
    }

    /// Where a new dependency element with `tag` goes: after the last
    /// dependency of the same or an earlier kind, else before the first later
    /// dependency or `<export>`, else at the end.
    fn insert_position(&self, tag: &str) -> usize {
        let rank = |name: &str| DEPEND_ORDER.iter().position(|t| *t == name);
        let Some(own) = rank(tag) else {
            return self.root.children.len();
        };

        let mut after = None;
        let mut before = None;
        for (idx, node) in self.root.children.iter().enumerate() {
            let Some(el) = node.as_element() else {
                continue;
            };
            match rank(&el.name) {
                Some(r) if r <= own => after = Some(idx + 1),
                Some(_) => {
                    before.get_or_insert(idx);
                }
                None if el.name == "export" => {
                    before.get_or_insert(idx);
                }
                None => {}
            }
        }
        after
            .or(before)
            .unwrap_or(self.root.children.len())
    }
}

/// Resolve a `plugin` export attribute against the package root.
fn resolve_plugin_path(package_root: &Path, value: &str) -> PathBuf {
    let value = value.trim();
    if let Some(rest) = value.strip_prefix(PREFIX) {
        package_root.join(rest.trim_start_matches('/'))
    } else if Path::new(value).is_absolute() {
        PathBuf::from(value)
    } else {
        package_root.join(value)
    }
}
