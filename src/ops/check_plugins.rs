//! Register the plugin classes exported by the sources.
//!
//! Each exported class is written into the description file the manifest
//! declares for its base class package. When no description is declared for
//! that package, one is created at the package root and exported from the
//! manifest.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::{Package, PluginBinding};
use crate::formats::PluginXml;
use crate::util::fs::same_file;

/// What `check_plugins` changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginSummary {
    /// Classes that were not registered yet
    pub inserted: Vec<PluginBinding>,

    /// Description files that did not exist before
    pub created: Vec<PathBuf>,

    /// Base class packages that got a new manifest export
    pub exported: Vec<String>,
}

impl PluginSummary {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.created.is_empty() && self.exported.is_empty()
    }
}

/// Open description files, one handle per physical file.
#[derive(Default)]
struct Descriptions {
    docs: Vec<PluginXml>,
    existed: Vec<bool>,
}

impl Descriptions {
    fn open(&mut self, path: &Path) -> Result<usize> {
        if let Some(idx) = self
            .docs
            .iter()
            .position(|d| d.path() == path || same_file(d.path(), path))
        {
            return Ok(idx);
        }
        let existed = path.exists();
        let doc = PluginXml::open(path)
            .with_context(|| format!("failed to open plugin description {}", path.display()))?;
        self.docs.push(doc);
        self.existed.push(existed);
        Ok(self.docs.len() - 1)
    }
}

pub fn check_plugins(package: &mut Package) -> Result<PluginSummary> {
    let bindings: Vec<PluginBinding> = package.sources().iter().flat_map(|s| s.plugins()).collect();
    let mut summary = PluginSummary::default();
    if bindings.is_empty() {
        return Ok(summary);
    }

    let mut descriptions = Descriptions::default();
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    for plugin in package.files().plugins() {
        let idx = descriptions.open(&plugin.path)?;
        // the first declaration of a type wins
        by_type.entry(plugin.plugin_type.clone()).or_insert(idx);
    }

    let plugin_file = package.plugin_file().to_string();
    let fallback = package.root().join(&plugin_file);

    for binding in &bindings {
        let idx = match by_type.get(&binding.target_package) {
            Some(idx) => *idx,
            None => {
                let idx = descriptions.open(&fallback)?;
                if package
                    .manifest_mut()
                    .add_plugin_export(&plugin_file, &binding.target_package)
                {
                    summary.exported.push(binding.target_package.clone());
                }
                by_type.insert(binding.target_package.clone(), idx);
                idx
            }
        };

        if descriptions.docs[idx].insert_if_needed(&binding.implementation(), &binding.interface()) {
            tracing::debug!("{}: registering plugin {}", package.name(), binding);
            summary.inserted.push(binding.clone());
        }
    }

    for (doc, existed) in descriptions.docs.iter_mut().zip(&descriptions.existed) {
        if doc.write()? && !existed {
            summary.created.push(doc.path().to_path_buf());
        }
    }
    package.write_manifest()?;

    // newly created descriptions are declared files from here on
    if !summary.created.is_empty() {
        package.rescan()?;
    }
    Ok(summary)
}
