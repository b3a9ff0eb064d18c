//! Package - a ROS package directory with its manifest and classified files.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::core::category::{Category, PathClassifier};
use crate::core::dependency::PackageIndex;
use crate::core::files::{self, ClassifiedFiles};
use crate::formats::package_xml::MANIFEST_NAME;
use crate::formats::plugin_xml::DEFAULT_PLUGIN_FILE;
use crate::formats::{PackageXml, People, Person, Role, Source};
use crate::ops::{self, PluginSummary, UpdateSummary};
use crate::util::fs;

/// Knobs shared by every package loaded from one invocation.
#[derive(Debug, Clone)]
pub struct PackageOptions {
    /// File name classification tables
    pub classifier: PathClassifier,

    /// Name of the plugin description created when none is declared
    pub plugin_file: String,

    /// Known package names; dependencies outside it are dropped
    pub index: Option<Arc<PackageIndex>>,
}

impl Default for PackageOptions {
    fn default() -> Self {
        PackageOptions {
            classifier: PathClassifier::new(),
            plugin_file: DEFAULT_PLUGIN_FILE.to_string(),
            index: None,
        }
    }
}

impl PackageOptions {
    pub fn with_classifier(mut self, classifier: PathClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_plugin_file(mut self, name: impl Into<String>) -> Self {
        self.plugin_file = name.into();
        self
    }

    pub fn with_index(mut self, index: PackageIndex) -> Self {
        self.index = Some(Arc::new(index));
        self
    }
}

/// A loaded ROS package.
///
/// The name is the last segment of the root directory, which is what catkin
/// uses to find the package; the `<name>` in the manifest is not consulted.
#[derive(Debug)]
pub struct Package {
    name: String,

    /// Absolute root directory
    root: PathBuf,

    /// The `package.xml`, edited in place by the update operations
    manifest: PackageXml,

    files: ClassifiedFiles,

    /// One parsed source per file classified as [`Category::Source`]
    sources: Vec<Source>,

    options: PackageOptions,
}

impl Package {
    /// Load the package rooted at `root` with default options.
    pub fn new(root: &Path) -> Result<Self> {
        Self::with_options(root, PackageOptions::default())
    }

    pub fn with_options(root: &Path, options: PackageOptions) -> Result<Self> {
        let root = fs::normalize_path(root);
        let Some(name) = root.file_name().and_then(|n| n.to_str()) else {
            bail!("cannot derive a package name from `{}`", root.display());
        };
        let name = name.to_string();

        let manifest = PackageXml::load(&root.join(MANIFEST_NAME))
            .with_context(|| format!("failed to load manifest of package `{}`", name))?;
        if let Some(declared) = manifest.name() {
            if declared != name {
                tracing::debug!(
                    "package directory `{}` declares the name `{}`",
                    name,
                    declared
                );
            }
        }

        let mut package = Package {
            name,
            root,
            manifest,
            files: ClassifiedFiles::new(),
            sources: Vec::new(),
            options,
        };
        package.rescan()?;
        Ok(package)
    }

    /// Re-classify the files and reload the sources.
    ///
    /// Plugin declarations are taken from the in-memory manifest, so exports
    /// added since loading are honored.
    pub fn rescan(&mut self) -> Result<()> {
        let declared = self.manifest.plugin_xmls(&self.root);
        self.files = files::scan(&self.root, &declared, &self.options.classifier);
        self.sources = self
            .files
            .files(Category::Source)
            .iter()
            .map(|path| Source::load(path))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            "loaded package `{}`: {} files, {} sources",
            self.name,
            self.files.len(),
            self.sources.len()
        );
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &PackageXml {
        &self.manifest
    }

    pub fn manifest_mut(&mut self) -> &mut PackageXml {
        &mut self.manifest
    }

    pub fn files(&self) -> &ClassifiedFiles {
        &self.files
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// The known-package filter, if one was configured.
    pub fn index(&self) -> Option<&PackageIndex> {
        self.options.index.as_deref()
    }

    /// File name used when a plugin description has to be created.
    pub fn plugin_file(&self) -> &str {
        &self.options.plugin_file
    }

    /// Packages this package needs to build (`build == true`) or to run.
    pub fn get_dependencies(&self, build: bool) -> Result<Vec<String>> {
        if build {
            ops::build_dependencies(self)
        } else {
            ops::run_dependencies(self)
        }
    }

    /// Add every discovered dependency missing from the manifest.
    pub fn update_manifest(&mut self) -> Result<UpdateSummary> {
        ops::update_manifest(self)
    }

    /// Register the exported plugin classes in their description files.
    pub fn check_plugins(&mut self) -> Result<PluginSummary> {
        ops::check_plugins(self)
    }

    /// Write a `setup.py` when the package ships python modules.
    pub fn generate_setup(&self) -> Result<bool> {
        ops::generate_setup(self)
    }

    pub fn get_people(&self) -> People {
        People {
            maintainers: self.manifest.people(Role::Maintainer),
            authors: self.manifest.people(Role::Author),
        }
    }

    /// Rename people through `replace` and fill in emails from `people`, for
    /// maintainers and authors alike. The manifest is not written.
    pub fn update_people(&mut self, people: &[Person], replace: &BTreeMap<String, String>) -> usize {
        self.manifest.update_people(Role::Maintainer, people, replace)
            + self.manifest.update_people(Role::Author, people, replace)
    }

    /// Write the manifest if anything changed it.
    pub fn write_manifest(&mut self) -> Result<bool> {
        self.manifest.output()
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.root.display())
    }
}
