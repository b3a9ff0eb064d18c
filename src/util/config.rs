//! Configuration file support for roscompile.
//!
//! roscompile reads two configuration files:
//! - Global: `~/.roscompile/config.toml` - User-wide defaults
//! - Project: `.roscompile/config.toml` - Overrides for one workspace
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{Category, PathClassifier};
use crate::formats::plugin_xml::DEFAULT_PLUGIN_FILE;
use crate::util::fs;

/// Name of the directory holding roscompile configuration.
pub const CONFIG_DIR: &str = ".roscompile";

/// roscompile configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File classification settings
    pub classify: ClassifyConfig,

    /// Plugin description settings
    pub plugins: PluginsConfig,

    /// Known package index settings
    pub index: IndexConfig,
}

/// Extra entries for the classification tables.
///
/// Extensions are given without the leading dot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    pub source: Vec<String>,
    pub config: Vec<String>,
    pub data: Vec<String>,
    pub model: Vec<String>,

    /// File names always treated as build files
    pub basic_files: Vec<String>,
}

/// Plugin-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    /// Description file created when a package declares none
    pub file_name: String,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        PluginsConfig {
            file_name: DEFAULT_PLUGIN_FILE.to_string(),
        }
    }
}

/// Which names count as packages when filtering dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Turn filtering off entirely
    pub enabled: bool,

    /// Packages known to exist even if they are not on disk
    pub known_packages: Vec<String>,

    /// Also index the packages found under `ROS_PACKAGE_PATH`
    pub use_ros_package_path: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            enabled: true,
            known_packages: Vec::new(),
            use_ros_package_path: true,
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    ///
    /// Extension and name lists accumulate; scalar settings are replaced when
    /// they differ from the default.
    pub fn merge(&mut self, other: Config) {
        let classify = other.classify;
        self.classify.source.extend(classify.source);
        self.classify.config.extend(classify.config);
        self.classify.data.extend(classify.data);
        self.classify.model.extend(classify.model);
        self.classify.basic_files.extend(classify.basic_files);

        if other.plugins != PluginsConfig::default() {
            self.plugins = other.plugins;
        }

        self.index.known_packages.extend(other.index.known_packages);
        if !other.index.enabled {
            self.index.enabled = false;
        }
        if !other.index.use_ros_package_path {
            self.index.use_ros_package_path = false;
        }
    }

    /// The classifier described by the `[classify]` table.
    pub fn classifier(&self) -> PathClassifier {
        let c = &self.classify;
        PathClassifier::new()
            .with_extensions(Category::Source, &c.source)
            .with_extensions(Category::Config, &c.config)
            .with_extensions(Category::Data, &c.data)
            .with_extensions(Category::Model, &c.model)
            .with_basic_files(&c.basic_files)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.roscompile/config.toml)
/// 2. Global config (~/.roscompile/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }
    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global config directory (~/.roscompile).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR))
}

/// Get the global config path (~/.roscompile/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.roscompile/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join("config.toml")
}
