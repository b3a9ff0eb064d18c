//! Global context for roscompile operations.
//!
//! Provides centralized access to configuration, paths, and environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::{PackageIndex, PackageOptions};
use crate::util::config::{self, Config};

/// Environment variable listing the ROS package roots.
pub const ROS_PACKAGE_PATH: &str = "ROS_PACKAGE_PATH";

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Merged global and project configuration
    config: Config,

    /// Value of `ROS_PACKAGE_PATH` at startup
    ros_package_path: Option<String>,
}

impl GlobalContext {
    /// Create a new GlobalContext for the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    ///
    /// The project config is looked up in `cwd`.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let global = config::global_config_path().unwrap_or_default();
        let config = config::load_config(&global, &config::project_config_path(&cwd));
        GlobalContext {
            cwd,
            config,
            ros_package_path: std::env::var(ROS_PACKAGE_PATH).ok(),
        }
    }

    /// Replace the loaded configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Override the package path instead of reading the environment.
    pub fn with_ros_package_path(mut self, value: Option<String>) -> Self {
        self.ros_package_path = value;
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve a user-supplied path against the working directory.
    pub fn resolve_path(&self, path: Option<&Path>) -> PathBuf {
        match path {
            Some(p) if p.is_absolute() => p.to_path_buf(),
            Some(p) => self.cwd.join(p),
            None => self.cwd.clone(),
        }
    }

    /// Build the known-package index for packages under `workspace`.
    ///
    /// Returns `None` when filtering is disabled or when nothing beyond the
    /// workspace itself is known, since filtering against the workspace alone
    /// would drop every external dependency.
    pub fn package_index(&self, workspace: &Path) -> Option<PackageIndex> {
        let settings = &self.config.index;
        if !settings.enabled {
            return None;
        }

        let mut index: PackageIndex = settings.known_packages.iter().cloned().collect();
        if settings.use_ros_package_path {
            if let Some(value) = &self.ros_package_path {
                for root in PackageIndex::roots_from_path_var(value) {
                    index.add_root(&root);
                }
            }
        }
        if index.is_empty() {
            tracing::debug!("no known packages, dependency filtering disabled");
            return None;
        }

        index.add_root(workspace);
        tracing::debug!("indexed {} known packages", index.len());
        Some(index)
    }

    /// Options for loading the packages under `workspace`.
    pub fn package_options(&self, workspace: &Path) -> PackageOptions {
        let options = PackageOptions::default()
            .with_classifier(self.config.classifier())
            .with_plugin_file(self.config.plugins.file_name.clone());
        match self.package_index(workspace) {
            Some(index) => options.with_index(index),
            None => options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn package(dir: &Path) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("package.xml"), "<package/>").unwrap();
    }

    #[test]
    fn test_resolve_path() {
        let ctx = GlobalContext::with_cwd(PathBuf::from("/ws"));
        assert_eq!(ctx.resolve_path(None), PathBuf::from("/ws"));
        assert_eq!(ctx.resolve_path(Some(Path::new("src"))), PathBuf::from("/ws/src"));
        assert_eq!(ctx.resolve_path(Some(Path::new("/other"))), PathBuf::from("/other"));
    }

    #[test]
    fn test_project_config_is_loaded() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".roscompile")).unwrap();
        fs::write(
            tmp.path().join(".roscompile/config.toml"),
            "[plugins]\nfile_name = \"local.xml\"\n",
        )
        .unwrap();

        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf());
        assert_eq!(ctx.config().plugins.file_name, "local.xml");
        assert_eq!(ctx.package_options(tmp.path()).plugin_file, "local.xml");
    }

    #[test]
    fn test_no_index_without_known_packages() {
        let tmp = TempDir::new().unwrap();
        package(&tmp.path().join("ws/foo"));

        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf())
            .with_config(Config::default())
            .with_ros_package_path(None);
        assert!(ctx.package_index(&tmp.path().join("ws")).is_none());
    }

    #[test]
    fn test_index_from_package_path_and_workspace() {
        let tmp = TempDir::new().unwrap();
        package(&tmp.path().join("opt/roscpp"));
        package(&tmp.path().join("opt/rospy"));
        package(&tmp.path().join("ws/foo"));

        let mut config = Config::default();
        config.index.known_packages = vec!["tf2".to_string()];
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf())
            .with_config(config)
            .with_ros_package_path(Some(tmp.path().join("opt").display().to_string()));

        let index = ctx.package_index(&tmp.path().join("ws")).unwrap();
        for name in ["roscpp", "rospy", "tf2", "foo"] {
            assert!(index.contains(name), "{}", name);
        }
        assert!(!index.contains("os"));
    }

    #[test]
    fn test_index_disabled() {
        let mut config = Config::default();
        config.index.enabled = false;
        config.index.known_packages = vec!["roscpp".to_string()];

        let ctx = GlobalContext::with_cwd(PathBuf::from("/ws")).with_config(config);
        assert!(ctx.package_index(Path::new("/ws")).is_none());
        assert!(ctx.package_options(Path::new("/ws")).index.is_none());
    }
}
