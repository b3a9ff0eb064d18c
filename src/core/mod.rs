//! Core data structures for roscompile.
//!
//! - File classification ([`Category`], [`PathClassifier`], [`ClassifiedFiles`])
//! - Dependency sets, plugin bindings and the known-package index
//! - Packages and package discovery

pub mod category;
pub mod dependency;
pub mod files;
pub mod package;
pub mod workspace;

pub use category::{Category, PathClassifier};
pub use dependency::{DependencySet, PackageIndex, PluginBinding};
pub use files::{scan, ClassifiedFiles, PluginFile};
pub use package::{Package, PackageOptions};
pub use workspace::{find_package_roots, get_packages, get_packages_with};
