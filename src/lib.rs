//! roscompile - keeps ROS package metadata in sync with the code
//!
//! This crate scans ROS packages, classifies their files, infers build and
//! run dependencies from sources and launch files, and rewrites
//! `package.xml`, pluginlib descriptions and `setup.py` to match.

pub mod core;
pub mod formats;
pub mod ops;
pub mod util;

pub use core::{
    category::{Category, PathClassifier},
    dependency::{DependencySet, PackageIndex, PluginBinding},
    files::ClassifiedFiles,
    package::{Package, PackageOptions},
    workspace::{find_package_roots, get_packages},
};

pub use util::context::GlobalContext;
