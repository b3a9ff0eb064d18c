//! High-level operations.
//!
//! Each operation works on one loaded [`Package`](crate::core::Package) and
//! backs one roscompile command.

pub mod check_plugins;
pub mod dependencies;
pub mod generate_setup;
pub mod update_manifest;

pub use check_plugins::{check_plugins, PluginSummary};
pub use dependencies::{aggregate, build_dependencies, run_dependencies};
pub use generate_setup::generate_setup;
pub use update_manifest::{update_manifest, UpdateSummary};
