//! `roscompile plugins` command

use anyhow::Result;

use super::{display_path, finish, load_packages};
use crate::cli::PluginsArgs;
use roscompile::util::{Shell, Status};

pub fn execute(args: PluginsArgs, shell: &Shell) -> Result<()> {
    let mut packages = load_packages(args.path.as_deref(), shell)?;

    for package in &mut packages {
        let summary = match package.check_plugins() {
            Ok(summary) => summary,
            Err(e) => {
                shell.error(format!("{}: {:#}", package.name(), e));
                continue;
            }
        };

        if shell.is_json() {
            shell.json_event(&serde_json::json!({
                "reason": "package-plugins",
                "package": package.name(),
                "plugins": summary,
            }));
            continue;
        }

        for path in &summary.created {
            shell.status(Status::Created, display_path(package, path).display());
        }
        for binding in &summary.inserted {
            shell.status(Status::Registered, format!("{} in {}", binding, package.name()));
        }
    }

    finish(shell)
}
