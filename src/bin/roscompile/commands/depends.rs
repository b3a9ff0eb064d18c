//! `roscompile depends` command

use anyhow::Result;

use super::{finish, load_packages};
use crate::cli::DependsArgs;
use roscompile::util::Shell;

pub fn execute(args: DependsArgs, shell: &Shell) -> Result<()> {
    let packages = load_packages(args.path.as_deref(), shell)?;
    let build = !args.run;
    let kind = if build { "build" } else { "run" };

    for package in &packages {
        let deps = match package.get_dependencies(build) {
            Ok(deps) => deps,
            Err(e) => {
                shell.error(format!("{}: {:#}", package.name(), e));
                continue;
            }
        };

        if shell.is_json() {
            shell.json_event(&serde_json::json!({
                "reason": "package-dependencies",
                "package": package.name(),
                "kind": kind,
                "dependencies": deps,
            }));
        } else {
            shell.print(format!("{}: {}", package.name(), deps.join(" ")).trim_end());
        }
    }

    finish(shell)
}
