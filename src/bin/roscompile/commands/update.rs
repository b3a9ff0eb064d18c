//! `roscompile update` command
//!
//! Adds missing dependencies to each manifest, then registers exported
//! plugins, and optionally writes `setup.py`.

use anyhow::Result;

use super::{display_path, finish, load_packages};
use crate::cli::UpdateArgs;
use roscompile::core::Package;
use roscompile::ops::{PluginSummary, UpdateSummary};
use roscompile::util::{Shell, Status};

/// Everything one package went through.
struct Outcome {
    dependencies: UpdateSummary,
    plugins: PluginSummary,
    setup: bool,
}

pub fn execute(args: UpdateArgs, shell: &Shell) -> Result<()> {
    let mut packages = load_packages(args.path.as_deref(), shell)?;

    for package in &mut packages {
        let outcome = match update_package(package, args.setup) {
            Ok(outcome) => outcome,
            Err(e) => {
                shell.error(format!("{}: {:#}", package.name(), e));
                continue;
            }
        };
        let unclassified: Vec<String> = if args.extras {
            package
                .files()
                .unclassified()
                .iter()
                .map(|p| display_path(package, p).display().to_string())
                .collect()
        } else {
            Vec::new()
        };

        if shell.is_json() {
            shell.json_event(&serde_json::json!({
                "reason": "package-updated",
                "package": package.name(),
                "dependencies": outcome.dependencies,
                "plugins": outcome.plugins,
                "setup": outcome.setup,
                "unclassified": unclassified,
            }));
            continue;
        }

        report(shell, package, &outcome);
        for path in &unclassified {
            shell.status(Status::Skipped, format!("{}: unclassified file {}", package.name(), path));
        }
    }

    finish(shell)
}

fn update_package(package: &mut Package, setup: bool) -> Result<Outcome> {
    let dependencies = package.update_manifest()?;
    let plugins = package.check_plugins()?;
    let setup = setup && package.generate_setup()?;
    Ok(Outcome {
        dependencies,
        plugins,
        setup,
    })
}

fn report(shell: &Shell, package: &Package, outcome: &Outcome) {
    let name = package.name();
    for dep in &outcome.dependencies.build {
        shell.status(Status::Added, format!("{} to {} (build)", dep, name));
    }
    for dep in &outcome.dependencies.run {
        shell.status(Status::Added, format!("{} to {} (run)", dep, name));
    }
    for path in &outcome.plugins.created {
        shell.status(Status::Created, display_path(package, path).display());
    }
    for binding in &outcome.plugins.inserted {
        shell.status(Status::Registered, format!("{} in {}", binding, name));
    }
    if outcome.setup {
        shell.status(Status::Created, format!("setup.py for {}", name));
    }
    if outcome.dependencies.is_empty() && outcome.plugins.is_empty() && !outcome.setup {
        shell.note(format!("{} is up to date", name));
    }
}
