//! `roscompile files` command

use std::collections::BTreeMap;

use anyhow::Result;

use super::{display_path, finish, load_packages};
use crate::cli::FilesArgs;
use roscompile::core::Category;
use roscompile::util::Shell;

pub fn execute(args: FilesArgs, shell: &Shell) -> Result<()> {
    let packages = load_packages(args.path.as_deref(), shell)?;

    for package in &packages {
        let files = package.files();
        let categories: Vec<Category> = if args.unclassified {
            vec![Category::Unclassified]
        } else {
            files.categories().collect()
        };

        if shell.is_json() {
            let listing: BTreeMap<Category, Vec<String>> = categories
                .iter()
                .map(|c| {
                    let paths = files
                        .files(*c)
                        .iter()
                        .map(|p| display_path(package, p).display().to_string())
                        .collect();
                    (*c, paths)
                })
                .collect();
            shell.json_event(&serde_json::json!({
                "reason": "package-files",
                "package": package.name(),
                "root": package.root(),
                "files": listing,
            }));
            continue;
        }

        shell.print(package.name());
        for category in categories {
            let paths = files.files(category);
            if paths.is_empty() {
                continue;
            }
            shell.print(format!("  {}", category));
            for path in paths {
                shell.print(format!("    {}", display_path(package, path).display()));
            }
        }
    }

    finish(shell)
}
