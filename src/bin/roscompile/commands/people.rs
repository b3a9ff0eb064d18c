//! `roscompile people` command
//!
//! Lists the maintainers and authors across all packages. With `--write`,
//! the renames and every known email are applied to each manifest.

use std::collections::BTreeMap;

use anyhow::Result;

use super::{finish, load_packages};
use crate::cli::PeopleArgs;
use roscompile::core::Package;
use roscompile::formats::Person;
use roscompile::util::{Shell, Status};

pub fn execute(args: PeopleArgs, shell: &Shell) -> Result<()> {
    let mut packages = load_packages(args.path.as_deref(), shell)?;
    let replace: BTreeMap<String, String> = args.replace.into_iter().collect();
    let people = merge_people(&packages, &replace);

    if shell.is_json() {
        shell.json_event(&serde_json::json!({
            "reason": "people",
            "people": people,
        }));
    } else {
        for person in &people {
            match &person.email {
                Some(email) => shell.print(format!("{} <{}>", person.name, email)),
                None => shell.print(&person.name),
            }
        }
    }

    if args.write {
        for package in &mut packages {
            let changed = package.update_people(&people, &replace);
            if changed == 0 {
                continue;
            }
            match package.write_manifest() {
                Ok(_) => shell.status(
                    Status::Updated,
                    format!("{} ({} entries)", package.name(), changed),
                ),
                Err(e) => shell.error(format!("{}: {:#}", package.name(), e)),
            }
        }
    }

    finish(shell)
}

/// Everyone listed in any package, after renaming, sorted by name.
///
/// The first email seen for a name is kept.
fn merge_people(packages: &[Package], replace: &BTreeMap<String, String>) -> Vec<Person> {
    let mut merged: BTreeMap<String, Option<String>> = BTreeMap::new();
    for package in packages {
        let people = package.get_people();
        for person in people.maintainers.into_iter().chain(people.authors) {
            let name = replace.get(&person.name).cloned().unwrap_or(person.name);
            let email = merged.entry(name).or_default();
            if email.is_none() {
                *email = person.email;
            }
        }
    }
    merged
        .into_iter()
        .map(|(name, email)| Person::new(name, email))
        .collect()
}
