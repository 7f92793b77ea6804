use crate::output::{print_json, print_outcome};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum PersonSubcommand {
    /// Add a person; unset on every existing cycle
    Add {
        /// Display name
        name: String,
    },
    /// Remove a person by number
    Remove {
        /// Person number as shown by `prayer list`
        number: usize,
    },
}

pub fn run(root: &Path, subcmd: PersonSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        PersonSubcommand::Add { name } => add(root, &name, json),
        PersonSubcommand::Remove { number } => remove(root, number, json),
    }
}

fn add(root: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    let mut session = super::open_session(root)?;
    let outcome = session.add_participant(name)?;
    let number = session.roster().people.len();

    if json {
        return print_json(&serde_json::json!({
            "added": name.trim(),
            "number": number,
            "outcome": outcome,
        }));
    }
    println!("Added '{}' as #{number}", name.trim());
    print_outcome(&outcome);
    Ok(())
}

fn remove(root: &Path, number: usize, json: bool) -> anyhow::Result<()> {
    let index = super::person_index(number)?;
    let mut session = super::open_session(root)?;
    let name = session.roster().people.get(index).map(|p| p.name.clone());
    let outcome = session.remove_participant(index)?;
    let name = name.unwrap_or_default();

    if json {
        return print_json(&serde_json::json!({
            "removed": name,
            "outcome": outcome,
        }));
    }
    println!("Removed '{name}'");
    print_outcome(&outcome);
    Ok(())
}
