//! Interactive choice of the list to work on. The operator picks a list by number and may create
//! or remove lists from the same prompt; the menu is rebuilt from disk after each change.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    store::{list_store::ListStore, naming::display_name},
    utils::input::LineInput,
};

/// One line of operator input at the selection prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorCommand {
    Select(usize),
    Create(String),
    Remove(usize),
    Invalid,
}

impl SelectorCommand {
    /// `<n>`, `create <name>` / `c <name>`, or `remove <n>` / `r <n>`.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(word, rest)| (word, rest.trim()))
            .unwrap_or((line, ""));

        match word {
            "create" | "c" => SelectorCommand::Create(rest.to_string()),
            "remove" | "r" => rest
                .parse()
                .map(SelectorCommand::Remove)
                .unwrap_or(SelectorCommand::Invalid),
            _ if rest.is_empty() => line
                .parse()
                .map(SelectorCommand::Select)
                .unwrap_or(SelectorCommand::Invalid),
            _ => SelectorCommand::Invalid,
        }
    }
}

pub fn print_lists(lists: &[String]) {
    println!("\n📋 Found {} task lists:\n", lists.len());
    for (i, file) in lists.iter().enumerate() {
        println!("{}. {}", i + 1, display_name(file));
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Returns the path of the list the operator picked.
///
/// A directory with a single list selects it without asking. Bad input and failed create/remove
/// commands are reported and asked again; the loop only ends on a valid choice, on the input
/// closing, or when the last list gets removed.
pub async fn select_list(store: &impl ListStore, input: &mut impl LineInput) -> Result<PathBuf> {
    let mut lists = store.discover_lists().await?;
    if let [only] = lists.as_slice() {
        debug!("Single list {only} selected");
        return Ok(store.list_path(only));
    }

    print_lists(&lists);
    loop {
        let line = input
            .prompt(&format!(
                "\nSelect a list (1-{}), create one 'create <name>' or remove 'remove <number>': ",
                lists.len()
            ))
            .await?;

        match SelectorCommand::parse(&line) {
            SelectorCommand::Select(n) if (1..=lists.len()).contains(&n) => {
                return Ok(store.list_path(&lists[n - 1]));
            }
            SelectorCommand::Create(name) => match store.create_list(&name).await {
                Ok(path) => {
                    println!("✅ Created list: {}", name.trim());
                    debug!("New list at {path:?}");
                    match store.discover_lists().await {
                        Ok(refreshed) => lists = refreshed,
                        Err(e) => {
                            warn!("Failed to refresh lists after creating '{name}': {e}");
                            println!("❌ {e}");
                        }
                    }
                    print_lists(&lists);
                }
                Err(e) => {
                    warn!("Failed to create list '{name}': {e}");
                    println!("❌ {e}");
                }
            },
            SelectorCommand::Remove(n) if (1..=lists.len()).contains(&n) => {
                let file = &lists[n - 1];
                let answer = input
                    .prompt(&format!("Remove '{}'? (y/N): ", display_name(file)))
                    .await?;
                if !is_affirmative(&answer) {
                    continue;
                }
                if let Err(e) = store.remove_list(file).await {
                    warn!("Failed to remove list {file}: {e}");
                    println!("❌ {e}");
                    continue;
                }
                println!("✅ Removed: {}", display_name(file));
                lists = store.discover_lists().await?;
                print_lists(&lists);
            }
            SelectorCommand::Select(_) | SelectorCommand::Remove(_) | SelectorCommand::Invalid => {
                println!("❌ {}", Error::InvalidSelection);
            }
        }
    }
}
