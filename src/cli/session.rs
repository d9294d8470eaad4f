use std::path::Path;

use tracing::{info, warn};

use crate::{
    error::{Error, Result},
    store::list_store::ListStore,
    tasks::{
        task::TaskList,
        timer::{self, Completed, Toggled},
    },
    utils::{clock::Clock, duration::format_duration, input::LineInput},
};

use super::output::render_list;

const HELP: &str =
    "💡 Commands: <number> start/pause, 'add <task>', 'done <n>', 'rm <n>', 'note <n> <text>', 'show <n>', 'q':";

/// One line of operator input inside an open list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Toggle(usize),
    Add(String),
    Done(usize),
    Remove(usize),
    Note(usize, String),
    ShowNote(usize),
    Quit,
    Invalid,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(word, rest)| (word, rest.trim()))
            .unwrap_or((line, ""));

        let position = |s: &str, f: fn(usize) -> SessionCommand| {
            s.parse().map(f).unwrap_or(SessionCommand::Invalid)
        };

        match word {
            "q" | "quit" | "exit" if rest.is_empty() => SessionCommand::Quit,
            "add" | "a" => SessionCommand::Add(rest.to_string()),
            "done" | "d" => position(rest, SessionCommand::Done),
            "rm" => position(rest, SessionCommand::Remove),
            "show" => position(rest, SessionCommand::ShowNote),
            "note" => {
                let (n, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                n.parse()
                    .map(|n| SessionCommand::Note(n, text.trim().to_string()))
                    .unwrap_or(SessionCommand::Invalid)
            }
            _ if rest.is_empty() => position(line, SessionCommand::Toggle),
            _ => SessionCommand::Invalid,
        }
    }
}

/// Applies a mutating command to `list` and returns the message for the operator. Nothing is
/// saved here.
pub fn apply(list: &mut TaskList, command: SessionCommand, clock: &dyn Clock) -> Result<String> {
    match command {
        SessionCommand::Toggle(n) => match timer::toggle(list, n, clock)? {
            Toggled::Started { interrupted } => {
                let mut message = format!("▶ Started: {}", list.items[n - 1].title);
                if let Some((i, session)) = interrupted {
                    message.push_str(&format!(
                        "\n⏸ Paused: {} ({})",
                        list.items[i].title,
                        format_duration(session.duration)
                    ));
                }
                Ok(message)
            }
            Toggled::Paused(session) => Ok(format!(
                "⏸ Paused: {} (+{}, total {})",
                list.items[n - 1].title,
                format_duration(session.duration),
                format_duration(list.items[n - 1].total_duration)
            )),
        },
        SessionCommand::Add(title) => {
            let position = timer::add(list, &title, clock)?;
            Ok(format!("✨ Added: {}", list.items[position - 1].title))
        }
        SessionCommand::Done(n) => match timer::complete(list, n, clock)? {
            Completed::Finished(_) => Ok(format!(
                "✅ Completed: {} ({})",
                list.items[n - 1].title,
                format_duration(list.items[n - 1].total_duration)
            )),
            Completed::AlreadyDone => Ok(format!("{} is already done", list.items[n - 1].title)),
        },
        SessionCommand::Remove(n) => {
            let task = timer::remove(list, n)?;
            Ok(format!("🗑 Removed: {}", task.title))
        }
        SessionCommand::Note(n, text) => {
            timer::set_comment(list, n, &text)?;
            Ok(format!("💬 Updated note of {}", list.items[n - 1].title))
        }
        SessionCommand::ShowNote(n) => {
            let shown = timer::toggle_comment(list, n)?;
            let verb = if shown { "Showing" } else { "Hiding" };
            Ok(format!("{verb} note of {}", list.items[n - 1].title))
        }
        SessionCommand::Quit | SessionCommand::Invalid => Err(Error::InvalidSelection),
    }
}

/// Runs the interactive loop on an open list, saving after every change. Ends on `q` or when the
/// input closes.
pub async fn run_session(
    store: &impl ListStore,
    path: &Path,
    input: &mut impl LineInput,
    clock: &dyn Clock,
) -> Result<TaskList> {
    let mut list = store.load(path).await?;
    if let Some(name) = path.file_name() {
        println!("📁 {}", name.to_string_lossy());
    }
    println!("{}", render_list(&list, clock.time()));
    println!("{HELP}");

    loop {
        let line = match input.prompt("> ").await {
            Ok(line) => line,
            Err(Error::InputClosed) => break,
            Err(e) => return Err(e),
        };

        let command = SessionCommand::parse(&line);
        match command {
            SessionCommand::Quit => break,
            SessionCommand::Invalid => {
                println!("❌ Enter a number, 'add <task>', 'done <n>', 'rm <n>', 'note <n> <text>', 'show <n>' or 'q'");
                continue;
            }
            _ => {}
        }

        match apply(&mut list, command, clock) {
            Ok(message) => println!("{message}"),
            Err(e) => {
                println!("❌ {e}");
                continue;
            }
        }

        if let Err(e) = store.save(path, &mut list).await {
            warn!("Failed to save {path:?}: {e}");
            println!("❌ Save error: {e}");
            continue;
        }

        println!("{}", render_list(&list, clock.time()));
        println!("{HELP}");
    }

    info!("Leaving {path:?}");
    Ok(list)
}
