//! Operations that mutate a [TaskList]. Each one reads the clock once and derives every
//! timestamp it writes from that single instant.

use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    utils::{clock::Clock, duration::format_duration},
};

use super::task::{Session, Task, TaskList, TaskStatus};

/// What [toggle] did to the selected task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggled {
    /// The task started running. `interrupted` holds the task that was running before, if any,
    /// together with the session that was closed for it.
    Started {
        interrupted: Option<(usize, Session)>,
    },
    Paused(Session),
}

/// What [complete] did to the selected task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completed {
    /// Carries the session closed on the way, if the task was running.
    Finished(Option<Session>),
    AlreadyDone,
}

/// Converts a 1-based position into an index of `list.items`.
fn index_of(list: &TaskList, position: usize) -> Result<usize> {
    if position == 0 || position > list.len() {
        return Err(Error::IndexOutOfRange {
            position,
            len: list.len(),
        });
    }
    Ok(position - 1)
}

/// Appends a new pending task. Returns its 1-based position.
pub fn add(list: &mut TaskList, title: &str, clock: &dyn Clock) -> Result<usize> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::EmptyTitle);
    }
    list.items.push(Task::new(title, clock.time()));
    info!("Added '{title}' to '{}'", list.title);
    Ok(list.items.len())
}

/// Removes the task at `position`, keeping the order of the rest.
pub fn remove(list: &mut TaskList, position: usize) -> Result<Task> {
    let index = index_of(list, position)?;
    let task = list.items.remove(index);
    info!("Removed '{}' from '{}'", task.title, list.title);
    Ok(task)
}

/// Starts a stopped task or pauses a running one.
///
/// Starting a task stops whichever other task is running, so a list never has more than one
/// active task. Done tasks cannot be toggled.
pub fn toggle(list: &mut TaskList, position: usize, clock: &dyn Clock) -> Result<Toggled> {
    let index = index_of(list, position)?;
    let now = clock.time();

    match list.items[index].status {
        TaskStatus::Done => Err(Error::TaskAlreadyDone(list.items[index].title.clone())),
        TaskStatus::Active => {
            let task = &mut list.items[index];
            let session = task.stop(now).unwrap_or_else(|| Session::between(now, now));
            info!(
                "Paused '{}' after {}",
                task.title,
                format_duration(session.duration)
            );
            Ok(Toggled::Paused(session))
        }
        TaskStatus::Pending | TaskStatus::Paused => {
            let interrupted = list
                .items
                .iter_mut()
                .enumerate()
                .filter(|(i, task)| *i != index && task.status.is_running())
                .filter_map(|(i, task)| {
                    debug!("Stopping '{}' to start another task", task.title);
                    task.stop(now).map(|session| (i, session))
                })
                .last();

            list.items[index].start(now);
            info!("Started '{}'", list.items[index].title);
            Ok(Toggled::Started { interrupted })
        }
    }
}

/// Marks a task done, closing its running session first. Completing a done task changes nothing.
pub fn complete(list: &mut TaskList, position: usize, clock: &dyn Clock) -> Result<Completed> {
    let index = index_of(list, position)?;
    let task = &mut list.items[index];
    if task.is_done() {
        debug!("'{}' is already done", task.title);
        return Ok(Completed::AlreadyDone);
    }

    let session = task.finish(clock.time());
    info!("Completed '{}'", task.title);
    Ok(Completed::Finished(session))
}

/// Sets the comment of a task and shows it. Blank text clears and hides the comment.
pub fn set_comment(list: &mut TaskList, position: usize, text: &str) -> Result<()> {
    let index = index_of(list, position)?;
    let task = &mut list.items[index];
    task.comment = text.trim().to_string();
    task.comment_displayed = !task.comment.is_empty();
    Ok(())
}

/// Flips whether the comment is shown. Returns the new visibility.
pub fn toggle_comment(list: &mut TaskList, position: usize) -> Result<bool> {
    let index = index_of(list, position)?;
    let task = &mut list.items[index];
    task.comment_displayed = !task.comment_displayed;
    Ok(task.comment_displayed)
}
