use std::fmt::Write;

use ansi_term::{Colour, Style};
use chrono::{DateTime, Utc};

use crate::{
    store::list_store::FolderContents,
    tasks::task::{Task, TaskList, TaskStatus},
    utils::duration::format_duration,
};

fn status_style(status: TaskStatus) -> Style {
    match status {
        TaskStatus::Pending => Style::new(),
        TaskStatus::Active => Colour::Green.bold(),
        TaskStatus::Paused => Colour::Yellow.normal(),
        TaskStatus::Done => Style::new().dimmed(),
    }
}

fn render_task(out: &mut String, position: usize, task: &Task, now: DateTime<Utc>) {
    let style = task.status.style();
    let elapsed = task.elapsed_at(now);
    let label = if elapsed.is_zero() {
        style.label.to_string()
    } else {
        format!("{} · {}", style.label, format_duration(elapsed))
    };

    let _ = writeln!(
        out,
        "{position}. {} {} [{}]",
        style.icon,
        task.title,
        status_style(task.status).paint(label)
    );
    if task.comment_displayed && !task.comment.is_empty() {
        let _ = writeln!(out, "   💬 {}", task.comment);
    }
}

/// Unfinished tasks first, then done ones. Positions stay those of the underlying list so they can
/// be typed back as commands.
pub fn render_list(list: &TaskList, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n📋 {}", list.title);
    let _ = writeln!(out, "{}", "=".repeat(list.title.chars().count() + 4));

    let (done, open): (Vec<_>, Vec<_>) = list
        .items
        .iter()
        .enumerate()
        .partition(|(_, task)| task.is_done());

    if list.items.is_empty() {
        let _ = writeln!(out, "(no tasks yet)");
    }
    if !open.is_empty() {
        let _ = writeln!(out, "Not done:");
        for (i, task) in open {
            render_task(&mut out, i + 1, task, now);
        }
    }
    if !done.is_empty() {
        let _ = writeln!(out, "\nDone:");
        for (i, task) in done {
            render_task(&mut out, i + 1, task, now);
        }
    }
    out
}

pub fn render_folder(dir: &std::path::Path, contents: &FolderContents) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nFiles in {}:", dir.display());
    if !contents.list_files.is_empty() {
        let _ = writeln!(out, "  📋 Task lists:");
        for file in &contents.list_files {
            let _ = writeln!(out, "    - {file}");
        }
    }
    if !contents.other_files.is_empty() {
        let _ = writeln!(out, "  📄 Other files:");
        for file in &contents.other_files {
            let _ = writeln!(out, "    - {file}");
        }
    }
    if contents.list_files.is_empty() && contents.other_files.is_empty() {
        let _ = writeln!(out, "  (no files found)");
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

    use crate::{
        store::list_store::FolderContents,
        tasks::task::{Task, TaskList, TaskStatus},
    };

    use super::{render_folder, render_list};

    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), NaiveTime::MIN);

    fn start() -> DateTime<Utc> {
        Utc.from_utc_datetime(&TEST_START_DATE)
    }

    #[test]
    fn test_render_groups_done_last() {
        let mut list = TaskList::new("Groceries", start());
        let mut milk = Task::new("Milk", start());
        milk.status = TaskStatus::Done;
        milk.completed_at = Some(start());
        list.items.push(milk);

        let mut bread = Task::new("Bread", start());
        bread.status = TaskStatus::Active;
        bread.active_start_time = Some(start());
        bread.comment = "wholegrain".into();
        bread.comment_displayed = true;
        list.items.push(bread);

        let out = render_list(&list, start() + Duration::seconds(65));

        let bread_at = out.find("2. ▶ Bread").unwrap();
        let milk_at = out.find("1. ✓ Milk").unwrap();
        assert!(bread_at < milk_at);
        assert!(out.contains("active · 1m 5s"));
        assert!(out.contains("💬 wholegrain"));
    }

    #[test]
    fn test_render_empty_list() {
        let list = TaskList::new("Empty", start());
        let out = render_list(&list, start());
        assert!(out.contains("📋 Empty"));
        assert!(out.contains("(no tasks yet)"));
    }

    #[test]
    fn test_render_folder() {
        let out = render_folder(
            Path::new("/tasks"),
            &FolderContents {
                list_files: vec!["a.1list".into()],
                other_files: vec![],
            },
        );
        assert!(out.contains("- a.1list"));
        assert!(!out.contains("Other files"));
    }
}
