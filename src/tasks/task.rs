use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    store::entities::{TaskEntity, TaskListEntity},
    utils::duration::nanoseconds,
};

/// Time-tracking lifecycle of a task. `Pending` and `Paused` are both "not running", `Paused`
/// only ever follows at least one recorded session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Active,
    Paused,
    Done,
}

/// How a status is presented in the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub icon: &'static str,
    pub label: &'static str,
}

const STATUS_STYLES: [(TaskStatus, StatusStyle); 4] = [
    (TaskStatus::Pending, StatusStyle { icon: "○", label: "pending" }),
    (TaskStatus::Active, StatusStyle { icon: "▶", label: "active" }),
    (TaskStatus::Paused, StatusStyle { icon: "⏸", label: "paused" }),
    (TaskStatus::Done, StatusStyle { icon: "✓", label: "done" }),
];

impl TaskStatus {
    pub fn style(self) -> StatusStyle {
        STATUS_STYLES
            .iter()
            .find(|(status, _)| *status == self)
            .map(|(_, style)| *style)
            .unwrap_or(STATUS_STYLES[0].1)
    }

    pub fn is_running(self) -> bool {
        self == TaskStatus::Active
    }
}

/// One contiguous interval during which a task was timed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(with = "nanoseconds")]
    pub duration: Duration,
}

impl Session {
    /// A clock that went backwards yields an empty session rather than a negative one.
    pub fn between(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time,
            duration: (end_time - start_time).max(Duration::zero()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TaskEntity", into = "TaskEntity")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub status: TaskStatus,
    pub comment: String,
    pub comment_displayed: bool,
    pub sessions: Vec<Session>,
    pub total_duration: Duration,
    pub active_start_time: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Ids come from the creation instant. Two tasks created within the same nanosecond would
    /// collide, which is accepted for interactive use.
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: timestamp_id(now),
            title: title.into(),
            status: TaskStatus::Pending,
            comment: String::new(),
            comment_displayed: false,
            sessions: Vec::new(),
            total_duration: Duration::zero(),
            active_start_time: None,
            completed_at: None,
            created_at: now,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Tracked time including the running session up to `now`. Read-only, used for display.
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        match self.active_start_time {
            Some(start) if self.status.is_running() => {
                self.total_duration + (now - start).max(Duration::zero())
            }
            _ => self.total_duration,
        }
    }

    pub(crate) fn start(&mut self, now: DateTime<Utc>) {
        self.status = TaskStatus::Active;
        self.active_start_time = Some(now);
    }

    /// Closes the running session and leaves the task `Paused`. Returns the recorded session, or
    /// `None` when the task was not running.
    pub(crate) fn stop(&mut self, now: DateTime<Utc>) -> Option<Session> {
        if !self.status.is_running() {
            return None;
        }
        let start = self.active_start_time.take().unwrap_or(now);
        let session = Session::between(start, now);
        self.total_duration += session.duration;
        self.sessions.push(session.clone());
        self.status = TaskStatus::Paused;
        Some(session)
    }

    pub(crate) fn finish(&mut self, now: DateTime<Utc>) -> Option<Session> {
        let session = self.stop(now);
        self.status = TaskStatus::Done;
        self.active_start_time = None;
        self.completed_at = Some(now);
        session
    }
}

pub fn timestamp_id(now: DateTime<Utc>) -> i64 {
    now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp_micros())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TaskListEntity", into = "TaskListEntity")]
pub struct TaskList {
    pub title: String,
    pub items: Vec<Task>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskList {
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The task currently being timed, with its 0-based index.
    pub fn active(&self) -> Option<(usize, &Task)> {
        self.items
            .iter()
            .enumerate()
            .find(|(_, task)| task.status.is_running())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

    use super::{Session, Task, TaskStatus};

    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), NaiveTime::MIN);

    fn start() -> DateTime<Utc> {
        Utc.from_utc_datetime(&TEST_START_DATE)
    }

    #[test]
    fn test_new_task_is_pending() {
        let task = Task::new("Milk", start());
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.id, start().timestamp_nanos_opt().unwrap());
        assert!(task.sessions.is_empty());
        assert_eq!(task.total_duration, Duration::zero());
        assert_eq!(task.active_start_time, None);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn test_status_styles_are_distinct() {
        let statuses = [
            TaskStatus::Pending,
            TaskStatus::Active,
            TaskStatus::Paused,
            TaskStatus::Done,
        ];
        for (i, a) in statuses.iter().enumerate() {
            for b in &statuses[i + 1..] {
                assert_ne!(a.style(), b.style());
            }
        }
        assert_eq!(TaskStatus::Done.style().label, "done");
    }

    #[test]
    fn test_stop_on_pending_task_does_nothing() {
        let mut task = Task::new("Milk", start());
        assert_eq!(task.stop(start() + Duration::seconds(3)), None);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.sessions.is_empty());
    }

    #[test]
    fn test_session_never_negative() {
        let session = Session::between(start(), start() - Duration::seconds(10));
        assert_eq!(session.duration, Duration::zero());
    }

    #[test]
    fn test_elapsed_includes_running_session() {
        let mut task = Task::new("Milk", start());
        task.start(start());
        task.stop(start() + Duration::seconds(10));
        task.start(start() + Duration::seconds(20));

        assert_eq!(
            task.elapsed_at(start() + Duration::seconds(25)),
            Duration::seconds(15)
        );
        assert_eq!(task.total_duration, Duration::seconds(10));
    }
}
