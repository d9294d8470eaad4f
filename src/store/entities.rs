//! On-disk shape of list files. Domain types convert through these so that files written by
//! older versions, which only had a `done` flag, still load.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    tasks::task::{Session, Task, TaskList, TaskStatus},
    utils::duration::nanoseconds,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEntity {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub comment_displayed: bool,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default = "Duration::zero", with = "nanoseconds")]
    pub total_duration: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<TaskEntity> for Task {
    fn from(
        TaskEntity {
            id,
            title,
            status,
            done,
            comment,
            comment_displayed,
            sessions,
            total_duration,
            active_start_time,
            completed_at,
            created_at,
        }: TaskEntity,
    ) -> Self {
        // Legacy ids were the creation time in nanoseconds.
        let created_at = created_at.unwrap_or_else(|| DateTime::from_timestamp_nanos(id));

        let status = match (status, done) {
            (Some(status), _) => status,
            (None, true) => TaskStatus::Done,
            (None, false) if !sessions.is_empty() => TaskStatus::Paused,
            (None, false) => TaskStatus::Pending,
        };

        // Keep the timestamp fields consistent with the status whatever the file claims.
        let (status, active_start_time) = match (status, active_start_time) {
            (TaskStatus::Active, Some(start)) => (TaskStatus::Active, Some(start)),
            (TaskStatus::Active, None) if sessions.is_empty() => (TaskStatus::Pending, None),
            (TaskStatus::Active, None) => (TaskStatus::Paused, None),
            (status, _) => (status, None),
        };
        let completed_at = match status {
            TaskStatus::Done => Some(completed_at.unwrap_or(created_at)),
            _ => None,
        };

        Task {
            id,
            title,
            status,
            comment,
            comment_displayed,
            sessions,
            total_duration,
            active_start_time,
            completed_at,
            created_at,
        }
    }
}

impl From<Task> for TaskEntity {
    fn from(
        Task {
            id,
            title,
            status,
            comment,
            comment_displayed,
            sessions,
            total_duration,
            active_start_time,
            completed_at,
            created_at,
        }: Task,
    ) -> Self {
        TaskEntity {
            id,
            title,
            status: Some(status),
            done: status == TaskStatus::Done,
            comment,
            comment_displayed,
            sessions,
            total_duration,
            active_start_time,
            completed_at,
            created_at: Some(created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListEntity {
    pub title: String,
    #[serde(default)]
    pub items: Vec<Task>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<TaskListEntity> for TaskList {
    fn from(
        TaskListEntity {
            title,
            items,
            created_at,
            updated_at,
        }: TaskListEntity,
    ) -> Self {
        // Legacy lists carry no timestamps. The oldest task is the best estimate available.
        let created_at = created_at
            .or_else(|| items.iter().map(|task| task.created_at).min())
            .unwrap_or(DateTime::UNIX_EPOCH);
        TaskList {
            title,
            items,
            created_at,
            updated_at: updated_at.unwrap_or(created_at),
        }
    }
}

impl From<TaskList> for TaskListEntity {
    fn from(
        TaskList {
            title,
            items,
            created_at,
            updated_at,
        }: TaskList,
    ) -> Self {
        TaskListEntity {
            title,
            items,
            created_at: Some(created_at),
            updated_at: Some(updated_at),
        }
    }
}
