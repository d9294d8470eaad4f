use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures of the task-list core. Every variant is recoverable at the interactive level: loops
/// print it and prompt again, single-shot commands hand it to `main`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("no task directory configured, use `onelist set-dir <path>`")]
    NotConfigured,

    #[error("cannot read directory {path:?}: {source}")]
    DirectoryUnreadable { path: PathBuf, source: io::Error },

    #[error("no .1list files found")]
    NoListsFound,

    #[error("cannot read list {path:?}: {source}")]
    ReadFailure { path: PathBuf, source: io::Error },

    #[error("list {path:?} is malformed: {source}")]
    MalformedData {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("cannot write list {path:?}: {source}")]
    WriteFailure { path: PathBuf, source: io::Error },

    #[error("cannot remove list {path:?}: {source}")]
    RemoveFailure { path: PathBuf, source: io::Error },

    #[error("list name cannot be empty")]
    EmptyName,

    #[error("task title cannot be empty")]
    EmptyTitle,

    #[error("invalid task number {position}, use 1-{len}")]
    IndexOutOfRange { position: usize, len: usize },

    #[error("invalid selection")]
    InvalidSelection,

    #[error("task '{0}' is already done")]
    TaskAlreadyDone(String),

    #[error("input closed")]
    InputClosed,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
