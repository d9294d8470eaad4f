//! The task-list model and the operations that change it.
//!
//! [task] holds the records that end up in list files, [timer] the state machine that moves tasks
//! between pending, active, paused and done while keeping their time accounting consistent.

pub mod task;
pub mod timer;
