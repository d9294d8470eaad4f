//! Plain-file task lists for the terminal with a per-task time tracker.
//! Lists live as JSON documents in one configured directory; tasks move between pending, active,
//! paused and done, and every active stretch is recorded as a session.
//!

pub mod cli;
pub mod config;
pub mod error;
pub mod selector;
pub mod store;
pub mod tasks;
pub mod utils;

pub use error::{Error, Result};
