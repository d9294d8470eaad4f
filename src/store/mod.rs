//! Storage is organized through [list_store::FileListStore].
//! The basic idea is:
//!  - There is a single configured directory holding every list.
//!  - Each list is one `.1list` file containing the whole list as JSON.
//!  - Files are always rewritten in full, there is no partial update and no locking.

pub mod entities;
pub mod list_store;
pub mod naming;
