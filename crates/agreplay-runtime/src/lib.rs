//! Drives session replay over files on disk.
//!
//! `replay_file` folds a finished log in one pass. `LiveSession` and
//! `SessionWatcher` follow a log that is still being appended to.

pub mod config;
pub mod error;
pub mod session;
pub mod streaming;

pub use config::{Config, WatchConfig, expand_tilde, resolve_workspace_path};
pub use error::{Error, Result};
pub use session::{FileReplay, LiveSession, Refresh, replay_file};
pub use streaming::{SessionWatcher, StreamEvent};
