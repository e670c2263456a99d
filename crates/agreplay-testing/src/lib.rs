//! Testing infrastructure for agreplay tests.
//!
//! This crate provides utilities for writing robust tests:
//! - `fixtures`: Builders for Claude Code style session records
//! - `TestWorld`: Isolated temp environment for session files and CLI runs
//! - `assertions`: Transcript-level assertions
//! - `process`: Long-running commands such as `agreplay watch`

pub mod assertions;
pub mod fixtures;
pub mod process;
pub mod world;

pub use fixtures::{SessionLog, records};
pub use world::{CliResult, TestWorld};
