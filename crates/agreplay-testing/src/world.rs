//! TestWorld pattern for declarative integration test setup.
//!
//! Provides a fluent interface for:
//! - Creating isolated test environments
//! - Writing and appending session log files
//! - Executing CLI commands with proper context

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::fixtures::SessionLog;

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use agreplay_testing::{SessionLog, TestWorld, records};
///
/// let world = TestWorld::new();
/// let path = world
///     .write_session("session.jsonl", &SessionLog::new().push(records::user_text("hi")))
///     .unwrap();
///
/// let result = world.run(&["render", path.to_str().unwrap()]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    data_dir: PathBuf,
    log_root: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_path = temp_dir.path().to_path_buf();
        let data_dir = base_path.join(".agreplay");
        let log_root = base_path.join(".claude");

        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");
        std::fs::create_dir_all(&log_root).expect("Failed to create log dir");

        Self {
            temp_dir,
            data_dir,
            log_root,
            env_vars: HashMap::new(),
        }
    }

    /// Get the data directory path (.agreplay).
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the log root directory path (.claude).
    pub fn log_root(&self) -> &Path {
        &self.log_root
    }

    /// Get the temp directory root.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Write a config.toml into the data directory.
    pub fn with_config(self, toml: &str) -> Self {
        std::fs::write(self.data_dir.join("config.toml"), toml).expect("Failed to write config");
        self
    }

    /// Write a session log under the log root and return its path.
    pub fn write_session(&self, name: &str, log: &SessionLog) -> Result<PathBuf> {
        self.write_raw(name, &log.to_jsonl())
    }

    /// Write arbitrary text (possibly malformed JSONL) under the log root.
    pub fn write_raw(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.log_root.join(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Append raw text to an existing file, as a live session would.
    pub fn append_raw(&self, path: &Path, content: &str) -> Result<()> {
        let mut file = std::fs::OpenOptions::new().append(true).open(path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Configure a CLI command with this test environment's settings.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--data-dir").arg(self.data_dir());
        cmd.current_dir(self.temp_dir.path());
        cmd.env_remove("RUST_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute a command using the project's binary and return the result.
    ///
    /// # Note
    /// This method uses `Command::cargo_bin()` which requires the binary to be
    /// built and the `CARGO_BIN_EXE_` environment variable to be set (which
    /// cargo test does automatically).
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("agreplay")
            .map_err(|e| anyhow::anyhow!("Failed to find agreplay binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    /// Check if the command succeeded.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Get stdout as a string.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Get stderr as a string.
    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
