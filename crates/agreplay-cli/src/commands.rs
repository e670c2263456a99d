use super::args::{Cli, Commands};
use super::handlers;
use crate::types::LogLevel;
use agreplay_runtime::{Config, resolve_workspace_path};
use anyhow::{Context, Result};
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);

    match cli.command {
        Commands::Render { file, output } => handlers::render::handle(&file, output.as_deref()),

        Commands::Watch { file, output } => {
            let config = load_config(cli.data_dir.as_deref(), cli.config.as_deref())?;
            handlers::watch::handle(&file, output.as_deref(), &config.watch)
        }
    }
}

/// Logs go to stderr; `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(data_dir: Option<&str>, explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => resolve_workspace_path(data_dir)?.join("config.toml"),
    };

    let config = Config::load_from(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}
