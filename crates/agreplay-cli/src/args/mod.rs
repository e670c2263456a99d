mod commands;

pub use commands::*;

use crate::types::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agreplay")]
#[command(about = "Replay Claude Code session logs as a terminal transcript", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Data directory holding config.toml [env: AGREPLAY_PATH]"
    )]
    pub data_dir: Option<String>,

    #[arg(long, global = true, help = "Config file (overrides <data-dir>/config.toml)")]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}
