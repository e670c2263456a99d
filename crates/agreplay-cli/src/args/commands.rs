use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Render a session log to a transcript once")]
    Render {
        #[arg(help = "Claude Code session file (.jsonl)")]
        file: PathBuf,

        #[arg(short, long, help = "Write the transcript here instead of stdout")]
        output: Option<PathBuf>,
    },

    #[command(about = "Follow a session log and re-render it as it grows")]
    Watch {
        #[arg(help = "Claude Code session file (.jsonl)")]
        file: PathBuf,

        #[arg(
            short,
            long,
            help = "Rewrite this file on every change instead of printing"
        )]
        output: Option<PathBuf>,
    },
}
