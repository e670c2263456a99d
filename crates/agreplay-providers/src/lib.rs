// Error types
pub mod error;

// Claude Code session log readers
pub mod claude;

pub use claude::{
    DecodedLine, ReadReport, SessionRead, TailReader, TailUpdate, decode_line, read_session_file,
};
pub use error::{Error, Result};
