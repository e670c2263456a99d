mod io;
mod tail;

pub use io::{DecodedLine, ReadReport, SessionRead, decode_line, read_session_file};
pub use tail::{TailReader, TailUpdate};
