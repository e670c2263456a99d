pub mod element;
pub mod event;

pub use element::*;
pub use event::*;
