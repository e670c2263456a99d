// Engine module - stateful transcript replay
// Sits between decoded log records (types) and whatever host displays the text

pub mod abbreviate;
pub mod classifier;
pub mod dispatcher;
pub mod formatter;
pub mod state;
pub mod text;

pub use abbreviate::abbreviate;
pub use classifier::classify;
pub use dispatcher::{apply, apply_kind};
pub use formatter::render;
pub use state::ReplayState;

use agreplay_types::Event;
use std::borrow::Borrow;

// Façade API - stable interface for hosts (runtime, CLI)

/// Fold a whole event sequence into a fresh state
pub fn replay<I>(events: I) -> ReplayState
where
    I: IntoIterator,
    I::Item: Borrow<Event>,
{
    let mut state = ReplayState::new();
    for event in events {
        apply(&mut state, event.borrow());
    }
    state
}

/// Replay and render in one step
pub fn render_events<I>(events: I) -> String
where
    I: IntoIterator,
    I::Item: Borrow<Event>,
{
    render(&replay(events))
}
