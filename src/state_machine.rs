//! Per-chat screen state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! `transition` decides the next state and the effects to run, the runtime
//! performs the I/O and feeds results back in as events.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::ScreenState;
pub use transition::{transition, TransitionError, TransitionResult};
