//! Terminal input (engine-facing).
//!
//! Maps `crossterm` events onto the per-frame [`crate::types::Intents`] the
//! simulation consumes. Works with terminals that do not emit key-release
//! events.

pub mod map;
pub mod source;

pub use blockfall_types as types;

pub use map::{action_for_key, handle_key_event, should_quit, InputAction};
pub use source::{InputSource, PRESS_ONLY_REPEAT_GUARD_MS};
