//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events into [`crate::types::ActionCode`]s and buffers them in a
//! [`KeyboardInput`] that the engine samples once per frame through the
//! [`InputSource`](crate::core::InputSource) boundary. Terminals without
//! key-release events are handled with a release timeout.

pub mod keyboard;
pub mod map;

pub use tui_fliptris_core as core;
pub use tui_fliptris_types as types;

pub use keyboard::KeyboardInput;
pub use map::{handle_key_event, map_key_code, should_quit, should_restart};
