//! Engine-facing run driver.
//!
//! The core crate is a pure state machine; this crate drives it against the
//! outside world. Each frame the [`Engine`] samples an input source once, steps
//! the state, turns the recorded events into [`AudioHook`] cues, and hands one
//! [`ScoreEntry`] per finished run to a [`ScoreStore`]. Runs can be recorded as
//! [`InputScript`]s and replayed bit-for-bit.

pub mod driver;
pub mod hooks;
pub mod replay;

pub use tui_fliptris_core as core;
pub use tui_fliptris_types as types;

pub use driver::Engine;
pub use hooks::{rank, AudioHook, MemoryScoreStore, NoAudio, ScoreEntry, ScoreStore};
pub use replay::{InputScript, ReplayError, ScriptFrame};
