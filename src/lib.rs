//! TUI Fliptris (workspace facade crate).
//!
//! Re-exports the member crates under one roof as
//! `tui_fliptris::{core, engine, input, term, types}`; the implementation lives in
//! dedicated crates under `crates/`.

pub use tui_fliptris_core as core;
pub use tui_fliptris_engine as engine;
pub use tui_fliptris_input as input;
pub use tui_fliptris_term as term;
pub use tui_fliptris_types as types;
