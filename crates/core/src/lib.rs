//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state management, and simulation logic.
//! It has **zero dependencies** on terminals, audio, or persistence, making it:
//!
//! - **Deterministic**: Same seed and input sequence produce identical runs
//! - **Testable**: Every rule is exercised through plain function calls
//! - **Portable**: Runs the same in the terminal front end, headless replays, or benches
//!
//! # Module Structure
//!
//! - [`board`]: 40-row split board, two owner stacks, coordinate mapping, line clearing
//! - [`pieces`]: Tetromino shapes and SRS rotation with wall kicks in a gravity frame
//! - [`rng`]: 7-bag randomizer and the three-piece preview queue
//! - [`scoring`]: Line points, flip/momentum multipliers, level and gravity curves
//! - [`momentum`]: The momentum meter, bursts and recovery
//! - [`timers`]: Named countdown timers advanced by the simulation step
//! - [`mode`]: Mode settings and the per-mode rules they resolve to
//! - [`config`]: Tunable timing rules loaded from JSON
//! - [`das`]: DAS/ARR horizontal auto-repeat
//! - [`input`]: The action-code input boundary and per-frame input values
//! - [`game_state`]: The state machine that ties it all together
//! - [`snapshot`]: Read-only raw-grid view for renderers
//!
//! # The Flip
//!
//! Two owners, A and B, each keep a 10x20 stack that grows from the center of the
//! 40-row grid outward. The active owner is drawn in the top half with gravity pulling
//! down; the inactive owner sits in the bottom half with gravity pulling up. A flip
//! swaps the roles in O(1): no cell moves, only the mapping from owner to half.
//! A falling piece stays in its half and therefore changes owner; if it now overlaps
//! the new owner's stack it is pushed outward and locked (a *flip-jam*).
//!
//! # Example
//!
//! ```
//! use tui_fliptris_core::{step, FrameInput, GameState};
//! use tui_fliptris_core::types::ActionCode;
//!
//! let game = GameState::new(12345);
//! let game = step(&game, &FrameInput::idle().with_press(ActionCode::HardDrop), 16);
//! assert!(game.score() > 0); // Hard drop awards points
//!
//! let game = step(&game, &FrameInput::idle().with_press(ActionCode::Flip), 16);
//! assert!(game.board().is_flipped());
//! ```
//!
//! # Timing
//!
//! The simulation is advanced with an explicit frame delta:
//! - **Tick Rate**: 16ms frames in the terminal front end
//! - **Gravity**: 1000ms per row at level 0, faster with level, floored at 120ms
//! - **Soft Drop**: 40ms per row, never slower than gravity
//! - **Lock Delay**: 450ms when grounded, shrinking after repeated resets

pub mod board;
pub mod config;
pub mod das;
pub mod game_state;
pub mod input;
pub mod mode;
pub mod momentum;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod timers;

pub use tui_fliptris_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, CoordinateMapper};
pub use config::{ConfigError, RulesConfig};
pub use game_state::{step, GameEvent, GameState, RunPhase, ScoreState};
pub use input::{FrameInput, InputSource, InputState};
pub use mode::{ModeRules, ModeSettings};
pub use momentum::Momentum;
pub use pieces::{get_shape, try_rotate, Piece};
pub use rng::{PieceQueue, SimpleRng};
pub use scoring::{calculate_drop_score, calculate_score, ClearContext, ScoreResult};
pub use snapshot::{GameSnapshot, PieceSnapshot, SeatSnapshot};
pub use timers::{TimerId, TimerTable};
