//! Core types module - shared data structures and rule constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behavior beyond parsing and small lookups,
//! so they can be shared by the simulation core, the terminal front-end and
//! recorded replay scripts alike.
//!
//! # Board Dimensions
//!
//! The playfield is a single 10x40 grid split into two 20-row halves:
//!
//! - **Columns**: 10 (indexed 0-9)
//! - **Rows**: 40 (indexed 0-39, top to bottom)
//! - **Half**: 20 rows per owner; the top half is the *active* side
//! - **Spawn buffer**: 4 rows beyond each outer edge that never collide
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Frame interval used by the terminal runner (~60 FPS) |
//! | `SOFT_DROP_INTERVAL_MS` | 40 | Gravity interval while soft drop is held |
//! | `LOCK_DELAY_MS` | 450 | Grace period before a grounded piece locks |
//! | `LOCK_RESET_COOLDOWN_MS` | 40 | Minimum spacing between lock timer resets |
//! | `LOCK_MOVE_LIMIT` | 15 | Grounded moves/rotations before a forced lock |
//! | `GROUNDED_CEILING_MS` | 3000 | Total grounded time before a forced lock |
//! | `LINE_CLEAR_MS` | 300 | Clear animation (500 for a tetris) |
//!
//! # DAS/ARR Timing
//!
//! - `DEFAULT_DAS_MS`: 160ms - time before auto-repeat starts
//! - `DEFAULT_ARR_MS`: 30ms - interval between auto-repeats
//!
//! # Drop Intervals by Level
//!
//! | Level | Interval |
//! |-------|----------|
//! | 0 | 1000ms |
//! | 1 | 800ms |
//! | 2 | 650ms |
//! | 3 | 500ms |
//! | 4 | 400ms |
//! | 5 | 320ms |
//! | 6 | 250ms |
//! | 7 | 200ms |
//! | 8 | 160ms |
//! | 9+ | 120ms floor |
//!
//! # Examples
//!
//! ```
//! use tui_fliptris_types::{GameMode, Owner, PieceKind, Rotation, BOARD_ROWS, HALF_ROWS};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(PieceKind::T.id(), 6);
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Owner::A.other(), Owner::B);
//! assert_eq!(GameMode::from_str("sirtet"), Some(GameMode::Sirtet));
//! assert_eq!(BOARD_ROWS, 2 * HALF_ROWS);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_COLS: u8 = 10;

/// Board height in cells (40 rows, two halves)
pub const BOARD_ROWS: u8 = 40;

/// Rows owned by each side
pub const HALF_ROWS: u8 = BOARD_ROWS / 2;

/// Rows beyond each outer edge where a piece may sit without colliding
pub const SPAWN_BUFFER: u8 = 4;

/// Number of upcoming pieces shown per queue
pub const QUEUE_PREVIEW: usize = 3;

/// Cell value used for garbage material (piece ids are 1..=7)
pub const GARBAGE_CELL: u8 = 8;

/// Frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval while soft drop is held
pub const SOFT_DROP_INTERVAL_MS: u32 = 40;

/// Lock delay when piece is grounded (450ms)
pub const LOCK_DELAY_MS: u32 = 450;

/// Minimum time between two lock timer resets
pub const LOCK_RESET_COOLDOWN_MS: u32 = 40;

/// Resets allowed at full lock delay before it starts to shrink
pub const LOCK_DEGRADE_AFTER: u32 = 8;

/// Lock delay lost per reset beyond `LOCK_DEGRADE_AFTER`
pub const LOCK_DEGRADE_STEP_MS: u32 = 30;

/// Lock delay never degrades below this
pub const LOCK_DELAY_MIN_MS: u32 = 150;

/// Grounded moves/rotations that force a lock on the next grounded tick
pub const LOCK_MOVE_LIMIT: u32 = 15;

/// Total grounded time that forces a lock
pub const GROUNDED_CEILING_MS: u32 = 3000;

/// Clear animation for 1-3 lines
pub const LINE_CLEAR_MS: u32 = 300;

/// Clear animation for a 4-line clear
pub const TETRIS_CLEAR_MS: u32 = 500;

/// Flash shown after a flip-jam lock
pub const FLIP_JAM_FLASH_MS: u32 = 250;

/// DAS (Delayed Auto Shift) delay in milliseconds
pub const DEFAULT_DAS_MS: u32 = 160;

/// ARR (Auto Repeat Rate) in milliseconds
pub const DEFAULT_ARR_MS: u32 = 30;

/// Drop intervals by level (milliseconds per row)
///
/// Index 0 = Level 0, Index 8 = Level 8
pub const DROP_INTERVALS: [u32; 9] = [1000, 800, 650, 500, 400, 320, 250, 200, 160];

/// Drop interval beyond the table
pub const DROP_INTERVAL_FLOOR_MS: u32 = 120;

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Highest selectable starting level
pub const MAX_STARTING_LEVEL: u32 = 15;

/// Garbage height setting range
pub const MIN_GARBAGE_HEIGHT: u8 = 1;
pub const MAX_GARBAGE_HEIGHT: u8 = 5;

/// Redemption life pool
pub const DEFAULT_LIVES: u8 = 3;
pub const MAX_LIVES: u8 = 9;

/// Rows evicted from the owner's stack when a life is spent
pub const LIFE_LOSS_EVICT_ROWS: usize = 4;

/// Pause after spending a life before the blocked piece respawns
pub const LIFE_LOSS_ANIM_MS: u32 = 600;

/// Co-op second piece placement deadline
pub const COOP_PLACEMENT_MS: u32 = 10_000;

/// Line clear base table, multiplied by level
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// The seven tetromino piece kinds
///
/// Numeric ids (`id()`) double as board cell values:
/// I=1, J=2, L=3, O=4, S=5, T=6, Z=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All kinds in id order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Board cell value for this kind (1..=7)
    pub fn id(self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::J => 2,
            PieceKind::L => 3,
            PieceKind::O => 4,
            PieceKind::S => 5,
            PieceKind::T => 6,
            PieceKind::Z => 7,
        }
    }

    /// Inverse of [`PieceKind::id`]
    ///
    /// ```
    /// use tui_fliptris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_id(1), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_id(8), None);
    /// ```
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::J),
            3 => Some(PieceKind::L),
            4 => Some(PieceKind::O),
            5 => Some(PieceKind::S),
            6 => Some(PieceKind::T),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
        }
    }
}

/// Rotation states following the Super Rotation System (SRS)
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotation state as 0..=3 (North = 0, clockwise)
    pub fn index(self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Parse rotation from string
    ///
    /// Accepts full names or single letters (case-insensitive):
    /// "north" | "n", "east" | "e", "south" | "s", "west" | "w"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "north" | "n" => Some(Rotation::North),
            "east" | "e" => Some(Rotation::East),
            "south" | "s" => Some(Rotation::South),
            "west" | "w" => Some(Rotation::West),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// One of the two logical fields sharing the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    A,
    B,
}

impl Owner {
    pub const ALL: [Owner; 2] = [Owner::A, Owner::B];

    pub fn index(self) -> usize {
        match self {
            Owner::A => 0,
            Owner::B => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Owner::A => Owner::B,
            Owner::B => Owner::A,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Owner::A => "a",
            Owner::B => "b",
        }
    }
}

/// Screen half of the raw grid
///
/// The top half always hosts the active owner (gravity down, toward the center);
/// the bottom half hosts the inactive owner, simulated upside-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    pub fn other(self) -> Self {
        match self {
            Half::Top => Half::Bottom,
            Half::Bottom => Half::Top,
        }
    }
}

/// A controllable piece slot; `Two` only exists in co-op
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatId {
    One,
    Two,
}

impl SeatId {
    pub const ALL: [SeatId; 2] = [SeatId::One, SeatId::Two];

    pub fn index(self) -> usize {
        match self {
            SeatId::One => 0,
            SeatId::Two => 1,
        }
    }
}

/// Per-piece controls, resolved to an [`ActionCode`] per seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Hold,
}

/// Logical input vocabulary shared by every input device
///
/// The engine only ever sees these codes; key/gamepad/touch mapping lives
/// in front-end crates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionCode {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Hold,
    Flip,
    Pause,
    Confirm,
    Back,
    P2MoveLeft,
    P2MoveRight,
    P2SoftDrop,
    P2HardDrop,
    P2RotateCw,
    P2RotateCcw,
    P2Hold,
}

impl ActionCode {
    pub const COUNT: usize = 18;

    pub const ALL: [ActionCode; ActionCode::COUNT] = [
        ActionCode::MoveLeft,
        ActionCode::MoveRight,
        ActionCode::SoftDrop,
        ActionCode::HardDrop,
        ActionCode::RotateCw,
        ActionCode::RotateCcw,
        ActionCode::Hold,
        ActionCode::Flip,
        ActionCode::Pause,
        ActionCode::Confirm,
        ActionCode::Back,
        ActionCode::P2MoveLeft,
        ActionCode::P2MoveRight,
        ActionCode::P2SoftDrop,
        ActionCode::P2HardDrop,
        ActionCode::P2RotateCw,
        ActionCode::P2RotateCcw,
        ActionCode::P2Hold,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Resolve a per-piece control for a seat
    ///
    /// ```
    /// use tui_fliptris_types::{ActionCode, PlayerAction, SeatId};
    ///
    /// assert_eq!(ActionCode::for_seat(SeatId::One, PlayerAction::Hold), ActionCode::Hold);
    /// assert_eq!(ActionCode::for_seat(SeatId::Two, PlayerAction::Hold), ActionCode::P2Hold);
    /// ```
    pub fn for_seat(seat: SeatId, action: PlayerAction) -> Self {
        match (seat, action) {
            (SeatId::One, PlayerAction::MoveLeft) => ActionCode::MoveLeft,
            (SeatId::One, PlayerAction::MoveRight) => ActionCode::MoveRight,
            (SeatId::One, PlayerAction::SoftDrop) => ActionCode::SoftDrop,
            (SeatId::One, PlayerAction::HardDrop) => ActionCode::HardDrop,
            (SeatId::One, PlayerAction::RotateCw) => ActionCode::RotateCw,
            (SeatId::One, PlayerAction::RotateCcw) => ActionCode::RotateCcw,
            (SeatId::One, PlayerAction::Hold) => ActionCode::Hold,
            (SeatId::Two, PlayerAction::MoveLeft) => ActionCode::P2MoveLeft,
            (SeatId::Two, PlayerAction::MoveRight) => ActionCode::P2MoveRight,
            (SeatId::Two, PlayerAction::SoftDrop) => ActionCode::P2SoftDrop,
            (SeatId::Two, PlayerAction::HardDrop) => ActionCode::P2HardDrop,
            (SeatId::Two, PlayerAction::RotateCw) => ActionCode::P2RotateCw,
            (SeatId::Two, PlayerAction::RotateCcw) => ActionCode::P2RotateCcw,
            (SeatId::Two, PlayerAction::Hold) => ActionCode::P2Hold,
        }
    }

    /// Parse action code from a camelCase name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        ActionCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().to_lowercase() == lower)
    }

    /// Convert to camelCase string (used by replay scripts)
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionCode::MoveLeft => "moveLeft",
            ActionCode::MoveRight => "moveRight",
            ActionCode::SoftDrop => "softDrop",
            ActionCode::HardDrop => "hardDrop",
            ActionCode::RotateCw => "rotateCw",
            ActionCode::RotateCcw => "rotateCcw",
            ActionCode::Hold => "hold",
            ActionCode::Flip => "flip",
            ActionCode::Pause => "pause",
            ActionCode::Confirm => "confirm",
            ActionCode::Back => "back",
            ActionCode::P2MoveLeft => "p2MoveLeft",
            ActionCode::P2MoveRight => "p2MoveRight",
            ActionCode::P2SoftDrop => "p2SoftDrop",
            ActionCode::P2HardDrop => "p2HardDrop",
            ActionCode::P2RotateCw => "p2RotateCw",
            ActionCode::P2RotateCcw => "p2RotateCcw",
            ActionCode::P2Hold => "p2Hold",
        }
    }
}

/// Rule variants driven by the same state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Standard leveling from the starting gravity
    Marathon,
    /// Level pinned to the starting value
    Chillax,
    /// Clear the pre-seeded garbage as fast as possible
    Garbage,
    /// Finite lives; a blocked spawn can be bought back
    Redemption,
    /// Second piece permanently on the inactive side
    Coop,
    /// Single piece with inverted gravity
    Sirtet,
}

impl GameMode {
    pub const ALL: [GameMode; 6] = [
        GameMode::Marathon,
        GameMode::Chillax,
        GameMode::Garbage,
        GameMode::Redemption,
        GameMode::Coop,
        GameMode::Sirtet,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "marathon" => Some(GameMode::Marathon),
            "chillax" => Some(GameMode::Chillax),
            "garbage" => Some(GameMode::Garbage),
            "redemption" => Some(GameMode::Redemption),
            "coop" | "co-op" => Some(GameMode::Coop),
            "sirtet" => Some(GameMode::Sirtet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Marathon => "marathon",
            GameMode::Chillax => "chillax",
            GameMode::Garbage => "garbage",
            GameMode::Redemption => "redemption",
            GameMode::Coop => "coop",
            GameMode::Sirtet => "sirtet",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_halves_are_even() {
        assert_eq!(BOARD_ROWS % 2, 0);
        assert_eq!(HALF_ROWS, 20);
        assert!(SPAWN_BUFFER >= 4, "buffer must fit any piece");
    }

    #[test]
    fn piece_ids_round_trip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(PieceKind::from_id(0), None);
        assert_eq!(PieceKind::from_id(GARBAGE_CELL), None);
    }

    #[test]
    fn action_codes_are_densely_indexed() {
        for (i, code) in ActionCode::ALL.iter().enumerate() {
            assert_eq!(code.index(), i);
            assert_eq!(ActionCode::from_str(code.as_str()), Some(*code));
        }
    }

    #[test]
    fn game_mode_names() {
        for mode in GameMode::ALL {
            assert_eq!(GameMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(GameMode::from_str("co-op"), Some(GameMode::Coop));
        assert_eq!(GameMode::from_str("tetris"), None);
    }
}
