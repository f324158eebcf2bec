//! Read-only per-frame view of the game for renderers and recorders.
//!
//! Everything is in raw grid coordinates (row 0 = top edge), so a renderer never
//! has to know about owners or gravity frames.

use serde::{Serialize, Serializer};

use crate::board::{RawGrid, COLS};
use crate::game_state::RunPhase;
use crate::types::{GameMode, Half, Owner, PieceKind, Rotation, SeatId, BOARD_ROWS, QUEUE_PREVIEW};

/// Raw `(x, row)` of one block; `None` while inside the spawn buffer
pub type RawCell = Option<(u8, u8)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub cells: [RawCell; 4],
    /// Where a hard drop would put the piece
    pub ghost: [RawCell; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SeatSnapshot {
    pub seat: SeatId,
    pub half: Half,
    pub owner: Owner,
    pub active: Option<PieceSnapshot>,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub next: [PieceKind; QUEUE_PREVIEW],
    pub grounded: bool,
    pub lock_ms: u32,
}

/// Remaining time of each running timer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TimersSnapshot {
    pub clear_top_ms: Option<u32>,
    pub clear_bottom_ms: Option<u32>,
    pub flip_jam_flash_ms: Option<u32>,
    pub burst_ms: Option<u32>,
    pub recovery_ms: Option<u32>,
    pub life_loss_ms: Option<u32>,
    pub coop_placement_ms: Option<u32>,
}

fn serialize_grid<S: Serializer>(grid: &RawGrid, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(grid.iter())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GameSnapshot {
    #[serde(serialize_with = "serialize_grid")]
    pub board: RawGrid,
    /// Bit `row` is set while that raw row is waiting to be cleared
    pub clearing_rows: u64,
    pub flipped: bool,
    pub mode: GameMode,
    pub phase: RunPhase,
    pub paused: bool,
    pub seats: [Option<SeatSnapshot>; 2],
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub elapsed_ms: u64,
    pub drop_interval_ms: u32,
    /// Momentum meter, 0..=100
    pub momentum: u32,
    pub lives: u8,
    pub tetris_streak: u32,
    pub flip_chain: u32,
    pub seed: u32,
    pub timers: TimersSnapshot,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn playable(&self) -> bool {
        self.phase == RunPhase::Playing && !self.paused
    }

    pub fn is_clearing_row(&self, row: u8) -> bool {
        row < BOARD_ROWS && self.clearing_rows & (1u64 << row) != 0
    }

    pub fn burst(&self) -> bool {
        self.timers.burst_ms.is_some()
    }

    pub fn seat(&self, seat: SeatId) -> Option<&SeatSnapshot> {
        self.seats[seat.index()].as_ref()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; COLS]; BOARD_ROWS as usize],
            clearing_rows: 0,
            flipped: false,
            mode: GameMode::Marathon,
            phase: RunPhase::Playing,
            paused: false,
            seats: [None, None],
            score: 0,
            lines: 0,
            level: 0,
            elapsed_ms: 0,
            drop_interval_ms: 0,
            momentum: 0,
            lives: 0,
            tetris_streak: 0,
            flip_chain: 0,
            seed: 0,
            timers: TimersSnapshot::default(),
        }
    }
}
