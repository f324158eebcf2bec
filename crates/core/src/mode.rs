//! Mode rules - one variant per game mode, dispatched once
//!
//! [`ModeSettings`] is what a menu edits (clamped on every write); [`ModeRules`] is
//! the resolved rule set the state machine consults for leveling, seating, spawn
//! failure handling and run completion.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::types::{
    ActionCode, GameMode, Half, PlayerAction, SeatId, DEFAULT_LIVES, MAX_GARBAGE_HEIGHT,
    MAX_LIVES, MAX_STARTING_LEVEL, MIN_GARBAGE_HEIGHT,
};

/// Garbage rows seeded per owner for each height setting (1..=5)
pub const GARBAGE_ROWS: [u8; 5] = [3, 5, 8, 10, 12];

/// Rows of garbage per owner for a height setting (clamped to 1..=5)
pub fn get_garbage_row_count(height: u8) -> u8 {
    let h = height.clamp(MIN_GARBAGE_HEIGHT, MAX_GARBAGE_HEIGHT);
    GARBAGE_ROWS[(h - MIN_GARBAGE_HEIGHT) as usize]
}

/// Menu-facing run settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSettings {
    pub mode: GameMode,
    pub starting_level: u32,
    pub garbage_height: u8,
    pub lives: u8,
}

impl ModeSettings {
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            starting_level: 0,
            garbage_height: MIN_GARBAGE_HEIGHT,
            lives: DEFAULT_LIVES,
        }
    }

    pub fn set_starting_level(&mut self, level: u32) {
        self.starting_level = level.min(MAX_STARTING_LEVEL);
    }

    pub fn set_garbage_height(&mut self, height: u8) {
        self.garbage_height = height.clamp(MIN_GARBAGE_HEIGHT, MAX_GARBAGE_HEIGHT);
    }

    pub fn set_lives(&mut self, lives: u8) {
        self.lives = lives.clamp(1, MAX_LIVES);
    }

    /// Re-apply every clamp (for settings that arrived from outside)
    pub fn sanitized(mut self) -> Self {
        self.set_starting_level(self.starting_level);
        self.set_garbage_height(self.garbage_height);
        self.set_lives(self.lives);
        self
    }
}

impl Default for ModeSettings {
    fn default() -> Self {
        Self::new(GameMode::Marathon)
    }
}

/// What to do when a piece cannot spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockedSpawn {
    /// Offer to spend a life
    OfferLife,
    GameOver,
}

/// Resolved per-mode rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRules {
    Marathon,
    Chillax,
    Garbage { rows: u8 },
    Redemption,
    Coop,
    Sirtet,
}

impl ModeRules {
    pub fn from_settings(settings: &ModeSettings) -> Self {
        match settings.mode {
            GameMode::Marathon => ModeRules::Marathon,
            GameMode::Chillax => ModeRules::Chillax,
            GameMode::Garbage => ModeRules::Garbage {
                rows: get_garbage_row_count(settings.garbage_height),
            },
            GameMode::Redemption => ModeRules::Redemption,
            GameMode::Coop => ModeRules::Coop,
            GameMode::Sirtet => ModeRules::Sirtet,
        }
    }

    pub fn mode(&self) -> GameMode {
        match self {
            ModeRules::Marathon => GameMode::Marathon,
            ModeRules::Chillax => GameMode::Chillax,
            ModeRules::Garbage { .. } => GameMode::Garbage,
            ModeRules::Redemption => GameMode::Redemption,
            ModeRules::Coop => GameMode::Coop,
            ModeRules::Sirtet => GameMode::Sirtet,
        }
    }

    /// Level stays at the starting value
    pub fn freeze_level(&self) -> bool {
        matches!(self, ModeRules::Chillax)
    }

    /// Screen half the piece of a seat plays in
    pub fn seat_half(&self, seat: SeatId) -> Half {
        match (self, seat) {
            (ModeRules::Sirtet, SeatId::One) => Half::Bottom,
            (_, SeatId::One) => Half::Top,
            (_, SeatId::Two) => Half::Bottom,
        }
    }

    pub fn has_second_seat(&self) -> bool {
        matches!(self, ModeRules::Coop)
    }

    /// Garbage rows seeded per owner at run start
    pub fn garbage_rows(&self) -> u8 {
        match self {
            ModeRules::Garbage { rows } => *rows,
            _ => 0,
        }
    }

    /// Elapsed time rather than score is the ranking metric
    pub fn ranks_by_time(&self) -> bool {
        matches!(self, ModeRules::Garbage { .. })
    }

    /// Input code that drives a per-piece control; Sirtet swaps the two drops
    pub fn action_code(&self, seat: SeatId, action: PlayerAction) -> ActionCode {
        let action = match (self, action) {
            (ModeRules::Sirtet, PlayerAction::SoftDrop) => PlayerAction::HardDrop,
            (ModeRules::Sirtet, PlayerAction::HardDrop) => PlayerAction::SoftDrop,
            (_, a) => a,
        };
        ActionCode::for_seat(seat, action)
    }

    pub fn on_spawn_blocked(&self, lives_left: u8) -> BlockedSpawn {
        match self {
            ModeRules::Redemption if lives_left > 0 => BlockedSpawn::OfferLife,
            _ => BlockedSpawn::GameOver,
        }
    }

    /// Victory check after a committed clear
    pub fn is_run_complete(&self, board: &Board) -> bool {
        match self {
            ModeRules::Garbage { .. } => !board.has_remaining_garbage(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Owner, GARBAGE_CELL};

    #[test]
    fn test_garbage_row_counts() {
        assert_eq!(get_garbage_row_count(1), 3);
        assert_eq!(get_garbage_row_count(3), 8);
        assert_eq!(get_garbage_row_count(5), 12);
        assert_eq!(get_garbage_row_count(0), 3);
        assert_eq!(get_garbage_row_count(200), 12);
    }

    #[test]
    fn test_settings_clamp() {
        let mut s = ModeSettings::new(GameMode::Redemption);
        s.set_starting_level(99);
        s.set_garbage_height(0);
        s.set_lives(42);
        assert_eq!(s.starting_level, MAX_STARTING_LEVEL);
        assert_eq!(s.garbage_height, MIN_GARBAGE_HEIGHT);
        assert_eq!(s.lives, MAX_LIVES);

        let raw = ModeSettings {
            mode: GameMode::Garbage,
            starting_level: 20,
            garbage_height: 9,
            lives: 0,
        };
        let clean = raw.sanitized();
        assert_eq!(clean.garbage_height, MAX_GARBAGE_HEIGHT);
        assert_eq!(clean.lives, 1);
    }

    #[test]
    fn test_seat_halves() {
        assert_eq!(ModeRules::Marathon.seat_half(SeatId::One), Half::Top);
        assert_eq!(ModeRules::Sirtet.seat_half(SeatId::One), Half::Bottom);
        assert_eq!(ModeRules::Coop.seat_half(SeatId::Two), Half::Bottom);
    }

    #[test]
    fn test_sirtet_swaps_drop_codes() {
        let rules = ModeRules::Sirtet;
        assert_eq!(
            rules.action_code(SeatId::One, PlayerAction::SoftDrop),
            ActionCode::HardDrop
        );
        assert_eq!(
            rules.action_code(SeatId::One, PlayerAction::HardDrop),
            ActionCode::SoftDrop
        );
        assert_eq!(
            ModeRules::Marathon.action_code(SeatId::One, PlayerAction::SoftDrop),
            ActionCode::SoftDrop
        );
    }

    #[test]
    fn test_blocked_spawn_hook() {
        assert_eq!(
            ModeRules::Redemption.on_spawn_blocked(2),
            BlockedSpawn::OfferLife
        );
        assert_eq!(
            ModeRules::Redemption.on_spawn_blocked(0),
            BlockedSpawn::GameOver
        );
        assert_eq!(ModeRules::Marathon.on_spawn_blocked(3), BlockedSpawn::GameOver);
    }

    #[test]
    fn test_garbage_completion() {
        let rules = ModeRules::from_settings(&ModeSettings::new(GameMode::Garbage));
        let mut board = Board::new();
        assert!(rules.is_run_complete(&board));
        board.set_cell_for_owner(Owner::B, 0, 0, GARBAGE_CELL);
        assert!(!rules.is_run_complete(&board));
        assert!(!ModeRules::Marathon.is_run_complete(&board));
    }
}
