//! Collaborators the driver notifies: audio cues and the score store.

use serde::{Deserialize, Serialize};

use crate::core::{ModeRules, ModeSettings, ScoreState};
use crate::types::GameMode;

/// Fire-and-forget sound cues
///
/// Every method defaults to a no-op so a front end only implements what it plays.
pub trait AudioHook {
    fn play_lock(&mut self) {}
    fn play_clear(&mut self) {}
    fn play_tetris(&mut self) {}
    fn play_flip(&mut self) {}
    fn play_rotate(&mut self) {}
    fn play_hard_drop(&mut self) {}
    fn play_life_loss(&mut self) {}
    fn play_level_up(&mut self) {}
    fn play_game_over(&mut self) {}
    fn play_victory(&mut self) {}
}

/// Silent audio
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAudio;

impl AudioHook for NoAudio {}

/// One finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub mode: GameMode,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub elapsed_ms: u64,
    pub won: bool,
    pub seed: u32,
}

impl ScoreEntry {
    pub fn from_state(state: &ScoreState, seed: u32) -> Self {
        Self {
            mode: state.mode,
            score: state.score,
            lines: state.lines,
            level: state.level,
            elapsed_ms: state.elapsed_ms,
            won: state.won,
            seed,
        }
    }

    /// Ranked by completion time instead of score
    pub fn ranks_by_time(&self) -> bool {
        ModeRules::from_settings(&ModeSettings::new(self.mode)).ranks_by_time()
    }
}

/// Order entries best first
///
/// Time-ranked modes put wins first, fastest first; everything else sorts by score.
/// A mixed list keeps score-ranked entries ahead of time-ranked ones.
pub fn rank(entries: &mut [ScoreEntry]) {
    entries.sort_by(|a, b| {
        let by_time = a.ranks_by_time();
        by_time.cmp(&b.ranks_by_time()).then_with(|| {
            if by_time {
                b.won.cmp(&a.won).then(a.elapsed_ms.cmp(&b.elapsed_ms))
            } else {
                b.score.cmp(&a.score).then(a.elapsed_ms.cmp(&b.elapsed_ms))
            }
        })
    });
}

/// Receives exactly one entry per finished run
pub trait ScoreStore {
    fn record(&mut self, entry: ScoreEntry);
}

/// In-memory store, handy for tests and headless replays
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryScoreStore {
    pub entries: Vec<ScoreEntry>,
}

impl ScoreStore for MemoryScoreStore {
    fn record(&mut self, entry: ScoreEntry) {
        self.entries.push(entry);
    }
}

impl<S: ScoreStore + ?Sized> ScoreStore for &mut S {
    fn record(&mut self, entry: ScoreEntry) {
        (**self).record(entry);
    }
}

impl<A: AudioHook + ?Sized> AudioHook for &mut A {
    fn play_lock(&mut self) {
        (**self).play_lock();
    }
    fn play_clear(&mut self) {
        (**self).play_clear();
    }
    fn play_tetris(&mut self) {
        (**self).play_tetris();
    }
    fn play_flip(&mut self) {
        (**self).play_flip();
    }
    fn play_rotate(&mut self) {
        (**self).play_rotate();
    }
    fn play_hard_drop(&mut self) {
        (**self).play_hard_drop();
    }
    fn play_life_loss(&mut self) {
        (**self).play_life_loss();
    }
    fn play_level_up(&mut self) {
        (**self).play_level_up();
    }
    fn play_game_over(&mut self) {
        (**self).play_game_over();
    }
    fn play_victory(&mut self) {
        (**self).play_victory();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(mode: GameMode, score: u32, elapsed_ms: u64, won: bool) -> ScoreEntry {
        ScoreEntry {
            mode,
            score,
            lines: 0,
            level: 0,
            elapsed_ms,
            won,
            seed: 1,
        }
    }

    #[test]
    fn test_rank_by_score() {
        let mut entries = vec![
            entry(GameMode::Marathon, 100, 0, false),
            entry(GameMode::Marathon, 900, 0, false),
            entry(GameMode::Marathon, 400, 0, false),
        ];
        rank(&mut entries);
        let scores: Vec<_> = entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![900, 400, 100]);
    }

    #[test]
    fn test_rank_garbage_by_time_wins_first() {
        let mut entries = vec![
            entry(GameMode::Garbage, 5000, 10_000, false),
            entry(GameMode::Garbage, 10, 90_000, true),
            entry(GameMode::Garbage, 10, 60_000, true),
        ];
        rank(&mut entries);
        let times: Vec<_> = entries.iter().map(|e| e.elapsed_ms).collect();
        assert_eq!(times, vec![60_000, 90_000, 10_000]);
    }

    #[test]
    fn test_rank_mixed_modes_is_consistent() {
        let won_garbage = entry(GameMode::Garbage, 10, 30_000, true);
        let lost_garbage = entry(GameMode::Garbage, 50, 5_000, false);
        let marathon = entry(GameMode::Marathon, 20, 1_000, false);

        let mut forward = vec![won_garbage, lost_garbage, marathon];
        let mut backward = vec![marathon, lost_garbage, won_garbage];
        rank(&mut forward);
        rank(&mut backward);

        assert_eq!(forward, vec![marathon, won_garbage, lost_garbage]);
        assert_eq!(backward, forward);
    }

    #[test]
    fn test_entry_serializes() {
        let e = entry(GameMode::Coop, 1, 2, false);
        let text = serde_json::to_string(&e).unwrap();
        assert!(text.contains("\"Coop\""));
        let back: ScoreEntry = serde_json::from_str(&text).unwrap();
        assert_eq!(back, e);
    }
}
