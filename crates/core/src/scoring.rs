//! Scoring module - line clears, drop points and stacked multipliers
//!
//! A clear scores `LINE_SCORES[lines] * max(level, 1)`. Bonus multipliers are integer
//! percentages applied one after another with truncation, in this order:
//!
//! | Bonus | Percent |
//! |-------|---------|
//! | flip-jam clear | 125 |
//! | flip chain step 0..=4 | 100, 110, 125, 150, 200 |
//! | high-wire (stack > 15 rows) | 120 |
//! | momentum burst | 175 |
//! | tetris streak 0..=4 | 100, 100, 150, 175, 200 |
//!
//! Emptying the owner's half adds a flat `2000 * max(level, 1)` after multipliers.

use crate::types::{DROP_INTERVALS, DROP_INTERVAL_FLOOR_MS, LINES_PER_LEVEL, LINE_SCORES};

pub const FLIP_JAM_PCT: u32 = 125;
pub const FLIP_CHAIN_PCT: [u32; 5] = [100, 110, 125, 150, 200];
pub const HIGH_WIRE_PCT: u32 = 120;
pub const BURST_PCT: u32 = 175;
pub const TETRIS_STREAK_PCT: [u32; 5] = [100, 100, 150, 175, 200];

/// Stack height (rows) above which a clear counts as high-wire
pub const HIGH_WIRE_ROWS: u8 = 15;

pub const CLEAROUT_BONUS: u32 = 2000;

/// Everything about a clear that affects its score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearContext {
    pub lines: usize,
    pub level: u32,
    /// The clear came from a flip-jam lock
    pub flip_jam: bool,
    /// Consecutive flip-assisted clears, this one included
    pub flip_chain: u32,
    /// Owner stack height right after the lock, before removal
    pub stack_height: u8,
    pub burst: bool,
    /// Consecutive tetrises, this one included
    pub tetris_streak: u32,
    /// The clear leaves the owner's half empty
    pub clearout: bool,
}

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Table points times level, before bonuses
    pub base: u32,
    /// Points after all multipliers
    pub multiplied: u32,
    pub clearout_bonus: u32,
    pub total: u32,
}

fn level_factor(level: u32) -> u32 {
    level.max(1)
}

fn apply_pct(points: u32, pct: u32) -> u32 {
    (points as u64 * pct as u64 / 100).min(u32::MAX as u64) as u32
}

/// Base points for a clear
/// lines: number of lines cleared (1-4)
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines >= LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[lines].saturating_mul(level_factor(level))
}

/// Calculate the complete score for a clear
pub fn calculate_score(ctx: &ClearContext) -> ScoreResult {
    let base = calculate_line_score(ctx.lines, ctx.level);

    let mut points = base;
    if ctx.flip_jam {
        points = apply_pct(points, FLIP_JAM_PCT);
    }
    points = apply_pct(points, FLIP_CHAIN_PCT[(ctx.flip_chain as usize).min(4)]);
    if ctx.stack_height > HIGH_WIRE_ROWS {
        points = apply_pct(points, HIGH_WIRE_PCT);
    }
    if ctx.burst {
        points = apply_pct(points, BURST_PCT);
    }
    points = apply_pct(points, TETRIS_STREAK_PCT[(ctx.tetris_streak as usize).min(4)]);

    let clearout_bonus = if ctx.clearout && base > 0 {
        CLEAROUT_BONUS.saturating_mul(level_factor(ctx.level))
    } else {
        0
    };

    ScoreResult {
        base,
        multiplied: points,
        clearout_bonus,
        total: points.saturating_add(clearout_bonus),
    }
}

/// Calculate drop score
/// soft_drop: +1 per cell
/// hard_drop: +2 per cell
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u32 {
    if is_hard_drop {
        cells * 2
    } else {
        cells
    }
}

/// Level after `total_lines`, starting from `starting_level`
pub fn calculate_level(starting_level: u32, total_lines: u32) -> u32 {
    starting_level + total_lines / LINES_PER_LEVEL
}

/// Get drop interval for a level (in milliseconds)
pub fn get_drop_interval_ms(level: u32) -> u32 {
    DROP_INTERVALS
        .get(level as usize)
        .copied()
        .unwrap_or(DROP_INTERVAL_FLOOR_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: usize, level: u32) -> ClearContext {
        ClearContext {
            lines,
            level,
            flip_chain: 0,
            tetris_streak: if lines == 4 { 1 } else { 0 },
            ..ClearContext::default()
        }
    }

    #[test]
    fn test_plain_clears_at_level_one() {
        assert_eq!(calculate_score(&plain(1, 1)).total, 100);
        assert_eq!(calculate_score(&plain(2, 1)).total, 300);
        assert_eq!(calculate_score(&plain(3, 1)).total, 500);
        assert_eq!(calculate_score(&plain(4, 1)).total, 800);
    }

    #[test]
    fn test_level_zero_scores_like_level_one() {
        assert_eq!(calculate_line_score(1, 0), 100);
        assert_eq!(calculate_line_score(4, 3), 2400);
        assert_eq!(calculate_line_score(0, 5), 0);
        assert_eq!(calculate_line_score(5, 5), 0);
    }

    #[test]
    fn test_multipliers_stack_in_order() {
        let ctx = ClearContext {
            lines: 1,
            level: 1,
            flip_jam: true,
            flip_chain: 2,
            ..ClearContext::default()
        };
        // 100 * 1.25 = 125, * 1.25 = 156 (truncated)
        assert_eq!(calculate_score(&ctx).total, 156);

        let ctx = ClearContext {
            lines: 2,
            level: 2,
            stack_height: 16,
            burst: true,
            ..ClearContext::default()
        };
        // 600 * 1.2 = 720, * 1.75 = 1260
        assert_eq!(calculate_score(&ctx).total, 1260);
    }

    #[test]
    fn test_high_wire_threshold_is_exclusive() {
        let mut ctx = plain(1, 1);
        ctx.stack_height = HIGH_WIRE_ROWS;
        assert_eq!(calculate_score(&ctx).total, 100);
        ctx.stack_height = HIGH_WIRE_ROWS + 1;
        assert_eq!(calculate_score(&ctx).total, 120);
    }

    #[test]
    fn test_tetris_streak_escalates_and_caps() {
        let mut ctx = plain(4, 1);
        ctx.tetris_streak = 2;
        assert_eq!(calculate_score(&ctx).total, 1200);
        ctx.tetris_streak = 9;
        assert_eq!(calculate_score(&ctx).total, 1600);
    }

    #[test]
    fn test_clearout_bonus_is_flat() {
        let mut ctx = plain(1, 3);
        ctx.clearout = true;
        let result = calculate_score(&ctx);
        assert_eq!(result.multiplied, 300);
        assert_eq!(result.clearout_bonus, 6000);
        assert_eq!(result.total, 6300);
    }

    #[test]
    fn test_drop_scores() {
        assert_eq!(calculate_drop_score(10, false), 10);
        assert_eq!(calculate_drop_score(10, true), 20);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(calculate_level(0, 9), 0);
        assert_eq!(calculate_level(0, 10), 1);
        assert_eq!(calculate_level(5, 29), 7);
    }

    #[test]
    fn test_drop_intervals() {
        assert_eq!(get_drop_interval_ms(0), 1000);
        assert_eq!(get_drop_interval_ms(1), 800);
        assert_eq!(get_drop_interval_ms(8), 160);
        assert_eq!(get_drop_interval_ms(9), 120);
        assert_eq!(get_drop_interval_ms(20), 120);
    }
}
