//! Game state module - the simulation state machine
//!
//! This module ties together the board, pieces, queues, timers, scoring and mode
//! rules. One or two *seats* each drive a falling piece in a screen half; the top
//! half always belongs to the active owner and the bottom half to the inactive one.
//!
//! The state only changes through [`GameState::advance`] (or the pure [`step`]),
//! which consumes one [`FrameInput`] and a frame delta. Everything that happened
//! during the step is recorded in a bounded event buffer.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::{Board, CoordinateMapper, COLS, HALF};
use crate::config::RulesConfig;
use crate::das::{Das, HorizontalInput};
use crate::input::FrameInput;
use crate::mode::{BlockedSpawn, ModeRules, ModeSettings};
use crate::momentum::Momentum;
use crate::pieces::{try_rotate, Piece};
use crate::rng::{PieceQueue, SimpleRng};
use crate::scoring::{
    calculate_drop_score, calculate_level, calculate_score, get_drop_interval_ms, ClearContext,
};
use crate::snapshot::{GameSnapshot, PieceSnapshot, RawCell, SeatSnapshot, TimersSnapshot};
use crate::timers::{TimerId, TimerTable};
use crate::types::*;

/// Keeps the co-op queue independent from the primary one
const SEAT_TWO_SEED_SALT: u32 = 0x9E37_79B9;
const GARBAGE_SEED_SALT: u32 = 0x85EB_CA6B;

pub const MAX_EVENTS: usize = 32;

/// Events recorded during one step
pub type Events = ArrayVec<GameEvent, MAX_EVENTS>;

/// Run lifecycle; `paused` is tracked separately
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunPhase {
    Playing,
    /// A spawn was blocked; waiting for Confirm (spend a life) or Back (give up)
    LifeLossPending { seat: SeatId },
    /// A life was spent; the blocked seat respawns when the animation ends
    LifeLossAnimating { seat: SeatId },
    GameOver,
    Victory,
}

impl RunPhase {
    pub fn is_finished(&self) -> bool {
        matches!(self, RunPhase::GameOver | RunPhase::Victory)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    Spawned { seat: SeatId, kind: PieceKind },
    Rotated { seat: SeatId },
    HardDropped { seat: SeatId, rows: u32 },
    Locked { seat: SeatId, owner: Owner },
    LinesCleared { owner: Owner, count: u8 },
    Tetris { owner: Owner },
    Flipped,
    FlipJam { seat: SeatId },
    Held { seat: SeatId },
    LevelUp { level: u32 },
    BurstStarted,
    BurstEnded,
    SpawnBlocked { seat: SeatId },
    LifeLost { lives_left: u8 },
    Paused { paused: bool },
    GameOver,
    Victory,
}

/// Run results handed to menus and score stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub mode: GameMode,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub elapsed_ms: u64,
    pub lives: u8,
    pub finished: bool,
    pub won: bool,
}

/// Lock delay bookkeeping for one piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LockState {
    timer_ms: u32,
    grounded_ms: u32,
    since_reset_ms: u32,
    resets: u32,
    moves: u32,
}

impl LockState {
    fn fresh() -> Self {
        Self {
            timer_ms: 0,
            grounded_ms: 0,
            since_reset_ms: u32::MAX,
            resets: 0,
            moves: 0,
        }
    }
}

/// One controllable piece slot with its own queue, hold and lock state
#[derive(Debug, Clone)]
pub struct Seat {
    id: SeatId,
    half: Half,
    active: Option<Piece>,
    hold: Option<PieceKind>,
    can_hold: bool,
    queue: PieceQueue,
    das: Das,
    drop_timer_ms: u32,
    lock: LockState,
    flipped_this_piece: bool,
    needs_spawn: bool,
}

impl Seat {
    fn new(id: SeatId, half: Half, seed: u32) -> Self {
        Self {
            id,
            half,
            active: None,
            hold: None,
            can_hold: true,
            queue: PieceQueue::new(seed),
            das: Das::new(),
            drop_timer_ms: 0,
            lock: LockState::fresh(),
            flipped_this_piece: false,
            needs_spawn: true,
        }
    }

    pub fn id(&self) -> SeatId {
        self.id
    }

    pub fn half(&self) -> Half {
        self.half
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn next_queue(&self) -> &[PieceKind; QUEUE_PREVIEW] {
        self.queue.preview()
    }

    fn reset_piece_timers(&mut self) {
        self.drop_timer_ms = 0;
        self.lock = LockState::fresh();
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    settings: ModeSettings,
    rules: ModeRules,
    config: RulesConfig,
    seats: ArrayVec<Seat, 2>,
    /// Rows waiting for their clear animation to end, per owner
    pending_clears: [ArrayVec<u8, HALF>; 2],
    timers: TimerTable,
    momentum: Momentum,
    phase: RunPhase,
    paused: bool,
    score: u32,
    lines: u32,
    level: u32,
    elapsed_ms: u64,
    lives: u8,
    tetris_streak: u32,
    flip_chain: u32,
    seed: u32,
    events: Events,
}

impl GameState {
    /// Create a marathon run with default rules
    pub fn new(seed: u32) -> Self {
        Self::with_settings(seed, ModeSettings::default(), RulesConfig::default())
    }

    /// Create a run; identical arguments always produce identical runs
    pub fn with_settings(seed: u32, settings: ModeSettings, config: RulesConfig) -> Self {
        let settings = settings.sanitized();
        let config = config.sanitized();
        let rules = ModeRules::from_settings(&settings);

        let mut board = Board::new();
        let garbage_rows = rules.garbage_rows();
        if garbage_rows > 0 {
            let mut rng = SimpleRng::new(seed ^ GARBAGE_SEED_SALT);
            board.seed_garbage(Owner::A, garbage_rows, &mut rng);
            board.seed_garbage(Owner::B, garbage_rows, &mut rng);
        }

        let mut seats = ArrayVec::new();
        seats.push(Seat::new(SeatId::One, rules.seat_half(SeatId::One), seed));
        if rules.has_second_seat() {
            seats.push(Seat::new(
                SeatId::Two,
                rules.seat_half(SeatId::Two),
                seed ^ SEAT_TWO_SEED_SALT,
            ));
        }

        let mut state = Self {
            board,
            settings,
            rules,
            config,
            seats,
            pending_clears: [ArrayVec::new(), ArrayVec::new()],
            timers: TimerTable::new(),
            momentum: Momentum::new(),
            phase: RunPhase::Playing,
            paused: false,
            score: 0,
            lines: 0,
            level: settings.starting_level,
            elapsed_ms: 0,
            lives: settings.lives,
            tetris_streak: 0,
            flip_chain: 0,
            seed,
            events: Events::new(),
        };

        info!(
            mode = settings.mode.as_str(),
            seed,
            level = settings.starting_level,
            "run started"
        );
        state.spawn_waiting();
        state.events.clear();
        state
    }

    /// Start a new run with the current settings, seeded from this run's RNG state
    pub fn reset(&mut self) {
        let seed = self.seats[0].queue.seed();
        *self = Self::with_settings(seed, self.settings, self.config);
    }

    /// Mode for the next [`reset`](Self::reset)
    pub fn set_mode(&mut self, mode: GameMode) {
        self.settings.mode = mode;
    }

    /// Starting level for the next reset, clamped to 0..=15
    pub fn set_starting_level(&mut self, level: u32) {
        self.settings.set_starting_level(level);
    }

    /// Garbage height for the next reset, clamped to 1..=5
    pub fn set_garbage_height(&mut self, height: u8) {
        self.settings.set_garbage_height(height);
    }

    /// Redemption lives for the next reset, clamped to 1..=9
    pub fn set_redemption_lives(&mut self, lives: u8) {
        self.settings.set_lives(lives);
    }

    /// Replace timing rules; takes effect immediately
    pub fn set_config(&mut self, config: RulesConfig) {
        self.config = config.sanitized();
    }

    pub fn score_state(&self) -> ScoreState {
        ScoreState {
            mode: self.rules.mode(),
            score: self.score,
            lines: self.lines,
            level: self.level,
            elapsed_ms: self.elapsed_ms,
            lives: self.lives,
            finished: self.phase.is_finished(),
            won: self.phase == RunPhase::Victory,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn settings(&self) -> &ModeSettings {
        &self.settings
    }

    pub fn rules(&self) -> ModeRules {
        self.rules
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn momentum(&self) -> Momentum {
        self.momentum
    }

    pub fn tetris_streak(&self) -> u32 {
        self.tetris_streak
    }

    pub fn flip_chain(&self) -> u32 {
        self.flip_chain
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn timers(&self) -> &TimerTable {
        &self.timers
    }

    /// Events recorded by the most recent step
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn seat(&self, seat: SeatId) -> Option<&Seat> {
        self.seats.get(seat.index())
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Owner a seat currently plays for
    pub fn seat_owner(&self, seat: SeatId) -> Option<Owner> {
        self.seat(seat).map(|s| self.board.mapper().owner_of(s.half))
    }

    /// Get current drop interval based on level
    pub fn drop_interval_ms(&self) -> u32 {
        get_drop_interval_ms(self.level)
    }

    fn push_event(&mut self, event: GameEvent) {
        let _ = self.events.try_push(event);
    }

    fn owner_of_seat(&self, i: usize) -> Owner {
        self.board.mapper().owner_of(self.seats[i].half)
    }

    /// Whether a frame cell is unusable for seat `i`
    ///
    /// Blocked: outside the columns, beyond the spawn buffer or past the center,
    /// over a locked cell of the seat's owner, or over another live piece in the
    /// same half. Cells inside the spawn buffer never touch the stack.
    fn cell_blocked(&self, i: usize, x: i8, depth: i8) -> bool {
        if !CoordinateMapper::in_frame(x, depth) {
            return true;
        }
        if let Some(local) = CoordinateMapper::depth_to_local(depth) {
            if self.board.is_filled(self.owner_of_seat(i), local, x) {
                return true;
            }
        }
        let half = self.seats[i].half;
        self.seats.iter().enumerate().any(|(j, other)| {
            j != i
                && other.half == half
                && other
                    .active
                    .is_some_and(|p| p.blocks().contains(&(x, depth)))
        })
    }

    fn piece_collides(&self, i: usize, piece: &Piece) -> bool {
        piece
            .blocks()
            .iter()
            .any(|&(x, depth)| self.cell_blocked(i, x, depth))
    }

    /// Collision test for a seat's active piece after an offset and rotation
    ///
    /// Returns false when the seat has no active piece.
    pub fn collides(&self, seat: SeatId, dx: i8, dy: i8, rotation: Rotation) -> bool {
        let i = seat.index();
        let Some(piece) = self.seats.get(i).and_then(|s| s.active) else {
            return false;
        };
        piece
            .blocks_at(dx, dy, rotation)
            .iter()
            .any(|&(x, depth)| self.cell_blocked(i, x, depth))
    }

    /// Check if the active piece of a seat is resting on something
    pub fn is_grounded(&self, seat: SeatId) -> bool {
        match self.seat(seat).and_then(|s| s.active) {
            Some(piece) => self.collides(seat, 0, 1, piece.rotation),
            None => false,
        }
    }

    fn drop_distance(&self, i: usize) -> i8 {
        let Some(piece) = self.seats[i].active else {
            return 0;
        };
        let mut distance = 0i8;
        while !self.piece_collides(i, &piece.moved(0, distance + 1)) {
            distance += 1;
        }
        distance
    }

    /// Calculate the ghost piece depth (where the piece would land)
    pub fn ghost_y(&self, seat: SeatId) -> Option<i8> {
        let piece = self.seat(seat)?.active?;
        Some(piece.y + self.drop_distance(seat.index()))
    }

    /// Advance the simulation by one frame
    pub fn advance(&mut self, input: &FrameInput, delta_ms: u32) {
        self.events.clear();
        if self.phase.is_finished() {
            return;
        }

        if input.pressed(ActionCode::Pause) && self.phase == RunPhase::Playing {
            self.paused = !self.paused;
            self.push_event(GameEvent::Paused {
                paused: self.paused,
            });
        }
        if self.paused {
            return;
        }

        match self.phase {
            RunPhase::LifeLossPending { seat } => {
                self.resolve_life_choice(seat, input);
                return;
            }
            RunPhase::LifeLossAnimating { .. } => {
                self.tick_timers(delta_ms);
                self.spawn_waiting();
                return;
            }
            RunPhase::GameOver | RunPhase::Victory => return,
            RunPhase::Playing => {}
        }

        self.elapsed_ms += delta_ms as u64;

        // Timers started further down this frame count from the next one.
        self.tick_timers(delta_ms);
        if self.phase.is_finished() {
            return;
        }

        if input.pressed(ActionCode::Flip) {
            self.try_flip();
        }

        for i in 0..self.seats.len() {
            if self.phase != RunPhase::Playing {
                break;
            }
            self.update_seat(i, input, delta_ms);
        }

        if self.phase.is_finished() {
            return;
        }
        self.momentum.decay(delta_ms, &self.timers);
        self.spawn_waiting();
    }

    fn update_seat(&mut self, i: usize, input: &FrameInput, delta_ms: u32) {
        let id = self.seats[i].id;
        let rules = self.rules;
        let pressed = |action| input.pressed(rules.action_code(id, action));
        let held = |action| input.held(rules.action_code(id, action));

        self.seats[i].lock.since_reset_ms =
            self.seats[i].lock.since_reset_ms.saturating_add(delta_ms);

        if self.seats[i].active.is_none() {
            self.seats[i].das.reset();
            return;
        }

        if pressed(PlayerAction::Hold) {
            self.hold(i);
        }
        if self.seats[i].active.is_none() || self.phase != RunPhase::Playing {
            return;
        }

        if pressed(PlayerAction::RotateCw) {
            self.rotate(i, true);
        }
        if pressed(PlayerAction::RotateCcw) {
            self.rotate(i, false);
        }

        let horizontal = HorizontalInput {
            press_left: pressed(PlayerAction::MoveLeft),
            press_right: pressed(PlayerAction::MoveRight),
            held_left: held(PlayerAction::MoveLeft),
            held_right: held(PlayerAction::MoveRight),
        };
        let (das_ms, arr_ms) = (self.config.das_ms, self.config.arr_ms);
        let shifts = self.seats[i]
            .das
            .update(horizontal, delta_ms, das_ms, arr_ms);
        for dx in shifts {
            if !self.shift(i, dx) {
                break;
            }
        }

        if pressed(PlayerAction::HardDrop) {
            self.hard_drop(i);
            return;
        }

        let soft = held(PlayerAction::SoftDrop) || pressed(PlayerAction::SoftDrop);
        self.apply_gravity(i, delta_ms, soft);
    }

    /// Count a grounded move/rotation and reset the lock timer outside the cooldown
    fn register_lock_reset(&mut self, i: usize) {
        let cooldown = self.config.lock_reset_cooldown_ms;
        let lock = &mut self.seats[i].lock;
        lock.moves += 1;
        if lock.since_reset_ms >= cooldown {
            lock.timer_ms = 0;
            lock.resets += 1;
            lock.since_reset_ms = 0;
        }
    }

    /// Try to move the active piece horizontally
    fn shift(&mut self, i: usize, dx: i8) -> bool {
        let Some(piece) = self.seats[i].active else {
            return false;
        };
        let moved = piece.moved(dx, 0);
        if self.piece_collides(i, &moved) {
            return false;
        }
        let was_grounded = self.piece_collides(i, &piece.moved(0, 1));
        self.seats[i].active = Some(moved);
        if was_grounded {
            self.register_lock_reset(i);
        }
        true
    }

    /// Try to rotate the active piece with SRS wall kicks
    fn rotate(&mut self, i: usize, clockwise: bool) -> bool {
        let Some(piece) = self.seats[i].active else {
            return false;
        };

        let result = try_rotate(
            piece.kind,
            piece.rotation,
            piece.x,
            piece.y,
            clockwise,
            |x, y| !self.cell_blocked(i, x, y),
        );

        let Some((_shape, rotation, (dx, dy))) = result else {
            return false;
        };

        let was_grounded = self.piece_collides(i, &piece.moved(0, 1));
        self.seats[i].active = Some(Piece {
            rotation,
            ..piece.moved(dx, dy)
        });
        if was_grounded {
            self.register_lock_reset(i);
        }
        let seat = self.seats[i].id;
        self.push_event(GameEvent::Rotated { seat });
        true
    }

    fn apply_gravity(&mut self, i: usize, delta_ms: u32, soft: bool) {
        let Some(piece) = self.seats[i].active else {
            return;
        };
        let level_interval = self.drop_interval_ms();
        let interval = if soft {
            self.config.soft_drop_interval_ms.min(level_interval)
        } else {
            level_interval
        };

        if !self.piece_collides(i, &piece.moved(0, 1)) {
            let seat = &mut self.seats[i];
            seat.lock.timer_ms = 0;
            seat.drop_timer_ms += delta_ms;

            let mut rows = 0u32;
            while self.seats[i].drop_timer_ms >= interval {
                self.seats[i].drop_timer_ms -= interval;
                let Some(current) = self.seats[i].active else {
                    break;
                };
                let next = current.moved(0, 1);
                if self.piece_collides(i, &next) {
                    self.seats[i].drop_timer_ms = 0;
                    break;
                }
                self.seats[i].active = Some(next);
                rows += 1;
            }
            if soft {
                self.score = self
                    .score
                    .saturating_add(calculate_drop_score(rows, false));
            }
            return;
        }

        let resets = self.seats[i].lock.resets;
        let delay = self.config.lock_delay_after_resets(resets);
        let move_limit = self.config.lock_move_limit;
        let ceiling = self.config.grounded_ceiling_ms;

        let seat = &mut self.seats[i];
        seat.drop_timer_ms = 0;
        seat.lock.timer_ms = seat.lock.timer_ms.saturating_add(delta_ms);
        seat.lock.grounded_ms = seat.lock.grounded_ms.saturating_add(delta_ms);
        let lock = seat.lock;

        if lock.timer_ms >= delay || lock.moves >= move_limit || lock.grounded_ms >= ceiling {
            self.lock_seat(i, false);
        }
    }

    /// Hard drop the active piece and lock it
    fn hard_drop(&mut self, i: usize) {
        let Some(piece) = self.seats[i].active else {
            return;
        };
        let distance = self.drop_distance(i);
        self.seats[i].active = Some(piece.moved(0, distance));

        let rows = distance as u32;
        self.score = self
            .score
            .saturating_add(calculate_drop_score(rows, true));
        if self.momentum.gain_hard_drop(&mut self.timers) {
            self.push_event(GameEvent::BurstStarted);
        }

        let seat = self.seats[i].id;
        self.push_event(GameEvent::HardDropped { seat, rows });
        self.lock_seat(i, false);
    }

    /// Swap active piece with hold piece
    fn hold(&mut self, i: usize) -> bool {
        if !self.seats[i].can_hold {
            return false;
        }
        let Some(piece) = self.seats[i].active else {
            return false;
        };

        match self.seats[i].hold {
            Some(held) => {
                let swapped = Piece::spawn(held);
                if self.piece_collides(i, &swapped) {
                    return false;
                }
                let seat = &mut self.seats[i];
                seat.hold = Some(piece.kind);
                seat.active = Some(swapped);
                seat.flipped_this_piece = false;
                seat.reset_piece_timers();
            }
            None => {
                let seat = &mut self.seats[i];
                seat.hold = Some(piece.kind);
                seat.active = None;
                seat.needs_spawn = true;
                self.spawn_seat(i);
            }
        }

        self.seats[i].can_hold = false;
        let seat = self.seats[i].id;
        self.push_event(GameEvent::Held { seat });
        true
    }

    /// Write the active piece into its owner's stack and start any clear
    fn lock_seat(&mut self, i: usize, flip_jam: bool) {
        let Some(piece) = self.seats[i].active.take() else {
            return;
        };
        let owner = self.owner_of_seat(i);
        for (x, depth) in piece.blocks() {
            if let Some(local) = CoordinateMapper::depth_to_local(depth) {
                self.board
                    .set_cell_for_owner(owner, local, x, piece.kind.id());
            }
        }

        let seat = &mut self.seats[i];
        let id = seat.id;
        let flipped = seat.flipped_this_piece;
        seat.flipped_this_piece = false;
        seat.needs_spawn = true;
        seat.reset_piece_timers();
        if id == SeatId::Two {
            self.timers.cancel(TimerId::CoopPlacement);
        }
        self.push_event(GameEvent::Locked { seat: id, owner });

        let rows = self.board.find_clear_lines_for_owner(owner);
        if rows.is_empty() {
            return;
        }
        let count = rows.len();

        self.flip_chain = if flipped {
            self.flip_chain.saturating_add(1)
        } else {
            0
        };
        self.tetris_streak = if count >= 4 {
            self.tetris_streak.saturating_add(1)
        } else {
            0
        };

        let ctx = ClearContext {
            lines: count.min(4),
            level: self.level,
            flip_jam,
            flip_chain: self.flip_chain,
            stack_height: self.board.stack_height(owner),
            burst: Momentum::in_burst(&self.timers),
            tetris_streak: self.tetris_streak,
            clearout: self.board.filled_count(owner) == count * COLS,
        };
        let result = calculate_score(&ctx);
        self.score = self.score.saturating_add(result.total);
        self.lines += count as u32;

        let level = if self.rules.freeze_level() {
            self.settings.starting_level
        } else {
            calculate_level(self.settings.starting_level, self.lines)
        };
        if level > self.level {
            debug!(level, lines = self.lines, "level up");
            self.push_event(GameEvent::LevelUp { level });
        }
        self.level = level;

        if self.momentum.gain_clear(count, &mut self.timers) {
            self.push_event(GameEvent::BurstStarted);
        }

        debug!(
            ?owner,
            count,
            points = result.total,
            flip_jam,
            flip_chain = self.flip_chain,
            "lines cleared"
        );
        self.push_event(GameEvent::LinesCleared {
            owner,
            count: count as u8,
        });
        if count >= 4 {
            self.push_event(GameEvent::Tetris { owner });
        }

        self.timers
            .start(TimerId::LineClear(owner), self.config.clear_ms(count));
        self.pending_clears[owner.index()] = rows;
    }

    /// Remove an owner's pending rows once its clear animation ends
    fn commit_clear(&mut self, owner: Owner) {
        let rows = std::mem::take(&mut self.pending_clears[owner.index()]);
        self.board.clear_lines_for_owner(owner, &rows);

        if self.phase == RunPhase::Playing && self.rules.is_run_complete(&self.board) {
            self.end_run(true);
        }
    }

    /// Swap the active owner; rejected while a clear is pending
    fn try_flip(&mut self) -> bool {
        if self.phase != RunPhase::Playing {
            return false;
        }
        let clearing = Owner::ALL
            .iter()
            .any(|&owner| self.timers.is_running(TimerId::LineClear(owner)));
        if clearing {
            return false;
        }

        self.board.flip();
        self.push_event(GameEvent::Flipped);

        for i in 0..self.seats.len() {
            if self.seats[i].active.is_some() {
                self.seats[i].flipped_this_piece = true;
                self.resolve_flip_jam(i);
            }
        }
        true
    }

    /// Relocate a piece embedded in its new owner's stack, then lock it
    ///
    /// The piece moves away from the center one row at a time while its outermost
    /// block stays inside the grid; the first free position wins. Without one the
    /// piece is clamped at the outer edge and locked over whatever it overlaps. A
    /// piece already reaching into the spawn buffer is locked where it is.
    fn resolve_flip_jam(&mut self, i: usize) {
        let Some(piece) = self.seats[i].active else {
            return;
        };
        if !self.piece_collides(i, &piece) {
            return;
        }

        let top = piece.top_depth();
        let free = (1..=top.max(0))
            .map(|shift| piece.moved(0, -shift))
            .find(|candidate| !self.piece_collides(i, candidate));
        let resolved = match free {
            Some(candidate) => candidate,
            None if top > 0 => piece.moved(0, -top),
            None => piece,
        };

        let seat = self.seats[i].id;
        debug!(
            ?seat,
            from = piece.y,
            to = resolved.y,
            clean = free.is_some(),
            "flip-jam"
        );
        self.seats[i].active = Some(resolved);
        self.timers
            .start(TimerId::FlipJamFlash, self.config.flip_jam_flash_ms);
        self.push_event(GameEvent::FlipJam { seat });
        self.lock_seat(i, true);
    }

    fn tick_timers(&mut self, delta_ms: u32) {
        for id in self.timers.tick(delta_ms) {
            match id {
                TimerId::LineClear(owner) => self.commit_clear(owner),
                TimerId::MomentumBurst => {
                    self.momentum.end_burst(&mut self.timers);
                    self.push_event(GameEvent::BurstEnded);
                }
                TimerId::CoopPlacement => {
                    if self.seats.len() > 1 {
                        self.hard_drop(SeatId::Two.index());
                    }
                }
                TimerId::LifeLoss => {
                    if let RunPhase::LifeLossAnimating { .. } = self.phase {
                        self.phase = RunPhase::Playing;
                    }
                }
                TimerId::FlipJamFlash | TimerId::MomentumRecovery => {}
            }
            if self.phase.is_finished() {
                return;
            }
        }
    }

    /// Spawn for every seat that needs a piece and whose owner is not mid-clear
    fn spawn_waiting(&mut self) {
        for i in 0..self.seats.len() {
            if self.phase != RunPhase::Playing {
                return;
            }
            if !self.seats[i].needs_spawn {
                continue;
            }
            let owner = self.owner_of_seat(i);
            if self.timers.is_running(TimerId::LineClear(owner)) {
                continue;
            }
            self.spawn_seat(i);
        }
    }

    /// Spawn the next queued piece; the queue is only consumed on success
    fn spawn_seat(&mut self, i: usize) -> bool {
        let kind = self.seats[i].queue.peek();
        let piece = Piece::spawn(kind);
        if self.piece_collides(i, &piece) {
            self.on_spawn_blocked(i);
            return false;
        }

        let placement_ms = self.config.coop_placement_ms;
        let seat = &mut self.seats[i];
        seat.queue.draw();
        seat.active = Some(piece);
        seat.needs_spawn = false;
        seat.can_hold = true;
        seat.flipped_this_piece = false;
        seat.reset_piece_timers();
        let id = seat.id;

        if id == SeatId::Two {
            self.timers.start(TimerId::CoopPlacement, placement_ms);
        }
        self.push_event(GameEvent::Spawned { seat: id, kind });
        true
    }

    fn on_spawn_blocked(&mut self, i: usize) {
        let seat = self.seats[i].id;
        debug!(?seat, lives = self.lives, "spawn blocked");
        self.push_event(GameEvent::SpawnBlocked { seat });
        match self.rules.on_spawn_blocked(self.lives) {
            BlockedSpawn::OfferLife => self.phase = RunPhase::LifeLossPending { seat },
            BlockedSpawn::GameOver => self.end_run(false),
        }
    }

    fn resolve_life_choice(&mut self, seat: SeatId, input: &FrameInput) {
        if input.pressed(ActionCode::Confirm) && self.lives > 0 {
            self.lives -= 1;
            let owner = self.owner_of_seat(seat.index());
            let evicted = self
                .board
                .remove_bottom_rows_for_owner(owner, LIFE_LOSS_EVICT_ROWS);
            debug!(?owner, evicted, lives = self.lives, "life spent");
            self.push_event(GameEvent::LifeLost {
                lives_left: self.lives,
            });
            self.phase = RunPhase::LifeLossAnimating { seat };
            self.timers
                .start(TimerId::LifeLoss, self.config.life_loss_anim_ms);
        } else if input.pressed(ActionCode::Back) {
            self.end_run(false);
        }
    }

    fn end_run(&mut self, won: bool) {
        self.timers.cancel_all();
        for rows in &mut self.pending_clears {
            rows.clear();
        }
        if won {
            self.phase = RunPhase::Victory;
            self.push_event(GameEvent::Victory);
        } else {
            self.phase = RunPhase::GameOver;
            self.push_event(GameEvent::GameOver);
        }
        info!(
            mode = self.rules.mode().as_str(),
            score = self.score,
            lines = self.lines,
            elapsed_ms = self.elapsed_ms,
            won,
            "run finished"
        );
    }

    fn raw_cells(half: Half, piece: &Piece) -> [RawCell; 4] {
        let mut out = [None; 4];
        for (slot, (x, depth)) in out.iter_mut().zip(piece.blocks()) {
            *slot = CoordinateMapper::depth_to_row(half, depth).map(|row| (x as u8, row));
        }
        out
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        let mapper = self.board.mapper();
        self.board.write_raw_grid(&mut out.board);

        out.clearing_rows = 0;
        for owner in Owner::ALL {
            for &local in &self.pending_clears[owner.index()] {
                if let Some(row) = mapper.local_to_row(owner, local) {
                    out.clearing_rows |= 1u64 << row;
                }
            }
        }

        out.seats = [None, None];
        for (i, seat) in self.seats.iter().enumerate() {
            let active = seat.active.map(|piece| {
                let ghost = piece.moved(0, self.drop_distance(i));
                PieceSnapshot {
                    kind: piece.kind,
                    rotation: piece.rotation,
                    cells: Self::raw_cells(seat.half, &piece),
                    ghost: Self::raw_cells(seat.half, &ghost),
                }
            });
            out.seats[seat.id.index()] = Some(SeatSnapshot {
                seat: seat.id,
                half: seat.half,
                owner: mapper.owner_of(seat.half),
                active,
                hold: seat.hold,
                can_hold: seat.can_hold,
                next: *seat.queue.preview(),
                grounded: self.is_grounded(seat.id),
                lock_ms: seat.lock.timer_ms,
            });
        }

        out.flipped = self.board.is_flipped();
        out.mode = self.rules.mode();
        out.phase = self.phase;
        out.paused = self.paused;
        out.score = self.score;
        out.lines = self.lines;
        out.level = self.level;
        out.elapsed_ms = self.elapsed_ms;
        out.drop_interval_ms = self.drop_interval_ms();
        out.momentum = self.momentum.percent();
        out.lives = self.lives;
        out.tetris_streak = self.tetris_streak;
        out.flip_chain = self.flip_chain;
        out.seed = self.seed;
        out.timers = TimersSnapshot {
            clear_top_ms: self
                .timers
                .remaining(TimerId::LineClear(mapper.owner_of(Half::Top))),
            clear_bottom_ms: self
                .timers
                .remaining(TimerId::LineClear(mapper.owner_of(Half::Bottom))),
            flip_jam_flash_ms: self.timers.remaining(TimerId::FlipJamFlash),
            burst_ms: self.timers.remaining(TimerId::MomentumBurst),
            recovery_ms: self.timers.remaining(TimerId::MomentumRecovery),
            life_loss_ms: self.timers.remaining(TimerId::LifeLoss),
            coop_placement_ms: self.timers.remaining(TimerId::CoopPlacement),
        };
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn set_active(&mut self, seat: SeatId, piece: Piece) {
        let seat = &mut self.seats[seat.index()];
        seat.active = Some(piece);
        seat.needs_spawn = false;
        seat.reset_piece_timers();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Pure transition: the state after one frame, leaving `state` untouched
pub fn step(state: &GameState, input: &FrameInput, delta_ms: u32) -> GameState {
    let mut next = state.clone();
    next.advance(input, delta_ms);
    next
}
