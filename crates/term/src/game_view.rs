//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Tall terminals get one text row per board row. Shorter ones fall back to a
//! compact half-block layout that packs two board rows into each text row
//! (`▀` with the upper row as foreground and the lower row as background).

use crate::core::{GameSnapshot, RunPhase};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{GameMode, PieceKind, SeatId, BOARD_COLS, BOARD_ROWS, GARBAGE_CELL, HALF_ROWS};

const ROWS: usize = BOARD_ROWS as usize;
const COLS: usize = BOARD_COLS as usize;

const BOARD_BG: Rgb = Rgb::new(24, 24, 32);
const EMPTY_DOT: Rgb = Rgb::new(70, 70, 82);
const GHOST: Rgb = Rgb::new(120, 120, 130);
const GARBAGE: Rgb = Rgb::new(130, 130, 130);
const BORDER: Rgb = Rgb::new(200, 200, 200);
const BORDER_BURST: Rgb = Rgb::new(255, 200, 60);
const BORDER_JAM: Rgb = Rgb::new(255, 80, 80);
/// Brightness of the inactive (bottom) stack
const INACTIVE_PCT: u8 = 55;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// What occupies one board cell this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paint {
    Empty,
    Locked(Rgb),
    Clearing,
    Ghost,
    Active(Rgb),
}

impl Paint {
    /// Solid color in the compact layout; `None` shows the board background
    fn color(self) -> Option<Rgb> {
        match self {
            Paint::Empty => None,
            Paint::Locked(c) | Paint::Active(c) => Some(c),
            Paint::Clearing => Some(Rgb::WHITE),
            Paint::Ghost => Some(GHOST.scaled(60)),
        }
    }
}

/// Where the board frame lands in the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub compact: bool,
    pub start_x: u16,
    pub start_y: u16,
    pub frame_w: u16,
    pub frame_h: u16,
}

impl Layout {
    /// Text row of the first interior row for a raw board row
    pub fn row_y(&self, row: u8) -> u16 {
        let row = if self.compact { row / 2 } else { row } as u16;
        self.start_y + 1 + row
    }
}

/// A lightweight terminal renderer for the split board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    pub fn layout(&self, viewport: Viewport) -> Layout {
        let board_w = BOARD_COLS as u16 * self.cell_w;
        let full_h = BOARD_ROWS as u16;
        let compact = viewport.height < full_h + 2;
        let board_h = if compact { full_h / 2 } else { full_h };
        let frame_w = board_w + 2;
        let frame_h = board_h + 2;
        Layout {
            compact,
            start_x: viewport.width.saturating_sub(frame_w) / 2,
            start_y: viewport.height.saturating_sub(frame_h) / 2,
            frame_w,
            frame_h,
        }
    }

    /// Render the snapshot into an existing framebuffer.
    ///
    /// This is the allocation-free hot path. Callers can reuse a framebuffer
    /// across frames and only resize when the terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let layout = self.layout(viewport);
        let paints = paint_grid(snap);

        let border_fg = if snap.timers.flip_jam_flash_ms.is_some() {
            BORDER_JAM
        } else if snap.burst() {
            BORDER_BURST
        } else {
            BORDER
        };
        self.draw_border(fb, &layout, CellStyle::new(border_fg, Rgb::BLACK));

        if layout.compact {
            self.draw_board_compact(fb, &layout, &paints);
        } else {
            self.draw_board_full(fb, &layout, &paints);
        }

        self.draw_side_panel(fb, snap, viewport, &layout);

        let (title, hint) = match (snap.paused, snap.phase) {
            (true, _) => (Some("PAUSED"), None),
            (_, RunPhase::GameOver) => (Some("GAME OVER"), Some("R restart  Q quit")),
            (_, RunPhase::Victory) => (Some("VICTORY"), Some("R restart  Q quit")),
            (_, RunPhase::LifeLossPending { .. }) => (Some("CONTINUE?"), Some("Y continue  N quit")),
            (_, RunPhase::LifeLossAnimating { .. }) => (Some("LIFE LOST"), None),
            (_, RunPhase::Playing) => (None, None),
        };
        if let Some(title) = title {
            self.draw_overlay_text(fb, &layout, 0, title, true);
        }
        if let Some(hint) = hint {
            self.draw_overlay_text(fb, &layout, 1, hint, false);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, l: &Layout, style: CellStyle) {
        let (x, y, w, h) = (l.start_x, l.start_y, l.frame_w, l.frame_h);

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }

        // Center line markers.
        for row in [HALF_ROWS - 1, HALF_ROWS] {
            let ty = l.row_y(row);
            fb.put_char(x, ty, '►', style);
            fb.put_char(x + w - 1, ty, '◄', style);
        }
    }

    fn draw_board_full(&self, fb: &mut FrameBuffer, l: &Layout, paints: &[[Paint; COLS]; ROWS]) {
        for (row, line) in paints.iter().enumerate() {
            for (x, paint) in line.iter().enumerate() {
                let (ch, style) = match *paint {
                    Paint::Empty => ('·', CellStyle::new(EMPTY_DOT, BOARD_BG).dim()),
                    Paint::Locked(c) => ('█', CellStyle::new(c, BOARD_BG)),
                    Paint::Clearing => ('█', CellStyle::new(Rgb::WHITE, BOARD_BG).bold()),
                    Paint::Ghost => ('░', CellStyle::new(GHOST, BOARD_BG).dim()),
                    Paint::Active(c) => ('█', CellStyle::new(c, BOARD_BG).bold()),
                };
                let px = l.start_x + 1 + x as u16 * self.cell_w;
                fb.fill_rect(px, l.row_y(row as u8), self.cell_w, 1, ch, style);
            }
        }
    }

    fn draw_board_compact(&self, fb: &mut FrameBuffer, l: &Layout, paints: &[[Paint; COLS]; ROWS]) {
        for pair in 0..ROWS / 2 {
            let upper = &paints[pair * 2];
            let lower = &paints[pair * 2 + 1];
            for x in 0..COLS {
                let cell = match (upper[x].color(), lower[x].color()) {
                    (None, None) => CellStyle::new(EMPTY_DOT, BOARD_BG).into_cell(' '),
                    (top, bottom) => {
                        CellStyle::new(top.unwrap_or(BOARD_BG), bottom.unwrap_or(BOARD_BG))
                            .into_cell('▀')
                    }
                };
                let px = l.start_x + 1 + x as u16 * self.cell_w;
                fb.fill_rect(px, l.row_y(pair as u8 * 2), self.cell_w, 1, cell.ch, cell.style);
            }
        }
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, l: &Layout) {
        let panel_x = l.start_x.saturating_add(l.frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 14 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::BLACK);
        let dim = value.dim();
        let vx = panel_x + 7;

        let mut y = l.start_y;
        fb.put_str(panel_x, y, mode_label(snap.mode), label);
        y += 2;

        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_u32(vx, y, snap.score, value);
        y += 1;
        fb.put_str(panel_x, y, "LEVEL", label);
        fb.put_u32(vx, y, snap.level, value);
        y += 1;
        fb.put_str(panel_x, y, "LINES", label);
        fb.put_u32(vx, y, snap.lines, value);
        y += 1;
        fb.put_str(panel_x, y, "TIME", label);
        put_time(fb, vx, y, snap.elapsed_ms, value);
        y += 2;

        fb.put_str(panel_x, y, "FLOW", label);
        let filled = (snap.momentum.min(100) / 10) as u16;
        for i in 0..10u16 {
            let (ch, style) = if i < filled { ('■', value) } else { ('·', dim) };
            fb.put_char(vx + i, y, ch, style);
        }
        y += 1;
        if snap.burst() {
            fb.put_str(vx, y, "BURST", CellStyle::new(BORDER_BURST, Rgb::BLACK).bold());
        } else if snap.timers.recovery_ms.is_some() {
            fb.put_str(vx, y, "recovering", dim);
        }
        y += 1;

        if snap.mode == GameMode::Redemption {
            fb.put_str(panel_x, y, "LIVES", label);
            fb.put_u32(vx, y, snap.lives as u32, value);
            y += 1;
        }
        if snap.flip_chain > 0 {
            fb.put_str(panel_x, y, "CHAIN", label);
            fb.put_u32(vx, y, snap.flip_chain, value);
            y += 1;
        }
        if snap.tetris_streak > 1 {
            fb.put_str(panel_x, y, "STREAK", label);
            fb.put_u32(vx, y, snap.tetris_streak, value);
            y += 1;
        }
        y += 1;

        for seat in SeatId::ALL {
            let Some(s) = snap.seat(seat) else {
                continue;
            };
            if y >= viewport.height {
                break;
            }
            let (hold_label, next_label) = match seat {
                SeatId::One => ("HOLD", "NEXT"),
                SeatId::Two => ("P2 HOLD", "P2 NEXT"),
            };
            fb.put_str(panel_x, y, hold_label, label);
            let hold_style = if s.can_hold { value } else { dim };
            fb.put_str(vx + 1, y, s.hold.map(piece_letter).unwrap_or("-"), hold_style);
            y += 1;
            fb.put_str(panel_x, y, next_label, label);
            let mut nx = vx + 1;
            for kind in s.next {
                fb.put_str(nx, y, piece_letter(kind), value);
                nx += 2;
            }
            y += 2;
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, l: &Layout, line: u16, text: &str, bold: bool) {
        let mid_y = l.start_y.saturating_add(l.frame_h / 2).saturating_add(line);
        let text_w = text.chars().count() as u16;
        let x = l.start_x.saturating_add(l.frame_w.saturating_sub(text_w) / 2);
        let mut style = CellStyle::new(Rgb::WHITE, Rgb::BLACK);
        style.bold = bold;
        fb.put_str(x, mid_y, text, style);
    }
}

/// Resolve every board cell: locked stack, clearing rows, ghosts, then pieces on top
fn paint_grid(snap: &GameSnapshot) -> [[Paint; COLS]; ROWS] {
    let mut paints = [[Paint::Empty; COLS]; ROWS];

    for (row, line) in snap.board.iter().enumerate() {
        let clearing = snap.is_clearing_row(row as u8);
        let inactive = row >= HALF_ROWS as usize;
        for (x, &value) in line.iter().enumerate() {
            if value == 0 {
                continue;
            }
            paints[row][x] = if clearing {
                Paint::Clearing
            } else if inactive {
                Paint::Locked(cell_color(value).scaled(INACTIVE_PCT))
            } else {
                Paint::Locked(cell_color(value))
            };
        }
    }

    let pieces = snap.seats.iter().flatten().filter_map(|s| s.active);
    for piece in pieces.clone() {
        for (x, row) in piece.ghost.iter().flatten().copied() {
            let slot = &mut paints[row as usize][x as usize];
            if *slot == Paint::Empty {
                *slot = Paint::Ghost;
            }
        }
    }
    for piece in pieces {
        let color = piece_color(piece.kind);
        for (x, row) in piece.cells.iter().flatten().copied() {
            paints[row as usize][x as usize] = Paint::Active(color);
        }
    }

    paints
}

fn put_time(fb: &mut FrameBuffer, x: u16, y: u16, elapsed_ms: u64, style: CellStyle) {
    let secs = elapsed_ms / 1000;
    let w = fb.put_u64(x, y, secs / 60, style);
    fb.put_char(x + w, y, ':', style);
    let s = secs % 60;
    fb.put_char(x + w + 1, y, (b'0' + (s / 10) as u8) as char, style);
    fb.put_char(x + w + 2, y, (b'0' + (s % 10) as u8) as char, style);
}

fn cell_color(value: u8) -> Rgb {
    if value == GARBAGE_CELL {
        return GARBAGE;
    }
    PieceKind::from_id(value)
        .map(piece_color)
        .unwrap_or(Rgb::new(220, 220, 220))
}

fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    }
}

fn piece_letter(kind: PieceKind) -> &'static str {
    match kind {
        PieceKind::I => "I",
        PieceKind::O => "O",
        PieceKind::T => "T",
        PieceKind::S => "S",
        PieceKind::Z => "Z",
        PieceKind::J => "J",
        PieceKind::L => "L",
    }
}

fn mode_label(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Marathon => "MARATHON",
        GameMode::Chillax => "CHILLAX",
        GameMode::Garbage => "GARBAGE",
        GameMode::Redemption => "REDEMPTION",
        GameMode::Coop => "CO-OP",
        GameMode::Sirtet => "SIRTET",
    }
}
