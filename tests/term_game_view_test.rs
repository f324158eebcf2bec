use tui_fliptris::core::{GameSnapshot, GameState, ModeSettings, RulesConfig, RunPhase};
use tui_fliptris::term::{FrameBuffer, GameView, Rgb, Viewport};
use tui_fliptris::types::{GameMode, PieceKind, SeatId};

#[test]
fn term_view_renders_border_corners_full_height() {
    let snap = GameState::new(1).snapshot();
    let view = GameView::default();

    // board pixels = 10*2 by 40*1 => 20x40, plus border => 22x42
    let fb = view.render(&snap, Viewport::new(22, 42));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(21, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 41).unwrap().ch, '└');
    assert_eq!(fb.get(21, 41).unwrap().ch, '┘');
    // Center line markers sit on the rows either side of the split.
    assert_eq!(fb.get(0, 20).unwrap().ch, '►');
    assert_eq!(fb.get(0, 21).unwrap().ch, '►');
    assert_eq!(fb.get(21, 20).unwrap().ch, '◄');
}

#[test]
fn term_view_renders_locked_cells_two_chars_wide_and_dims_bottom() {
    let mut snap = GameState::new(1).snapshot();
    snap.seats = [None, None];
    snap.board[19][0] = PieceKind::I.id();
    snap.board[20][0] = PieceKind::I.id();

    let fb = view_fb(&snap, 22, 42);

    let top = fb.get(1, 1 + 19).unwrap();
    let bottom = fb.get(2, 1 + 20).unwrap();
    assert_eq!(top.ch, '█');
    assert_eq!(bottom.ch, '█');
    assert!(brightness(bottom.style.fg) < brightness(top.style.fg));
}

#[test]
fn term_view_compacts_two_rows_per_line_on_short_terminals() {
    let mut snap = GameState::new(1).snapshot();
    snap.seats = [None, None];
    snap.board[38][9] = PieceKind::O.id();

    // 22 rows: 20 lines of half blocks plus the border.
    let fb = view_fb(&snap, 22, 22);
    assert_eq!(fb.get(0, 21).unwrap().ch, '└');

    let cell = fb.get(1 + 9 * 2, 1 + 19).unwrap();
    assert_eq!(cell.ch, '▀');
    assert_ne!(cell.style.fg, cell.style.bg);
}

#[test]
fn term_view_draws_active_piece_for_each_seat() {
    let state = GameState::with_settings(4, ModeSettings::new(GameMode::Coop), RulesConfig::default());
    let snap = state.snapshot();
    let fb = view_fb(&snap, 22, 42);

    for seat in SeatId::ALL {
        let piece = snap.seat(seat).and_then(|s| s.active).unwrap();
        for (x, row) in piece.cells.iter().flatten().copied() {
            assert_eq!(fb.get(1 + x as u16 * 2, 1 + row as u16).unwrap().ch, '█');
        }
    }
}

#[test]
fn term_view_draws_side_panel_when_wide_enough() {
    let mut snap = GameState::new(1).snapshot();
    snap.score = 1234;
    snap.level = 2;
    snap.lines = 10;
    snap.elapsed_ms = 65_000;

    let fb = view_fb(&snap, 60, 42);
    let text: String = (0..42).map(|y| fb.row_text(y) + "\n").collect();

    assert!(text.contains("MARATHON"));
    assert!(text.contains("SCORE  1234"));
    assert!(text.contains("LEVEL  2"));
    assert!(text.contains("LINES  10"));
    assert!(text.contains("TIME   1:05"));
    assert!(text.contains("NEXT"));
    assert!(!text.contains("P2 NEXT"));
    assert!(!text.contains("LIVES"));
}

#[test]
fn term_view_shows_overlays() {
    let mut snap = GameState::new(1).snapshot();
    let text = |snap: &GameSnapshot| -> String {
        let fb = view_fb(snap, 40, 42);
        (0..42).map(|y| fb.row_text(y)).collect()
    };

    snap.paused = true;
    assert!(text(&snap).contains("PAUSED"));

    snap.paused = false;
    snap.phase = RunPhase::GameOver;
    let over = text(&snap);
    assert!(over.contains("GAME OVER"));
    assert!(over.contains("R restart"));

    snap.phase = RunPhase::LifeLossPending { seat: SeatId::One };
    assert!(text(&snap).contains("CONTINUE?"));
}

fn view_fb(snap: &GameSnapshot, w: u16, h: u16) -> FrameBuffer {
    GameView::default().render(snap, Viewport::new(w, h))
}

fn brightness(rgb: Rgb) -> u32 {
    rgb.r as u32 + rgb.g as u32 + rgb.b as u32
}
