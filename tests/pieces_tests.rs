//! Pieces module tests - shapes, spawn and SRS kicks in the gravity frame

use tui_fliptris::core::pieces::{get_kick_offsets, spawn_position};
use tui_fliptris::core::{get_shape, try_rotate, Piece};
use tui_fliptris::types::{PieceKind, Rotation, BOARD_COLS};

// ============== Shape Tests ==============

#[test]
fn test_i_piece_shapes() {
    assert_eq!(get_shape(PieceKind::I, Rotation::North), [(0, 1), (1, 1), (2, 1), (3, 1)]);
    assert_eq!(get_shape(PieceKind::I, Rotation::East), [(2, 0), (2, 1), (2, 2), (2, 3)]);
    assert_eq!(get_shape(PieceKind::I, Rotation::South), [(0, 2), (1, 2), (2, 2), (3, 2)]);
    assert_eq!(get_shape(PieceKind::I, Rotation::West), [(1, 0), (1, 1), (1, 2), (1, 3)]);
}

#[test]
fn test_o_piece_shapes() {
    let north = get_shape(PieceKind::O, Rotation::North);
    assert_eq!(north, [(1, 0), (2, 0), (1, 1), (2, 1)]);
    for rotation in [Rotation::East, Rotation::South, Rotation::West] {
        assert_eq!(get_shape(PieceKind::O, rotation), north);
    }
}

#[test]
fn test_t_piece_shapes() {
    assert_eq!(get_shape(PieceKind::T, Rotation::North), [(1, 0), (0, 1), (1, 1), (2, 1)]);
    assert_eq!(get_shape(PieceKind::T, Rotation::South), [(0, 1), (1, 1), (2, 1), (1, 2)]);
}

// ============== Spawn Tests ==============

#[test]
fn test_spawn_outer_block_touches_edge() {
    for kind in PieceKind::ALL {
        let piece = Piece::spawn(kind);
        assert_eq!(piece.rotation, Rotation::North);
        assert_eq!(piece.top_depth(), 0, "{:?}", kind);
        assert_eq!(piece.x, ((BOARD_COLS - 4) / 2) as i8);
        for (x, _) in piece.blocks() {
            assert!(x >= 0 && x < BOARD_COLS as i8);
        }
    }
    assert_eq!(spawn_position(PieceKind::I), (3, -1));
    assert_eq!(spawn_position(PieceKind::T), (3, 0));
}

#[test]
fn test_piece_moved_and_blocks_at() {
    let piece = Piece::spawn(PieceKind::T).moved(1, 2);
    assert_eq!(piece.blocks(), [(5, 2), (4, 3), (5, 3), (6, 3)]);
    assert_eq!(piece.blocks_at(-1, 0, Rotation::East), [(4, 2), (4, 3), (5, 3), (4, 4)]);
}

// ============== Rotation Tests ==============

#[test]
fn test_rotate_in_open_space_uses_identity_kick() {
    let result = try_rotate(PieceKind::T, Rotation::North, 3, 5, true, |_, _| true);
    let (shape, rotation, kick) = result.unwrap();
    assert_eq!(rotation, Rotation::East);
    assert_eq!(kick, (0, 0));
    assert_eq!(shape, get_shape(PieceKind::T, Rotation::East));

    let (_, ccw, _) = try_rotate(PieceKind::T, Rotation::North, 3, 5, false, |_, _| true).unwrap();
    assert_eq!(ccw, Rotation::West);
}

#[test]
fn test_rotate_against_left_wall_kicks_right() {
    // I vertical (West) flush with the left wall; horizontal needs a kick.
    let in_bounds = |x: i8, _y: i8| (0..BOARD_COLS as i8).contains(&x);
    let (_, rotation, kick) =
        try_rotate(PieceKind::I, Rotation::West, -1, 5, false, in_bounds).unwrap();
    assert_eq!(rotation, Rotation::South);
    assert!(kick.0 > 0);
}

#[test]
fn test_o_piece_never_rotates() {
    assert!(try_rotate(PieceKind::O, Rotation::North, 3, 3, true, |_, _| true).is_none());
    assert!(get_kick_offsets(PieceKind::O, Rotation::North, Rotation::East).is_empty());
}

#[test]
fn test_half_turns_have_no_kicks() {
    for kind in PieceKind::ALL {
        assert!(get_kick_offsets(kind, Rotation::North, Rotation::South).is_empty());
        assert!(get_kick_offsets(kind, Rotation::East, Rotation::West).is_empty());
    }
}

#[test]
fn test_blocked_rotation_returns_none() {
    assert!(try_rotate(PieceKind::J, Rotation::North, 3, 5, true, |_, _| false).is_none());
}
