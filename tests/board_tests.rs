//! Board tests - split field storage and owner mapping

use tui_fliptris::core::board::CoordinateMapper;
use tui_fliptris::core::Board;
use tui_fliptris::types::{Half, Owner, PieceKind, BOARD_COLS, BOARD_ROWS, GARBAGE_CELL, HALF_ROWS};

fn fill_row(board: &mut Board, owner: Owner, local: u8, hole: Option<i8>) {
    for x in 0..BOARD_COLS as i8 {
        let value = if Some(x) == hole { 0 } else { PieceKind::T.id() };
        board.set_cell_for_owner(owner, local, x, value);
    }
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert!(!board.is_flipped());
    assert_eq!(board.active_owner(), Owner::A);
    for owner in Owner::ALL {
        assert!(board.is_owner_empty(owner));
        assert_eq!(board.stack_height(owner), 0);
        for local in 0..HALF_ROWS {
            for x in 0..BOARD_COLS as i8 {
                assert!(!board.is_filled(owner, local, x));
            }
        }
    }
}

#[test]
fn test_board_out_of_bounds() {
    let mut board = Board::new();
    assert_eq!(board.get_cell_for_owner(Owner::A, HALF_ROWS, 0), None);
    assert_eq!(board.get_cell_for_owner(Owner::A, 0, -1), None);
    assert_eq!(board.get_cell_for_owner(Owner::B, 0, BOARD_COLS as i8), None);

    assert!(!board.set_cell_for_owner(Owner::A, HALF_ROWS, 0, 1));
    assert!(!board.set_cell_for_owner(Owner::B, 0, -1, 1));
    assert!(board.is_owner_empty(Owner::A));
    assert!(board.is_owner_empty(Owner::B));

    assert_eq!(board.raw_cell(0, BOARD_ROWS), None);
}

#[test]
fn test_center_rows_are_local_zero() {
    let board = Board::new();
    assert_eq!(board.map_local_to_row(Owner::A, 0), Some(HALF_ROWS - 1));
    assert_eq!(board.map_local_to_row(Owner::B, 0), Some(HALF_ROWS));
    assert_eq!(board.map_local_to_row(Owner::A, HALF_ROWS - 1), Some(0));
    assert_eq!(board.map_local_to_row(Owner::B, HALF_ROWS - 1), Some(BOARD_ROWS - 1));
    assert_eq!(board.map_local_to_row(Owner::A, HALF_ROWS), None);
}

#[test]
fn test_flip_changes_view_not_data() {
    let mut board = Board::new();
    board.set_cell_for_owner(Owner::A, 3, 4, PieceKind::L.id());
    let before = board.raw_cell(4, HALF_ROWS - 1 - 3).unwrap();
    assert_eq!(before.owner, Some(Owner::A));

    board.flip();
    assert_eq!(board.active_owner(), Owner::B);
    assert!(board.is_filled(Owner::A, 3, 4));
    let after = board.raw_cell(4, HALF_ROWS + 3).unwrap();
    assert_eq!(after, before);
    assert!(board.raw_cell(4, HALF_ROWS - 1 - 3).unwrap().is_empty());

    board.flip();
    assert_eq!(board.raw_cell(4, HALF_ROWS - 1 - 3).unwrap(), before);
}

#[test]
fn test_mapper_halves_follow_flip() {
    let normal = CoordinateMapper::new(false);
    let flipped = CoordinateMapper::new(true);
    assert_eq!(normal.owner_of(Half::Top), Owner::A);
    assert_eq!(flipped.owner_of(Half::Top), Owner::B);
    assert_eq!(flipped.half_of(Owner::A), Half::Bottom);

    for row in 0..BOARD_ROWS {
        let (owner, local) = flipped.row_to_local(row).unwrap();
        assert_eq!(flipped.local_to_row(owner, local), Some(row));
    }
}

#[test]
fn test_depth_rows_mirror_across_center() {
    assert_eq!(CoordinateMapper::depth_to_row(Half::Top, 0), Some(0));
    assert_eq!(CoordinateMapper::depth_to_row(Half::Bottom, 0), Some(BOARD_ROWS - 1));
    assert_eq!(CoordinateMapper::depth_to_row(Half::Top, 19), Some(19));
    assert_eq!(CoordinateMapper::depth_to_row(Half::Bottom, 19), Some(20));
    assert_eq!(CoordinateMapper::depth_to_row(Half::Top, -1), None);
    assert!(CoordinateMapper::in_frame(0, -4));
    assert!(!CoordinateMapper::in_frame(0, -5));
    assert!(!CoordinateMapper::in_frame(0, HALF_ROWS as i8));
}

#[test]
fn test_clear_any_subset_in_any_order() {
    let mut board = Board::new();
    for local in 0..6 {
        fill_row(&mut board, Owner::B, local, None);
    }
    // Markers survive on rows 1, 3 and 5.
    board.set_cell_for_owner(Owner::B, 1, 0, 0);
    board.set_cell_for_owner(Owner::B, 3, 1, 0);
    board.set_cell_for_owner(Owner::B, 5, 2, 0);

    let removed = board.clear_lines_for_owner(Owner::B, &[4, 0, 2, 2, 99]);
    assert_eq!(removed, 3);
    assert!(!board.is_filled(Owner::B, 0, 0));
    assert!(!board.is_filled(Owner::B, 1, 1));
    assert!(!board.is_filled(Owner::B, 2, 2));
    assert_eq!(board.stack_height(Owner::B), 3);
    assert!(board.is_owner_empty(Owner::A));
}

#[test]
fn test_find_clear_lines_scans_outer_edge_first() {
    let mut board = Board::new();
    fill_row(&mut board, Owner::A, 0, None);
    fill_row(&mut board, Owner::A, 1, Some(5));
    fill_row(&mut board, Owner::A, 7, None);

    assert_eq!(board.find_clear_lines_for_owner(Owner::A).as_slice(), &[7u8, 0][..]);
    assert!(board.find_clear_lines_for_owner(Owner::B).is_empty());
}

#[test]
fn test_remove_bottom_rows_skips_empty_rows() {
    let mut board = Board::new();
    fill_row(&mut board, Owner::A, 0, Some(0));
    fill_row(&mut board, Owner::A, 4, Some(0));
    fill_row(&mut board, Owner::A, 9, Some(0));

    assert_eq!(board.remove_bottom_rows_for_owner(Owner::A, 2), 2);
    assert_eq!(board.stack_height(Owner::A), 1);
    assert_eq!(board.remove_bottom_rows_for_owner(Owner::A, 4), 1);
    assert!(board.is_owner_empty(Owner::A));
}

#[test]
fn test_garbage_detection() {
    let mut board = Board::new();
    assert!(!board.has_remaining_garbage());
    board.set_cell_for_owner(Owner::B, 0, 0, GARBAGE_CELL);
    assert!(board.has_remaining_garbage());
    assert_eq!(board.filled_count(Owner::B), 1);
    board.clear();
    assert!(!board.has_remaining_garbage());
}
