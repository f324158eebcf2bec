//! Board module - the dual-owner grid
//!
//! The raw grid is 10 columns by 40 rows, rows numbered top to bottom. It is split
//! into two 20-row halves; the top half belongs to the *active* owner and the bottom
//! half to the *inactive* owner. `flip()` swaps which owner is active without moving
//! any cell data.
//!
//! Each owner's stack is stored in **owner-local rows**: row 0 touches the shared
//! center and indices grow toward that owner's outer edge. Both stacks rest against
//! the center, so line clears compact toward it and freed rows appear at the edge.
//!
//! All translation between local rows, gravity-frame depths and raw rows goes
//! through [`CoordinateMapper`].

use arrayvec::ArrayVec;

use crate::rng::SimpleRng;
use crate::types::{Half, Owner, BOARD_COLS, BOARD_ROWS, GARBAGE_CELL, HALF_ROWS, SPAWN_BUFFER};

/// Columns as usize
pub const COLS: usize = BOARD_COLS as usize;

/// Rows per owner as usize
pub const HALF: usize = HALF_ROWS as usize;

/// Cells per owner
const HALF_SIZE: usize = COLS * HALF;

/// Raw grid as rendered, top row first
pub type RawGrid = [[u8; COLS]; BOARD_ROWS as usize];

/// A single board cell
///
/// `value == 0` is empty. Piece cells carry the piece id (1..=7), garbage carries
/// [`GARBAGE_CELL`]. `locked` always equals `value != 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub value: u8,
    pub owner: Option<Owner>,
    pub locked: bool,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        value: 0,
        owner: None,
        locked: false,
    };

    fn filled(value: u8, owner: Owner) -> Self {
        if value == 0 {
            return Self::EMPTY;
        }
        Cell {
            value,
            owner: Some(owner),
            locked: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value == 0
    }
}

/// Owner/half translation keyed by the flip flag
///
/// Frame depth `g` is the coordinate pieces fall along: 0 at the outer edge,
/// `HALF_ROWS - 1` at the center, negative inside the spawn buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateMapper {
    flipped: bool,
}

impl CoordinateMapper {
    pub fn new(flipped: bool) -> Self {
        Self { flipped }
    }

    pub fn active_owner(&self) -> Owner {
        if self.flipped {
            Owner::B
        } else {
            Owner::A
        }
    }

    pub fn inactive_owner(&self) -> Owner {
        self.active_owner().other()
    }

    /// Owner currently mapped to a screen half
    pub fn owner_of(&self, half: Half) -> Owner {
        match half {
            Half::Top => self.active_owner(),
            Half::Bottom => self.inactive_owner(),
        }
    }

    /// Screen half an owner currently occupies
    pub fn half_of(&self, owner: Owner) -> Half {
        if owner == self.active_owner() {
            Half::Top
        } else {
            Half::Bottom
        }
    }

    /// Raw row (top-down) of an owner-local row
    pub fn local_to_row(&self, owner: Owner, local: u8) -> Option<u8> {
        if local >= HALF_ROWS {
            return None;
        }
        Some(match self.half_of(owner) {
            Half::Top => HALF_ROWS - 1 - local,
            Half::Bottom => HALF_ROWS + local,
        })
    }

    /// Owner and local row of a raw row
    pub fn row_to_local(&self, row: u8) -> Option<(Owner, u8)> {
        if row >= BOARD_ROWS {
            return None;
        }
        if row < HALF_ROWS {
            Some((self.owner_of(Half::Top), HALF_ROWS - 1 - row))
        } else {
            Some((self.owner_of(Half::Bottom), row - HALF_ROWS))
        }
    }

    /// Local row of an in-grid frame depth (independent of the half)
    pub fn depth_to_local(depth: i8) -> Option<u8> {
        if depth < 0 || depth >= HALF_ROWS as i8 {
            return None;
        }
        Some(HALF_ROWS - 1 - depth as u8)
    }

    /// Raw row of a frame depth in the given half; `None` in the buffer or past the center
    pub fn depth_to_row(half: Half, depth: i8) -> Option<u8> {
        if depth < 0 || depth >= HALF_ROWS as i8 {
            return None;
        }
        let depth = depth as u8;
        Some(match half {
            Half::Top => depth,
            Half::Bottom => BOARD_ROWS - 1 - depth,
        })
    }

    /// Whether a frame position lies inside the playable volume (grid or spawn buffer)
    pub fn in_frame(x: i8, depth: i8) -> bool {
        x >= 0 && x < BOARD_COLS as i8 && depth >= -(SPAWN_BUFFER as i8) && depth < HALF_ROWS as i8
    }
}

/// The game board - two owner stacks in flat per-owner arrays
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Per-owner flat arrays, row-major over local rows (local * COLS + x)
    cells: [[Cell; HALF_SIZE]; 2],
    flipped: bool,
}

impl Board {
    /// Create a new empty, unflipped board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::EMPTY; HALF_SIZE]; 2],
            flipped: false,
        }
    }

    #[inline(always)]
    fn index(local: u8, x: i8) -> Option<usize> {
        if local >= HALF_ROWS || x < 0 || x >= BOARD_COLS as i8 {
            return None;
        }
        Some(local as usize * COLS + x as usize)
    }

    /// Toggle which owner is active. O(1), moves no cell data.
    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(self.flipped)
    }

    pub fn active_owner(&self) -> Owner {
        self.mapper().active_owner()
    }

    pub fn inactive_owner(&self) -> Owner {
        self.mapper().inactive_owner()
    }

    pub fn map_local_to_row(&self, owner: Owner, local: u8) -> Option<u8> {
        self.mapper().local_to_row(owner, local)
    }

    pub fn map_row_to_local(&self, row: u8) -> Option<(Owner, u8)> {
        self.mapper().row_to_local(row)
    }

    /// Bounds-checked read in owner-local coordinates
    pub fn get_cell_for_owner(&self, owner: Owner, local: u8, x: i8) -> Option<Cell> {
        Self::index(local, x).map(|idx| self.cells[owner.index()][idx])
    }

    /// Bounds-checked write; `value == 0` clears the cell
    /// Returns false if out of bounds
    pub fn set_cell_for_owner(&mut self, owner: Owner, local: u8, x: i8, value: u8) -> bool {
        match Self::index(local, x) {
            Some(idx) => {
                self.cells[owner.index()][idx] = Cell::filled(value, owner);
                true
            }
            None => false,
        }
    }

    /// Check if an owner-local cell is filled
    pub fn is_filled(&self, owner: Owner, local: u8, x: i8) -> bool {
        matches!(self.get_cell_for_owner(owner, local, x), Some(c) if !c.is_empty())
    }

    fn row(&self, owner: Owner, local: usize) -> &[Cell] {
        let start = local * COLS;
        &self.cells[owner.index()][start..start + COLS]
    }

    fn is_row_full(&self, owner: Owner, local: usize) -> bool {
        self.row(owner, local)
            .iter()
            .all(|c| c.value != 0 && c.owner == Some(owner))
    }

    fn is_row_empty(&self, owner: Owner, local: usize) -> bool {
        self.row(owner, local).iter().all(Cell::is_empty)
    }

    /// Local rows where every column is filled by this owner, scanning from the
    /// outer edge toward the center
    pub fn find_clear_lines_for_owner(&self, owner: Owner) -> ArrayVec<u8, HALF> {
        let mut rows = ArrayVec::new();
        for local in (0..HALF).rev() {
            if self.is_row_full(owner, local) {
                rows.push(local as u8);
            }
        }
        rows
    }

    /// Remove the given local rows and compact the rest toward the center
    ///
    /// Accepts any subset in any order; duplicates and out-of-range rows are ignored.
    /// Remaining rows keep their relative order. Returns the number of rows removed.
    pub fn clear_lines_for_owner(&mut self, owner: Owner, rows: &[u8]) -> usize {
        let mut remove = [false; HALF];
        for &r in rows {
            if (r as usize) < HALF {
                remove[r as usize] = true;
            }
        }

        let cells = &mut self.cells[owner.index()];
        let mut write = 0usize;
        for read in 0..HALF {
            if remove[read] {
                continue;
            }
            if write != read {
                cells.copy_within(read * COLS..(read + 1) * COLS, write * COLS);
            }
            write += 1;
        }

        let removed = HALF - write;
        for cell in &mut cells[write * COLS..] {
            *cell = Cell::EMPTY;
        }
        removed
    }

    /// Evict the `count` occupied rows nearest the owner's outer edge
    pub fn remove_bottom_rows_for_owner(&mut self, owner: Owner, count: usize) -> usize {
        let mut rows: ArrayVec<u8, HALF> = ArrayVec::new();
        for local in (0..HALF).rev() {
            if rows.len() == count {
                break;
            }
            if !self.is_row_empty(owner, local) {
                rows.push(local as u8);
            }
        }
        self.clear_lines_for_owner(owner, &rows)
    }

    /// Number of local rows from the center up to the outermost occupied row
    pub fn stack_height(&self, owner: Owner) -> u8 {
        (0..HALF)
            .rev()
            .find(|&local| !self.is_row_empty(owner, local))
            .map(|local| local as u8 + 1)
            .unwrap_or(0)
    }

    pub fn is_owner_empty(&self, owner: Owner) -> bool {
        self.cells[owner.index()].iter().all(Cell::is_empty)
    }

    pub fn filled_count(&self, owner: Owner) -> usize {
        self.cells[owner.index()]
            .iter()
            .filter(|c| !c.is_empty())
            .count()
    }

    /// Any garbage material left on either side
    pub fn has_remaining_garbage(&self) -> bool {
        self.cells
            .iter()
            .flat_map(|side| side.iter())
            .any(|c| c.value == GARBAGE_CELL)
    }

    /// Fill local rows `0..rows` with garbage, punctured by one random hole per row
    pub fn seed_garbage(&mut self, owner: Owner, rows: u8, rng: &mut SimpleRng) {
        for local in 0..rows.min(HALF_ROWS) {
            let hole = rng.next_range(BOARD_COLS as u32) as i8;
            for x in 0..BOARD_COLS as i8 {
                let value = if x == hole { 0 } else { GARBAGE_CELL };
                self.set_cell_for_owner(owner, local, x, value);
            }
        }
    }

    /// Cell at a raw grid position
    pub fn raw_cell(&self, x: i8, row: u8) -> Option<Cell> {
        let (owner, local) = self.map_row_to_local(row)?;
        self.get_cell_for_owner(owner, local, x)
    }

    /// Write cell values into a raw top-down grid
    pub fn write_raw_grid(&self, out: &mut RawGrid) {
        let mapper = self.mapper();
        for (row, line) in out.iter_mut().enumerate() {
            let Some((owner, local)) = mapper.row_to_local(row as u8) else {
                continue;
            };
            for (x, slot) in line.iter_mut().enumerate() {
                *slot = self.row(owner, local as usize)[x].value;
            }
        }
    }

    /// Clear both stacks and unflip
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Fill a local row except for the listed columns (for testing)
    #[cfg(test)]
    pub fn fill_row_for_owner(&mut self, owner: Owner, local: u8, holes: &[i8]) {
        for x in 0..BOARD_COLS as i8 {
            let value = if holes.contains(&x) { 0 } else { 1 };
            self.set_cell_for_owner(owner, local, x, value);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
