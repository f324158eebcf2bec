//! Pieces module - Tetromino shapes and SRS rotation system
//!
//! Shapes and kicks are expressed in a piece's *gravity frame*: `x` grows to the
//! right, `y` grows along gravity. The same tables therefore serve a piece falling
//! down the top half and a piece falling up the bottom half; the board mirrors
//! the frame when it maps cells to raw rows.
//!
//! Reference: https://tetris.wiki/SRS (kick offsets converted to y-along-gravity)

use crate::types::{PieceKind, Rotation, BOARD_COLS};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// A piece in its gravity frame
///
/// `y` is the depth of the piece origin: 0 is the outer edge of the half,
/// negative values are inside the spawn buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Create a piece at its spawn position, flush against the outer edge
    pub fn spawn(kind: PieceKind) -> Self {
        let (x, y) = spawn_position(kind);
        Self {
            kind,
            rotation: Rotation::North,
            x,
            y,
        }
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute frame cells occupied by this piece
    pub fn blocks(&self) -> PieceShape {
        self.blocks_at(0, 0, self.rotation)
    }

    /// Absolute frame cells after applying an offset and rotation, without mutating
    pub fn blocks_at(&self, dx: i8, dy: i8, rotation: Rotation) -> PieceShape {
        let mut out = get_shape(self.kind, rotation);
        for cell in &mut out {
            cell.0 += self.x + dx;
            cell.1 += self.y + dy;
        }
        out
    }

    /// Depth of the outermost (smallest y) block
    pub fn top_depth(&self) -> i8 {
        self.blocks().iter().map(|&(_, y)| y).min().unwrap_or(self.y)
    }

    pub fn moved(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::I => get_i_shape(rotation),
        PieceKind::O => get_o_shape(rotation),
        PieceKind::T => get_t_shape(rotation),
        PieceKind::S => get_s_shape(rotation),
        PieceKind::Z => get_z_shape(rotation),
        PieceKind::J => get_j_shape(rotation),
        PieceKind::L => get_l_shape(rotation),
    }
}

/// I piece shapes
fn get_i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
        Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
        Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
    }
}

/// O piece shapes (same for all rotations)
fn get_o_shape(_rotation: Rotation) -> PieceShape {
    [(1, 0), (2, 0), (1, 1), (2, 1)]
}

fn get_t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn get_s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn get_z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

fn get_j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

fn get_l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// Kick candidates for one rotation transition, tried in order
pub type KickList = &'static [(i8, i8)];

/// Kick tables indexed `[from][to]` by rotation index
pub type KickTable = [[KickList; 4]; 4];

const NONE: KickList = &[];

const JLSTZ_0_1: KickList = &[(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)];
const JLSTZ_1_0: KickList = &[(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)];
const JLSTZ_2_3: KickList = &[(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)];
const JLSTZ_3_2: KickList = &[(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)];

const I_0_1: KickList = &[(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)];
const I_1_0: KickList = &[(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)];
const I_1_2: KickList = &[(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)];
const I_2_1: KickList = &[(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)];

/// JLSTZ kick table (shared by J, L, S, T, Z)
const JLSTZ_KICKS: KickTable = [
    // from North
    [NONE, JLSTZ_0_1, NONE, JLSTZ_2_3],
    // from East
    [JLSTZ_1_0, NONE, JLSTZ_1_0, NONE],
    // from South
    [NONE, JLSTZ_0_1, NONE, JLSTZ_2_3],
    // from West
    [JLSTZ_3_2, NONE, JLSTZ_3_2, NONE],
];

/// I piece kick table (different from JLSTZ)
const I_KICKS: KickTable = [
    [NONE, I_0_1, NONE, I_1_2],
    [I_1_0, NONE, I_1_2, NONE],
    [NONE, I_2_1, NONE, I_1_0],
    [I_2_1, NONE, I_0_1, NONE],
];

/// O never rotates
const O_KICKS: KickTable = [[NONE; 4]; 4];

/// Get kick table for a piece kind
pub fn get_kick_table(kind: PieceKind) -> &'static KickTable {
    match kind {
        PieceKind::O => &O_KICKS,
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    }
}

/// Ordered kick candidates for a transition; empty means the rotation is not allowed
pub fn get_kick_offsets(kind: PieceKind, from: Rotation, to: Rotation) -> KickList {
    get_kick_table(kind)[from.index()][to.index()]
}

/// Try to rotate a piece with wall kicks
/// Returns Some(new_shape, new_rotation, kick_offset) if successful, None if all kicks fail
pub fn try_rotate(
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
    clockwise: bool,
    is_valid: impl Fn(i8, i8) -> bool,
) -> Option<(PieceShape, Rotation, (i8, i8))> {
    let new_rotation = if clockwise {
        rotation.rotate_cw()
    } else {
        rotation.rotate_ccw()
    };

    let new_shape = get_shape(kind, new_rotation);

    for &(dx, dy) in get_kick_offsets(kind, rotation, new_rotation) {
        let new_x = x + dx;
        let new_y = y + dy;

        let valid = new_shape
            .iter()
            .all(|&(mx, my)| is_valid(new_x + mx, new_y + my));

        if valid {
            return Some((new_shape, new_rotation, (dx, dy)));
        }
    }

    None
}

/// Spawn origin for a kind: centered, with the outermost block on depth 0
pub fn spawn_position(kind: PieceKind) -> (i8, i8) {
    let shape = get_shape(kind, Rotation::North);
    let min_dy = shape.iter().map(|&(_, dy)| dy).min().unwrap_or(0);
    (((BOARD_COLS - 4) / 2) as i8, -min_dy)
}
