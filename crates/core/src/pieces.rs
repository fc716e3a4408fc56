//! Pieces module - canonical shapes, clockwise rotation and wall kicks
//!
//! Shapes are square 0/1 bitmasks (2x2 for O, 3x3 for T/S/Z/J/L, 4x4 for I)
//! stored in a fixed 4x4 grid. The canonical tables are `const` and never
//! mutated: an active piece always owns its own copy, and rotation produces a
//! new value.
//!
//! Rotation uses a single simplified kick list shared by every piece rather
//! than per-state SRS tables.

use arrayvec::ArrayVec;

use crate::types::{PieceKind, COLS, MAX_SHAPE_SIZE};

/// Offset of a single mino relative to the piece origin: (column, row)
pub type MinoOffset = (i8, i8);

/// Kick offsets tried in priority order when rotating.
///
/// Horizontal kicks come first; the single upward kick `(0, -1)` is only tried
/// after the one-column kicks fail.
pub const WALL_KICKS: [MinoOffset; 6] = [(0, 0), (1, 0), (-1, 0), (0, -1), (2, 0), (-2, 0)];

/// Square bitmask shape of size N (N <= 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    size: u8,
    rows: [[u8; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    const fn new(size: u8, rows: [[u8; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE]) -> Self {
        Self { size, rows }
    }

    /// Side length of the bounding square.
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Filled cells as (column, row) offsets, row-major.
    pub fn minos(&self) -> ArrayVec<MinoOffset, 16> {
        let n = self.size as usize;
        let mut out = ArrayVec::new();
        for row in 0..n {
            for col in 0..n {
                if self.rows[row][col] != 0 {
                    out.push((col as i8, row as i8));
                }
            }
        }
        out
    }

    /// Rotate 90 degrees clockwise: `new[c][n-1-r] = old[r][c]`.
    pub fn rotate_cw(&self) -> Self {
        let n = self.size as usize;
        let mut rows = [[0u8; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for r in 0..n {
            for c in 0..n {
                rows[c][n - 1 - r] = self.rows[r][c];
            }
        }
        Self {
            size: self.size,
            rows,
        }
    }
}

const I_SHAPE: Shape = Shape::new(
    4,
    [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]],
);

const O_SHAPE: Shape = Shape::new(
    2,
    [[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);

const T_SHAPE: Shape = Shape::new(
    3,
    [[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);

const S_SHAPE: Shape = Shape::new(
    3,
    [[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);

const Z_SHAPE: Shape = Shape::new(
    3,
    [[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);

const J_SHAPE: Shape = Shape::new(
    3,
    [[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);

const L_SHAPE: Shape = Shape::new(
    3,
    [[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);

/// Canonical (spawn orientation) shape for a piece kind
pub fn canonical_shape(kind: PieceKind) -> &'static Shape {
    match kind {
        PieceKind::I => &I_SHAPE,
        PieceKind::O => &O_SHAPE,
        PieceKind::T => &T_SHAPE,
        PieceKind::S => &S_SHAPE,
        PieceKind::Z => &Z_SHAPE,
        PieceKind::J => &J_SHAPE,
        PieceKind::L => &L_SHAPE,
    }
}

/// Rotate a shape clockwise (free-function form of [`Shape::rotate_cw`]).
pub fn rotate_clockwise(shape: &Shape) -> Shape {
    shape.rotate_cw()
}

/// Try to rotate `shape` clockwise, testing each kick in [`WALL_KICKS`] order.
///
/// `collides(candidate, dx, dy)` must report whether the rotated shape would
/// collide when the piece is translated by `(dx, dy)`.
///
/// Returns the rotated shape and the accepted kick, or `None` when every kick
/// is blocked.
pub fn try_rotate<F>(shape: &Shape, mut collides: F) -> Option<(Shape, MinoOffset)>
where
    F: FnMut(&Shape, i8, i8) -> bool,
{
    let rotated = shape.rotate_cw();
    WALL_KICKS
        .iter()
        .copied()
        .find(|&(dx, dy)| !collides(&rotated, dx, dy))
        .map(|kick| (rotated, kick))
}

/// Active falling piece
///
/// `shape` is an owned copy; rotating it never touches the canonical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    /// Column of the bounding square's top-left corner
    pub x: i8,
    /// Row of the bounding square's top-left corner
    pub y: i8,
    /// Number of clockwise quarter turns applied, mod 4
    pub rotation: u8,
    pub shape: Shape,
}

impl Piece {
    /// Create a piece at the spawn position: horizontally centered, top of
    /// the hidden buffer, spawn orientation.
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = *canonical_shape(kind);
        let size = shape.size() as i8;
        let x = (COLS as i8) / 2 - (size + 1) / 2;
        Self {
            kind,
            x,
            y: 0,
            rotation: 0,
            shape,
        }
    }

    /// Absolute board cells covered by the piece.
    pub fn cells(&self) -> ArrayVec<(i8, i8), 16> {
        self.shape
            .minos()
            .iter()
            .map(|&(dx, dy)| (self.x + dx, self.y + dy))
            .collect()
    }
}
