//! Board module - manages the game grid
//!
//! The board is a 10x22 grid where each cell can be empty or hold the kind of
//! the piece that was locked there. Rows 0-1 are the hidden spawn buffer.
//! Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..21
//! (top to bottom).

use crate::pieces::{Piece, Shape};
use crate::types::{Cell, COLS, ROWS};

/// Total number of cells on the board
const BOARD_SIZE: usize = (COLS as usize) * (ROWS as usize);

/// The game board - 10 columns x 22 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * COLS + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= COLS as i8 || y < 0 || y >= ROWS as i8 {
            return None;
        }
        Some((y as usize) * (COLS as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        COLS
    }

    pub fn height(&self) -> u8 {
        ROWS
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| cell.is_some()))
            .unwrap_or(false)
    }

    /// Borrow one row, or `None` past the bottom.
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= ROWS as usize {
            return None;
        }
        let start = y * COLS as usize;
        Some(&self.cells[start..start + COLS as usize])
    }

    /// Iterate rows top to bottom. Always yields exactly `ROWS` rows of `COLS` cells.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(COLS as usize)
    }

    /// Whether translating `piece` by (dx, dy) would put a filled cell out of
    /// bounds or onto an occupied cell.
    ///
    /// `candidate` substitutes a different shape (used to pre-check rotations).
    /// Cells above the top edge (y < 0) only collide with the side walls, so a
    /// piece may poke out of the top while spawning.
    pub fn collides(&self, piece: &Piece, dx: i8, dy: i8, candidate: Option<&Shape>) -> bool {
        let shape = candidate.unwrap_or(&piece.shape);
        shape.minos().iter().any(|&(mx, my)| {
            let x = piece.x + mx + dx;
            let y = piece.y + my + dy;
            if x < 0 || x >= COLS as i8 || y >= ROWS as i8 {
                return true;
            }
            y >= 0 && self.is_occupied(x, y)
        })
    }

    /// Write the piece's kind into every cell it covers.
    ///
    /// Cells outside the board are discarded; returns how many were. Anything
    /// other than 0 means a position escaped the collision checks.
    pub fn lock(&mut self, piece: &Piece) -> usize {
        let mut clipped = 0;
        for (x, y) in piece.cells() {
            if !self.set(x, y, Some(piece.kind)) {
                clipped += 1;
            }
        }
        if clipped > 0 {
            log::error!(
                "locked {} piece at ({}, {}) with {} cell(s) outside the board",
                piece.kind.as_str(),
                piece.x,
                piece.y,
                clipped
            );
        }
        clipped
    }

    /// Clear all full rows and return how many were cleared.
    ///
    /// Rows above each cleared row shift down and empty rows fill in from the
    /// top, so adjacent and non-adjacent full rows are all handled in one pass.
    /// Uses a two-pointer compaction with zero allocation.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = COLS as usize;
        let mut cleared = 0;
        let mut write_y = ROWS as usize;

        // Scan from bottom to top
        for read_y in (0..ROWS as usize).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Clear the vacated rows at the top
        self.cells[..write_y * width].fill(None);

        cleared
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy into a fixed 2D grid (snapshot hot path, no allocation).
    pub fn write_grid(&self, out: &mut [[Cell; COLS as usize]; ROWS as usize]) {
        for (dst, src) in out.iter_mut().zip(self.rows()) {
            dst.copy_from_slice(src);
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
