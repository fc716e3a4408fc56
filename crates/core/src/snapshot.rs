use crate::pieces::Piece;
use crate::types::{Cell, Phase, PieceKind, COLS, ROWS};

/// Full board as a fixed 2D grid, row-major (`grid[y][x]`).
pub type Grid = [[Cell; COLS as usize]; ROWS as usize];

/// Point-in-time copy of everything a presenter may read.
///
/// Valid until the next `update`; holds no references into the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: Grid,
    pub active: Piece,
    /// Resting row of the active piece (render-only projection).
    pub ghost_y: Option<i8>,
    pub next: PieceKind,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub best: u32,
    pub phase: Phase,
    pub fall_interval_ms: u32,
    pub gravity_ms: Option<u32>,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.phase == Phase::Running
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; COLS as usize]; ROWS as usize],
            active: Piece::spawn(PieceKind::I),
            ghost_y: None,
            next: PieceKind::I,
            score: 0,
            lines: 0,
            level: 1,
            best: 0,
            phase: Phase::Ready,
            fall_interval_ms: 0,
            gravity_ms: None,
        }
    }
}
