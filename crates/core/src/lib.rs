//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state transitions, and simulation
//! logic. It has no dependency on terminals, input devices, or the filesystem:
//! the only outside world it sees is the [`BestScoreStore`] seam and an
//! injected random source.
//!
//! - **Deterministic**: the same seed and the same `(dt, intents)` stream
//!   produce the same game
//! - **Frame-stepped**: one [`Simulation::update`] per rendered frame
//! - **Allocation-free hot path**: fixed arrays for the board and shapes
//!
//! # Module Structure
//!
//! - [`board`]: 10x22 grid (2 hidden rows) with collision, locking and line clears
//! - [`pieces`]: bitmask shapes, clockwise rotation and the shared kick list
//! - [`rng`]: 7-bag piece queue with a one-piece preview
//! - [`scoring`]: line-clear table, drop bonuses, level and gravity curve
//! - [`simulation`]: the phase state machine driven once per frame
//! - [`snapshot`]: copy of the state for presenters
//! - [`store`]: best-score persistence seam and an in-memory store
//!
//! # Rules
//!
//! - **7-Bag Randomizer**: every consecutive bag of seven is a permutation of all kinds
//! - **Simplified kicks**: `(0,0) (1,0) (-1,0) (0,-1) (2,0) (-2,0)` for every piece
//! - **Immediate lock**: a piece locks on the gravity step that finds it grounded
//! - **Block out**: a new piece that overlaps the stack ends the game
//! - **Scoring**: 100/300/500/800 per clear, 2 per hard-dropped row, 1 per soft-dropped row
//!
//! # Example
//!
//! ```
//! use blockfall_core::{MemoryStore, Simulation};
//! use blockfall_core::types::{Intents, Phase};
//!
//! let mut sim = Simulation::with_seed(MemoryStore::new(), 12345);
//! sim.update(16, Intents { start: true, ..Intents::default() });
//! assert_eq!(sim.phase(), Phase::Running);
//!
//! sim.update(16, Intents { hard_drop: true, ..Intents::default() });
//! assert!(sim.score() > 0);
//! ```

pub mod board;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod simulation;
pub mod snapshot;
pub mod store;

pub use blockfall_types as types;

pub use board::Board;
pub use pieces::{canonical_shape, rotate_clockwise, try_rotate, Piece, Shape, WALL_KICKS};
pub use rng::PieceQueue;
pub use scoring::{drop_score, fall_interval_ms, level_for_lines, line_clear_score};
pub use simulation::Simulation;
pub use snapshot::{GameSnapshot, Grid};
pub use store::{BestScoreStore, MemoryStore};
