//! Simulation module - the game state machine
//!
//! Ties together the board, pieces, bag queue, scoring and the best-score
//! store. It is driven by a single [`Simulation::update`] call per frame with
//! the elapsed milliseconds and that frame's [`Intents`]; every mutation of the
//! game happens inside that call or one of the public transition operations.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::board::Board;
use crate::pieces::{try_rotate, Piece};
use crate::rng::PieceQueue;
use crate::scoring::{drop_score, fall_interval_ms, level_for_lines, line_clear_score};
use crate::snapshot::GameSnapshot;
use crate::store::BestScoreStore;
use crate::types::{Intents, Phase, PieceKind, BEST_SCORE_KEY};

/// Phase with its per-phase payload.
///
/// The gravity accumulator only exists while the clock can run (or is
/// frozen mid-game), so `Ready` and `Over` cannot carry a stale timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhaseState {
    Ready,
    Running { gravity_ms: u32 },
    Paused { gravity_ms: u32 },
    Over,
}

impl PhaseState {
    fn phase(&self) -> Phase {
        match self {
            PhaseState::Ready => Phase::Ready,
            PhaseState::Running { .. } => Phase::Running,
            PhaseState::Paused { .. } => Phase::Paused,
            PhaseState::Over => Phase::Over,
        }
    }

    fn gravity_ms(&self) -> Option<u32> {
        match *self {
            PhaseState::Running { gravity_ms } | PhaseState::Paused { gravity_ms } => {
                Some(gravity_ms)
            }
            PhaseState::Ready | PhaseState::Over => None,
        }
    }
}

/// Complete game state
#[derive(Debug)]
pub struct Simulation<S, R = StdRng> {
    board: Board,
    active: Piece,
    queue: PieceQueue<R>,
    score: u32,
    lines: u32,
    level: u32,
    fall_interval_ms: u32,
    best: u32,
    phase: PhaseState,
    store: S,
}

impl<S: BestScoreStore> Simulation<S> {
    /// New game in phase `ready`, bag order seeded from OS entropy.
    pub fn new(store: S) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    /// New game whose piece sequence is fully determined by `seed`.
    pub fn with_seed(store: S, seed: u64) -> Self {
        Self::with_rng(store, StdRng::seed_from_u64(seed))
    }
}

impl<S: BestScoreStore, R: RngCore> Simulation<S, R> {
    /// New game in phase `ready` with the first piece already spawned.
    pub fn with_rng(store: S, rng: R) -> Self {
        let queue = PieceQueue::new(rng);
        let best = store.get(BEST_SCORE_KEY);
        let mut sim = Self {
            board: Board::new(),
            active: Piece::spawn(queue.peek()),
            queue,
            score: 0,
            lines: 0,
            level: 1,
            fall_interval_ms: fall_interval_ms(1),
            best,
            phase: PhaseState::Ready,
            store,
        };
        sim.spawn();
        sim
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &Piece {
        &self.active
    }

    /// Kind shown in the next-piece preview.
    pub fn next(&self) -> PieceKind {
        self.queue.peek()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn phase(&self) -> Phase {
        self.phase.phase()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, PhaseState::Running { .. })
    }

    /// Current gravity interval in milliseconds.
    pub fn fall_interval_ms(&self) -> u32 {
        self.fall_interval_ms
    }

    /// Accumulated gravity time, if the game has a running or paused clock.
    pub fn gravity_ms(&self) -> Option<u32> {
        self.phase.gravity_ms()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Row the active piece would come to rest on if dropped now.
    pub fn ghost_y(&self) -> i8 {
        let mut dy: i8 = 0;
        while !self.board.collides(&self.active, 0, dy + 1, None) {
            dy += 1;
        }
        self.active.y + dy
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);
        out.active = self.active;
        out.ghost_y = match self.phase {
            PhaseState::Over => None,
            _ => Some(self.ghost_y()),
        };
        out.next = self.queue.peek();
        out.score = self.score;
        out.lines = self.lines;
        out.level = self.level;
        out.best = self.best;
        out.phase = self.phase.phase();
        out.fall_interval_ms = self.fall_interval_ms;
        out.gravity_ms = self.phase.gravity_ms();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Advance one frame.
    ///
    /// Precedence within a call: `over` ignores everything; `restart` resets
    /// into `running` and ends the frame; `pause_toggle`; `ready` only honors
    /// `start`; then moves, rotation, hard drop, held soft drop and gravity.
    pub fn update(&mut self, dt_ms: u32, intents: Intents) {
        if self.phase == PhaseState::Over {
            return;
        }

        if intents.restart {
            self.restart();
            return;
        }

        if intents.pause_toggle {
            self.pause_toggle();
        }

        if self.phase == PhaseState::Ready {
            if intents.start {
                self.start();
            }
            return;
        }

        if !self.is_running() {
            return;
        }

        if intents.move_left {
            self.move_horizontal(-1);
        }
        if intents.move_right {
            self.move_horizontal(1);
        }
        if intents.rotate_cw {
            self.rotate_cw();
        }
        if intents.hard_drop {
            self.hard_drop();
        }

        // Held soft drop slides to rest but never locks on its own.
        if intents.soft_drop_active && self.is_running() {
            while self.soft_drop_step(true) {}
        }

        self.advance_gravity(dt_ms);
    }

    fn advance_gravity(&mut self, dt_ms: u32) {
        let interval = self.fall_interval_ms;
        let due = match &mut self.phase {
            PhaseState::Running { gravity_ms } => {
                *gravity_ms = gravity_ms.saturating_add(dt_ms);
                if *gravity_ms >= interval {
                    *gravity_ms = 0;
                    true
                } else {
                    false
                }
            }
            _ => false,
        };

        if due && !self.soft_drop_step(false) {
            self.lock_piece();
        }
    }

    /// Start or resume the clock.
    ///
    /// `ready` starts with a zeroed gravity timer and `paused` resumes with the
    /// timer it froze. From `over` the game is reset first, so the stale
    /// overlapping piece never comes back to life.
    pub fn start(&mut self) {
        match self.phase {
            PhaseState::Ready => {
                log::info!("game started");
                self.phase = PhaseState::Running { gravity_ms: 0 };
            }
            PhaseState::Over => self.restart(),
            PhaseState::Paused { gravity_ms } => {
                self.phase = PhaseState::Running { gravity_ms };
            }
            PhaseState::Running { .. } => {}
        }
    }

    /// Toggle between `running` and `paused`; no effect otherwise.
    pub fn pause_toggle(&mut self) {
        self.phase = match self.phase {
            PhaseState::Running { gravity_ms } => PhaseState::Paused { gravity_ms },
            PhaseState::Paused { gravity_ms } => PhaseState::Running { gravity_ms },
            other => other,
        };
    }

    /// Pause if running (used on focus loss); idempotent.
    pub fn pause(&mut self) {
        if let PhaseState::Running { gravity_ms } = self.phase {
            self.phase = PhaseState::Paused { gravity_ms };
        }
    }

    /// Reinitialize everything except the persisted best score and return to
    /// `ready` with a new piece.
    pub fn reset(&mut self) {
        self.board.clear();
        self.score = 0;
        self.lines = 0;
        self.level = 1;
        self.fall_interval_ms = fall_interval_ms(self.level);
        self.best = self.store.get(BEST_SCORE_KEY);
        self.queue.reset();
        self.phase = PhaseState::Ready;
        self.spawn();
        log::info!("game reset, best score {}", self.best);
    }

    /// Reset and go straight to `running`.
    pub fn restart(&mut self) {
        self.reset();
        if self.phase == PhaseState::Ready {
            self.phase = PhaseState::Running { gravity_ms: 0 };
        }
    }

    /// Make the on-deck kind the active piece at the spawn position.
    ///
    /// A piece that overlaps the stack the moment it appears ends the game.
    pub fn spawn(&mut self) {
        let kind = self.queue.advance();
        self.active = Piece::spawn(kind);

        if self.board.collides(&self.active, 0, 0, None) {
            log::info!(
                "block out: {} spawned into the stack (score {}, lines {})",
                kind.as_str(),
                self.score,
                self.lines
            );
            self.phase = PhaseState::Over;
            self.refresh_best();
            self.store.flush();
        }
    }

    /// Commit the active piece, clear rows, score, then spawn the next piece.
    pub fn lock_piece(&mut self) {
        self.board.lock(&self.active);
        let cleared = self.board.clear_full_rows();

        if cleared > 0 {
            self.score = self.score.saturating_add(line_clear_score(cleared));
            self.lines = self.lines.saturating_add(cleared as u32);

            let level = level_for_lines(self.lines);
            if level != self.level {
                self.level = level;
                self.fall_interval_ms = fall_interval_ms(level);
                log::info!(
                    "level {} reached, fall interval {}ms",
                    level,
                    self.fall_interval_ms
                );
            }

            self.refresh_best();
        }

        log::debug!(
            "locked {} at ({}, {}), cleared {}",
            self.active.kind.as_str(),
            self.active.x,
            self.active.y,
            cleared
        );

        self.spawn();
        self.store.flush();
    }

    /// Drop straight to rest and lock, 2 points per row travelled.
    ///
    /// Only acts while running. Returns the distance dropped.
    pub fn hard_drop(&mut self) -> u32 {
        if !self.is_running() {
            return 0;
        }

        let mut distance: u32 = 0;
        while !self.board.collides(&self.active, 0, 1, None) {
            self.active.y += 1;
            distance += 1;
        }

        if distance > 0 {
            self.score = self.score.saturating_add(drop_score(distance, true));
            self.refresh_best();
        }

        self.lock_piece();
        distance
    }

    /// Move down one row if free. A manual step that moves scores 1 point.
    ///
    /// Never locks; gravity or a hard drop does that.
    pub fn soft_drop_step(&mut self, manual: bool) -> bool {
        if self.board.collides(&self.active, 0, 1, None) {
            return false;
        }

        self.active.y += 1;
        if manual {
            self.score = self.score.saturating_add(drop_score(1, false));
            self.refresh_best();
        }
        true
    }

    /// Shift horizontally by `dx` if the destination is free. Only while running.
    pub fn move_horizontal(&mut self, dx: i8) -> bool {
        if !self.is_running() || self.board.collides(&self.active, dx, 0, None) {
            return false;
        }
        self.active.x += dx;
        true
    }

    /// Rotate clockwise with wall kicks. Only while running.
    ///
    /// Shape, position and rotation index change together or not at all.
    pub fn rotate_cw(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }

        let board = &self.board;
        let active = &self.active;
        let result = try_rotate(&active.shape, |candidate, dx, dy| {
            board.collides(active, dx, dy, Some(candidate))
        });

        match result {
            Some((shape, (dx, dy))) => {
                self.active.shape = shape;
                self.active.x += dx;
                self.active.y += dy;
                self.active.rotation = (self.active.rotation + 1) % 4;
                true
            }
            None => false,
        }
    }

    fn refresh_best(&mut self) {
        if self.score > self.best {
            self.best = self.score;
            self.store.set(BEST_SCORE_KEY, self.best);
        }
    }
}
