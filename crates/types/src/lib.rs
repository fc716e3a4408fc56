//! Core types module - shared data structures and constants
//!
//! Everything here is plain data with no dependencies, so it can be used by the
//! simulation, the terminal presenter and the input source alike.
//!
//! # Board Dimensions
//!
//! The playfield is 10 columns wide and 22 rows tall. The top two rows are a
//! hidden spawn buffer; only the bottom 20 are drawn.
//!
//! - **Columns**: 10 (indexed 0-9, left to right)
//! - **Rows**: 22 (indexed 0-21, top to bottom; rows 0-1 hidden)
//!
//! # Gravity by Level
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_FALL_MS` | 1000 | Fall interval at level 1 |
//! | `FALL_STEP_MS` | 70 | Interval reduction per level |
//! | `MIN_FALL_MS` | 60 | Fastest possible interval |
//! | `LINES_PER_LEVEL` | 10 | Cleared lines needed per level |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{PieceKind, Phase, COLS, ROWS, VISIBLE_ROWS, HIDDEN_ROWS};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(PieceKind::T.as_str(), "t");
//! assert_eq!(Phase::Running.as_str(), "running");
//!
//! assert_eq!(COLS, 10);
//! assert_eq!(ROWS, VISIBLE_ROWS + HIDDEN_ROWS);
//! ```

/// Board width in cells (10 columns)
pub const COLS: u8 = 10;

/// Rows drawn by the presenter (20 rows)
pub const VISIBLE_ROWS: u8 = 20;

/// Spawn buffer above the visible area (2 rows)
pub const HIDDEN_ROWS: u8 = 2;

/// Total board height in cells (22 rows)
pub const ROWS: u8 = VISIBLE_ROWS + HIDDEN_ROWS;

/// Largest canonical shape dimension (the I piece is 4x4)
pub const MAX_SHAPE_SIZE: usize = 4;

/// Fall interval at level 1 (1000ms = 1 second per row)
pub const BASE_FALL_MS: u32 = 1000;

/// Fall interval reduction per level gained
pub const FALL_STEP_MS: u32 = 70;

/// Fastest fall interval reachable at high levels
pub const MIN_FALL_MS: u32 = 60;

/// Cumulative cleared lines per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Points awarded for clearing N rows at once (index 0 unused)
pub const SCORE_PER_LINE: [u32; 5] = [0, 100, 300, 500, 800];

/// Points per row travelled by a hard drop
pub const HARD_DROP_POINTS_PER_ROW: u32 = 2;

/// Points per row travelled by a manual soft drop
pub const SOFT_DROP_POINTS_PER_ROW: u32 = 1;

/// Best-score store key
pub const BEST_SCORE_KEY: &str = "tetris_best";

/// A queue refill is triggered whenever fewer than this many types remain
pub const BAG_SIZE: usize = 7;

/// The seven piece types
///
/// The type is a color tag only once a piece is locked into the board; no
/// behavior depends on it beyond the choice of canonical shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All seven kinds in canonical order (the unshuffled bag).
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Display color as a `#rrggbb` hex string.
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.color(), "#34d399");
    /// ```
    pub fn color(&self) -> &'static str {
        match self {
            PieceKind::I => "#34d399",
            PieceKind::O => "#fbbf24",
            PieceKind::T => "#a78bfa",
            PieceKind::S => "#22d3ee",
            PieceKind::Z => "#f87171",
            PieceKind::J => "#60a5fa",
            PieceKind::L => "#fb923c",
        }
    }

    /// Display color as an `(r, g, b)` triple, matching [`PieceKind::color`].
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            PieceKind::I => (0x34, 0xd3, 0x99),
            PieceKind::O => (0xfb, 0xbf, 0x24),
            PieceKind::T => (0xa7, 0x8b, 0xfa),
            PieceKind::S => (0x22, 0xd3, 0xee),
            PieceKind::Z => (0xf8, 0x71, 0x71),
            PieceKind::J => (0x60, 0xa5, 0xfa),
            PieceKind::L => (0xfb, 0x92, 0x3c),
        }
    }
}

/// Game phase as seen by readers of the simulation
///
/// - **Ready**: piece spawned, clock not running
/// - **Running**: gravity and inputs active
/// - **Paused**: frozen until toggled back
/// - **Over**: a freshly spawned piece overlapped the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Ready,
    Running,
    Paused,
    Over,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Ready => "ready",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::Over => "over",
        }
    }
}

/// One frame's worth of player intent
///
/// Every field except `soft_drop_active` is a one-shot flag meaning "this
/// happened since the previous frame". `soft_drop_active` is level-triggered
/// and stays set for as long as the soft-drop key is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Intents {
    pub move_left: bool,
    pub move_right: bool,
    pub rotate_cw: bool,
    pub hard_drop: bool,
    pub pause_toggle: bool,
    pub restart: bool,
    pub start: bool,
    pub soft_drop_active: bool,
}

impl Intents {
    /// True when no intent is set.
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a locked piece of that kind
pub type Cell = Option<PieceKind>;
