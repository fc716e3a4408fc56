//! Scoring module - line-clear points, drop bonuses, level and gravity curve
//!
//! Level is a pure function of cumulative cleared lines and the fall interval
//! a pure function of level, so both can always be recomputed from `lines`.

use crate::types::{
    BASE_FALL_MS, FALL_STEP_MS, HARD_DROP_POINTS_PER_ROW, LINES_PER_LEVEL, MIN_FALL_MS,
    SCORE_PER_LINE, SOFT_DROP_POINTS_PER_ROW,
};

/// Points for clearing `rows` rows with a single lock.
///
/// Counts beyond the table saturate at the four-row value.
pub fn line_clear_score(rows: usize) -> u32 {
    SCORE_PER_LINE[rows.min(SCORE_PER_LINE.len() - 1)]
}

/// Points for a drop of `rows` rows.
pub fn drop_score(rows: u32, hard_drop: bool) -> u32 {
    let per_row = if hard_drop {
        HARD_DROP_POINTS_PER_ROW
    } else {
        SOFT_DROP_POINTS_PER_ROW
    };
    rows.saturating_mul(per_row)
}

/// `floor(lines / 10) + 1`
pub fn level_for_lines(lines: u32) -> u32 {
    lines / LINES_PER_LEVEL + 1
}

/// `max(1000 - (level - 1) * 70, 60)` milliseconds per gravity row.
pub fn fall_interval_ms(level: u32) -> u32 {
    let speedup = level.saturating_sub(1).saturating_mul(FALL_STEP_MS);
    BASE_FALL_MS.saturating_sub(speedup).max(MIN_FALL_MS)
}
