#![warn(clippy::all, clippy::pedantic)]

// Play-field dimensions
pub const COLS: usize = 10;
pub const ROWS: usize = 20;

// Points per simultaneous clear, indexed by line count and multiplied by level
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

// Level progression
pub const LINES_PER_LEVEL: u32 = 10;
pub const STARTING_LEVEL: u32 = 1;

// Drop cadence in milliseconds
pub const BASE_DROP_INTERVAL_MS: u32 = 800;
pub const DROP_INTERVAL_STEP_MS: u32 = 100;
pub const MIN_DROP_INTERVAL_MS: u32 = 100;

/// Level for a cumulative cleared-line count.
#[must_use]
pub fn level_for_lines(lines: u32) -> u32 {
    lines / LINES_PER_LEVEL + STARTING_LEVEL
}

/// Milliseconds between automatic one-row steps for a cumulative cleared-line count.
#[must_use]
pub fn drop_interval_ms(lines: u32) -> u32 {
    let speedup = (lines / LINES_PER_LEVEL).saturating_mul(DROP_INTERVAL_STEP_MS);
    BASE_DROP_INTERVAL_MS
        .saturating_sub(speedup)
        .max(MIN_DROP_INTERVAL_MS)
}

/// Points for clearing `lines` rows at once while at `level`.
#[must_use]
pub fn line_clear_points(lines: usize, level: u32) -> u32 {
    LINE_SCORES
        .get(lines)
        .copied()
        .unwrap_or(LINE_SCORES[LINE_SCORES.len() - 1])
        .saturating_mul(level)
}
