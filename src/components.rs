#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Board dimensions are small enough that usize <-> i32 casts never truncate
    clippy::cast_possible_truncation,
    // Coordinates are bounds-checked as non-negative before casting to usize
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;
use ratatui::style::Color;

use crate::game::{COLS, ROWS, drop_interval_ms, level_for_lines};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TetrominoType {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::J,
        TetrominoType::L,
        TetrominoType::O,
        TetrominoType::S,
        TetrominoType::T,
        TetrominoType::Z,
    ];

    /// Picks a kind uniformly; consecutive repeats are allowed.
    #[must_use]
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::ALL[rng.usize(0..Self::ALL.len())]
    }

    /// Color id stored in board cells, 1 through 7.
    #[must_use]
    pub fn color_id(self) -> u8 {
        match self {
            TetrominoType::I => 1,
            TetrominoType::J => 2,
            TetrominoType::L => 3,
            TetrominoType::O => 4,
            TetrominoType::S => 5,
            TetrominoType::T => 6,
            TetrominoType::Z => 7,
        }
    }

    #[must_use]
    pub fn from_color_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id).checked_sub(1)?).copied()
    }

    /// Spawn orientation as rows of 0 or the kind's color id.
    #[must_use]
    pub fn shape(self) -> Vec<Vec<u8>> {
        let c = self.color_id();
        match self {
            TetrominoType::I => vec![vec![c, c, c, c]],
            TetrominoType::J => vec![vec![c, 0, 0], vec![c, c, c]],
            TetrominoType::L => vec![vec![0, 0, c], vec![c, c, c]],
            TetrominoType::O => vec![vec![c, c], vec![c, c]],
            TetrominoType::S => vec![vec![0, c, c], vec![c, c, 0]],
            TetrominoType::T => vec![vec![0, c, 0], vec![c, c, c]],
            TetrominoType::Z => vec![vec![c, c, 0], vec![0, c, c]],
        }
    }

    #[must_use]
    pub fn get_color(self) -> Color {
        match self {
            TetrominoType::I => Color::Cyan,
            TetrominoType::J => Color::Blue,
            TetrominoType::L => Color::LightRed,
            TetrominoType::O => Color::Yellow,
            TetrominoType::S => Color::Green,
            TetrominoType::T => Color::Magenta,
            TetrominoType::Z => Color::Red,
        }
    }
}

/// Top-left grid coordinate of a piece's shape matrix.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The falling piece. Transforms build a new value rather than editing in place.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub shape: Vec<Vec<u8>>,
    pub color: u8,
}

impl Piece {
    #[must_use]
    pub fn new(tetromino_type: TetrominoType) -> Self {
        Self {
            shape: tetromino_type.shape(),
            color: tetromino_type.color_id(),
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.shape.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.shape.len()
    }

    /// Column a piece of this width spawns at so that it sits horizontally centered.
    #[must_use]
    pub fn spawn_position(&self) -> Position {
        Position {
            x: (COLS / 2) as i32 - (self.width() / 2) as i32,
            y: 0,
        }
    }

    /// Offsets of the occupied cells relative to the top-left corner.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .filter(|(_, value)| **value != 0)
                .map(move |(col, _)| (col as i32, row as i32))
        })
    }

    /// Rotates 90 degrees clockwise: transpose, then reverse each new row.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let height = self.height();
        let shape = (0..self.width())
            .map(|col| (0..height).rev().map(|row| self.shape[row][col]).collect())
            .collect();

        Self {
            shape,
            color: self.color,
        }
    }
}

/// Projected resting place of the active piece, kept for display only.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ghost {
    pub position: Position,
}

#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub cells: [[u8; COLS]; ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: [[0; COLS]; ROWS],
        }
    }

    pub fn clear(&mut self) {
        self.cells = [[0; COLS]; ROWS];
    }

    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 {
            return None;
        }
        self.cells
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    /// True when any occupied cell of `piece` at `position` leaves the grid
    /// or lands on a locked block.
    #[must_use]
    pub fn collides(&self, piece: &Piece, position: Position) -> bool {
        piece
            .cells()
            .any(|(dx, dy)| !matches!(self.get(position.x + dx, position.y + dy), Some(0)))
    }

    /// Copies the piece into the grid with its color id. Cells outside the grid are skipped.
    pub fn lock(&mut self, piece: &Piece, position: Position) {
        for (dx, dy) in piece.cells() {
            let (x, y) = (position.x + dx, position.y + dy);
            if x >= 0 && (x as usize) < COLS && y >= 0 && (y as usize) < ROWS {
                self.cells[y as usize][x as usize] = piece.color;
            }
        }
    }

    /// Removes full rows, shifts the rest down and fills the top with empty rows.
    /// Returns the removed row indices, top to bottom.
    pub fn clear_lines(&mut self) -> Vec<usize> {
        let cleared: Vec<usize> = (0..ROWS)
            .filter(|&y| self.cells[y].iter().all(|&cell| cell != 0))
            .collect();

        if cleared.is_empty() {
            return cleared;
        }

        let mut next = [[0; COLS]; ROWS];
        let kept = self
            .cells
            .iter()
            .filter(|row| row.iter().any(|&cell| cell == 0));
        for (dst, row) in next.iter_mut().skip(cleared.len()).zip(kept) {
            *dst = *row;
        }
        self.cells = next;

        cleared
    }

    /// Lowest position the piece can fall to from `position`.
    #[must_use]
    pub fn drop_position(&self, piece: &Piece, position: Position) -> Position {
        let mut resting = position;
        while resting.y < ROWS as i32 && !self.collides(piece, resting.offset(0, 1)) {
            resting = resting.offset(0, 1);
        }
        resting
    }
}

/// Session lifecycle. `Locking` only lasts for the synchronous lock-and-clear step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Spawning,
    Falling,
    Locking,
    GameOver,
}

#[derive(Debug, Resource, Clone)]
pub struct GameState {
    pub score: u32,
    pub lines_cleared: u32,
    pub high_score: u32,
    pub phase: Phase,
    pub paused: bool,
    pub drop_timer_ms: f32,
    pub new_high_score: bool,
    pub high_score_unsaved: bool,
    pub was_paused_for_resize: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            score: 0,
            lines_cleared: 0,
            high_score: 0,
            phase: Phase::Spawning,
            paused: false,
            drop_timer_ms: 0.0,
            new_high_score: false,
            high_score_unsaved: false,
            was_paused_for_resize: false,
        }
    }
}

impl GameState {
    #[must_use]
    pub fn with_high_score(high_score: u32) -> Self {
        Self {
            high_score,
            ..Self::default()
        }
    }

    /// Back to start-of-session values. The stored best survives.
    pub fn reset(&mut self) {
        *self = Self::with_high_score(self.high_score);
    }

    #[must_use]
    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        level_for_lines(self.lines_cleared)
    }

    #[must_use]
    pub fn drop_interval_ms(&self) -> u32 {
        drop_interval_ms(self.lines_cleared)
    }

    /// Adds the score for `lines` rows cleared by one lock. The multiplier is the
    /// level before these rows count.
    pub fn award_lines(&mut self, lines: usize) {
        if lines == 0 {
            return;
        }
        let level = self.level();
        self.score = self
            .score
            .saturating_add(crate::game::line_clear_points(lines, level));
        self.lines_cleared = self
            .lines_cleared
            .saturating_add(u32::try_from(lines).unwrap_or(u32::MAX));
    }

    /// Records the end of the session. Returns true when the score beats the stored best.
    pub fn finish(&mut self) -> bool {
        self.phase = Phase::GameOver;
        if self.score > self.high_score {
            self.high_score = self.score;
            self.new_high_score = true;
            self.high_score_unsaved = true;
            true
        } else {
            false
        }
    }
}

/// Seedable piece source so sessions can be replayed in tests.
#[derive(Resource, Debug, Clone)]
pub struct PieceRng(pub fastrand::Rng);

impl Default for PieceRng {
    fn default() -> Self {
        Self(fastrand::Rng::new())
    }
}

impl PieceRng {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}

// Pending commands from the keyboard, drained once per input pass
#[derive(Resource, Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub rotate: bool,
    pub hard_drop: bool,
    pub toggle_pause: bool,
}

// Confetti and line-clear sparks
#[derive(Debug, Clone, Component)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub velocity: (f32, f32),
    pub color: Color,
    pub lifetime: f32,
    pub size: f32,
}
