#![allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]

use crate::components::{Board, Piece, Position, TetrominoType};
use crate::game::{COLS, ROWS};
use proptest::prelude::*;

fn board_from(cells: &[u8]) -> Board {
    let mut board = Board::new();
    for (index, &value) in cells.iter().enumerate() {
        board.cells[index / COLS][index % COLS] = value;
    }
    board
}

fn rotated(kind: TetrominoType, turns: usize) -> Piece {
    (0..turns).fold(Piece::new(kind), |piece, _| piece.rotated())
}

proptest! {
    #[test]
    fn collision_matches_bounds_and_occupancy(
        cells in prop::collection::vec(prop_oneof![3 => Just(0u8), 1 => 1u8..=7], ROWS * COLS),
        kind in 0usize..7,
        turns in 0usize..4,
        x in -4i32..14,
        y in -4i32..24,
    ) {
        let board = board_from(&cells);
        let piece = rotated(TetrominoType::ALL[kind], turns);

        let expected = piece.cells().any(|(dx, dy)| {
            let (cx, cy) = (x + dx, y + dy);
            cx < 0
                || cx >= COLS as i32
                || cy < 0
                || cy >= ROWS as i32
                || board.cells[cy as usize][cx as usize] != 0
        });

        prop_assert_eq!(board.collides(&piece, Position { x, y }), expected);
    }

    #[test]
    fn clearing_removes_full_rows_and_keeps_order(
        filled in prop::collection::vec(prop::bool::weighted(0.9), ROWS * COLS),
    ) {
        let cells: Vec<u8> = filled.iter().map(|&f| u8::from(f)).collect();
        let mut board = board_from(&cells);
        let before = board.clone();
        let full: Vec<usize> = (0..ROWS)
            .filter(|&y| before.cells[y].iter().all(|&c| c != 0))
            .collect();
        let survivors: Vec<[u8; COLS]> = before
            .cells
            .iter()
            .filter(|row| row.contains(&0))
            .copied()
            .collect();

        let cleared = board.clear_lines();

        prop_assert_eq!(&cleared, &full);
        prop_assert_eq!(board.cells.len(), ROWS);
        for row in &board.cells[..full.len()] {
            prop_assert!(row.iter().all(|&c| c == 0));
        }
        prop_assert_eq!(&board.cells[full.len()..], survivors.as_slice());
    }

    #[test]
    fn resting_position_never_collides(
        cells in prop::collection::vec(prop_oneof![4 => Just(0u8), 1 => Just(2u8)], ROWS * COLS),
        kind in 0usize..7,
        turns in 0usize..4,
        x in 0i32..7,
    ) {
        let mut board = board_from(&cells);
        // Keep the spawn rows open so every start is legal
        for row in &mut board.cells[..4] {
            *row = [0; COLS];
        }
        let piece = rotated(TetrominoType::ALL[kind], turns);
        let start = Position { x, y: 0 };
        prop_assert!(!board.collides(&piece, start));

        let resting = board.drop_position(&piece, start);

        prop_assert!(!board.collides(&piece, resting));
        let below = Position { x, y: resting.y + 1 };
        prop_assert!(board.collides(&piece, below));
        prop_assert_eq!(resting.x, x);
    }
}
