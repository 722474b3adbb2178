#[cfg(test)]
mod piece_tests {
    use crate::components::{Piece, Position, TetrominoType};

    #[test]
    fn test_shapes_have_four_cells_and_their_color() {
        for (index, kind) in TetrominoType::ALL.iter().enumerate() {
            let piece = Piece::new(*kind);
            assert_eq!(piece.cells().count(), 4, "{kind:?} should have 4 cells");
            assert_eq!(usize::from(piece.color), index + 1);
            assert!(
                piece.shape.iter().flatten().all(|&v| v == 0 || v == piece.color),
                "{kind:?} cells should carry its color id"
            );
            assert_eq!(TetrominoType::from_color_id(piece.color), Some(*kind));
        }
        assert_eq!(TetrominoType::from_color_id(0), None);
        assert_eq!(TetrominoType::from_color_id(8), None);
    }

    #[test]
    fn test_spawn_position_is_centered() {
        assert_eq!(Piece::new(TetrominoType::O).spawn_position(), Position { x: 4, y: 0 });
        assert_eq!(Piece::new(TetrominoType::I).spawn_position(), Position { x: 3, y: 0 });
        assert_eq!(Piece::new(TetrominoType::T).spawn_position(), Position { x: 4, y: 0 });
    }

    #[test]
    fn test_rotation_transposes_and_reverses() {
        let t = Piece::new(TetrominoType::T);
        let rotated = t.rotated();
        assert_eq!(rotated.shape, vec![vec![6, 0], vec![6, 6], vec![6, 0]]);

        let i = Piece::new(TetrominoType::I).rotated();
        assert_eq!(i.width(), 1);
        assert_eq!(i.height(), 4);

        let j = Piece::new(TetrominoType::J).rotated();
        assert_eq!(j.shape, vec![vec![2, 2], vec![2, 0], vec![2, 0]]);
    }

    #[test]
    fn test_four_rotations_return_to_start() {
        for kind in TetrominoType::ALL {
            let piece = Piece::new(kind);
            let spun = piece.rotated().rotated().rotated().rotated();
            assert_eq!(spun, piece);
        }
    }

    #[test]
    fn test_random_kind_uses_seeded_rng() {
        let mut a = fastrand::Rng::with_seed(9);
        let mut b = fastrand::Rng::with_seed(9);
        let first: Vec<_> = (0..20).map(|_| TetrominoType::random(&mut a)).collect();
        let second: Vec<_> = (0..20).map(|_| TetrominoType::random(&mut b)).collect();
        assert_eq!(first, second);
    }
}

#[cfg(test)]
mod board_tests {
    use crate::components::{Board, Piece, Position, TetrominoType};
    use crate::game::{COLS, ROWS};
    use crate::tests::test_utils::fill_row_except;

    #[test]
    fn test_board_creation_and_clear() {
        let mut board = Board::new();
        assert_eq!(board.cells.len(), ROWS);
        assert_eq!(board.cells[0].len(), COLS);
        assert!(board.cells.iter().flatten().all(|&c| c == 0));

        board.cells[3][4] = 2;
        board.clear();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_collision_bounds() {
        let board = Board::new();
        let o = Piece::new(TetrominoType::O);

        assert!(!board.collides(&o, Position { x: 0, y: 0 }));
        assert!(!board.collides(&o, Position { x: 8, y: 18 }));
        assert!(board.collides(&o, Position { x: -1, y: 0 }));
        assert!(board.collides(&o, Position { x: 9, y: 0 }));
        assert!(board.collides(&o, Position { x: 0, y: 19 }));
        assert!(board.collides(&o, Position { x: 0, y: -1 }));
    }

    #[test]
    fn test_collision_ignores_empty_shape_cells() {
        let mut board = Board::new();
        // The T's top corners are empty, so a block there is not a hit
        board.cells[0][4] = 1;
        let t = Piece::new(TetrominoType::T);
        assert!(!board.collides(&t, Position { x: 4, y: 0 }));

        board.cells[0][5] = 1;
        assert!(board.collides(&t, Position { x: 4, y: 0 }));
    }

    #[test]
    fn test_lock_writes_color_id() {
        let mut board = Board::new();
        let s = Piece::new(TetrominoType::S);
        board.lock(&s, Position { x: 2, y: 18 });

        assert_eq!(board.cells[18][3], 5);
        assert_eq!(board.cells[18][4], 5);
        assert_eq!(board.cells[19][2], 5);
        assert_eq!(board.cells[19][3], 5);
        assert_eq!(board.cells.iter().flatten().filter(|&&c| c != 0).count(), 4);
    }

    #[test]
    fn test_clear_single_line() {
        let mut board = Board::new();
        fill_row_except(&mut board, 19, &[], 3);
        board.cells[18][0] = 7;

        let cleared = board.clear_lines();

        assert_eq!(cleared, vec![19]);
        assert_eq!(board.cells[19][0], 7);
        assert!(board.cells[19][1..].iter().all(|&c| c == 0));
        assert!(board.cells[..19].iter().flatten().all(|&c| c == 0));
    }

    #[test]
    fn test_clear_non_adjacent_lines_keeps_order() {
        let mut board = Board::new();
        fill_row_except(&mut board, 19, &[], 1);
        fill_row_except(&mut board, 18, &[5], 2);
        fill_row_except(&mut board, 17, &[], 3);
        board.cells[16][0] = 4;

        let cleared = board.clear_lines();

        assert_eq!(cleared, vec![17, 19]);
        // Row with the hole drops to the floor, the lone block sits above it
        assert_eq!(board.cells[19][5], 0);
        assert_eq!(board.cells[19][0], 2);
        assert_eq!(board.cells[18][0], 4);
        assert!(board.cells[..18].iter().flatten().all(|&c| c == 0));
    }

    #[test]
    fn test_clear_without_full_rows_is_noop() {
        let mut board = Board::new();
        fill_row_except(&mut board, 19, &[9], 1);
        let before = board.clone();

        assert!(board.clear_lines().is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn test_drop_position() {
        let mut board = Board::new();
        let o = Piece::new(TetrominoType::O);
        assert_eq!(
            board.drop_position(&o, Position { x: 4, y: 0 }),
            Position { x: 4, y: 18 }
        );

        board.cells[10][5] = 1;
        assert_eq!(
            board.drop_position(&o, Position { x: 4, y: 0 }),
            Position { x: 4, y: 8 }
        );
    }
}

#[cfg(test)]
mod game_state_tests {
    use crate::components::{GameState, Phase};

    #[test]
    fn test_award_lines_uses_level_before_clear() {
        let mut state = GameState {
            lines_cleared: 9,
            ..GameState::default()
        };

        state.award_lines(4);

        // Level 1 multiplier even though the clear crosses into level 2
        assert_eq!(state.score, 800);
        assert_eq!(state.lines_cleared, 13);
        assert_eq!(state.level(), 2);

        state.award_lines(1);
        assert_eq!(state.score, 1000);
    }

    #[test]
    fn test_finish_records_new_best() {
        let mut state = GameState::with_high_score(100);
        state.score = 150;

        assert!(state.finish());
        assert_eq!(state.phase, Phase::GameOver);
        assert_eq!(state.high_score, 150);
        assert!(state.new_high_score);
        assert!(state.high_score_unsaved);
    }

    #[test]
    fn test_finish_without_new_best() {
        let mut state = GameState::with_high_score(100);
        state.score = 100;

        assert!(!state.finish());
        assert!(state.game_over());
        assert_eq!(state.high_score, 100);
        assert!(!state.new_high_score);
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let mut state = GameState::with_high_score(300);
        state.score = 40;
        state.lines_cleared = 12;
        state.finish();

        state.reset();

        assert_eq!(state.score, 0);
        assert_eq!(state.lines_cleared, 0);
        assert_eq!(state.high_score, 300);
        assert_eq!(state.phase, Phase::Spawning);
        assert!(!state.paused);
    }
}
