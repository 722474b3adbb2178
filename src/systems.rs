#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Grid coordinates fit comfortably in i32 and i8 color ids
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use bevy_ecs::prelude::*;
use log::{debug, info, trace};

use crate::components::{
    Board, GameState, Ghost, Input, Phase, Piece, PieceRng, Particle, Position,
    TetrominoType,
};
use crate::config::GameplayConfig;
use crate::game::{COLS, ROWS};
use crate::particles;

/// Board with the ghost (negative ids) and the active piece (positive ids) drawn over it.
pub type DisplayGrid = [[i8; COLS]; ROWS];

/// Returns the active piece entity with copies of its piece and position.
pub fn active_piece(world: &mut World) -> Option<(Entity, Piece, Position)> {
    let mut query = world.query::<(Entity, &Piece, &Position)>();
    query
        .iter(world)
        .next()
        .map(|(entity, piece, position)| (entity, piece.clone(), *position))
}

/// Replaces the active piece's shape and position and recomputes its ghost.
fn commit_piece(world: &mut World, entity: Entity, piece: Piece, position: Position) {
    let ghost = Ghost {
        position: world.resource::<Board>().drop_position(&piece, position),
    };
    world.entity_mut(entity).insert((piece, position, ghost));
}

fn accepts_commands(world: &World) -> bool {
    let game_state = world.resource::<GameState>();
    !game_state.paused && !game_state.game_over()
}

pub fn spawn_piece(world: &mut World) {
    if world.resource::<GameState>().game_over() {
        return;
    }
    world.resource_mut::<GameState>().phase = Phase::Spawning;

    let tetromino_type = {
        let mut rng = world.get_resource_or_insert_with(PieceRng::default);
        TetrominoType::random(&mut rng.0)
    };
    spawn_piece_of(world, tetromino_type);
}

/// Spawns a specific kind at the top center of the board, ending the session
/// if that spot is already taken.
pub fn spawn_piece_of(world: &mut World, tetromino_type: TetrominoType) {
    if world.resource::<GameState>().game_over() {
        return;
    }

    let piece = Piece::new(tetromino_type);
    let position = piece.spawn_position();

    if world.resource::<Board>().collides(&piece, position) {
        end_session(world);
        return;
    }

    debug!(
        "Spawning {:?} at ({}, {})",
        tetromino_type, position.x, position.y
    );
    let entity = world.spawn_empty().id();
    commit_piece(world, entity, piece, position);

    let mut game_state = world.resource_mut::<GameState>();
    game_state.phase = Phase::Falling;
    game_state.drop_timer_ms = 0.0;
}

fn end_session(world: &mut World) {
    let (score, new_best) = {
        let mut game_state = world.resource_mut::<GameState>();
        let new_best = game_state.finish();
        (game_state.score, new_best)
    };
    info!("Game over with score {score}");

    let celebrate = world
        .get_resource::<GameplayConfig>()
        .is_none_or(|gameplay| gameplay.celebrate_high_score);
    if new_best {
        info!("New high score: {score}");
        if celebrate {
            particles::spawn_celebration_particles(world);
        }
    }
}

/// Shifts the active piece sideways. Blocked moves are ignored.
pub fn move_piece(world: &mut World, dx: i32) -> bool {
    if !accepts_commands(world) {
        return false;
    }
    let Some((entity, piece, position)) = active_piece(world) else {
        return false;
    };

    let target = position.offset(dx, 0);
    if world.resource::<Board>().collides(&piece, target) {
        trace!("Move by {dx} blocked");
        return false;
    }
    commit_piece(world, entity, piece, target);
    true
}

/// Horizontal shifts tried after a rotation: 0, +1, -1, +2, -2, ... up to `width`.
pub fn kick_offsets(width: usize) -> impl Iterator<Item = i32> {
    let width = width as i32;
    std::iter::once(0).chain((1..=width).flat_map(|step| [step, -step]))
}

/// Rotates clockwise, nudging sideways when the rotated shape does not fit.
/// When no offset fits the piece is left untouched.
pub fn rotate_piece(world: &mut World) -> bool {
    if !accepts_commands(world) {
        return false;
    }
    let Some((entity, piece, position)) = active_piece(world) else {
        return false;
    };

    let rotated = piece.rotated();
    let kick = {
        let board = world.resource::<Board>();
        kick_offsets(rotated.width()).find(|&dx| !board.collides(&rotated, position.offset(dx, 0)))
    };

    match kick {
        Some(dx) => {
            if dx != 0 {
                trace!("Rotation kicked by {dx}");
            }
            commit_piece(world, entity, rotated, position.offset(dx, 0));
            true
        }
        None => {
            trace!("Rotation rejected");
            false
        }
    }
}

/// One step down. A blocked step locks the piece and brings in the next one.
/// Returns true when the piece moved.
pub fn soft_drop(world: &mut World) -> bool {
    if !accepts_commands(world) {
        return false;
    }
    let Some((entity, piece, position)) = active_piece(world) else {
        return false;
    };

    let below = position.offset(0, 1);
    if world.resource::<Board>().collides(&piece, below) {
        lock_piece(world, entity, &piece, position);
        spawn_piece(world);
        false
    } else {
        commit_piece(world, entity, piece, below);
        true
    }
}

/// Drops straight to the resting row and locks there. Returns the distance fallen.
pub fn hard_drop(world: &mut World) -> u32 {
    if !accepts_commands(world) {
        return 0;
    }
    let Some((entity, piece, position)) = active_piece(world) else {
        return 0;
    };

    let resting = world.resource::<Board>().drop_position(&piece, position);
    let distance = u32::try_from(resting.y - position.y).unwrap_or(0);
    debug!("Hard drop by {distance} rows");

    lock_piece(world, entity, &piece, resting);
    spawn_piece(world);
    distance
}

fn lock_piece(world: &mut World, entity: Entity, piece: &Piece, position: Position) {
    info!("Locking piece at ({}, {})", position.x, position.y);
    world.resource_mut::<GameState>().phase = Phase::Locking;

    let cleared = {
        let mut board = world.resource_mut::<Board>();
        board.lock(piece, position);
        board.clear_lines()
    };
    world.despawn(entity);

    if !cleared.is_empty() {
        {
            let mut game_state = world.resource_mut::<GameState>();
            game_state.award_lines(cleared.len());
            info!(
                "Cleared {} lines, score {}, level {}",
                cleared.len(),
                game_state.score,
                game_state.level()
            );
        }
        particles::spawn_line_clear_particles(world, &cleared);
    }
}

pub fn toggle_pause(world: &mut World) {
    let mut game_state = world.resource_mut::<GameState>();
    if game_state.game_over() {
        return;
    }
    game_state.paused = !game_state.paused;
    // A manual toggle takes over from the resize auto-pause
    game_state.was_paused_for_resize = false;
    debug!("Paused: {}", game_state.paused);
}

/// Starts a fresh session: empty board, zeroed counters, new piece. The best score is kept.
pub fn reset_session(world: &mut World) {
    let pieces: Vec<Entity> = world
        .query_filtered::<Entity, With<Piece>>()
        .iter(world)
        .collect();
    let leftover_particles: Vec<Entity> = world
        .query_filtered::<Entity, With<Particle>>()
        .iter(world)
        .collect();
    for entity in pieces.into_iter().chain(leftover_particles) {
        world.despawn(entity);
    }

    world.resource_mut::<Board>().clear();
    world.resource_mut::<GameState>().reset();
    *world.resource_mut::<Input>() = Input::default();

    info!("New session");
    spawn_piece(world);
}

pub fn display_grid(world: &mut World, show_ghost: bool) -> DisplayGrid {
    let mut grid = [[0i8; COLS]; ROWS];
    for (dst, src) in grid.iter_mut().zip(world.resource::<Board>().cells.iter()) {
        for (cell, &value) in dst.iter_mut().zip(src.iter()) {
            *cell = value as i8;
        }
    }

    let (game_over, paused) = {
        let game_state = world.resource::<GameState>();
        (game_state.game_over(), game_state.paused)
    };
    if game_over {
        return grid;
    }

    let mut query = world.query::<(&Piece, &Position, &Ghost)>();
    let Some((piece, position, ghost)) = query.iter(world).next() else {
        return grid;
    };
    let color = piece.color as i8;

    let mut paint = |origin: Position, value: i8, only_empty: bool| {
        for (dx, dy) in piece.cells() {
            let (x, y) = (origin.x + dx, origin.y + dy);
            if x < 0 || y < 0 || x as usize >= COLS || y as usize >= ROWS {
                continue;
            }
            let cell = &mut grid[y as usize][x as usize];
            if !only_empty || *cell == 0 {
                *cell = value;
            }
        }
    };

    if show_ghost && !paused {
        paint(ghost.position, -color, true);
    }
    paint(*position, color, false);

    grid
}

/// Applies the pending keyboard commands and clears them.
pub fn input_system(world: &mut World) {
    let input = std::mem::take(&mut *world.resource_mut::<Input>());

    if input.toggle_pause {
        toggle_pause(world);
    }

    if !accepts_commands(world) {
        return;
    }

    if input.hard_drop {
        hard_drop(world);
        return;
    }

    if input.left {
        move_piece(world, -1);
    }
    if input.right {
        move_piece(world, 1);
    }
    if input.rotate {
        rotate_piece(world);
    }
    if input.down {
        soft_drop(world);
        world.resource_mut::<GameState>().drop_timer_ms = 0.0;
    }
}

/// Advances effects and, while the session is live, the automatic drop timer.
pub fn game_tick_system(world: &mut World, delta_seconds: f32) {
    trace!("Game tick with delta: {delta_seconds}");

    particles::update_particles(world, delta_seconds);

    if !accepts_commands(world) {
        return;
    }

    if active_piece(world).is_none() {
        debug!("No active piece, spawning a new one");
        spawn_piece(world);
        return;
    }

    let should_drop = {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.drop_timer_ms += delta_seconds * 1000.0;
        let interval = game_state.drop_interval_ms() as f32;
        if game_state.drop_timer_ms >= interval {
            game_state.drop_timer_ms = 0.0;
            true
        } else {
            false
        }
    };

    if should_drop {
        soft_drop(world);
    }
}
