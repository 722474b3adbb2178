#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Particle coordinates are small board-space floats
    clippy::cast_precision_loss,
    // Allow defining constants after statements in functions as it's clearer to define them near where they're used
    clippy::items_after_statements
)]

use bevy_ecs::prelude::*;
use log::debug;
use ratatui::style::Color;

use crate::components::{Particle, TetrominoType};
use crate::game::{COLS, ROWS};

/// Confetti burst for beating the stored best score.
pub fn spawn_celebration_particles(world: &mut World) {
    const PARTICLE_COUNT: usize = 150;

    debug!("Spawning {PARTICLE_COUNT} celebration particles");

    // Launch from a little below the middle of the board, spreading outwards
    let origin_x = COLS as f32 / 2.0;
    let origin_y = ROWS as f32 * 0.6;

    for _ in 0..PARTICLE_COUNT {
        let color = TetrominoType::ALL[fastrand::usize(0..TetrominoType::ALL.len())].get_color();
        let vx = (fastrand::f32() - 0.5) * 14.0;
        let vy = -(fastrand::f32() * 12.0 + 4.0);

        spawn_particle(
            world,
            (origin_x, origin_y),
            (vx, vy),
            color,
            fastrand::f32() * 1.5 + 1.0, // lifetime: 1.0 to 2.5 seconds
            fastrand::f32() * 0.8 + 0.4, // size: 0.4 to 1.2
        );
    }
}

/// Sparks along each cleared row.
pub fn spawn_line_clear_particles(world: &mut World, lines: &[usize]) {
    debug!("Spawning line clear particles for {} lines", lines.len());

    let color = match lines.len() {
        2 => Color::LightBlue,
        3 => Color::LightGreen,
        4 => Color::LightYellow,
        _ => Color::White,
    };
    let particles_per_cell = 2 + lines.len();

    for &y in lines {
        for x in 0..COLS {
            for _ in 0..particles_per_cell {
                let vx = (fastrand::f32() - 0.5) * 8.0;
                let vy = (fastrand::f32() - 0.5) * 3.0;

                spawn_particle(
                    world,
                    (x as f32, y as f32),
                    (vx, vy),
                    color,
                    fastrand::f32() * 0.5 + 0.2, // lifetime: 0.2 to 0.7 seconds
                    fastrand::f32() * 0.6 + 0.3,
                );
            }
        }
    }
}

pub fn update_particles(world: &mut World, delta_seconds: f32) {
    let mut expired = Vec::new();

    for (entity, mut particle) in world.query::<(Entity, &mut Particle)>().iter_mut(world) {
        particle.lifetime -= delta_seconds;
        if particle.lifetime <= 0.0 {
            expired.push(entity);
            continue;
        }

        particle.x += particle.velocity.0 * delta_seconds;
        particle.y += particle.velocity.1 * delta_seconds;

        // Friction, then gravity
        particle.velocity.0 *= 0.95;
        particle.velocity.1 *= 0.95;
        particle.velocity.1 += delta_seconds * 9.0;

        particle.size *= 0.98;
    }

    for entity in expired {
        world.despawn(entity);
    }
}

fn spawn_particle(
    world: &mut World,
    (x, y): (f32, f32),
    velocity: (f32, f32),
    color: Color,
    lifetime: f32,
    size: f32,
) {
    world.spawn(Particle {
        x,
        y,
        velocity,
        color,
        lifetime,
        size,
    });
}
