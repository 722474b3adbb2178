#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::{error, info};

use crate::Time;
use crate::components::{Board, GameState, Input, PieceRng};
use crate::config::high_score::HighScoreStore;
use crate::config::{Config, GameplayConfig};
use crate::systems::{self, DisplayGrid};

/// One play session plus the collaborators around it. The world owns the
/// board, the active piece and the counters.
pub struct App {
    pub world: World,
    pub should_quit: bool,
    pub high_score_store: HighScoreStore,
}

impl App {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let high_score_store = HighScoreStore::from_config(&config.storage);
        Self::with_store(config.gameplay.clone(), high_score_store, PieceRng::default())
    }

    /// Builds a session around an explicit store and piece source.
    #[must_use]
    pub fn with_store(
        gameplay: GameplayConfig,
        high_score_store: HighScoreStore,
        rng: PieceRng,
    ) -> Self {
        let high_score = high_score_store.load();
        info!(
            "Loaded high score {high_score} from {}",
            high_score_store.path().display()
        );

        let start_paused = gameplay.start_paused;

        let mut world = World::new();
        world.insert_resource(Time::new());
        world.insert_resource(Input::default());
        world.insert_resource(Board::new());
        world.insert_resource(GameState::with_high_score(high_score));
        world.insert_resource(rng);
        world.insert_resource(gameplay);

        // A paused start waits for the first unpause before bringing in a piece
        if start_paused {
            world.resource_mut::<GameState>().paused = true;
        } else {
            systems::spawn_piece(&mut world);
        }

        Self {
            world,
            should_quit: false,
            high_score_store,
        }
    }

    #[must_use]
    pub fn game_state(&self) -> &GameState {
        self.world.resource::<GameState>()
    }

    /// Grid the renderer draws, with ghost and active piece overlaid.
    pub fn display_grid(&mut self) -> DisplayGrid {
        let show_ghost = self
            .world
            .get_resource::<GameplayConfig>()
            .is_none_or(|gameplay| gameplay.show_ghost);
        systems::display_grid(&mut self.world, show_ghost)
    }

    /// Runs the automatic drop and effects, then writes out a newly beaten best.
    pub fn on_tick(&mut self, delta_seconds: f32) {
        systems::game_tick_system(&mut self.world, delta_seconds);
        self.persist_high_score();
    }

    /// Applies whatever the last key press queued.
    pub fn handle_input(&mut self) {
        systems::input_system(&mut self.world);
        self.persist_high_score();
    }

    fn persist_high_score(&mut self) {
        let high_score = {
            let game_state = self.world.resource::<GameState>();
            if !game_state.high_score_unsaved {
                return;
            }
            game_state.high_score
        };

        // Marked saved even on failure so a broken disk does not retry every frame
        self.world.resource_mut::<GameState>().high_score_unsaved = false;
        if let Err(err) = self.high_score_store.save(high_score) {
            error!("Failed to save high score: {err}");
        }
    }

    /// Reset the game state
    pub fn reset(&mut self) {
        systems::reset_session(&mut self.world);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(&Config::current())
    }
}
