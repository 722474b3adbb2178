pub mod high_score;
pub mod loader;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

// Global configuration instance with thread-safe access
pub static CONFIG: once_cell::sync::Lazy<Arc<RwLock<Config>>> =
    once_cell::sync::Lazy::new(|| Arc::new(RwLock::new(Config::default())));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gameplay: GameplayConfig,
    pub timing: TimingConfig,
    pub storage: StorageConfig,
}

// Gameplay switches, also inserted into the game world as a resource
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    pub start_paused: bool,
    pub show_ghost: bool,
    pub celebrate_high_score: bool,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            start_paused: true,
            show_ghost: true,
            celebrate_high_score: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub frame_interval_ms: u64,
    pub game_tick_ms: u64,
    pub input_poll_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 33, // ~30 FPS
            game_tick_ms: 16,
            input_poll_ms: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub high_score_path: Option<PathBuf>,
}

impl Config {
    /// Snapshot of the process-wide configuration.
    #[must_use]
    pub fn current() -> Config {
        match CONFIG.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn install(config: Config) {
        match CONFIG.write() {
            Ok(mut current) => *current = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
    }

    // Force reload the configuration from file
    pub fn force_reload() -> Result<Config, loader::ConfigError> {
        let config = loader::load_config_from_file()?;
        Self::install(config.clone());
        Ok(config)
    }
}
