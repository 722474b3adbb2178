#![warn(clippy::all, clippy::pedantic)]

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::StorageConfig;
use super::loader::{ConfigError, ensure_parent_dir};

// Environment variable that overrides the score file location
pub const HIGH_SCORE_ENV_VAR: &str = "BLOCKFALL_HIGH_SCORE";

const HIGH_SCORE_FILE_PATH: &str = "blockfall_high_score.toml";

#[derive(Debug, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u32,
}

/// File-backed best score.
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Explicit path from the config, then the environment, then the platform data dir.
    #[must_use]
    pub fn from_config(storage: &StorageConfig) -> Self {
        if let Some(path) = &storage.high_score_path {
            return Self::new(path.clone());
        }
        if let Ok(path) = std::env::var(HIGH_SCORE_ENV_VAR) {
            return Self::new(path);
        }
        match dirs::data_dir() {
            Some(data_dir) => Self::new(data_dir.join("blockfall").join("high_score.toml")),
            None => Self::new(HIGH_SCORE_FILE_PATH),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored best, or 0 when the file is missing, unreadable or malformed.
    #[must_use]
    pub fn load(&self) -> u32 {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                debug!("No high score at {}: {err}", self.path.display());
                return 0;
            }
        };

        if let Ok(file) = toml::from_str::<HighScoreFile>(&contents) {
            return file.high_score;
        }
        // Older files held just the number
        if let Ok(score) = contents.trim().parse::<u32>() {
            return score;
        }

        warn!("Ignoring invalid high score file {}", self.path.display());
        0
    }

    pub fn save(&self, high_score: u32) -> Result<(), ConfigError> {
        ensure_parent_dir(&self.path)?;
        let contents = toml::to_string(&HighScoreFile { high_score })?;
        fs::write(&self.path, contents)?;
        debug!("Saved high score {high_score} to {}", self.path.display());
        Ok(())
    }
}
