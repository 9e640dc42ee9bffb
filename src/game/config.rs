use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Board geometry and pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Board width in pixels
    pub width: u32,
    /// Board height in pixels
    pub height: u32,
    /// Cell size in pixels; the grid is width/cell_size by height/cell_size
    pub cell_size: u32,
    /// Starting snake length in cells
    pub initial_snake_length: usize,
    /// Starting tick interval in milliseconds
    pub initial_speed_ms: u64,
    /// How much the tick interval shrinks per food eaten
    pub speed_increase_ms: u64,
    /// Fastest allowed tick interval
    pub min_speed_ms: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            cell_size: 20,
            initial_snake_length: 1,
            initial_speed_ms: 150,
            speed_increase_ms: 5,
            min_speed_ms: 50,
        }
    }
}

/// Where session statistics end up on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub save_game_history: bool,
    pub stats_file: PathBuf,
    pub high_scores_file: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            save_game_history: true,
            stats_file: PathBuf::from("data/game_stats.json"),
            high_scores_file: PathBuf::from("data/high_scores.json"),
        }
    }
}

/// Optional UI elements
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureToggles {
    pub show_grid: bool,
    pub show_score: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_score: true,
        }
    }
}

/// Configuration for the game
///
/// Loaded once at startup and passed into the session by value. A missing or
/// malformed settings file is not fatal; built-in defaults are used instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub game: GameSettings,
    pub data: DataSettings,
    pub features: FeatureToggles,
}

impl GameConfig {
    /// Load configuration from a JSON file, falling back to defaults on error
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(config) => config,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to load settings, using built-in defaults"
                );
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {:?}", path))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse settings from {:?}", path))
    }

    /// Grid width in cells
    pub fn grid_width(&self) -> usize {
        (self.game.width / self.game.cell_size) as usize
    }

    /// Grid height in cells
    pub fn grid_height(&self) -> usize {
        (self.game.height / self.game.cell_size) as usize
    }

    /// Tick interval at session start
    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.game.initial_speed_ms)
    }

    /// How much faster each food makes the game
    pub fn speed_step(&self) -> Duration {
        Duration::from_millis(self.game.speed_increase_ms)
    }

    /// The pace never drops below this interval
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.game.min_speed_ms)
    }

    /// Small 10x10 board, handy for tests
    pub fn small() -> Self {
        let mut config = Self::default();
        config.game.width = 200;
        config.game.height = 200;
        config
    }
}
