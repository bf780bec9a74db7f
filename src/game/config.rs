use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Smallest board that still leaves room around the centre cell
pub const MIN_GRID_SIZE: usize = 3;
/// Largest board the terminal renderer is expected to fit
pub const MAX_GRID_SIZE: usize = 63;

/// Reasons a [`GameConfig`] cannot be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid size {0} must be odd and between {min} and {max}", min = MIN_GRID_SIZE, max = MAX_GRID_SIZE)]
    GridSize(usize),
    #[error("minimum interval {min}ms exceeds maximum interval {max}ms")]
    IntervalBounds { min: u64, max: u64 },
    #[error("initial interval {initial}ms is outside {min}..={max}ms")]
    InitialInterval { initial: u64, min: u64, max: u64 },
    #[error("minimum interval must be non-zero")]
    ZeroInterval,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid
    pub grid_size: usize,
    /// Tick interval at the start of every game
    pub initial_interval_ms: u64,
    /// How much faster the game ticks after each point
    pub interval_step_ms: u64,
    /// Floor for the tick interval
    pub min_interval_ms: u64,
    /// Ceiling for the tick interval (manual speed changes are clamped to it)
    pub max_interval_ms: u64,
    /// Seed for food placement; entropy when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 17,
            initial_interval_ms: 500,
            interval_step_ms: 10,
            min_interval_ms: 50,
            max_interval_ms: 500,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// The 17x17 board
    pub fn classic() -> Self {
        Self::default()
    }

    /// The 9x9 board
    pub fn small() -> Self {
        Self::new(9)
    }

    /// Fix the food placement sequence
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // The head starts on (size² - 1) / 2, which is only the middle cell for odd sizes
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) || self.grid_size % 2 == 0 {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        if self.min_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.min_interval_ms > self.max_interval_ms {
            return Err(ConfigError::IntervalBounds {
                min: self.min_interval_ms,
                max: self.max_interval_ms,
            });
        }
        if !(self.min_interval_ms..=self.max_interval_ms).contains(&self.initial_interval_ms) {
            return Err(ConfigError::InitialInterval {
                initial: self.initial_interval_ms,
                min: self.min_interval_ms,
                max: self.max_interval_ms,
            });
        }
        Ok(())
    }

    /// Clamp an interval into the configured bounds
    pub fn clamp_interval(&self, interval_ms: u64) -> u64 {
        interval_ms.clamp(self.min_interval_ms, self.max_interval_ms)
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}
