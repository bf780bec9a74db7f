//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The terminal front end drives it through [`GameEngine::apply`] and [`GameEngine::tick`].

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, TickOutcome};
pub use state::{CellKind, CollisionType, GameState, GameStatus, Grid, Snake};
