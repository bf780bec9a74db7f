//! Grid Snake - Snake on a square board, played in the terminal
//!
//! This library provides:
//! - Core game logic (game module): an index-based engine with deferred growth
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - The interactive terminal loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
