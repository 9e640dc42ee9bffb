//! Classic terminal snake with persistent session statistics
//!
//! This library provides:
//! - Core game logic: grid, snake, food and the session state machine (game module)
//! - Key-event to command mapping (input module)
//! - TUI rendering (render module)
//! - Session tracking and JSON persistence (stats module)
//! - Execution modes: interactive play and a stats report (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
pub mod stats;
