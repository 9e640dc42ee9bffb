//! Session statistics: per-game tracking and on-disk persistence

pub mod session_stats;
pub mod store;

pub use session_stats::{HighScoreEntry, SessionRecord, SessionTracker};
pub use store::{GameSummary, StatsStore};
