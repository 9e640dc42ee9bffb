use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use time::OffsetDateTime;

use crate::game::{FoodStats, SnakeAnalytics};

/// One finalized play-through, in exactly the shape persisted to the history log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub score: u32,
    pub max_length: usize,
    pub duration_seconds: f64,
    pub total_moves: u32,
    pub direction_changes: u32,
    pub foods_eaten: u32,
}

/// Entry in the top-10 ranking derived from a finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    pub max_length: usize,
    pub duration_seconds: f64,
    pub foods_eaten: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub efficiency: f64,
}

impl HighScoreEntry {
    pub fn from_record(record: &SessionRecord) -> Self {
        Self {
            score: record.score,
            max_length: record.max_length,
            duration_seconds: record.duration_seconds,
            foods_eaten: record.foods_eaten,
            date: record.start_time,
            efficiency: record.max_length as f64 / f64::from(record.total_moves.max(1)),
        }
    }
}

/// Accumulates per-session counters while a game is being played
///
/// Updated once per tick from snake and food snapshots; `finalize` stamps the
/// end time and yields the record handed to persistence. Max length is a
/// running maximum, not the length at death.
#[derive(Debug, Clone)]
pub struct SessionTracker {
    started_at: OffsetDateTime,
    started_instant: Instant,
    score: u32,
    max_length: usize,
    total_moves: u32,
    direction_changes: u32,
    foods_eaten: u32,
}

impl SessionTracker {
    /// Start tracking a new session
    pub fn begin(initial_length: usize) -> Self {
        Self {
            started_at: OffsetDateTime::now_utc(),
            started_instant: Instant::now(),
            score: 0,
            max_length: initial_length,
            total_moves: 0,
            direction_changes: 0,
            foods_eaten: 0,
        }
    }

    /// Fold the current tick's snapshots into the running counters
    pub fn observe(&mut self, snake: &SnakeAnalytics, food: &FoodStats, score: u32) {
        self.score = score;
        self.max_length = self.max_length.max(snake.length);
        self.total_moves = snake.total_moves;
        self.direction_changes = snake.direction_changes;
        self.foods_eaten = food.eaten;
    }

    /// Wall-clock time since the session started
    pub fn elapsed(&self) -> Duration {
        self.started_instant.elapsed()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Close out the session and produce the persistent record
    pub fn finalize(&self) -> SessionRecord {
        SessionRecord {
            start_time: self.started_at,
            end_time: OffsetDateTime::now_utc(),
            score: self.score,
            max_length: self.max_length,
            duration_seconds: self.elapsed().as_secs_f64(),
            total_moves: self.total_moves,
            direction_changes: self.direction_changes,
            foods_eaten: self.foods_eaten,
        }
    }
}
