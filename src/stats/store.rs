use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::session_stats::{HighScoreEntry, SessionRecord};

/// History keeps the most recent games only
const HISTORY_LIMIT: usize = 1000;
/// Ranking keeps the best games only
const HIGH_SCORE_LIMIT: usize = 10;

/// Aggregate figures across the whole history
#[derive(Debug, Clone, PartialEq)]
pub struct GameSummary {
    pub total_games: usize,
    pub total_playtime: f64,
    pub average_score: f64,
    pub best_score: u32,
    pub total_foods_eaten: u64,
    pub average_game_duration: f64,
}

/// On-disk store for session history and the high-score ranking
///
/// Both files are loaded once at startup; missing or corrupt content is
/// logged and treated as empty so the game always starts. Writes happen once
/// per finished session and a failure there is logged, not propagated.
pub struct StatsStore {
    history_path: PathBuf,
    high_scores_path: PathBuf,
    history: Vec<SessionRecord>,
    high_scores: Vec<HighScoreEntry>,
}

impl StatsStore {
    /// Open the store backed by the given file paths
    pub fn open(history_path: PathBuf, high_scores_path: PathBuf) -> Self {
        let history = load_or_empty(&history_path);
        let high_scores = load_or_empty(&high_scores_path);

        Self {
            history_path,
            high_scores_path,
            history,
            high_scores,
        }
    }

    /// Append a finished session and fold it into the ranking, then save
    pub fn record(&mut self, record: SessionRecord) {
        let entry = HighScoreEntry::from_record(&record);

        self.history.push(record);
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }

        self.high_scores.push(entry);
        // Stable sort: equal scores keep their insertion order
        self.high_scores.sort_by(|a, b| b.score.cmp(&a.score));
        self.high_scores.truncate(HIGH_SCORE_LIMIT);

        if let Err(err) = self.save() {
            warn!(error = %err, "failed to save game statistics");
        }
    }

    fn save(&self) -> Result<()> {
        write_json(&self.history_path, &self.history)?;
        write_json(&self.high_scores_path, &self.high_scores)?;
        Ok(())
    }

    pub fn history(&self) -> &[SessionRecord] {
        &self.history
    }

    pub fn high_scores(&self) -> &[HighScoreEntry] {
        &self.high_scores
    }

    /// Best score on record, if any games were played
    pub fn best_score(&self) -> Option<u32> {
        self.high_scores.first().map(|entry| entry.score)
    }

    /// Aggregate the history into overall figures
    pub fn summary(&self) -> GameSummary {
        if self.history.is_empty() {
            return GameSummary {
                total_games: 0,
                total_playtime: 0.0,
                average_score: 0.0,
                best_score: 0,
                total_foods_eaten: 0,
                average_game_duration: 0.0,
            };
        }

        let total_games = self.history.len();
        let total_playtime: f64 = self.history.iter().map(|game| game.duration_seconds).sum();
        let total_score: u64 = self.history.iter().map(|game| u64::from(game.score)).sum();
        let best_score = self
            .history
            .iter()
            .map(|game| game.score)
            .max()
            .unwrap_or(0);
        let total_foods_eaten = self
            .history
            .iter()
            .map(|game| u64::from(game.foods_eaten))
            .sum();

        GameSummary {
            total_games,
            total_playtime,
            average_score: total_score as f64 / total_games as f64,
            best_score,
            total_foods_eaten,
            average_game_duration: total_playtime / total_games as f64,
        }
    }
}

fn load_or_empty<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    if !path.exists() {
        return Vec::new();
    }

    match read_json(path) {
        Ok(items) => items,
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "failed to load stats file, starting with empty data"
            );
            Vec::new()
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {:?}", path))
}

fn write_json<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {:?}", parent))?;
        }
    }

    let json = serde_json::to_string_pretty(items).context("failed to serialize stats")?;
    fs::write(path, json).with_context(|| format!("failed to write {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use time::OffsetDateTime;

    fn record_with_score(score: u32) -> SessionRecord {
        let now = OffsetDateTime::now_utc();
        SessionRecord {
            start_time: now,
            end_time: now,
            score,
            max_length: 3,
            duration_seconds: 12.5,
            total_moves: 40,
            direction_changes: 6,
            foods_eaten: score / 10,
        }
    }

    fn store_in(dir: &TempDir) -> StatsStore {
        StatsStore::open(
            dir.path().join("game_stats.json"),
            dir.path().join("high_scores.json"),
        )
    }

    #[test]
    fn test_high_scores_sorted_descending() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.record(record_with_score(50));
        store.record(record_with_score(120));
        store.record(record_with_score(80));

        let scores: Vec<u32> = store.high_scores().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![120, 80, 50]);
        assert_eq!(store.history().len(), 3);
        assert_eq!(store.best_score(), Some(120));
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let mut first = record_with_score(50);
        first.max_length = 7;
        let mut second = record_with_score(50);
        second.max_length = 9;

        store.record(first);
        store.record(second);

        assert_eq!(store.high_scores()[0].max_length, 7);
        assert_eq!(store.high_scores()[1].max_length, 9);
    }

    #[test]
    fn test_ranking_caps_at_ten() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        for score in (0..13).map(|i| i * 10) {
            store.record(record_with_score(score));
        }

        assert_eq!(store.high_scores().len(), 10);
        assert_eq!(store.high_scores()[0].score, 120);
        // The three weakest sessions fell off the ranking
        assert_eq!(store.high_scores()[9].score, 30);
        assert_eq!(store.history().len(), 13);
    }

    #[test]
    fn test_reload_round_trip() {
        let dir = TempDir::new().unwrap();

        {
            let mut store = store_in(&dir);
            store.record(record_with_score(70));
            store.record(record_with_score(30));
        }

        let reloaded = store_in(&dir);
        assert_eq!(reloaded.history().len(), 2);
        assert_eq!(reloaded.best_score(), Some(70));
    }

    #[test]
    fn test_corrupt_files_start_empty() {
        let dir = TempDir::new().unwrap();
        let history_path = dir.path().join("game_stats.json");
        fs::write(&history_path, "not json at all").unwrap();

        let mut store = StatsStore::open(history_path, dir.path().join("high_scores.json"));
        assert!(store.history().is_empty());

        // Writes still work after a bad load
        store.record(record_with_score(10));
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_summary_aggregates_history() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.record(record_with_score(50));
        store.record(record_with_score(120));
        store.record(record_with_score(80));

        let summary = store.summary();
        assert_eq!(summary.total_games, 3);
        assert_eq!(summary.best_score, 120);
        assert!((summary.average_score - 250.0 / 3.0).abs() < 1e-9);
        assert!((summary.total_playtime - 37.5).abs() < 1e-9);
        assert!((summary.average_game_duration - 12.5).abs() < 1e-9);
        assert_eq!(summary.total_foods_eaten, 25);
    }

    #[test]
    fn test_summary_of_empty_history() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let summary = store.summary();
        assert_eq!(summary.total_games, 0);
        assert_eq!(summary.best_score, 0);
        assert_eq!(summary.average_score, 0.0);
    }
}
