use anyhow::Result;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::game::GameConfig;
use crate::stats::{SessionRecord, StatsStore};

/// Text dashboard over the persisted statistics
///
/// Reads the same files play mode writes and prints an overall summary, the
/// high-score table and the most recent sessions to stdout.
pub struct ReportMode {
    store: StatsStore,
}

/// Most recent sessions shown at the bottom of the report
const RECENT_LIMIT: usize = 10;

impl ReportMode {
    pub fn new(config: &GameConfig) -> Self {
        let store = StatsStore::open(
            config.data.stats_file.clone(),
            config.data.high_scores_file.clone(),
        );
        Self { store }
    }

    pub fn run(&self) -> Result<()> {
        let summary = self.store.summary();

        println!("=== Snake - Session Report ===");
        println!();
        println!("Games played:        {}", summary.total_games);
        println!("Best score:          {}", summary.best_score);
        println!("Average score:       {:.2}", summary.average_score);
        println!("Total foods eaten:   {}", summary.total_foods_eaten);
        println!("Total playtime:      {:.1}s", summary.total_playtime);
        println!("Average game length: {:.1}s", summary.average_game_duration);
        println!();

        if self.store.high_scores().is_empty() {
            println!("No games on record yet. Play a round first!");
            return Ok(());
        }

        println!("--- High Scores ---");
        println!(
            "{:>4}  {:>6}  {:>7}  {:>6}  {:>9}  {:>10}  {}",
            "#", "Score", "Length", "Foods", "Duration", "Efficiency", "Date"
        );
        for (rank, entry) in self.store.high_scores().iter().enumerate() {
            println!(
                "{:>4}  {:>6}  {:>7}  {:>6}  {:>8.1}s  {:>10.3}  {}",
                rank + 1,
                entry.score,
                entry.max_length,
                entry.foods_eaten,
                entry.duration_seconds,
                entry.efficiency,
                format_date(entry.date),
            );
        }
        println!();

        println!("--- Recent Sessions ---");
        for record in recent(self.store.history()) {
            println!(
                "{}  score {:>4}  length {:>3}  moves {:>5}  {:.1}s",
                format_date(record.start_time),
                record.score,
                record.max_length,
                record.total_moves,
                record.duration_seconds,
            );
        }

        Ok(())
    }
}

fn recent(history: &[SessionRecord]) -> impl Iterator<Item = &SessionRecord> {
    history.iter().rev().take(RECENT_LIMIT)
}

fn format_date(date: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]");
    date.format(&format).unwrap_or_else(|_| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_date_formatting() {
        let date = datetime!(2024-03-05 14:07:33 UTC);
        assert_eq!(format_date(date), "2024-03-05 14:07");
    }

    #[test]
    fn test_recent_takes_newest_first() {
        let now = OffsetDateTime::now_utc();
        let history: Vec<SessionRecord> = (0..15)
            .map(|i| SessionRecord {
                start_time: now,
                end_time: now,
                score: i,
                max_length: 1,
                duration_seconds: 1.0,
                total_moves: 1,
                direction_changes: 0,
                foods_eaten: 0,
            })
            .collect();

        let scores: Vec<u32> = recent(&history).map(|r| r.score).collect();
        assert_eq!(scores.len(), 10);
        assert_eq!(scores[0], 14);
        assert_eq!(scores[9], 5);
    }
}
