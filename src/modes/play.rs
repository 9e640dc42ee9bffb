use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, interval, interval_at};
use tracing::{info, warn};

use crate::game::{Command, Direction, GameConfig, GameSession, GameStatus, TickOutcome};
use crate::input::InputHandler;
use crate::render::Renderer;
use crate::stats::StatsStore;

/// Interactive play: terminal setup, the tick/render loop and persistence
pub struct PlayMode {
    session: GameSession,
    store: StatsStore,
    renderer: Renderer,
    input_handler: InputHandler,
    save_history: bool,
    pending_direction: Option<Direction>,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: GameConfig) -> Self {
        let store = StatsStore::open(
            config.data.stats_file.clone(),
            config.data.high_scores_file.clone(),
        );
        let save_history = config.data.save_game_history;
        let session = GameSession::new(config);

        Self {
            session,
            store,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            save_history,
            pending_direction: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor().context("failed to hide cursor")?;
        terminal.clear().context("failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal even when the loop failed
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut current_pace = self.session.tick_interval();
        let mut tick_timer = interval(current_pace);

        // Render at 30 FPS regardless of game pace
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.advance_tick();
                }

                // Render frame
                _ = render_timer.tick() => {
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.session, self.store.best_score());
                    }).context("failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            // Eating food (or a restart) changes the pace; rebuild the timer
            // so the new interval takes effect from now rather than firing an
            // immediate extra tick.
            let pace = self.session.tick_interval();
            if pace != current_pace {
                current_pace = pace;
                tick_timer = interval_at(Instant::now() + pace, pace);
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.map_key(key) {
                Some(Command::Move(direction)) => {
                    // Last key within a tick wins
                    self.pending_direction = Some(direction);
                }
                Some(Command::TogglePause) => {
                    self.session.toggle_pause();
                }
                Some(Command::Restart) => {
                    if self.session.status() == GameStatus::GameOver {
                        self.reset_game();
                    }
                }
                Some(Command::Quit) => {
                    self.should_quit = true;
                }
                None => {}
            }
        }
    }

    fn advance_tick(&mut self) {
        if self.session.status() != GameStatus::Playing {
            return;
        }

        let requested = self.pending_direction.take();

        if let TickOutcome::Ended { collision, record } = self.session.tick(requested) {
            info!(
                ?collision,
                score = record.score,
                max_length = record.max_length,
                total_moves = record.total_moves,
                "session ended"
            );

            if self.save_history {
                self.store.record(record);
            } else {
                warn!("history saving disabled, dropping session record");
            }
        }
    }

    fn reset_game(&mut self) {
        self.session.restart();
        self.pending_direction = None;
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("failed to leave alternate screen")?;
        terminal.show_cursor().context("failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &tempfile::TempDir) -> GameConfig {
        let mut config = GameConfig::small();
        config.data.stats_file = dir.path().join("game_stats.json");
        config.data.high_scores_file = dir.path().join("high_scores.json");
        config
    }

    #[test]
    fn test_initialization() {
        let dir = tempfile::tempdir().unwrap();
        let mode = PlayMode::new(config_in(&dir));

        assert_eq!(mode.session.status(), GameStatus::Playing);
        assert_eq!(mode.session.score(), 0);
        assert!(mode.store.history().is_empty());
    }

    #[test]
    fn test_reset_clears_pending_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut mode = PlayMode::new(config_in(&dir));

        mode.pending_direction = Some(Direction::Down);
        mode.reset_game();

        assert_eq!(mode.pending_direction, None);
        assert_eq!(mode.session.status(), GameStatus::Playing);
    }

    #[test]
    fn test_game_over_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut mode = PlayMode::new(config_in(&dir));

        // Drive straight into the right wall on the 10x10 test grid
        for _ in 0..6 {
            mode.advance_tick();
        }

        assert_eq!(mode.session.status(), GameStatus::GameOver);
        assert_eq!(mode.store.history().len(), 1);

        // Further ticks are no-ops and persist nothing new
        mode.advance_tick();
        assert_eq!(mode.store.history().len(), 1);
    }
}
