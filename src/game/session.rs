use rand::rngs::ThreadRng;
use std::time::Duration;

use super::action::Direction;
use super::config::GameConfig;
use super::food::Food;
use super::snake::{Position, Snake};
use crate::stats::{SessionRecord, SessionTracker};

/// Points awarded per food item
pub const FOOD_SCORE: u32 = 10;

/// Where the session currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Paused,
    GameOver,
}

/// What ended the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Result of one simulation tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The session goes on; food may have been eaten this tick
    Continued { ate_food: bool },
    /// A collision ended the session; the finalized record is ready to persist
    Ended {
        collision: CollisionType,
        record: SessionRecord,
    },
    /// Nothing was simulated (paused or already over)
    Idle,
}

/// One play-through: snake, food and counters plus the pacing state
///
/// The session is single-owner, single-timeline: the loop is the only writer
/// and the only reader of live state. Restart rebuilds everything from the
/// configuration, nothing carries over from the previous game.
pub struct GameSession {
    config: GameConfig,
    rng: ThreadRng,
    snake: Snake,
    food: Food,
    tracker: SessionTracker,
    status: GameStatus,
    score: u32,
    tick_interval: Duration,
}

impl GameSession {
    /// Start a fresh session from the given configuration
    pub fn new(config: GameConfig) -> Self {
        let mut rng = rand::thread_rng();
        let grid_width = config.grid_width();
        let grid_height = config.grid_height();

        let start = Position::new((grid_width / 2) as i32, (grid_height / 2) as i32);
        let snake = Snake::new(start, Direction::Right, config.game.initial_snake_length);
        let food = Food::spawn(&mut rng, grid_width, grid_height, snake.body());
        let tracker = SessionTracker::begin(snake.len());
        let tick_interval = config.initial_interval();

        Self {
            config,
            rng,
            snake,
            food,
            tracker,
            status: GameStatus::Playing,
            score: 0,
            tick_interval,
        }
    }

    /// Run one simulation tick
    ///
    /// `requested` is the single direction command chosen for this tick; the
    /// caller keeps only the most recent one, so later key presses within a
    /// tick win. Returns what happened so the loop can persist a finished
    /// record or pick up the new pace.
    pub fn tick(&mut self, requested: Option<Direction>) -> TickOutcome {
        if self.status != GameStatus::Playing {
            return TickOutcome::Idle;
        }

        if let Some(direction) = requested {
            self.snake.change_direction(direction);
        }

        self.snake.advance();

        let grid_width = self.config.grid_width();
        let grid_height = self.config.grid_height();

        let collision = if self.snake.hits_wall(grid_width, grid_height) {
            Some(CollisionType::Wall)
        } else if self.snake.hits_self() {
            Some(CollisionType::SelfCollision)
        } else {
            None
        };

        if let Some(collision) = collision {
            self.status = GameStatus::GameOver;
            return TickOutcome::Ended {
                collision,
                record: self.tracker.finalize(),
            };
        }

        let ate_food = self.food.try_eat(self.snake.head());
        if ate_food {
            self.snake.grow();
            self.score += FOOD_SCORE;
            self.speed_up();
            self.food
                .respawn(&mut self.rng, grid_width, grid_height, self.snake.body());
        }

        self.tracker
            .observe(&self.snake.analytics(), &self.food.stats(), self.score);

        TickOutcome::Continued { ate_food }
    }

    /// Shrink the tick interval by the configured step, down to the floor
    fn speed_up(&mut self) {
        self.tick_interval = self
            .tick_interval
            .saturating_sub(self.config.speed_step())
            .max(self.config.min_interval());
    }

    /// Toggle between playing and paused; rejected once the game is over
    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            GameStatus::Playing => {
                self.status = GameStatus::Paused;
                true
            }
            GameStatus::Paused => {
                self.status = GameStatus::Playing;
                true
            }
            GameStatus::GameOver => false,
        }
    }

    /// Rebuild the whole session: snake, food, tracker, score and pace
    pub fn restart(&mut self) {
        *self = Self::new(self.config.clone());
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current pace; decreases monotonically within a session
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Wall-clock time since the session started
    pub fn elapsed(&self) -> Duration {
        self.tracker.elapsed()
    }

    #[cfg(test)]
    pub(crate) fn place_food_at(&mut self, position: Position) {
        self.food.place_at(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::new(GameConfig::small())
    }

    #[test]
    fn test_new_session() {
        let session = session();
        assert_eq!(session.status(), GameStatus::Playing);
        assert_eq!(session.score(), 0);
        assert_eq!(session.snake().len(), 1);
        assert_eq!(session.snake().head(), Position::new(5, 5));
        assert_eq!(session.tick_interval(), Duration::from_millis(150));
        // Food never spawns on the snake
        assert_ne!(session.food().position(), session.snake().head());
    }

    #[test]
    fn test_tick_moves_snake() {
        let mut session = session();
        session.place_food_at(Position::new(0, 9));

        let outcome = session.tick(None);
        assert_eq!(outcome, TickOutcome::Continued { ate_food: false });
        assert_eq!(session.snake().head(), Position::new(6, 5));
    }

    #[test]
    fn test_eating_scores_and_defers_growth() {
        let mut session = session();
        session.place_food_at(Position::new(6, 5));

        let outcome = session.tick(None);
        assert_eq!(outcome, TickOutcome::Continued { ate_food: true });
        assert_eq!(session.score(), FOOD_SCORE);
        // Growth lands on the next move, not this one
        assert_eq!(session.snake().len(), 1);

        session.place_food_at(Position::new(0, 9));
        session.tick(None);
        assert_eq!(session.snake().len(), 2);
    }

    #[test]
    fn test_eating_speeds_up() {
        let mut session = session();
        session.place_food_at(Position::new(6, 5));

        session.tick(None);
        assert_eq!(session.tick_interval(), Duration::from_millis(145));
    }

    #[test]
    fn test_speed_never_drops_below_floor() {
        let mut config = GameConfig::small();
        config.game.initial_speed_ms = 52;
        let mut session = GameSession::new(config);

        session.place_food_at(Position::new(6, 5));
        session.tick(None);
        assert_eq!(session.tick_interval(), Duration::from_millis(50));

        session.place_food_at(Position::new(7, 5));
        session.tick(None);
        assert_eq!(session.tick_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_wall_collision_ends_session() {
        let mut session = session();
        session.place_food_at(Position::new(0, 9));

        // Head starts at (5, 5) heading right on a 10x10 grid
        for _ in 0..4 {
            assert!(matches!(session.tick(None), TickOutcome::Continued { .. }));
        }

        match session.tick(None) {
            TickOutcome::Ended { collision, record } => {
                assert_eq!(collision, CollisionType::Wall);
                assert_eq!(record.score, session.score());
            }
            other => panic!("expected wall collision, got {:?}", other),
        }
        assert_eq!(session.status(), GameStatus::GameOver);

        // A dead session no longer simulates
        assert_eq!(session.tick(None), TickOutcome::Idle);
    }

    #[test]
    fn test_self_collision_ends_session() {
        let mut config = GameConfig::small();
        config.game.initial_snake_length = 5;
        let mut session = GameSession::new(config);

        session.tick(Some(Direction::Down));
        session.tick(Some(Direction::Left));
        let outcome = session.tick(Some(Direction::Up));

        assert!(matches!(
            outcome,
            TickOutcome::Ended {
                collision: CollisionType::SelfCollision,
                ..
            }
        ));
    }

    #[test]
    fn test_reversal_ignored_in_tick() {
        let mut session = session();
        session.place_food_at(Position::new(0, 9));

        session.tick(Some(Direction::Left));
        assert_eq!(session.snake().direction(), Direction::Right);
        assert_eq!(session.snake().head(), Position::new(6, 5));
    }

    #[test]
    fn test_pause_blocks_simulation() {
        let mut session = session();

        assert!(session.toggle_pause());
        assert_eq!(session.status(), GameStatus::Paused);

        let head = session.snake().head();
        assert_eq!(session.tick(None), TickOutcome::Idle);
        assert_eq!(session.snake().head(), head);

        assert!(session.toggle_pause());
        assert_eq!(session.status(), GameStatus::Playing);
    }

    #[test]
    fn test_pause_rejected_after_game_over() {
        let mut session = session();
        session.place_food_at(Position::new(0, 9));

        for _ in 0..5 {
            session.tick(None);
        }
        assert_eq!(session.status(), GameStatus::GameOver);
        assert!(!session.toggle_pause());
        assert_eq!(session.status(), GameStatus::GameOver);
    }

    #[test]
    fn test_restart_rebuilds_everything() {
        let mut session = session();
        session.place_food_at(Position::new(6, 5));
        session.tick(None);

        // Drive into the wall to finish the game
        session.place_food_at(Position::new(0, 9));
        for _ in 0..5 {
            session.tick(None);
        }
        assert_eq!(session.status(), GameStatus::GameOver);
        assert!(session.score() > 0);

        session.restart();
        assert_eq!(session.status(), GameStatus::Playing);
        assert_eq!(session.score(), 0);
        assert_eq!(session.snake().len(), 1);
        assert_eq!(session.snake().head(), Position::new(5, 5));
        assert_eq!(session.tick_interval(), Duration::from_millis(150));
    }

    #[test]
    fn test_record_shape_after_session() {
        let mut session = session();
        session.place_food_at(Position::new(6, 5));
        session.tick(None);
        session.place_food_at(Position::new(0, 9));
        session.tick(Some(Direction::Down));

        // Run straight down into the wall
        let record = loop {
            if let TickOutcome::Ended { record, .. } = session.tick(None) {
                break record;
            }
        };

        assert_eq!(record.score, FOOD_SCORE);
        assert_eq!(record.foods_eaten, 1);
        assert_eq!(record.max_length, 2);
        assert_eq!(record.direction_changes, 1);
        // The dying move is not part of the recorded counters
        assert_eq!(record.total_moves, 5);
    }
}
