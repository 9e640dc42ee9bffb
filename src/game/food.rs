use rand::Rng;

use super::snake::Position;

/// Placement gives up after this many rejected candidates
const SPAWN_ATTEMPTS: usize = 100;

/// Read-only snapshot of the food state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodStats {
    pub eaten: u32,
    pub position: Position,
}

/// The single active food item on the grid
#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    position: Position,
    eaten: u32,
}

impl Food {
    /// Create a food item already placed on a free cell
    pub fn spawn<R: Rng>(rng: &mut R, width: usize, height: usize, occupied: &[Position]) -> Self {
        let mut food = Self {
            position: Position::new(0, 0),
            eaten: 0,
        };
        food.respawn(rng, width, height, occupied);
        food
    }

    /// Place the food on a uniformly random cell outside `occupied`
    ///
    /// Candidates are drawn up to a fixed attempt budget. On a near-full board
    /// the budget can run out; the item then lands on (0, 0) even if that cell
    /// is occupied. Known degenerate case, kept over failing the game.
    pub fn respawn<R: Rng>(
        &mut self,
        rng: &mut R,
        width: usize,
        height: usize,
        occupied: &[Position],
    ) {
        for _ in 0..SPAWN_ATTEMPTS {
            let candidate = Position::new(
                rng.gen_range(0..width as i32),
                rng.gen_range(0..height as i32),
            );

            if !occupied.contains(&candidate) {
                self.position = candidate;
                return;
            }
        }

        self.position = Position::new(0, 0);
    }

    /// Check whether the head landed on the food, counting a hit
    ///
    /// Not idempotent: a hit increments the eaten counter, so call this at
    /// most once per tick.
    pub fn try_eat(&mut self, head: Position) -> bool {
        if head == self.position {
            self.eaten += 1;
            return true;
        }
        false
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn stats(&self) -> FoodStats {
        FoodStats {
            eaten: self.eaten,
            position: self.position,
        }
    }

    #[cfg(test)]
    pub(crate) fn place_at(&mut self, position: Position) {
        self.position = position;
    }
}
