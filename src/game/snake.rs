use super::action::Direction;

/// A position on the game grid
///
/// Positions outside the grid bounds are valid values; a head that has just
/// stepped off the board is the normal way a wall collision is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in a direction
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// Deferred growth: eating arms `Pending`, the next advance consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Growth {
    Steady,
    Pending,
}

/// Read-only snapshot of the snake's movement counters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnakeAnalytics {
    pub length: usize,
    pub total_moves: u32,
    pub direction_changes: u32,
    pub efficiency: f64,
}

/// The player-controlled snake
///
/// Body segments are ordered head first. Length never drops below 1, and the
/// body holds no duplicate cells while the snake is alive.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: Vec<Position>,
    direction: Direction,
    growth: Growth,
    total_moves: u32,
    direction_changes: u32,
}

impl Snake {
    /// Create a new snake with the given head position, heading and length
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let length = length.max(1);
        let mut body = vec![head];

        // Initial segments extend away from the heading
        let (dx, dy) = direction.delta();
        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(-dx, -dy));
        }

        Self {
            body,
            direction,
            growth: Growth::Steady,
            total_moves: 0,
            direction_changes: 0,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// All body segments, head first
    pub fn body(&self) -> &[Position] {
        &self.body
    }

    /// Current heading
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Advance one cell in the current direction
    ///
    /// A pending growth is consumed here: the tail is kept and length goes up
    /// by one. Otherwise the tail is popped and length is unchanged. Always
    /// counts as one move; never fails.
    pub fn advance(&mut self) {
        let new_head = self.head().step(self.direction);
        self.body.insert(0, new_head);

        match self.growth {
            Growth::Pending => self.growth = Growth::Steady,
            Growth::Steady => {
                self.body.pop();
            }
        }

        self.total_moves += 1;
    }

    /// Request a direction change, effective on the next advance
    ///
    /// A 180-degree reversal is rejected and leaves the heading unchanged.
    /// Re-selecting the current heading is accepted but not counted as a
    /// change. Returns whether the request was accepted.
    pub fn change_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction.opposite() {
            return false;
        }

        if new_direction != self.direction {
            self.direction_changes += 1;
        }
        self.direction = new_direction;
        true
    }

    /// Arm growth for the next advance; idempotent within a tick
    pub fn grow(&mut self) {
        self.growth = Growth::Pending;
    }

    /// True iff the head lies strictly outside [0, width) x [0, height)
    pub fn hits_wall(&self, width: usize, height: usize) -> bool {
        let head = self.head();
        head.x < 0 || head.x >= width as i32 || head.y < 0 || head.y >= height as i32
    }

    /// True iff the head overlaps any other body segment
    ///
    /// Growth is deferred by a tick, so a snake of length 1 or 2 can never
    /// report true here.
    pub fn hits_self(&self) -> bool {
        self.body[1..].contains(&self.head())
    }

    /// Snapshot of the movement counters for the stats tracker
    pub fn analytics(&self) -> SnakeAnalytics {
        SnakeAnalytics {
            length: self.len(),
            total_moves: self.total_moves,
            direction_changes: self.direction_changes,
            efficiency: self.len() as f64 / f64::from(self.total_moves.max(1)),
        }
    }
}
