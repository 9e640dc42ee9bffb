use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Direction};

/// Maps raw key events to game commands
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Translate a key event; keys without a binding yield `None`
    pub fn map_key(&self, key: KeyEvent) -> Option<Command> {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => Some(Command::Move(Direction::Up)),
            KeyCode::Down => Some(Command::Move(Direction::Down)),
            KeyCode::Left => Some(Command::Move(Direction::Left)),
            KeyCode::Right => Some(Command::Move(Direction::Right)),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => Some(Command::Move(Direction::Up)),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::Move(Direction::Down)),
            KeyCode::Char('a') | KeyCode::Char('A') => Some(Command::Move(Direction::Left)),
            KeyCode::Char('d') | KeyCode::Char('D') => Some(Command::Move(Direction::Right)),

            // Controls
            KeyCode::Char(' ') => Some(Command::TogglePause),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),

            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
