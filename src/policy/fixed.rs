use crossterm::event::KeyCode;
use rand::rngs::SmallRng;

use super::{Policy, WorldView};
use crate::game::Direction;

/// Four keys bound to the four headings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMap {
    pub up: KeyCode,
    pub down: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
}

impl KeyMap {
    /// W/A/S/D, either case
    pub fn wasd() -> Self {
        Self {
            up: KeyCode::Char('w'),
            down: KeyCode::Char('s'),
            left: KeyCode::Char('a'),
            right: KeyCode::Char('d'),
        }
    }

    /// Arrow keys
    pub fn arrows() -> Self {
        Self {
            up: KeyCode::Up,
            down: KeyCode::Down,
            left: KeyCode::Left,
            right: KeyCode::Right,
        }
    }

    /// Heading bound to `code`, if any. Letter keys match either case.
    pub fn lookup(&self, code: KeyCode) -> Option<Direction> {
        let code = match code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        [
            (self.up, Direction::Up),
            (self.down, Direction::Down),
            (self.left, Direction::Left),
            (self.right, Direction::Right),
        ]
        .into_iter()
        .find(|(key, _)| *key == code)
        .map(|(_, dir)| dir)
    }
}

/// Steers from external key presses; no recognised key keeps the heading
#[derive(Debug, Clone)]
pub struct FixedInputPolicy {
    keys: KeyMap,
}

impl FixedInputPolicy {
    pub fn new(keys: KeyMap) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &KeyMap {
        &self.keys
    }
}

impl Policy for FixedInputPolicy {
    fn name(&self) -> &str {
        "fixed"
    }

    fn decide(&mut self, view: &WorldView<'_>, _rng: &mut SmallRng) -> Direction {
        view.command
            .and_then(|code| self.keys.lookup(code))
            .unwrap_or_else(|| view.direction())
    }
}
