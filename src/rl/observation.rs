use std::fmt;
use std::str::FromStr;

use crate::game::Position;

/// Discretised state used to index the Q-table.
///
/// Only the signed displacement from the head to the food is kept, so a value
/// learned in one corner of the arena applies everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey {
    pub dx: i32,
    pub dy: i32,
}

impl StateKey {
    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Key for a snake whose head is at `head` with food at `food`
    pub fn observe(head: Position, food: Position) -> Self {
        Self {
            dx: food.x - head.x,
            dy: food.y - head.y,
        }
    }
}

/// Encoded as `dx,dy`, which never contains whitespace
impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.dx, self.dy)
    }
}

impl FromStr for StateKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (dx, dy) = s
            .split_once(',')
            .ok_or_else(|| format!("state key '{s}' is not of the form dx,dy"))?;
        let dx = dx
            .parse()
            .map_err(|_| format!("state key '{s}' has a non-integer dx"))?;
        let dy = dy
            .parse()
            .map_err(|_| format!("state key '{s}' has a non-integer dy"))?;
        Ok(Self { dx, dy })
    }
}
