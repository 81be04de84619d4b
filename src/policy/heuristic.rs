use rand::rngs::SmallRng;

use super::{Policy, WorldView};
use crate::game::{Direction, Position};

/// Greedy food chaser.
///
/// Closes the horizontal gap first, then the vertical one, and never proposes
/// a reversal. With `avoid_obstacles` set, moves into a wall or a cell occupied
/// in the pre-tick snapshot are skipped too.
#[derive(Debug, Clone, Default)]
pub struct HeuristicPolicy {
    avoid_obstacles: bool,
}

impl HeuristicPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variant that also steers around walls and snakes when it can
    pub fn cautious() -> Self {
        Self {
            avoid_obstacles: true,
        }
    }

    /// Preferred headings toward `food`, horizontal before vertical
    fn candidates(head: Position, food: Position) -> impl Iterator<Item = Direction> {
        let horizontal = match food.x.cmp(&head.x) {
            std::cmp::Ordering::Greater => Some(Direction::Right),
            std::cmp::Ordering::Less => Some(Direction::Left),
            std::cmp::Ordering::Equal => None,
        };
        let vertical = match food.y.cmp(&head.y) {
            std::cmp::Ordering::Greater => Some(Direction::Down),
            std::cmp::Ordering::Less => Some(Direction::Up),
            std::cmp::Ordering::Equal => None,
        };
        horizontal.into_iter().chain(vertical)
    }
}

impl Policy for HeuristicPolicy {
    fn name(&self) -> &str {
        if self.avoid_obstacles {
            "cautious"
        } else {
            "heuristic"
        }
    }

    fn decide(&mut self, view: &WorldView<'_>, _rng: &mut SmallRng) -> Direction {
        let head = view.head();
        let current = view.direction();
        let safe = |dir: Direction| {
            !self.avoid_obstacles || !view.is_blocked(head.moved_in_direction(dir))
        };

        if let Some(dir) = Self::candidates(head, view.food)
            .find(|dir| !current.is_opposite(*dir) && safe(*dir))
        {
            return dir;
        }

        if self.avoid_obstacles {
            // Nothing toward the food is safe: keep going if possible, else any safe turn
            if let Some(dir) = std::iter::once(current)
                .chain(Direction::ALL)
                .find(|dir| !current.is_opposite(*dir) && safe(*dir))
            {
                return dir;
            }
        }

        current
    }
}
