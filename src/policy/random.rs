use rand::rngs::SmallRng;
use rand::Rng;

use super::{Policy, WorldView};
use crate::game::Direction;

/// Picks one of the four headings uniformly at random every tick
#[derive(Debug, Clone, Default)]
pub struct RandomPolicy;

impl RandomPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn decide(&mut self, _view: &WorldView<'_>, rng: &mut SmallRng) -> Direction {
        Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
    }
}
