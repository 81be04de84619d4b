//! Fluent builder for constructing a [`GameEngine`].

use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::{
    action::Direction,
    config::GameConfig,
    engine::GameEngine,
    state::{Arena, Position},
};
use crate::error::ConfigError;
use crate::policy::Policy;

/// Registers snakes and validates the round before the first tick.
///
/// Snakes are updated in registration order. All configuration problems
/// surface from [`build`][Self::build]; nothing is checked per tick.
///
/// # Example
///
/// ```rust
/// use multi_snake::game::{Direction, GameConfig, Position, RoundBuilder};
/// use multi_snake::policy::{HeuristicPolicy, RandomPolicy};
///
/// let mut engine = RoundBuilder::new(GameConfig::new(20, 12).with_seed(1).with_max_ticks(50))
///     .snake(Position::new(3, 6), Direction::Right, HeuristicPolicy::new())
///     .snake(Position::new(16, 6), Direction::Left, RandomPolicy::new())
///     .build()
///     .unwrap();
/// let report = engine.run_with(|_| None).unwrap();
/// assert_eq!(report.entries.len(), 2);
/// ```
pub struct RoundBuilder {
    config: GameConfig,
    starts: Vec<(Position, Direction)>,
    policies: Vec<Box<dyn Policy>>,
}

impl RoundBuilder {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            starts: Vec::new(),
            policies: Vec::new(),
        }
    }

    /// Add a single-segment snake at `start`, heading `direction`
    pub fn snake<P: Policy + 'static>(self, start: Position, direction: Direction, policy: P) -> Self {
        self.boxed_snake(start, direction, Box::new(policy))
    }

    /// Add a snake whose policy is already boxed
    pub fn boxed_snake(
        mut self,
        start: Position,
        direction: Direction,
        policy: Box<dyn Policy>,
    ) -> Self {
        self.starts.push((start, direction));
        self.policies.push(policy);
        self
    }

    /// Validate the round and hand back a ready engine
    pub fn build(self) -> Result<GameEngine, ConfigError> {
        self.config.validate()?;
        let arena = Arena::new(self.config.grid_width, self.config.grid_height)?;

        if self.starts.is_empty() {
            return Err(ConfigError::NoSnakes);
        }

        for (index, &(position, _)) in self.starts.iter().enumerate() {
            if !arena.is_interior(position) {
                return Err(ConfigError::SpawnOutOfBounds {
                    index,
                    position,
                    width: arena.width(),
                    height: arena.height(),
                });
            }
            if let Some(first) = self.starts[..index].iter().position(|(p, _)| *p == position) {
                return Err(ConfigError::SpawnOverlap {
                    first,
                    second: index,
                    position,
                });
            }
        }

        let rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Ok(GameEngine::from_parts(
            self.config,
            arena,
            self.starts,
            self.policies,
            rng,
        ))
    }
}
