//! Control policies that steer snakes
//!
//! Every snake in a round owns one boxed [`Policy`]. Once per tick, before the
//! snake moves, the round asks its policy for a heading through
//! [`Policy::decide`], passing a read-only [`WorldView`] built from the
//! pre-tick state and the round's seeded generator. After the move the round
//! reports what happened through [`Policy::observe`]; only learning policies
//! care about that.
//!
//! Four implementations ship with the crate:
//! - [`FixedInputPolicy`]: follows externally supplied key presses
//! - [`RandomPolicy`]: uniformly random heading each tick
//! - [`HeuristicPolicy`]: greedily closes the gap to the food
//! - [`crate::rl::QLearningPolicy`]: tabular Q-learning

pub mod fixed;
pub mod heuristic;
pub mod random;

use std::fmt;
use std::str::FromStr;

use crossterm::event::KeyCode;
use rand::rngs::SmallRng;

use crate::game::{Arena, CollisionType, Direction, Position, Snake, SnakeId};

pub use fixed::{FixedInputPolicy, KeyMap};
pub use heuristic::HeuristicPolicy;
pub use random::RandomPolicy;

/// What a policy may look at when choosing a heading
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    /// The snake being steered
    pub id: SnakeId,
    pub arena: &'a Arena,
    /// Current food position
    pub food: Position,
    /// Every snake as it was before anyone moved this tick
    pub snakes: &'a [Snake],
    /// Key pressed this tick, if any
    pub command: Option<KeyCode>,
}

impl<'a> WorldView<'a> {
    /// The snake being steered
    pub fn me(&self) -> &'a Snake {
        &self.snakes[self.id.index()]
    }

    pub fn head(&self) -> Position {
        self.me().head()
    }

    pub fn direction(&self) -> Direction {
        self.me().direction
    }

    /// True if moving onto `pos` would hit a wall or any snake's pre-tick body
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.arena.is_wall(pos) || self.snakes.iter().any(|s| s.occupies(pos))
    }
}

/// Result of a snake's move, delivered to its policy in the same tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feedback {
    /// Reward earned by the move
    pub reward: f32,
    /// Head position after the move
    pub head: Position,
    /// Food position after any respawn
    pub food: Position,
    pub ate_food: bool,
    /// Wall or self collision caused by the move
    pub collision: Option<CollisionType>,
}

/// A snake controller
pub trait Policy {
    /// Short name used in score reports and logs
    fn name(&self) -> &str;

    /// Choose a heading for this tick. Reversals are filtered by the caller.
    fn decide(&mut self, view: &WorldView<'_>, rng: &mut SmallRng) -> Direction;

    /// Called once after the snake moved, with the outcome of the move
    fn observe(&mut self, _feedback: &Feedback) {}

    /// Called when a round begins, before the first tick
    fn on_round_start(&mut self) {}

    /// Called once when the round ends
    fn on_round_end(&mut self) {}

    /// Number of states in a learned value table, for policies that keep one
    fn table_len(&self) -> Option<usize> {
        None
    }
}

/// The built-in policy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Fixed,
    Random,
    Heuristic,
    Learned,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Fixed => "fixed",
            PolicyKind::Random => "random",
            PolicyKind::Heuristic => "heuristic",
            PolicyKind::Learned => "learned",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" | "human" | "input" => Ok(PolicyKind::Fixed),
            "random" => Ok(PolicyKind::Random),
            "heuristic" | "greedy" => Ok(PolicyKind::Heuristic),
            "learned" | "q" | "qlearning" => Ok(PolicyKind::Learned),
            other => Err(format!(
                "unknown policy '{other}', expected fixed, random, heuristic or learned"
            )),
        }
    }
}
