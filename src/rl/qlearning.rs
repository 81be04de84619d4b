//! Tabular Q-learning policy
//!
//! Each tick the policy reads the head-to-food displacement, picks an action
//! ε-greedily from its table and remembers the pair. When the round reports
//! the outcome of the move it applies the one-step update using the post-move
//! head and the (possibly respawned) food.

use std::path::{Path, PathBuf};

use rand::rngs::SmallRng;
use rand::Rng;
use tracing::{debug, warn};

use super::config::QLearningConfig;
use super::observation::StateKey;
use super::persistence;
use super::table::QTable;
use crate::error::ConfigError;
use crate::game::Direction;
use crate::policy::{Feedback, Policy, WorldView};

/// One applied update, kept for inspection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: StateKey,
    pub action: Direction,
    pub reward: f32,
    pub next_state: StateKey,
    /// `Q[state][action]` after the update
    pub value: f32,
}

/// Learning snake controller with a private Q-table
#[derive(Debug, Clone)]
pub struct QLearningPolicy {
    config: QLearningConfig,
    table: QTable,
    /// Loaded at round start and saved at round end when set
    table_path: Option<PathBuf>,
    pending: Option<(StateKey, Direction)>,
    last_transition: Option<Transition>,
    round_reward: f32,
}

impl QLearningPolicy {
    /// Create a policy with an empty table
    pub fn new(config: QLearningConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            table: QTable::new(),
            table_path: None,
            pending: None,
            last_transition: None,
            round_reward: 0.0,
        })
    }

    /// Start from an existing table
    pub fn with_table(mut self, table: QTable) -> Self {
        self.table = table;
        self
    }

    /// Persist the table at `path` across rounds
    pub fn with_persistence(mut self, path: impl Into<PathBuf>) -> Self {
        self.table_path = Some(path.into());
        self
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn table_path(&self) -> Option<&Path> {
        self.table_path.as_deref()
    }

    /// Most recent update, if any
    pub fn last_transition(&self) -> Option<&Transition> {
        self.last_transition.as_ref()
    }

    /// Sum of rewards received since the round started
    pub fn round_reward(&self) -> f32 {
        self.round_reward
    }

    /// ε-greedy choice: random with probability ε, otherwise the best-valued action
    pub fn select_action(&mut self, state: StateKey, rng: &mut SmallRng) -> Direction {
        if rng.gen_bool(f64::from(self.config.exploration_rate)) {
            Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
        } else {
            self.table.best_action(state)
        }
    }

    /// Apply the one-step update for a completed move
    pub fn learn(
        &mut self,
        state: StateKey,
        action: Direction,
        reward: f32,
        next_state: StateKey,
    ) -> Transition {
        let value = self.table.update(
            state,
            action,
            reward,
            next_state,
            self.config.learning_rate,
            self.config.discount,
        );
        let transition = Transition {
            state,
            action,
            reward,
            next_state,
            value,
        };
        self.last_transition = Some(transition);
        self.round_reward += reward;
        transition
    }
}

impl Policy for QLearningPolicy {
    fn name(&self) -> &str {
        "learned"
    }

    fn decide(&mut self, view: &WorldView<'_>, rng: &mut SmallRng) -> Direction {
        let state = StateKey::observe(view.head(), view.food);
        let action = self.select_action(state, rng);
        self.pending = Some((state, action));
        action
    }

    fn observe(&mut self, feedback: &Feedback) {
        let Some((state, action)) = self.pending.take() else {
            return;
        };
        let next_state = StateKey::observe(feedback.head, feedback.food);
        self.learn(state, action, feedback.reward, next_state);
    }

    fn on_round_start(&mut self) {
        self.pending = None;
        self.round_reward = 0.0;
        let Some(path) = &self.table_path else {
            return;
        };
        match persistence::read_table(path) {
            Ok(table) => {
                debug!(?path, states = table.len(), "loaded Q-table");
                self.table = table;
            }
            Err(err) => warn!(
                "{err}; continuing with the current Q-table ({} states)",
                self.table.len()
            ),
        }
    }

    fn on_round_end(&mut self) {
        self.pending = None;
        if let Some(path) = &self.table_path {
            if persistence::save_or_warn(&self.table, path) {
                debug!(?path, states = self.table.len(), "saved Q-table");
            }
        }
    }

    fn table_len(&self) -> Option<usize> {
        Some(self.table.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Arena, Position, Snake, SnakeId};
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn greedy() -> QLearningPolicy {
        QLearningPolicy::new(QLearningConfig::new(0.5, 0.9, 0.0)).unwrap()
    }

    fn decide_at(policy: &mut QLearningPolicy, head: Position, food: Position) -> Direction {
        let arena = Arena::new(10, 10).unwrap();
        let snakes = vec![Snake::new(SnakeId(0), head, Direction::Right)];
        let view = WorldView {
            id: SnakeId(0),
            arena: &arena,
            food,
            snakes: &snakes,
            command: None,
        };
        let mut rng = SmallRng::seed_from_u64(5);
        policy.decide(&view, &mut rng)
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(QLearningPolicy::new(QLearningConfig::new(0.5, 1.5, 0.1)).is_err());
    }

    #[test]
    fn test_exploit_picks_best_row_value() {
        let mut table = QTable::new();
        table.insert(StateKey::new(-2, 0), [0.0, 0.0, 4.0, 1.0]);
        let mut policy = greedy().with_table(table);

        assert_eq!(
            decide_at(&mut policy, Position::new(5, 5), Position::new(3, 5)),
            Direction::Left
        );
    }

    #[test]
    fn test_first_visit_materialises_zero_row() {
        let mut policy = greedy();
        let dir = decide_at(&mut policy, Position::new(5, 5), Position::new(7, 2));
        assert_eq!(dir, Direction::Up);
        assert_eq!(policy.table().get(&StateKey::new(2, -3)), Some(&[0.0; 4]));
    }

    #[test]
    fn test_full_exploration_visits_every_action() {
        let mut policy = QLearningPolicy::new(QLearningConfig::new(0.1, 0.9, 1.0)).unwrap();
        let mut rng = SmallRng::seed_from_u64(11);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[policy.select_action(StateKey::new(1, 1), &mut rng).index()] = true;
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn test_observe_updates_pending_pair() {
        let mut policy = greedy();
        let dir = decide_at(&mut policy, Position::new(5, 5), Position::new(5, 4));
        assert_eq!(dir, Direction::Up);

        policy.observe(&Feedback {
            reward: 10.0,
            head: Position::new(5, 4),
            food: Position::new(2, 2),
            ate_food: true,
            collision: None,
        });

        let transition = *policy.last_transition().unwrap();
        assert_eq!(transition.state, StateKey::new(0, -1));
        assert_eq!(transition.action, Direction::Up);
        assert_eq!(transition.next_state, StateKey::new(-3, -2));
        assert!((transition.value - 5.0).abs() < 1e-6);
        assert_eq!(policy.round_reward(), 10.0);

        // A second observe without a decide is ignored
        policy.observe(&Feedback {
            reward: -10.0,
            head: Position::new(5, 3),
            food: Position::new(2, 2),
            ate_food: false,
            collision: None,
        });
        assert_eq!(policy.round_reward(), 10.0);
    }

    #[test]
    fn test_round_hooks_persist_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("q.txt");

        let mut policy = greedy().with_persistence(&path);
        policy.on_round_start();
        assert_eq!(policy.table_len(), Some(0));

        policy.learn(StateKey::new(1, 0), Direction::Right, 10.0, StateKey::new(0, 0));
        policy.on_round_end();
        assert!(path.exists());

        let mut reloaded = greedy().with_persistence(&path);
        reloaded.on_round_start();
        assert_eq!(reloaded.table(), policy.table());
    }

    #[test]
    fn test_missing_table_keeps_memory() {
        let dir = TempDir::new().unwrap();
        let mut table = QTable::new();
        table.insert(StateKey::new(3, 3), [1.0, 2.0, 3.0, 4.0]);

        let mut policy = greedy()
            .with_table(table.clone())
            .with_persistence(dir.path().join("missing.txt"));
        policy.on_round_start();
        assert_eq!(policy.table(), &table);
    }
}
