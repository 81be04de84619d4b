//! Turning a list of policy kinds into a ready round
//!
//! Shared by the headless modes: picks spawn cells, builds one policy per
//! snake and hands everything to [`RoundBuilder`].

use std::path::PathBuf;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;

use crate::game::{Direction, GameConfig, GameEngine, Position, RoundBuilder};
use crate::policy::{FixedInputPolicy, HeuristicPolicy, KeyMap, Policy, PolicyKind, RandomPolicy};
use crate::rl::{QLearningConfig, QLearningPolicy};

/// Who plays, and how learned snakes are set up
#[derive(Debug, Clone)]
pub struct Lineup {
    pub kinds: Vec<PolicyKind>,
    /// Q-table file for learned snakes; see [`Lineup::table_path_for`]
    pub table_path: Option<PathBuf>,
    pub learning: QLearningConfig,
    /// Use the obstacle-aware variant for heuristic snakes
    pub cautious: bool,
}

impl Lineup {
    pub fn new(kinds: Vec<PolicyKind>) -> Self {
        Self {
            kinds,
            table_path: None,
            learning: QLearningConfig::default(),
            cautious: false,
        }
    }

    /// Parse a comma-separated list such as `"learned,heuristic"`
    pub fn parse(list: &str) -> Result<Self> {
        let kinds = list
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<PolicyKind>().map_err(anyhow::Error::msg))
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Invalid snake line-up '{}'", list))?;
        Ok(Self::new(kinds))
    }

    pub fn has_learner(&self) -> bool {
        self.kinds.contains(&PolicyKind::Learned)
    }

    /// Indices of the learned snakes
    pub fn learners(&self) -> Vec<usize> {
        self.kinds
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == PolicyKind::Learned)
            .map(|(i, _)| i)
            .collect()
    }

    /// Table file of the snake at `index`.
    ///
    /// A lone learner uses `table_path` as is. With several learners each one
    /// gets its own `<stem>.<index>.<ext>` next to it, so tables stay private.
    pub fn table_path_for(&self, index: usize) -> Option<PathBuf> {
        let path = self.table_path.as_ref()?;
        if self.kinds.get(index) != Some(&PolicyKind::Learned) {
            return None;
        }
        if self.learners().len() < 2 {
            return Some(path.clone());
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match path.extension() {
            Some(ext) => format!("{}.{}.{}", stem, index, ext.to_string_lossy()),
            None => format!("{}.{}", stem, index),
        };
        Some(path.with_file_name(name))
    }

    /// Build the policy for the snake at `index`
    ///
    /// Fixed-input snakes alternate between the WASD and arrow-key maps.
    pub fn policy(&self, index: usize) -> Result<Box<dyn Policy>> {
        let kind = self
            .kinds
            .get(index)
            .copied()
            .with_context(|| format!("No snake at index {}", index))?;
        let policy: Box<dyn Policy> = match kind {
            PolicyKind::Fixed => {
                let keys = if index % 2 == 0 {
                    KeyMap::wasd()
                } else {
                    KeyMap::arrows()
                };
                Box::new(FixedInputPolicy::new(keys))
            }
            PolicyKind::Random => Box::new(RandomPolicy::new()),
            PolicyKind::Heuristic if self.cautious => Box::new(HeuristicPolicy::cautious()),
            PolicyKind::Heuristic => Box::new(HeuristicPolicy::new()),
            PolicyKind::Learned => {
                let mut learner = QLearningPolicy::new(self.learning)
                    .context("Invalid learning configuration")?;
                if let Some(path) = self.table_path_for(index) {
                    learner = learner.with_persistence(path);
                }
                Box::new(learner)
            }
        };
        Ok(policy)
    }

    /// Build a validated engine with every snake at its default spawn
    pub fn build(&self, config: GameConfig) -> Result<GameEngine> {
        let starts = spawn_layout(config.grid_width, config.grid_height, self.kinds.len());
        let mut builder = RoundBuilder::new(config);
        for (index, (start, direction)) in starts.into_iter().enumerate() {
            builder = builder.boxed_snake(start, direction, self.policy(index)?);
        }
        builder.build().context("Failed to set up round")
    }
}

/// Default spawn cells for `count` snakes.
///
/// Snakes come in facing pairs: even indices start five cells from the left
/// wall heading right, odd indices mirror them on the right heading left.
/// Pairs are spread evenly down the arena. Arenas too small for the line-up
/// yield overlapping cells, which the round builder rejects.
pub fn spawn_layout(width: usize, height: usize, count: usize) -> Vec<(Position, Direction)> {
    let width = width as i32;
    let height = height as i32;
    let left_x = 5.min(width / 2 - 1).max(1);
    let right_x = (width - left_x).min(width - 2);
    let rows = count.div_ceil(2) as i32;
    let interior_rows = (height - 2).max(1);

    (0..count)
        .map(|i| {
            let row = i as i32 / 2;
            let y = (1 + (row + 1) * interior_rows / (rows + 1)).clamp(1, (height - 2).max(1));
            if i % 2 == 0 {
                (Position::new(left_x, y), Direction::Right)
            } else {
                (Position::new(right_x, y), Direction::Left)
            }
        })
        .collect()
}

/// Parse a key script: one character per tick.
///
/// `.` means no key that tick and `^ v < >` stand for the arrow keys; any
/// other character is passed through as a letter key.
pub fn parse_script(script: &str) -> Vec<Option<KeyCode>> {
    script
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '.' => None,
            '^' => Some(KeyCode::Up),
            'v' => Some(KeyCode::Down),
            '<' => Some(KeyCode::Left),
            '>' => Some(KeyCode::Right),
            other => Some(KeyCode::Char(other)),
        })
        .collect()
}
