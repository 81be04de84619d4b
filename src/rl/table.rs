//! Tabular action-value store

use std::collections::HashMap;

use super::observation::StateKey;
use crate::game::Direction;

/// One value per action, indexed by [`Direction::index`]
pub type ActionValues = [f32; 4];

/// Q-table mapping state keys to per-action values.
///
/// Rows are created zero-filled on first access and never removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    rows: HashMap<StateKey, ActionValues>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of materialised states
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Read a row without creating it
    pub fn get(&self, state: &StateKey) -> Option<&ActionValues> {
        self.rows.get(state)
    }

    /// Row for `state`, zero-initialised if absent
    pub fn row_mut(&mut self, state: StateKey) -> &mut ActionValues {
        self.rows.entry(state).or_insert([0.0; 4])
    }

    /// Overwrite a row verbatim
    pub fn insert(&mut self, state: StateKey, values: ActionValues) {
        self.rows.insert(state, values);
    }

    /// Highest-valued action for `state`; ties go to the earliest of up, down, left, right
    pub fn best_action(&mut self, state: StateKey) -> Direction {
        let row = *self.row_mut(state);
        let mut best = 0;
        for i in 1..row.len() {
            if row[i] > row[best] {
                best = i;
            }
        }
        Direction::ALL[best]
    }

    /// Largest value in the row for `state`
    pub fn max_value(&mut self, state: StateKey) -> f32 {
        self.row_mut(state)
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// One-step update: `Q[s][a] += α (r + γ max Q[s'] − Q[s][a])`.
    ///
    /// Both rows are materialised before the update. Returns the new value.
    pub fn update(
        &mut self,
        state: StateKey,
        action: Direction,
        reward: f32,
        next_state: StateKey,
        learning_rate: f32,
        discount: f32,
    ) -> f32 {
        self.row_mut(state);
        let next_max = self.max_value(next_state);
        let value = &mut self.row_mut(state)[action.index()];
        *value += learning_rate * (reward + discount * next_max - *value);
        *value
    }

    /// Rows sorted by state key
    pub fn sorted_rows(&self) -> Vec<(StateKey, ActionValues)> {
        let mut rows: Vec<_> = self.rows.iter().map(|(k, v)| (*k, *v)).collect();
        rows.sort_by_key(|(k, _)| *k);
        rows
    }
}
