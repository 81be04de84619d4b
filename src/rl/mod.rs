//! Tabular reinforcement learning for snake control
//!
//! Provides:
//! - Translation-invariant state keys (head-to-food displacement)
//! - A lazily populated Q-table with the one-step update rule
//! - The ε-greedy [`QLearningPolicy`]
//! - Flat-text persistence of learned tables

pub mod config;
pub mod observation;
pub mod persistence;
pub mod qlearning;
pub mod table;

pub use config::QLearningConfig;
pub use observation::StateKey;
pub use persistence::{load_or_empty, read_table, save_or_warn, write_table};
pub use qlearning::{QLearningPolicy, Transition};
pub use table::{ActionValues, QTable};
