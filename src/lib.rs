//! Multi Snake - a multi-agent snake arena with pluggable controllers
//!
//! This library provides:
//! - Core simulation: arena, snakes, food and the tick orchestrator (game module)
//! - Snake controllers behind one trait: fixed input, random, heuristic (policy module)
//! - Tabular Q-learning with table persistence (rl module)
//! - Scoreboard and training statistics (metrics module)
//! - Headless round and training drivers (modes module)

pub mod error;
pub mod game;
pub mod metrics;
pub mod modes;
pub mod policy;
pub mod rl;
