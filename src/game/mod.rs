//! Core simulation for multi-snake rounds
//!
//! This module contains the arena geometry, snake and food state, and the tick
//! orchestrator. It does no I/O or rendering; drivers feed it one tick per frame.

pub mod action;
pub mod builder;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use builder::RoundBuilder;
pub use config::GameConfig;
pub use engine::{GameEngine, RoundStatus, SnakeEvent, TickReport};
pub use state::{Arena, CollisionType, Food, Position, Snake, SnakeId};
