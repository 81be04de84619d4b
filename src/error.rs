//! Error types shared by the simulation and the persistence layer

use std::path::PathBuf;

use thiserror::Error;

use crate::game::Position;

/// Fatal configuration problems, raised before the first tick
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("arena {width}x{height} is smaller than the 4x4 minimum")]
    ArenaTooSmall { width: usize, height: usize },

    #[error("snake {index} spawns at ({}, {}), outside the {width}x{height} arena interior", .position.x, .position.y)]
    SpawnOutOfBounds {
        index: usize,
        position: Position,
        width: usize,
        height: usize,
    },

    #[error("snakes {first} and {second} both spawn at ({}, {})", .position.x, .position.y)]
    SpawnOverlap {
        first: usize,
        second: usize,
        position: Position,
    },

    #[error("a round needs at least one snake")]
    NoSnakes,

    #[error("{name} must be in [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f32 },

    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Q-table file problems; callers usually downgrade these to warnings
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read table from {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write table to {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
