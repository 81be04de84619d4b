pub mod scoreboard;
pub mod training_stats;

pub use scoreboard::{ScoreEntry, ScoreReport};
pub use training_stats::TrainingStats;
