pub mod lineup;
pub mod round;
pub mod train;

pub use lineup::{parse_script, spawn_layout, Lineup};
pub use round::RoundMode;
pub use train::{TrainConfig, TrainMode};
