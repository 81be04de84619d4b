//! Training mode for learned snakes
//!
//! Plays the same line-up for many rounds on one engine. Learned snakes load
//! their table when a round starts and save it when it ends, so progress is
//! persisted after every round. Fixed-input snakes receive no keys here.
//!
//! # Example
//!
//! ```rust,no_run
//! use multi_snake::game::GameConfig;
//! use multi_snake::modes::{Lineup, TrainConfig, TrainMode};
//!
//! let mut lineup = Lineup::parse("learned,heuristic")?;
//! lineup.table_path = Some("tables/snake.qtable".into());
//!
//! let config = TrainConfig::new(500, GameConfig::default().with_max_ticks(1000), lineup);
//! let mut train_mode = TrainMode::new(config)?;
//! train_mode.run()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::Result;
use tracing::{info, warn};

use super::lineup::Lineup;
use crate::game::{GameConfig, GameEngine, SnakeId};
use crate::metrics::TrainingStats;

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of rounds to play
    pub num_rounds: usize,

    /// Log progress every N rounds
    pub log_frequency: usize,

    /// Arena and reward settings shared by every round
    pub game_config: GameConfig,

    pub lineup: Lineup,
}

impl TrainConfig {
    pub fn new(num_rounds: usize, game_config: GameConfig, lineup: Lineup) -> Self {
        Self {
            num_rounds,
            log_frequency: 100,
            game_config,
            lineup,
        }
    }
}

/// Multi-round training driver
pub struct TrainMode {
    engine: GameEngine,
    stats: TrainingStats,
    config: TrainConfig,
    /// Snakes whose rewards feed the statistics
    tracked: Vec<SnakeId>,
}

impl TrainMode {
    pub fn new(config: TrainConfig) -> Result<Self> {
        let engine = config.lineup.build(config.game_config.clone())?;

        // Learned snakes when present, otherwise everyone
        let mut tracked: Vec<SnakeId> = config
            .lineup
            .learners()
            .into_iter()
            .map(SnakeId)
            .collect();
        if tracked.is_empty() {
            warn!("no learned snakes in the line-up, nothing will be trained");
            tracked = (0..config.lineup.kinds.len()).map(SnakeId).collect();
        }

        Ok(Self {
            engine,
            stats: TrainingStats::new(100),
            config,
            tracked,
        })
    }

    /// Run every configured round and return the final statistics
    pub fn run(&mut self) -> Result<&TrainingStats> {
        self.print_header();

        for round in 0..self.config.num_rounds {
            if round > 0 {
                self.engine.reset();
            }
            let reward = self.run_round();
            let length = self
                .engine
                .snakes()
                .iter()
                .map(|s| s.len())
                .max()
                .unwrap_or(0);
            self.stats.record_round(reward, self.engine.ticks(), length);
            if let Some(size) = self.table_size() {
                self.stats.record_table_size(size);
            }

            if self.config.log_frequency > 0 && (round + 1) % self.config.log_frequency == 0 {
                info!(
                    "[Round {}/{}] {}",
                    round + 1,
                    self.config.num_rounds,
                    self.stats.format_summary()
                );
            }
        }

        println!("\nTraining complete!");
        for index in self.config.lineup.learners() {
            if let Some(path) = self.config.lineup.table_path_for(index) {
                println!("Q-table of {} saved to: {:?}", SnakeId(index), path);
            }
        }
        println!("\nFinal Statistics:");
        println!("{}", self.stats.format_summary());

        Ok(&self.stats)
    }

    /// Tick one round to completion, returning the tracked snakes' total reward
    fn run_round(&mut self) -> f32 {
        let mut reward = 0.0;
        while !self.engine.is_over() {
            let report = self.engine.tick(None);
            reward += report
                .events
                .iter()
                .filter(|e| self.tracked.contains(&e.id))
                .map(|e| e.reward)
                .sum::<f32>();
        }
        reward
    }

    /// Largest table among the learned snakes
    fn table_size(&self) -> Option<usize> {
        (0..self.engine.snakes().len())
            .filter_map(|i| self.engine.policy(SnakeId(i)).and_then(|p| p.table_len()))
            .max()
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    fn print_header(&self) {
        let learning = &self.config.lineup.learning;
        println!("{}", "=".repeat(70));
        println!("Q-learning Training - Multi Snake");
        println!("{}", "=".repeat(70));
        println!("Rounds: {}", self.config.num_rounds);
        println!(
            "Arena: {}x{}",
            self.config.game_config.grid_width, self.config.game_config.grid_height
        );
        let kinds: Vec<&str> = self.config.lineup.kinds.iter().map(|k| k.as_str()).collect();
        println!("Line-up: {}", kinds.join(", "));
        println!("  Learning rate: {}", learning.learning_rate);
        println!("  Discount: {}", learning.discount);
        println!("  Exploration: {}", learning.exploration_rate);
        println!("Logging: Every {} rounds", self.config.log_frequency);
        println!("{}", "=".repeat(70));
        println!();
    }
}
