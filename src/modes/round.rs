//! Headless single round
//!
//! Runs one round of the configured line-up to completion, feeding scripted
//! keys to fixed-input snakes, and prints the final scoreboard.

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use tracing::info;

use super::lineup::{parse_script, Lineup};
use crate::game::{GameConfig, GameEngine};
use crate::metrics::ScoreReport;

pub struct RoundMode {
    engine: GameEngine,
    script: Vec<Option<KeyCode>>,
}

impl RoundMode {
    /// Set up a round; `script` holds one key character per tick
    pub fn new(config: GameConfig, lineup: &Lineup, script: &str) -> Result<Self> {
        let engine = lineup.build(config)?;
        Ok(Self {
            engine,
            script: parse_script(script),
        })
    }

    /// Play the round out and return its score report
    pub fn run(&mut self) -> Result<ScoreReport> {
        info!(
            snakes = self.engine.snakes().len(),
            width = self.engine.arena().width(),
            height = self.engine.arena().height(),
            "starting round"
        );
        let script = &self.script;
        let report = self
            .engine
            .run_with(|tick| script.get(tick as usize).copied().flatten())
            .cloned()
            .context("Round ended without a score report")?;

        println!("{}", report);
        let leaders: Vec<String> = report.leaders().iter().map(|id| id.to_string()).collect();
        println!("Longest: {}", leaders.join(", "));
        Ok(report)
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }
}
