use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use multi_snake::game::GameConfig;
use multi_snake::modes::{Lineup, RoundMode, TrainConfig, TrainMode};
use tracing_subscriber::filter::EnvFilter;

/// Tick cap used when neither the CLI nor the config file sets one
const DEFAULT_MAX_TICKS: u64 = 2000;

#[derive(Parser)]
#[command(name = "multi_snake")]
#[command(version, about = "Multi-agent snake arena with learning controllers")]
struct Cli {
    #[arg(long, default_value = "round")]
    mode: Mode,

    /// JSON game configuration; CLI flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Arena width, walls included
    #[arg(long)]
    width: Option<usize>,

    /// Arena height, walls included
    #[arg(long)]
    height: Option<usize>,

    /// Seed for the round's random generator
    #[arg(long)]
    seed: Option<u64>,

    /// End a round after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Comma-separated controllers: fixed, random, heuristic, learned
    #[arg(long, default_value = "learned,heuristic")]
    snakes: String,

    /// Heuristic snakes also avoid walls and bodies
    #[arg(long)]
    cautious: bool,

    /// Q-table file for learned snakes; several learners use <stem>.<index>.<ext>
    #[arg(long)]
    table: Option<PathBuf>,

    /// Number of training rounds
    #[arg(long, default_value = "1000")]
    episodes: usize,

    /// Log training progress every N rounds
    #[arg(long, default_value = "100")]
    log_frequency: usize,

    /// Learning rate
    #[arg(long)]
    alpha: Option<f32>,

    /// Discount factor
    #[arg(long)]
    gamma: Option<f32>,

    /// Exploration rate
    #[arg(long)]
    epsilon: Option<f32>,

    /// Keys for fixed-input snakes, one per tick ('.' = none, '^v<>' = arrows)
    #[arg(long, default_value = "")]
    script: String,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play a single headless round and print the scoreboard
    Round,
    /// Train learned snakes over many rounds
    Train,
}

fn game_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)
            .with_context(|| format!("Failed to load game config {:?}", path))?,
        None => GameConfig::default(),
    };
    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    config.max_ticks = cli.max_ticks.or(config.max_ticks).or(Some(DEFAULT_MAX_TICKS));
    Ok(config)
}

fn lineup(cli: &Cli) -> Result<Lineup> {
    let mut lineup = Lineup::parse(&cli.snakes)?;
    lineup.cautious = cli.cautious;
    lineup.table_path = cli.table.clone();
    if let Some(alpha) = cli.alpha {
        lineup.learning.learning_rate = alpha;
    }
    if let Some(gamma) = cli.gamma {
        lineup.learning.discount = gamma;
    }
    if let Some(epsilon) = cli.epsilon {
        lineup.learning.exploration_rate = epsilon;
    }
    Ok(lineup)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = game_config(&cli)?;
    let lineup = lineup(&cli)?;

    match cli.mode {
        Mode::Round => {
            let mut round_mode = RoundMode::new(config, &lineup, &cli.script)?;
            round_mode.run()?;
        }
        Mode::Train => {
            let mut train_config = TrainConfig::new(cli.episodes, config, lineup);
            train_config.log_frequency = cli.log_frequency;
            let mut train_mode = TrainMode::new(train_config)?;
            train_mode.run()?;
        }
    }

    Ok(())
}
