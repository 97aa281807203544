#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Quiz Defence session.
//!
//! An automatic player answers questions with a configurable accuracy and
//! spends gold on towers, which makes the binary useful for balancing runs
//! and for smoke-testing the simulation end to end.

mod player;
mod questions;
mod scores;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, trace};
use quiz_defence_core::PlayState;
use quiz_defence_simulation::{MemoryScoreStore, ScoreStore, Session, SessionConfig};

use player::AutoPlayer;
use questions::ArithmeticQuestions;
use scores::FileScoreStore;

#[derive(Parser, Debug)]
#[command(name = "quiz-defence")]
#[command(about = "Runs a headless Quiz Defence session with an automatic player")]
struct Cli {
    /// TOML file with session settings; omitted fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the configured random seed
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides the configured question topic (addition, subtraction, multiplication)
    #[arg(long)]
    topic: Option<String>,
    /// Number of ticks to simulate before stopping
    #[arg(long, default_value_t = 3_000)]
    ticks: u64,
    /// Probability that the automatic player answers correctly
    #[arg(long, default_value_t = 0.8)]
    accuracy: f64,
    /// Ticks between two combat answers
    #[arg(long, default_value_t = 8)]
    answer_every: u64,
    /// File that keeps the best score between runs
    #[arg(long)]
    scores: Option<PathBuf>,
}

/// Entry point for the Quiz Defence command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let scores: Box<dyn ScoreStore> = match &cli.scores {
        Some(path) => Box::new(FileScoreStore::open(path)?),
        None => Box::new(MemoryScoreStore::new()),
    };

    let seed = config.rng_seed;
    let mut session = Session::new(config, Box::new(ArithmeticQuestions::new(seed)), scores);
    let mut player = AutoPlayer::new(cli.accuracy, cli.answer_every, seed);
    println!("{}", session.welcome_banner());

    let mut elapsed = 0;
    while elapsed < cli.ticks {
        player.act(&mut session, elapsed);
        for event in session.tick() {
            trace!("{event:?}");
        }
        elapsed += 1;

        if session.snapshot().play_state == PlayState::GameOver {
            break;
        }
    }

    let snapshot = session.snapshot();
    info!("stopped after {elapsed} ticks");
    println!("wave:       {}", snapshot.wave.plan.wave());
    println!("score:      {}", snapshot.score);
    println!(
        "best score: {}",
        snapshot
            .best_score
            .map_or_else(|| "none".to_owned(), |best| best.to_string())
    );
    println!("gold:       {}", snapshot.gold);
    println!("lives:      {}", snapshot.lives);
    println!("towers:     {}", snapshot.towers.len());
    if snapshot.play_state == PlayState::GameOver {
        println!("game over");
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read session config at {}", path.display()))?;
            toml::from_str(&text).with_context(|| {
                format!("failed to parse session config at {}", path.display())
            })?
        }
        None => SessionConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.rng_seed = seed;
    }
    if let Some(topic) = &cli.topic {
        config.topic = Some(topic.clone());
    }
    Ok(config)
}
