//! Stomp Platformer headless driver
//!
//! Runs an autopilot session through the level catalog with a fixed-step
//! accumulator, retrying lost levels and advancing on cleared ones, and keeps
//! the high-score file up to date.
//!
//! Usage: `stomp-platformer --help`

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use stomp_platformer::consts::*;
use stomp_platformer::sim::{LevelCatalog, Round, RoundEvent, RoundStatus, Simulation, idle_input};
use stomp_platformer::{HighScores, SimError, Tuning};

/// Simulated frame length for headless runs (30 fps presentation)
const FRAME_DT: f32 = 1.0 / 30.0;
/// Default session length in ticks (two minutes)
const DEFAULT_TICKS: u64 = 120 * TICK_RATE as u64;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// JSON level catalog (defaults to the built-in levels)
    #[arg(long, value_name = "FILE")]
    levels: Option<PathBuf>,

    /// JSON tuning overrides
    #[arg(long, value_name = "FILE")]
    tuning: Option<PathBuf>,

    /// Session length in simulation ticks
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_TICKS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    ticks: u64,

    /// High-score file, created if missing
    #[arg(long, value_name = "FILE")]
    highscores: Option<PathBuf>,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Game instance holding all driver state
struct Game {
    sim: Simulation,
    round: Round,
    accumulator: f32,
    ticks_run: u64,
    high_scores: HighScores,
    last_status: RoundStatus,
    finished: bool,
}

impl Game {
    fn new(sim: Simulation, high_scores: HighScores) -> Self {
        let round = sim.start();
        Self {
            sim,
            round,
            accumulator: 0.0,
            ticks_run: 0,
            high_scores,
            last_status: RoundStatus::Playing,
            finished: false,
        }
    }

    /// Run simulation ticks for one presented frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = idle_input(&self.round);
            self.round = self.sim.tick(&self.round, &input);
            self.accumulator -= SIM_DT;
            self.ticks_run += 1;
            substeps += 1;

            for event in &self.round.events {
                if let RoundEvent::ScoreChanged { score } = event
                    && self.high_scores.observe(*score)
                {
                    log::debug!("New best score: {}", score);
                }
            }

            if self.round.status != self.last_status {
                self.on_status_change();
            }
            if self.finished {
                return;
            }
        }
    }

    /// Leave a terminal status the way a player would
    fn on_status_change(&mut self) {
        match self.round.status {
            RoundStatus::Lost => {
                log::info!(
                    "Lost on level {} with score {} ({} adversaries left), retrying",
                    self.round.level_index + 1,
                    self.round.score,
                    self.round.adversaries_left()
                );
                self.round = self.sim.retry(&self.round);
            }
            RoundStatus::WonLevel => match self.sim.advance_level(&self.round) {
                Ok(next) => self.round = next,
                Err(SimError::NoNextLevel { .. }) => {
                    log::info!("All levels complete! Final score {}", self.round.score);
                    self.finished = true;
                }
                Err(e) => {
                    log::error!("Could not advance: {}", e);
                    self.finished = true;
                }
            },
            RoundStatus::Playing => {}
        }
        self.last_status = self.round.status;
    }
}

fn run(args: CliArgs) -> Result<(), SimError> {
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let catalog = match &args.levels {
        Some(path) => LevelCatalog::load(path, &tuning)?,
        None => LevelCatalog::builtin(&tuning)?,
    };
    let high_scores = match &args.highscores {
        Some(path) => HighScores::load(path)?,
        None => HighScores::new(),
    };

    log::info!("{} levels, best score so far {}", catalog.len(), high_scores.best);

    let mut game = Game::new(Simulation::new(catalog, tuning), high_scores);
    while !game.finished && game.ticks_run < args.ticks {
        game.update(FRAME_DT);
    }

    let level = game.round.level_index + 1;
    let score = game.round.score;
    log::info!(
        "Session over after {} ticks: level {}, score {}, {} adversaries left",
        game.ticks_run,
        level,
        score,
        game.round.adversaries_left()
    );

    if let Some(rank) = game.high_scores.add_score(score, level, unix_now()) {
        log::info!("New high score! Rank #{}", rank);
    }
    if let Some(path) = &args.highscores {
        game.high_scores.save(path)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Stomp Platformer (headless) starting...");

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
