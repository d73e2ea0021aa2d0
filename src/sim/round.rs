//! Round state machine
//!
//! [`Simulation`] owns the level catalog and tuning and is the single entry
//! point for advancing a round: `tick` while Playing, and the explicit
//! commands `retry`, `advance_level` and `restart` to leave a terminal state.
//! Every command takes the current round by reference and returns a new one.

use super::level::LevelCatalog;
use super::state::{Round, RoundStatus};
use super::tick::{TickInput, tick};
use crate::SimError;
use crate::tuning::Tuning;

/// Level catalog plus tuning: everything needed to run rounds
#[derive(Debug, Clone)]
pub struct Simulation {
    catalog: LevelCatalog,
    tuning: Tuning,
}

impl Simulation {
    pub fn new(catalog: LevelCatalog, tuning: Tuning) -> Self {
        Self { catalog, tuning }
    }

    /// Built-in catalog with default tuning
    pub fn with_builtin_levels() -> Result<Self, SimError> {
        let tuning = Tuning::default();
        let catalog = LevelCatalog::builtin(&tuning)?;
        Ok(Self::new(catalog, tuning))
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Fresh Playing round for a level, with score 0
    pub fn load_level(&self, index: usize) -> Result<Round, SimError> {
        let level = self.catalog.get(index)?;
        log::info!("Loading level {} '{}'", index + 1, level.name);
        Ok(Round::new(index, level, 0))
    }

    /// Start a new game on the first level
    pub fn start(&self) -> Round {
        Round::new(0, self.catalog.first(), 0)
    }

    /// Advance one fixed step
    pub fn tick(&self, round: &Round, input: &TickInput) -> Round {
        tick(round, input, &self.tuning)
    }

    /// Reload the current level's initial state, keeping the score
    pub fn retry(&self, round: &Round) -> Round {
        log::info!("Retrying level {}", round.level_index + 1);
        Round::new(round.level_index, round.level.clone(), round.score)
    }

    pub fn has_next_level(&self, round: &Round) -> bool {
        self.catalog.has_next(round.level_index)
    }

    /// Load the next level, keeping the score
    ///
    /// Only valid from `WonLevel` when another level exists.
    pub fn advance_level(&self, round: &Round) -> Result<Round, SimError> {
        if round.status != RoundStatus::WonLevel || !self.has_next_level(round) {
            return Err(SimError::NoNextLevel {
                level_index: round.level_index,
                status: round.status,
            });
        }

        let index = round.level_index + 1;
        let level = self.catalog.get(index)?;
        log::info!(
            "Advancing to level {} '{}' with score {}",
            index + 1,
            level.name,
            round.score
        );
        Ok(Round::new(index, level, round.score))
    }

    /// Reset score to 0 and reload the first level
    pub fn restart(&self, _round: &Round) -> Round {
        log::info!("Restarting from level 1");
        self.start()
    }

    /// True once the final level is won
    pub fn is_complete(&self, round: &Round) -> bool {
        round.status == RoundStatus::WonLevel && !self.has_next_level(round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::Direction;

    fn sim() -> Simulation {
        Simulation::with_builtin_levels().unwrap()
    }

    #[test]
    fn test_load_level() {
        let sim = sim();
        let round = sim.load_level(1).unwrap();
        assert_eq!(round.level_index, 1);
        assert_eq!(round.status, RoundStatus::Playing);
        assert_eq!(round.score, 0);
        assert_eq!(round.adversaries.len(), round.level.adversaries.len());

        let err = sim.load_level(99).unwrap_err();
        assert!(matches!(err, SimError::InvalidLevelIndex { index: 99, .. }));
    }

    #[test]
    fn test_retry_keeps_score_and_resets_bodies() {
        let sim = sim();
        let mut round = sim.start();
        let input = TickInput {
            direction: Direction::Right,
            jump: false,
        };
        for _ in 0..20 {
            round = sim.tick(&round, &input);
        }
        round.score = 300;
        round.status = RoundStatus::Lost;

        let retried = sim.retry(&round);
        assert_eq!(retried.score, 300);
        assert_eq!(retried.status, RoundStatus::Playing);
        assert_eq!(retried.time_ticks, 0);
        assert_eq!(retried.player.body.pos, retried.level.spawn);
        assert_eq!(retried.adversaries, retried.level.adversaries);
    }

    #[test]
    fn test_advance_requires_won_level() {
        let sim = sim();
        let round = sim.start();
        let before = round.clone();

        let err = sim.advance_level(&round).unwrap_err();
        assert!(matches!(
            err,
            SimError::NoNextLevel {
                level_index: 0,
                status: RoundStatus::Playing
            }
        ));
        assert_eq!(round, before);
    }

    #[test]
    fn test_advance_keeps_score() {
        let sim = sim();
        let mut round = sim.start();
        round.status = RoundStatus::WonLevel;
        round.score = 500;

        let next = sim.advance_level(&round).unwrap();
        assert_eq!(next.level_index, 1);
        assert_eq!(next.score, 500);
        assert_eq!(next.status, RoundStatus::Playing);
    }

    #[test]
    fn test_no_level_after_last() {
        let sim = sim();
        let mut round = sim.load_level(2).unwrap();
        round.status = RoundStatus::WonLevel;

        assert!(sim.is_complete(&round));
        assert!(matches!(
            sim.advance_level(&round),
            Err(SimError::NoNextLevel { level_index: 2, .. })
        ));
    }

    #[test]
    fn test_restart_resets_score() {
        let sim = sim();
        let mut round = sim.load_level(2).unwrap();
        round.score = 1200;
        round.status = RoundStatus::Lost;

        let restarted = sim.restart(&round);
        assert_eq!(restarted.level_index, 0);
        assert_eq!(restarted.score, 0);
        assert_eq!(restarted.status, RoundStatus::Playing);
        assert_eq!(restarted, sim.load_level(0).unwrap());
    }
}
