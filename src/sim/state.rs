//! Round state and core simulation types
//!
//! A [`Round`] is the full snapshot handed to collaborators each tick. It is
//! treated as a value: every transition builds a new Round from the previous
//! one, nothing is mutated through shared references.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::level::Level;
use crate::consts::PLAYER_SIZE;

/// Status of the current level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    /// Ticks are being applied
    Playing,
    /// The player touched an adversary without stomping it
    Lost,
    /// Every adversary in the level was defeated
    WonLevel,
}

/// A moving axis-aligned body (player or adversary)
///
/// `size` is fixed for the body's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner (y grows downward)
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// The controllable character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// In the air because of a jump (cleared on landing)
    pub jumping: bool,
    /// Resting on a platform this tick; only a grounded player may jump
    pub grounded: bool,
}

impl Player {
    /// Spawn a player at `pos`, airborne until the first landing check
    pub fn spawn(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, Vec2::splat(PLAYER_SIZE)),
            jumping: false,
            grounded: false,
        }
    }
}

/// Stable handle of an adversary within one level instance
///
/// Assigned from the adversary's slot in the level definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AdversaryId(pub u32);

/// Horizontal patrol direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PatrolDirection {
    Left,
    #[default]
    Right,
}

impl PatrolDirection {
    /// -1.0 for left, +1.0 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            PatrolDirection::Left => -1.0,
            PatrolDirection::Right => 1.0,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            PatrolDirection::Left => PatrolDirection::Right,
            PatrolDirection::Right => PatrolDirection::Left,
        }
    }
}

/// A patrolling adversary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adversary {
    pub id: AdversaryId,
    pub body: Body,
    pub direction: PatrolDirection,
    /// Left patrol bound (x of the body's left edge)
    pub patrol_start: f32,
    /// Right patrol bound, `>= patrol_start`
    pub patrol_end: f32,
}

/// Something that happened during a tick, for audio/high-score collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// The player left the ground with a jump
    Jumped,
    /// The player came to rest on a platform after being airborne
    Landed,
    AdversaryDefeated { id: AdversaryId },
    /// Score increased to the given value
    ScoreChanged { score: u64 },
    /// The player touched this adversary from the side or below
    PlayerHit { id: AdversaryId },
    /// The last adversary was removed
    LevelCleared,
}

/// One attempt at one level (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Catalog index of the level being played
    pub level_index: usize,
    /// Immutable level data, shared with the catalog
    pub level: Arc<Level>,
    /// Accumulated score (carried over by retry and level advance)
    pub score: u64,
    pub status: RoundStatus,
    pub player: Player,
    /// Live adversaries, in level-definition order
    pub adversaries: Vec<Adversary>,
    /// Ticks applied during this attempt
    pub time_ticks: u64,
    /// Events produced by the most recent tick
    #[serde(skip)]
    pub events: Vec<RoundEvent>,
}

impl Round {
    /// Fresh Playing round for a level, starting from `score`
    pub fn new(level_index: usize, level: Arc<Level>, score: u64) -> Self {
        let player = Player::spawn(level.spawn);
        let adversaries = level.adversaries.clone();
        Self {
            level_index,
            level,
            score,
            status: RoundStatus::Playing,
            player,
            adversaries,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.status == RoundStatus::Playing
    }

    /// Number of adversaries still alive
    pub fn adversaries_left(&self) -> usize {
        self.adversaries.len()
    }
}
