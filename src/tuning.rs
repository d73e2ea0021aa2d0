//! Physics tuning
//!
//! Every number the simulation reads at tick time. Defaults mirror
//! [`crate::consts`]; a JSON file may override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::SimError;
use crate::consts::*;

/// Physics and scoring parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub field_width: f32,
    pub field_height: f32,

    // === Kinematics ===
    /// Added to vy every tick
    pub gravity: f32,
    /// vy set on a grounded jump (negative = up)
    pub jump_impulse: f32,
    /// Player horizontal speed
    pub move_speed: f32,
    /// Adversary patrol speed
    pub adversary_speed: f32,

    // === Collision ===
    /// Depth below a platform's underside still treated as its top band
    pub landing_tolerance: f32,
    /// Stomp only if the player's bottom is less than this past the adversary's top
    pub stomp_max_penetration: f32,
    /// Player vy after a stomp
    pub stomp_bounce_velocity: f32,

    // === Scoring ===
    pub points_per_defeat: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            move_speed: MOVE_SPEED,
            adversary_speed: ADVERSARY_SPEED,

            landing_tolerance: LANDING_TOLERANCE,
            stomp_max_penetration: STOMP_MAX_PENETRATION,
            stomp_bounce_velocity: STOMP_BOUNCE_VELOCITY,

            points_per_defeat: POINTS_PER_DEFEAT,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON (missing fields keep their defaults)
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }
}
