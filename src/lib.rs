//! Stomp Platformer - a side-scrolling stomp-the-adversary platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, round state machine)
//! - `tuning`: Data-driven physics balance
//! - `highscores`: Best-score tracking and leaderboard persistence
//! - `error`: Error taxonomy for catalog and state-machine commands

pub mod error;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use highscores::HighScores;
pub use tuning::Tuning;

/// Game configuration constants
///
/// Physics values are expressed per tick. The landing band and stomp depth are
/// tuned against `GRAVITY` and `JUMP_IMPULSE` at this tick rate; change them
/// together or not at all.
pub mod consts {
    /// Fixed simulation rate
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds (wall-clock length of one tick)
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (y grows downward)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Downward acceleration added to vy every tick
    pub const GRAVITY: f32 = 0.6;
    /// Vertical velocity applied on a grounded jump (negative = up)
    pub const JUMP_IMPULSE: f32 = -15.0;
    /// Player horizontal speed while a direction is held
    pub const MOVE_SPEED: f32 = 5.0;
    /// Adversary patrol speed
    pub const ADVERSARY_SPEED: f32 = 2.0;

    pub const PLAYER_SIZE: f32 = 40.0;
    pub const ADVERSARY_SIZE: f32 = 35.0;
    pub const PLATFORM_THICKNESS: f32 = 20.0;

    /// Extra depth below a platform's underside that still counts as landing on it
    pub const LANDING_TOLERANCE: f32 = 10.0;
    /// A stomp must penetrate the adversary's top edge by less than this
    pub const STOMP_MAX_PENETRATION: f32 = 15.0;
    /// Player vy after a stomp
    pub const STOMP_BOUNCE_VELOCITY: f32 = -10.0;
    /// Score awarded per defeated adversary
    pub const POINTS_PER_DEFEAT: u64 = 100;
}
