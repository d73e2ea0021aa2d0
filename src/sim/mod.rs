//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - No randomness
//! - Stable iteration order (level-definition order)
//! - No rendering, audio, input-capture or storage dependencies

pub mod autopilot;
pub mod collision;
pub mod level;
pub mod round;
pub mod state;
pub mod tick;

pub use autopilot::idle_input;
pub use collision::{
    Aabb, Contact, Platform, classify_contact, find_landing, is_landing, resolve_landing,
};
pub use level::{AdversarySpawn, Level, LevelCatalog, LevelDef, builtin_levels};
pub use round::Simulation;
pub use state::{
    Adversary, AdversaryId, Body, PatrolDirection, Player, Round, RoundEvent, RoundStatus,
};
pub use tick::{
    Direction, Interactions, LogicalKey, TickInput, evaluate_interactions, integrate_player,
    step_adversary, tick,
};
