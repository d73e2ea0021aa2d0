//! Fixed timestep simulation tick
//!
//! One tick runs the whole pipeline to completion: integrate the player,
//! patrol every adversary, evaluate player/adversary contacts, then update
//! score and status. Each stage is a pure function so it can be tested alone.

use super::collision::{Contact, Platform, classify_contact, resolve_landing};
use super::state::{Adversary, AdversaryId, Player, Round, RoundEvent, RoundStatus};
use crate::tuning::Tuning;

/// Horizontal input direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    None,
    Left,
    Right,
}

/// Logical keys the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    Left,
    Right,
    Jump,
}

impl LogicalKey {
    /// Map a keyboard key name (DOM `KeyboardEvent.key` style) to a logical key
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "a" | "A" => Some(LogicalKey::Left),
            "ArrowRight" | "d" | "D" => Some(LogicalKey::Right),
            "ArrowUp" | "w" | "W" | " " => Some(LogicalKey::Jump),
            _ => None,
        }
    }
}

/// Input snapshot for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub direction: Direction,
    /// Jump held; only acts while grounded
    pub jump: bool,
}

impl TickInput {
    /// Collapse a set of held keys into a tick input (left wins over right)
    pub fn from_held<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = LogicalKey>,
    {
        let (mut left, mut right, mut jump) = (false, false, false);
        for key in keys {
            match key {
                LogicalKey::Left => left = true,
                LogicalKey::Right => right = true,
                LogicalKey::Jump => jump = true,
            }
        }

        let direction = if left {
            Direction::Left
        } else if right {
            Direction::Right
        } else {
            Direction::None
        };

        Self { direction, jump }
    }
}

/// Advance the player by one tick
///
/// Horizontal velocity comes straight from input (no momentum). A jump only
/// starts from the ground. Gravity always applies, then position integrates,
/// x is clamped to the playfield, and the player snaps onto the first platform
/// it is landing on. Finally y is clamped to the playfield floor.
pub fn integrate_player(
    player: &Player,
    input: &TickInput,
    platforms: &[Platform],
    tuning: &Tuning,
) -> Player {
    let mut next = *player;
    let body = &mut next.body;

    body.vel.x = match input.direction {
        Direction::Left => -tuning.move_speed,
        Direction::Right => tuning.move_speed,
        Direction::None => 0.0,
    };

    if input.jump && next.grounded {
        body.vel.y = tuning.jump_impulse;
        next.jumping = true;
        next.grounded = false;
    }

    body.vel.y += tuning.gravity;
    body.pos += body.vel;

    let max_x = (tuning.field_width - body.size.x).max(0.0);
    body.pos.x = body.pos.x.clamp(0.0, max_x);

    next.grounded = false;
    if resolve_landing(body, platforms, tuning.landing_tolerance) {
        next.jumping = false;
        next.grounded = true;
    }

    if body.pos.y > tuning.field_height {
        body.pos.y = tuning.field_height;
        body.vel.y = 0.0;
    }

    next
}

/// Advance one adversary by one tick
///
/// Patrol motion is unconditional. The direction flips when the moved x is at
/// or past either bound, so the body can overshoot by up to one step before
/// turning back. Vertical motion uses the same gravity and landing snap as the
/// player.
pub fn step_adversary(adversary: &Adversary, platforms: &[Platform], tuning: &Tuning) -> Adversary {
    let mut next = adversary.clone();
    let body = &mut next.body;

    body.vel.x = tuning.adversary_speed * next.direction.sign();
    body.pos.x += body.vel.x;

    if body.pos.x <= next.patrol_start || body.pos.x >= next.patrol_end {
        next.direction = next.direction.reversed();
    }

    body.vel.y += tuning.gravity;
    body.pos.y += body.vel.y;
    resolve_landing(body, platforms, tuning.landing_tolerance);

    next
}

/// Result of evaluating every live adversary against the player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interactions {
    /// Adversaries stomped this tick, in level order
    pub defeated: Vec<AdversaryId>,
    /// Adversaries that hit the player, in level order
    pub hits: Vec<AdversaryId>,
}

impl Interactions {
    pub fn player_hit(&self) -> bool {
        !self.hits.is_empty()
    }
}

/// Classify every player/adversary contact for the tick
///
/// The stomp test runs first for each adversary; only if it fails does an
/// overlap count as a hit.
pub fn evaluate_interactions(
    player: &Player,
    adversaries: &[Adversary],
    tuning: &Tuning,
) -> Interactions {
    let mut result = Interactions::default();
    for adversary in adversaries {
        match classify_contact(&player.body, &adversary.body, tuning.stomp_max_penetration) {
            Contact::Stomp => result.defeated.push(adversary.id),
            Contact::Hit => result.hits.push(adversary.id),
            Contact::None => {}
        }
    }
    result
}

/// Advance the round by one fixed timestep
///
/// Returns the next round; `round` itself is left untouched. Rounds that are
/// not `Playing` come back unchanged apart from having no events.
pub fn tick(round: &Round, input: &TickInput, tuning: &Tuning) -> Round {
    let mut next = round.clone();
    next.events.clear();

    if !round.is_playing() {
        log::debug!("Tick ignored: round is {:?}", round.status);
        return next;
    }

    next.time_ticks += 1;
    let platforms = &round.level.platforms;

    // Player
    next.player = integrate_player(&round.player, input, platforms, tuning);
    if input.jump && round.player.grounded {
        next.events.push(RoundEvent::Jumped);
    }
    if next.player.grounded && !round.player.grounded {
        next.events.push(RoundEvent::Landed);
    }

    // Adversaries
    next.adversaries = round
        .adversaries
        .iter()
        .map(|a| step_adversary(a, platforms, tuning))
        .collect();

    // Contacts
    let interactions = evaluate_interactions(&next.player, &next.adversaries, tuning);

    if !interactions.defeated.is_empty() {
        next.adversaries
            .retain(|a| !interactions.defeated.contains(&a.id));
        next.score += tuning.points_per_defeat * interactions.defeated.len() as u64;
        next.player.body.vel.y = tuning.stomp_bounce_velocity;

        for &id in &interactions.defeated {
            next.events.push(RoundEvent::AdversaryDefeated { id });
        }
        next.events.push(RoundEvent::ScoreChanged { score: next.score });
        log::debug!(
            "Defeated {} adversaries, score {}",
            interactions.defeated.len(),
            next.score
        );
    }

    if let Some(&id) = interactions.hits.first() {
        next.status = RoundStatus::Lost;
        next.events.push(RoundEvent::PlayerHit { id });
        log::info!(
            "Level {} lost at tick {} (hit by {:?})",
            next.level_index + 1,
            next.time_ticks,
            id
        );
    } else if next.adversaries.is_empty() {
        next.status = RoundStatus::WonLevel;
        next.events.push(RoundEvent::LevelCleared);
        log::info!(
            "Level {} cleared at tick {} with score {}",
            next.level_index + 1,
            next.time_ticks,
            next.score
        );
    }

    next
}
