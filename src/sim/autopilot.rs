//! Idle/demo controller
//!
//! Produces input for attract-mode runs: walk toward the nearest adversary and
//! jump when it is close or up on a ledge. Purely a function of the round, so
//! demo runs are as deterministic as the simulation itself.

use super::state::Round;
use super::tick::{Direction, TickInput};

/// Horizontal gap (center to center) at which the player stops steering
const STEER_DEADZONE: f32 = 4.0;
/// Jump when an adversary on the same level is this close
const JUMP_RANGE: f32 = 90.0;
/// Jump toward a higher adversary once roughly underneath it
const CLIMB_RANGE: f32 = 60.0;

/// Compute the next input for an unattended player
pub fn idle_input(round: &Round) -> TickInput {
    let player = &round.player.body;
    let center = player.center();

    // Nearest live adversary by straight-line distance
    let target = round.adversaries.iter().min_by(|a, b| {
        let da = a.body.center().distance_squared(center);
        let db = b.body.center().distance_squared(center);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });

    let Some(target) = target else {
        return TickInput::default();
    };

    let dx = target.body.center().x - center.x;
    let direction = if dx < -STEER_DEADZONE {
        Direction::Left
    } else if dx > STEER_DEADZONE {
        Direction::Right
    } else {
        Direction::None
    };

    let above = target.body.bottom() < player.pos.y;
    let jump = round.player.grounded
        && ((!above && dx.abs() < JUMP_RANGE) || (above && dx.abs() < CLIMB_RANGE));

    TickInput { direction, jump }
}
