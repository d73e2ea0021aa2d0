//! Axis-aligned collision detection and platform landing
//!
//! Everything in the playfield is an axis-aligned rectangle. Overlap is
//! strict on both axes, so rectangles that only share an edge do not touch.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Body;

/// Axis-aligned bounding box (top-left corner + size, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap on the x axis only
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    /// Strict overlap on both axes
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.top() < other.bottom() && self.bottom() > other.top()
    }
}

/// A static platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Check whether a body is landing on a platform this tick
///
/// Landing requires the body to be falling or at rest (never while rising
/// through the platform), to overlap the platform horizontally, and to have
/// its bottom edge inside the band from the platform's top down to its
/// underside plus `tolerance`.
pub fn is_landing(body: &Body, platform: &Platform, tolerance: f32) -> bool {
    let plat = platform.aabb();
    let bottom = body.bottom();

    body.vel.y >= 0.0
        && body.aabb().overlaps_x(&plat)
        && bottom >= plat.top()
        && bottom <= plat.bottom() + tolerance
}

/// First platform (in level order) the body is landing on
pub fn find_landing<'a>(
    body: &Body,
    platforms: &'a [Platform],
    tolerance: f32,
) -> Option<&'a Platform> {
    platforms.iter().find(|p| is_landing(body, p, tolerance))
}

/// Snap a body onto the first platform it is landing on
///
/// Returns true if the body landed (its bottom now rests on the platform top
/// and its vertical velocity is zero).
pub fn resolve_landing(body: &mut Body, platforms: &[Platform], tolerance: f32) -> bool {
    match find_landing(body, platforms, tolerance) {
        Some(platform) => {
            body.pos.y = platform.pos.y - body.size.y;
            body.vel.y = 0.0;
            true
        }
        None => false,
    }
}

/// Outcome of a player touching an adversary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// No overlap
    None,
    /// Shallow downward landing on the adversary's top
    Stomp,
    /// Any other overlap
    Hit,
}

/// Classify the player/adversary overlap
///
/// A stomp needs the player strictly descending (`vy > 0`) with its bottom
/// edge less than `max_penetration` past the adversary's top edge.
pub fn classify_contact(player: &Body, adversary: &Body, max_penetration: f32) -> Contact {
    if !player.aabb().overlaps(&adversary.aabb()) {
        return Contact::None;
    }

    let penetration = player.bottom() - adversary.pos.y;
    if player.vel.y > 0.0 && penetration < max_penetration {
        Contact::Stomp
    } else {
        Contact::Hit
    }
}
