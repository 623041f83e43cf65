#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bridge-constrained movement for arena troops.
//!
//! Ground troops may only cross the river at one of the two bridges. A troop
//! whose target lies across the river heads for the vertically closer bridge
//! first; once it stands on the bridge, or when it flies or tunnels, it heads
//! straight for the target. A troop standing on the centreline counts as
//! still being on its owner's half.

use crown_arena_core::{Position, Side, CENTERLINE_X};

/// Speed multiplier applied to slowed troops.
pub const SLOW_SPEED_FACTOR: f32 = 0.65;

/// Smallest distance used when normalizing a direction.
pub const MIN_DISTANCE: f32 = 1.0;

/// River crossings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bridge {
    /// Crossing serving the top lane.
    Top,
    /// Crossing serving the bottom lane.
    Bottom,
}

impl Bridge {
    /// Both bridges, top first.
    pub const ALL: [Bridge; 2] = [Bridge::Top, Bridge::Bottom];

    /// Centre of the bridge.
    #[must_use]
    pub const fn position(self) -> Position {
        match self {
            Self::Top => Position::new(CENTERLINE_X, 85.0),
            Self::Bottom => Position::new(CENTERLINE_X, 235.0),
        }
    }

    /// Bridge vertically closest to `y`; equal distances favour the bottom.
    #[must_use]
    pub fn closest_to(y: f32) -> Self {
        let top = (y - Self::Top.position().y).abs();
        let bottom = (y - Self::Bottom.position().y).abs();
        if top < bottom {
            Self::Top
        } else {
            Self::Bottom
        }
    }
}

/// Movement traits that decide whether the river constrains a troop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mover {
    /// Current centre.
    pub position: Position,
    /// Distance covered per tick before status effects.
    pub speed: f32,
    /// Whether the troop flies over the river.
    pub flying: bool,
    /// Whether the troop travels underground.
    pub burrowed: bool,
    /// Whether the troop is slowed.
    pub slowed: bool,
}

impl Mover {
    /// Distance covered this tick.
    #[must_use]
    pub fn step_length(&self) -> f32 {
        if self.slowed {
            self.speed * SLOW_SPEED_FACTOR
        } else {
            self.speed
        }
    }
}

/// Whether `x` lies beyond the centreline as seen from `side`'s half.
#[must_use]
pub fn has_crossed(side: Side, x: f32) -> bool {
    match side {
        Side::Player => x > CENTERLINE_X,
        Side::Enemy => x < CENTERLINE_X,
    }
}

fn across_river(side: Side, from: Position, to: Position) -> bool {
    has_crossed(side, from.x) != has_crossed(side, to.x)
}

/// Point a mover owned by `side` should walk towards this tick to reach
/// `target`.
#[must_use]
pub fn movement_goal(mover: &Mover, side: Side, target: Position) -> Position {
    if mover.flying || mover.burrowed || !across_river(side, mover.position, target) {
        return target;
    }
    let bridge = Bridge::closest_to(mover.position.y).position();
    if mover.position.distance(bridge) <= mover.step_length() {
        target
    } else {
        bridge
    }
}

/// Unit direction from `from` towards `to`, flooring the distance so that
/// coincident points yield a zero vector instead of NaN.
#[must_use]
pub fn direction(from: Position, to: Position) -> Position {
    let distance = from.distance(to).max(MIN_DISTANCE);
    Position::new((to.x - from.x) / distance, (to.y - from.y) / distance)
}

/// Moves `from` towards `to` by `step`.
#[must_use]
pub fn advance(from: Position, to: Position, step: f32) -> Position {
    let heading = direction(from, to);
    Position::new(from.x + heading.x * step, from.y + heading.y * step)
}

/// Position a mover owned by `side` reaches this tick while chasing
/// `target`.
#[must_use]
pub fn step_towards(mover: &Mover, side: Side, target: Position) -> Position {
    advance(
        mover.position,
        movement_goal(mover, side, target),
        mover.step_length(),
    )
}

/// Position reached when pushed `distance` directly away from `centre`.
#[must_use]
pub fn push_away(position: Position, centre: Position, distance: f32) -> Position {
    let heading = direction(centre, position);
    Position::new(
        position.x + heading.x * distance,
        position.y + heading.y * distance,
    )
}
