//! Actor capability contract - what planning and execution require from the
//! controlled entity
//!
//! The planner never touches tiles directly; it asks the actor, and the actor
//! answers from an occupancy oracle through footprint-sized rectangle checks
//! (see `body`). Plan-time predicates must be pure and mutually consistent
//! for the duration of one `PlanMap::build` call - the search assumes a
//! static world snapshot.

use bevy::prelude::*;

/// Occupancy oracle over the static tile world. All queries take world-space
/// rectangles; the oracle answers for every tile the rectangle overlaps.
pub trait OccupancyOracle {
    /// Any solid tile in `rect` (blocks occupation and jump arcs).
    fn obstructed(&self, rect: Rect) -> bool;
    /// Any climbable tile in `rect` (ladders, vines).
    fn graspable(&self, rect: Rect) -> bool;
    /// Any tile in `rect` that stops a falling actor (solids and one-way
    /// platforms).
    fn stoppable(&self, rect: Rect) -> bool;
}

/// Capability contract for a platformer agent.
///
/// The movement predicates and the two transition queries feed the search;
/// the run-time queries and commands feed the runner. Commands are bounded
/// per-tick requests - the surrounding physics decides what actually happens.
pub trait PlatformerActor {
    // ---- plan-time queries (pure) ----

    /// Grid cell the actor currently occupies.
    fn grid_pos(&self) -> IVec2;
    /// Full extent of the plan grid, in cells (inclusive). Search regions are
    /// clipped to it.
    fn grid_bounds(&self) -> IRect;
    /// World-space footprint at the actor's current position.
    fn grid_box(&self) -> Rect;
    /// World-space footprint the actor would occupy at `cell`.
    fn grid_box_at(&self, cell: IVec2) -> Rect;
    /// Relative offsets reachable by one jump (precomputed, `x >= 0`).
    fn jump_offsets(&self) -> &[IVec2];
    /// Relative offsets reachable by one uncontrolled fall.
    fn fall_offsets(&self) -> &[IVec2];

    /// The footprint at `cell` is free of solids.
    fn can_move_to(&self, cell: IVec2) -> bool;
    /// The footprint at `cell` overlaps something climbable.
    fn can_grab_at(&self, cell: IVec2) -> bool;
    /// Something stoppable sits directly under the footprint at `cell`.
    fn can_stand_at(&self, cell: IVec2) -> bool;
    /// The actor could climb upward into `cell`.
    fn can_climb_up(&self, cell: IVec2) -> bool;
    /// The actor could climb downward out of `cell`.
    fn can_climb_down(&self, cell: IVec2) -> bool;
    /// Nothing stoppable spans the drop corridor from `from` to `to`.
    fn can_fall_to(&self, from: IVec2, to: IVec2) -> bool;
    /// Nothing solid spans the leap corridor from `from` to the tip point
    /// `to`, including the corner-clip wedge test.
    fn can_jump_to(&self, from: IVec2, to: IVec2) -> bool;

    // ---- run-time queries ----

    /// The world-space displacement `v` is currently unobstructed.
    fn can_move(&self, v: Vec2) -> bool;
    /// The actor is in a state from which it can initiate a jump.
    fn can_jump(&self) -> bool;
    /// The actor is in a state from which it can fall freely.
    fn can_fall(&self) -> bool;
    /// Nothing stoppable blocks the arc from here to the footprint at `cell`.
    fn cleared_for(&self, cell: IVec2) -> bool;

    // ---- run-time commands ----

    /// Request one bounded-velocity step toward the center of `cell`.
    fn move_toward(&mut self, cell: IVec2);
    /// Initiate a jump and steer toward the center of `cell`.
    fn jump_toward(&mut self, cell: IVec2);
}
