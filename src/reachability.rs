//! Ballistic reachability - grid offsets reachable by one jump or fall
//!
//! Simulates trajectories tick-by-tick for a given horizontal speed and
//! vertical-velocity integrator, independent of world geometry. The planner
//! applies geometry afterward through the capability predicates. Offsets are
//! computed once per actor configuration with `x >= 0` and mirrored by the
//! expansion rule for leftward motion.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::constants::*;

/// One tick of the jump/fall integrator: returns the next vertical velocity.
/// `hold` is `Some(t)` while the jump impulse is still applied at tick `t`,
/// `None` once the trajectory is in free fall. Negative velocity is upward.
pub type JumpFn = fn(vy: f32, hold: Option<u32>) -> f32;

/// Reference jump dynamics: constant ascent while held, gravity-capped fall
/// once released.
pub fn default_jump_fn(vy: f32, hold: Option<u32>) -> f32 {
    match hold {
        Some(_) => -JUMP_RISE_SPEED,
        None => (vy + GRAVITY_STEP).min(MAX_FALL_SPEED),
    }
}

/// Offsets reachable by a single jump, for every release tick in
/// `[1, max_ticks)`. Each trajectory is swept at its tip point (the first
/// tick where vertical velocity turns non-negative): every cell from `x = 0`
/// to the current horizontal position is recorded at the tip's row. The zero
/// offset is never included.
pub fn compute_jump_offsets(
    cell_size: f32,
    speed: f32,
    jump_fn: JumpFn,
    max_ticks: u32,
) -> Vec<IVec2> {
    assert!(cell_size > 0.0, "cell size must be positive");
    assert!(speed > 0.0, "horizontal speed must be positive");
    let mut seen: HashSet<(i32, i32)> = HashSet::new();
    let mut pts = Vec::new();
    for jt in 1..max_ticks {
        let mut p = Vec2::ZERO;
        let mut vy = 0.0_f32;
        for t in 0..max_ticks {
            vy = if t < jt {
                jump_fn(vy, Some(t))
            } else {
                jump_fn(vy, None)
            };
            if vy >= 0.0 {
                // Tip point: record the swept columns at the apex row.
                sweep(&mut seen, &mut pts, cell_size, p);
                break;
            }
            p.x += speed;
            p.y += vy;
        }
    }
    pts
}

/// Offsets reachable by an uncontrolled fall: the same sweep, with no ascent
/// phase and no break condition, accumulating every tick up to `max_ticks`.
pub fn compute_fall_offsets(
    cell_size: f32,
    speed: f32,
    jump_fn: JumpFn,
    max_ticks: u32,
) -> Vec<IVec2> {
    assert!(cell_size > 0.0, "cell size must be positive");
    assert!(speed > 0.0, "horizontal speed must be positive");
    let mut seen: HashSet<(i32, i32)> = HashSet::new();
    let mut pts = Vec::new();
    let mut p = Vec2::ZERO;
    let mut vy = 0.0_f32;
    for _ in 0..max_ticks {
        vy = jump_fn(vy, None);
        p.x += speed;
        p.y += vy;
        sweep(&mut seen, &mut pts, cell_size, p);
    }
    pts
}

/// Record every cell from `x = 0` to `p.x` at `p`'s row, excluding the
/// origin. Deduplication is by exact cell equality; insertion order is kept
/// so expansion enumerates candidates deterministically.
fn sweep(seen: &mut HashSet<(i32, i32)>, pts: &mut Vec<IVec2>, cell_size: f32, p: Vec2) {
    let cy = (p.y / cell_size).ceil() as i32;
    let mut x = 0.0_f32;
    while x <= p.x {
        let c = IVec2::new((x / cell_size + 0.5).floor() as i32, cy);
        if c != IVec2::ZERO && seen.insert((c.x, c.y)) {
            pts.push(c);
        }
        x += 1.0;
    }
}

/// Precomputed ballistic offsets for one actor configuration (horizontal
/// speed plus jump integrator). Computed once and reused across searches.
#[derive(Resource, Clone, Debug)]
pub struct ReachProfile {
    pub speed: f32,
    pub jump_offsets: Vec<IVec2>,
    pub fall_offsets: Vec<IVec2>,
}

impl ReachProfile {
    pub fn compute(cell_size: f32, speed: f32, jump_fn: JumpFn) -> Self {
        Self {
            speed,
            jump_offsets: compute_jump_offsets(cell_size, speed, jump_fn, MAX_SIM_TICKS),
            fall_offsets: compute_fall_offsets(cell_size, speed, jump_fn, MAX_SIM_TICKS),
        }
    }
}
