//! Tunable constants for the planner
//!
//! Compile-time defaults; hosts override the run-time knobs via
//! [`crate::tuning::PlannerTuning`].

// =============================================================================
// SEARCH BOUNDS
// =============================================================================

/// Ballistic simulation cap in ticks. Bounds both the jump-release scan and
/// the fall sweep in `reachability`.
pub const MAX_SIM_TICKS: u32 = 15;

/// Default cost bound for `PlanMap::build_around`.
pub const DEFAULT_MAX_COST: u32 = 20;

/// Default region margin for `PlanMap::build_around` (0 = whole map).
pub const DEFAULT_REGION_MARGIN: u32 = 0;

/// Default runner watchdog, in ticks without progress.
pub const DEFAULT_RUNNER_TIMEOUT: u32 = 120;

// =============================================================================
// REFERENCE JUMP DYNAMICS (pixels per tick)
// =============================================================================

/// Ascent rate while the jump is held.
pub const JUMP_RISE_SPEED: f32 = 8.0;
/// Per-tick gravity once the jump is released.
pub const GRAVITY_STEP: f32 = 2.0;
/// Terminal fall speed.
pub const MAX_FALL_SPEED: f32 = 16.0;

/// Default horizontal speed, pixels per tick.
pub const DEFAULT_SPEED: f32 = 4.0;
