//! Platplan - grid-space motion planning for platformer agents
//!
//! Builds plans backward from a goal over discrete walk, climb, fall, and
//! jump moves, then executes them one tick at a time against a live actor.

// Core modules
pub mod action;
pub mod actor;
pub mod constants;
pub mod grid;
pub mod snapshot;
pub mod testing;
pub mod tuning;

// Planning and execution modules
pub mod body;
pub mod expand;
pub mod planner;
pub mod reachability;
pub mod runner;

// Re-export commonly used types for convenience
pub use action::{Action, ActionChain, ActionKey, ActionKind};
pub use actor::{OccupancyOracle, PlatformerActor};
pub use body::GridBody;
pub use constants::*;
pub use expand::expand_platformer;
pub use grid::GridTransform;
pub use planner::PlanMap;
pub use reachability::{
    JumpFn, ReachProfile, compute_fall_offsets, compute_jump_offsets, default_jump_fn,
};
pub use runner::{ActionRunner, RunnerStatus, find_simple_path};
pub use snapshot::{ChainSnapshot, StepSnapshot};
pub use tuning::{PLANNER_TUNING_FILE, PlannerTuning};
