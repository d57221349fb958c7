//! Planner tuning - runtime knobs loaded from JSON
//!
//! Hosts tweak these without recompiling; a missing or malformed file falls
//! back to the built-in defaults with a warning. Unknown fields are ignored
//! and missing fields take their defaults, so the file can be partial.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::*;

pub const PLANNER_TUNING_FILE: &str = "config/planner_tuning.json";

fn default_speed() -> f32 {
    DEFAULT_SPEED
}

fn default_max_sim_ticks() -> u32 {
    MAX_SIM_TICKS
}

fn default_max_cost() -> u32 {
    DEFAULT_MAX_COST
}

fn default_region_margin() -> u32 {
    DEFAULT_REGION_MARGIN
}

fn default_runner_timeout() -> Option<u32> {
    Some(DEFAULT_RUNNER_TIMEOUT)
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct PlannerTuning {
    /// Horizontal speed fed to the ballistic simulation, world units per tick.
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Trajectory simulation horizon in ticks.
    #[serde(default = "default_max_sim_ticks")]
    pub max_sim_ticks: u32,
    /// Search cutoff: actions at or beyond this cost are not expanded.
    #[serde(default = "default_max_cost")]
    pub max_cost: u32,
    /// Cells of padding around the goal for `build_around`; 0 searches the
    /// whole map.
    #[serde(default = "default_region_margin")]
    pub region_margin: u32,
    /// Runner watchdog in ticks, `None` for unbounded runs.
    #[serde(default = "default_runner_timeout")]
    pub runner_timeout: Option<u32>,
}

impl Default for PlannerTuning {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            max_sim_ticks: default_max_sim_ticks(),
            max_cost: default_max_cost(),
            region_margin: default_region_margin(),
            runner_timeout: default_runner_timeout(),
        }
    }
}

impl PlannerTuning {
    pub fn load() -> Self {
        Self::load_from(Path::new(PLANNER_TUNING_FILE))
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(tuning) => {
                    info!("loaded planner tuning from {}", path.display());
                    tuning
                }
                Err(err) => {
                    warn!("bad planner tuning in {}: {err}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                info!("no planner tuning at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) {
        let text = match serde_json::to_string_pretty(self) {
            Ok(text) => text,
            Err(err) => {
                warn!("could not serialize planner tuning: {err}");
                return;
            }
        };
        if let Some(dir) = path.parent()
            && let Err(err) = fs::create_dir_all(dir)
        {
            warn!("could not create {}: {err}", dir.display());
            return;
        }
        if let Err(err) = fs::write(path, text) {
            warn!("could not write {}: {err}", path.display());
        }
    }
}
