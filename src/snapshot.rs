//! Plan snapshots - serializable views of a finished chain
//!
//! Debug output for log capture and tooling; grid cells are flattened to
//! plain tuples so the JSON stays engine-agnostic.

use serde::Serialize;

use crate::action::{ActionChain, ActionKind};

#[derive(Serialize, Debug, Clone)]
pub struct StepSnapshot {
    pub kind: ActionKind,
    pub cell: (i32, i32),
    pub cost: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct ChainSnapshot {
    pub total_cost: u32,
    pub steps: Vec<StepSnapshot>,
}

impl ChainSnapshot {
    pub fn from_chain(chain: &ActionChain) -> Self {
        Self {
            total_cost: chain.total_cost(),
            steps: chain
                .iter()
                .map(|a| StepSnapshot {
                    kind: a.kind,
                    cell: (a.cell.x, a.cell.y),
                    cost: a.cost,
                    context: a.context.clone(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
