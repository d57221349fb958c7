//! Plan actions - discrete movement intentions chained toward a goal
//!
//! The search constructs chains goal-to-start; the finished chain is handed
//! to callers start-to-goal as an owned sequence with the Finish marker last.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Movement primitive one plan step asks the actor to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Walk,
    Fall,
    Jump,
    Climb,
    /// Goal marker terminating a chain.
    Finish,
}

/// Key identifying one search slot: cell plus optional application context.
/// Context disambiguates otherwise-identical cells when an application layers
/// extra semantics on top of plain arrival (carrying an object, say).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActionKey {
    pub x: i32,
    pub y: i32,
    pub context: Option<String>,
}

/// One discrete movement intention. `cost` is the remaining cost to the goal:
/// chains are built goal-to-start, so costs decrease along successor links
/// and reach 0 at the Finish marker.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    pub kind: ActionKind,
    pub cell: IVec2,
    pub cost: u32,
    pub context: Option<String>,
}

impl Action {
    pub fn new(kind: ActionKind, cell: IVec2, cost: u32, context: Option<String>) -> Self {
        Self {
            kind,
            cell,
            cost,
            context,
        }
    }

    pub fn key(&self) -> ActionKey {
        ActionKey {
            x: self.cell.x,
            y: self.cell.y,
            context: self.context.clone(),
        }
    }
}

/// Start-to-goal action sequence. Each element owns the step toward its
/// successor; the last element is the Finish marker at the goal cell.
#[derive(Clone, Debug, Default)]
pub struct ActionChain {
    actions: Vec<Action>,
}

impl ActionChain {
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn get(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    /// Cell of the chain head (the start when produced by a search).
    pub fn first_cell(&self) -> Option<IVec2> {
        self.actions.first().map(|a| a.cell)
    }

    /// Cell of the trailing marker (the goal when produced by a search).
    pub fn goal_cell(&self) -> Option<IVec2> {
        self.actions.last().map(|a| a.cell)
    }

    /// Total cost of executing the chain from its head.
    pub fn total_cost(&self) -> u32 {
        self.actions.first().map(|a| a.cost).unwrap_or(0)
    }

    /// Append another leg after the last non-Finish action, dropping the
    /// intermediate goal marker. Used by callers composing multi-leg plans
    /// ("walk to pickup" + "pick" + "walk to drop" + "place").
    pub fn chain(&mut self, next: ActionChain) {
        while self
            .actions
            .last()
            .is_some_and(|a| a.kind == ActionKind::Finish)
        {
            self.actions.pop();
        }
        self.actions.extend(next.actions);
    }
}
