//! Action runner - executes a plan chain one tick at a time
//!
//! Each tick dispatches on the current action, issues at most one movement
//! command, and advances the chain index when the actor's cell matches the
//! current step's destination. A watchdog counts ticks without progress and
//! cancels the run when the timeout elapses; any advance or a committed jump
//! resets it.

use bevy::prelude::*;

use crate::action::{ActionChain, ActionKind};
use crate::actor::PlatformerActor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunnerStatus {
    Running,
    Completed,
    Cancelled,
}

/// Executes an `ActionChain` against a live actor.
#[derive(Component)]
pub struct ActionRunner {
    chain: ActionChain,
    index: usize,
    /// Set once a jump is initiated; the rest of the arc (tip point to
    /// landing) executes with fall steering regardless of the step's kind.
    committed_fall: bool,
    /// Watchdog limit in ticks, `None` for unbounded runs.
    timeout: Option<u32>,
    ticks_since_progress: u32,
    status: RunnerStatus,
}

impl ActionRunner {
    pub fn new(chain: ActionChain, timeout: Option<u32>) -> Self {
        Self {
            chain,
            index: 0,
            committed_fall: false,
            timeout,
            ticks_since_progress: 0,
            status: RunnerStatus::Running,
        }
    }

    pub fn status(&self) -> RunnerStatus {
        self.status
    }

    pub fn chain(&self) -> &ActionChain {
        &self.chain
    }

    /// Index of the step currently being executed.
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Advance one tick. Idempotent once the run has completed or cancelled.
    pub fn update<A: PlatformerActor + ?Sized>(&mut self, actor: &mut A) -> RunnerStatus {
        if self.status != RunnerStatus::Running {
            return self.status;
        }
        let progressed = self.execute(actor);
        if progressed {
            self.ticks_since_progress = 0;
        } else {
            self.ticks_since_progress += 1;
            if let Some(limit) = self.timeout
                && self.ticks_since_progress >= limit
            {
                debug!(
                    "run cancelled at step {} after {limit} stalled ticks",
                    self.index
                );
                self.status = RunnerStatus::Cancelled;
            }
        }
        self.status
    }

    fn execute<A: PlatformerActor + ?Sized>(&mut self, actor: &mut A) -> bool {
        let Some(action) = self.chain.get(self.index) else {
            self.status = RunnerStatus::Completed;
            return true;
        };
        let Some(next) = self.chain.get(self.index + 1) else {
            self.status = RunnerStatus::Completed;
            return true;
        };
        if action.kind == ActionKind::Finish {
            self.status = RunnerStatus::Completed;
            return true;
        }

        let dst = next.cell;
        let kind = if self.committed_fall {
            ActionKind::Fall
        } else {
            action.kind
        };

        match kind {
            ActionKind::Walk | ActionKind::Climb => {
                let cur = actor.grid_pos();
                actor.move_toward(dst);
                if cur == dst {
                    self.advance();
                    return true;
                }
                false
            }
            ActionKind::Fall => {
                let cur = actor.grid_pos();
                // Steer toward the furthest safe cell of the local path this
                // tick; mid-arc there may be none, which is fine.
                for p in find_simple_path(actor, cur, dst) {
                    let v = actor.grid_box_at(p).min - actor.grid_box().min;
                    if actor.can_move(v) {
                        actor.move_toward(p);
                        break;
                    }
                }
                if cur == dst {
                    self.advance();
                    return true;
                }
                false
            }
            ActionKind::Jump => {
                if actor.can_jump() && actor.can_fall() && actor.cleared_for(dst) {
                    actor.jump_toward(dst);
                    self.committed_fall = true;
                    return true;
                }
                // Not ready yet: hold position until the preconditions hold.
                actor.move_toward(actor.grid_pos());
                false
            }
            ActionKind::Finish => unreachable!(),
        }
    }

    fn advance(&mut self) {
        self.index += 1;
        self.committed_fall = false;
    }
}

/// Monotone local path from `p0` to `p1`, goal-first.
///
/// Runs a small DP over the axis-aligned rectangle between the two cells:
/// steps move one cell at a time toward `p1` on either axis, and only cells
/// whose footprint is unobstructed can carry the path. The returned list
/// starts at `p1` and follows predecessor links back toward `p0`; when the
/// chain is broken the list stops short of `p0` and callers should treat it
/// as advisory steering only.
pub fn find_simple_path<A: PlatformerActor + ?Sized>(
    actor: &A,
    p0: IVec2,
    p1: IVec2,
) -> Vec<IVec2> {
    let vx = (p1.x - p0.x).signum();
    let vy = (p1.y - p0.y).signum();
    let w = (p1.x - p0.x).abs() as usize;
    let h = (p1.y - p0.y).abs() as usize;

    #[derive(Clone, Copy)]
    struct Entry {
        p: IVec2,
        d: u32,
        prev: Option<(usize, usize)>,
    }

    let mut rows: Vec<Vec<Entry>> = Vec::with_capacity(h + 1);
    for iy in 0..=h {
        let mut row: Vec<Entry> = Vec::with_capacity(w + 1);
        for ix in 0..=w {
            let p = IVec2::new(p0.x + ix as i32 * vx, p0.y + iy as i32 * vy);
            let mut e = Entry {
                p,
                d: u32::MAX,
                prev: None,
            };
            if ix == 0 && iy == 0 {
                e.d = 0;
            } else if actor.can_move_to(p) {
                let left = (ix > 0).then(|| row[ix - 1]).filter(|c| c.d != u32::MAX);
                let below = (iy > 0)
                    .then(|| rows[iy - 1][ix])
                    .filter(|c| c.d != u32::MAX);
                match (left, below) {
                    // On ties the same-column predecessor wins, so open
                    // rectangles trace horizontal-first paths.
                    (Some(l), Some(b)) => {
                        if b.d <= l.d {
                            e.d = b.d + 1;
                            e.prev = Some((iy - 1, ix));
                        } else {
                            e.d = l.d + 1;
                            e.prev = Some((iy, ix - 1));
                        }
                    }
                    (Some(l), None) => {
                        e.d = l.d + 1;
                        e.prev = Some((iy, ix - 1));
                    }
                    (None, Some(b)) => {
                        e.d = b.d + 1;
                        e.prev = Some((iy - 1, ix));
                    }
                    (None, None) => {}
                }
            }
            row.push(e);
        }
        rows.push(row);
    }

    let mut path = Vec::new();
    let mut cur = Some((h, w));
    while let Some((iy, ix)) = cur {
        let e = rows[iy][ix];
        path.push(e.p);
        cur = e.prev;
    }
    path
}
