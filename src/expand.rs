//! Standard platformer expansion - predecessors of one settled action
//!
//! For a settled action at `p0`, admits every cell an actor could leave by a
//! single move and arrive at `p0`: climbs from the rows above and below,
//! walks from the adjacent columns, fall takeoffs above, and jump origins
//! below. Ballistic candidates come from the actor's precomputed offset
//! tables; offsets are stored rightward-only and mirrored here through the
//! direction factor `vx`.
//!
//! A jump step sits at its takeoff cell and its destination (the successor's
//! cell) is the arc's tip point, not the landing; the runner covers the
//! descent from tip to landing as a fall. Predecessors of a Fall action are
//! therefore allowed to be mid-air jump origins, which is what lets a plan
//! express the full arc in two steps.

use bevy::prelude::*;

use crate::action::{Action, ActionKind};
use crate::actor::PlatformerActor;
use crate::planner::PlanMap;

pub fn expand_platformer<A: PlatformerActor + ?Sized>(
    map: &mut PlanMap,
    actor: &A,
    region: IRect,
    id: usize,
    a0: &Action,
) {
    let p0 = a0.cell;
    let cost = a0.cost;
    let standing = actor.can_stand_at(p0);

    // Climb down into p0 from the cell above. Climb candidates carry no
    // occupancy gate; the climb predicates alone decide.
    let dp = IVec2::new(p0.x, p0.y - 1);
    if region.contains(dp) && actor.can_climb_down(dp) {
        map.admit(Action::new(ActionKind::Climb, dp, cost + 1, None), Some(id));
    }

    // Climb up into p0 from the cell below.
    let up = IVec2::new(p0.x, p0.y + 1);
    if region.contains(up) && actor.can_climb_up(up) {
        map.admit(Action::new(ActionKind::Climb, up, cost + 1, None), Some(id));
    }

    for vx in [-1_i32, 1_i32] {
        // Walk into p0 from the adjacent column.
        let wp = IVec2::new(p0.x - vx, p0.y);
        if region.contains(wp)
            && actor.can_move_to(wp)
            && (actor.can_grab_at(wp) || actor.can_stand_at(wp))
        {
            map.admit(Action::new(ActionKind::Walk, wp, cost + 1, None), Some(id));
        }

        // Fall takeoffs: cells above p0 from which an uncontrolled drop lands
        // here. Only meaningful when the actor can settle at p0.
        if standing {
            for v in actor.fall_offsets() {
                if v.x == 0 && vx < 0 {
                    continue;
                }
                let fp = p0 - IVec2::new(v.x * vx, v.y);
                if region.contains(fp)
                    && actor.can_move_to(fp)
                    && actor.can_fall_to(fp, p0)
                {
                    let dc = (v.x.abs() + v.y.abs()) as u32;
                    map.admit(Action::new(ActionKind::Fall, fp, cost + dc, None), Some(id));
                }
            }
        }

        // Jump origins: cells below p0 from which a jump tips out here.
        // When the settled action is itself a Fall, p0 is mid-arc and the
        // origin needs no ground under p0; otherwise jumps only start toward
        // standable cells.
        let airborne = a0.kind == ActionKind::Fall;
        if airborne || standing {
            for v in actor.jump_offsets() {
                if v.x == 0 && (vx < 0 || !airborne) {
                    continue;
                }
                let jp = p0 - IVec2::new(v.x * vx, v.y);
                if region.contains(jp)
                    && actor.can_move_to(jp)
                    && (actor.can_grab_at(jp) || actor.can_stand_at(jp))
                    && actor.can_jump_to(jp, p0)
                {
                    let dc = (v.x.abs() + v.y.abs()) as u32;
                    map.admit(Action::new(ActionKind::Jump, jp, cost + dc, None), Some(id));
                }
            }
        }
    }
}
