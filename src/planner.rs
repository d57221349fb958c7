//! Backward best-first search over plan actions
//!
//! The map is seeded with a Finish action at the goal (cost 0) and expanded
//! backward: each admitted action asks which predecessor cells could reach it
//! in one move. With a start cell the frontier is ordered by cost plus the
//! Manhattan distance to the start, so the search behaves like A* with an
//! admissible unit-cost heuristic; without one the heuristic term is zero and
//! the whole reachable region inside `max_cost` is mapped Dijkstra-style.

use bevy::prelude::*;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::action::{Action, ActionChain, ActionKey, ActionKind};
use crate::actor::PlatformerActor;
use crate::constants::DEFAULT_MAX_COST;
use crate::expand::expand_platformer;

/// Admitted action plus the link to its successor (the action one step closer
/// to the goal).
struct SearchNode {
    action: Action,
    next: Option<usize>,
}

/// Frontier entry. Ordered so the binary heap pops the lowest priority first,
/// with insertion order as the tie-break to keep searches deterministic.
struct FrontierEntry {
    id: usize,
    priority: u32,
    seq: u64,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Search state and result map for one goal. Reusable: `build` clears all
/// prior state, and after a build the map answers `action_at` queries for
/// every admitted cell, not just the returned chain.
#[derive(Resource)]
pub struct PlanMap {
    nodes: Vec<SearchNode>,
    index: HashMap<ActionKey, usize>,
    frontier: BinaryHeap<FrontierEntry>,
    seq: u64,
    start: Option<IVec2>,
}

impl Default for PlanMap {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanMap {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            frontier: BinaryHeap::new(),
            seq: 0,
            start: None,
        }
    }

    /// Build the map backward from `goal` using the standard platformer
    /// expansion. Returns the start-to-goal chain as soon as `start` is
    /// popped, or `None` when the frontier drains (start given) or after the
    /// whole region is mapped (no start).
    pub fn build<A: PlatformerActor + ?Sized>(
        &mut self,
        actor: &A,
        goal: IVec2,
        region: IRect,
        start: Option<IVec2>,
        max_cost: u32,
    ) -> Option<ActionChain> {
        self.build_with(actor, goal, region, start, max_cost, expand_platformer)
    }

    /// `build` with `goal` padded by `margin` cells on every side, clipped to
    /// the map bounds. A margin of 0 searches the whole map.
    pub fn build_around<A: PlatformerActor + ?Sized>(
        &mut self,
        actor: &A,
        goal: IVec2,
        margin: u32,
        start: Option<IVec2>,
    ) -> Option<ActionChain> {
        let region = if margin == 0 {
            actor.grid_bounds()
        } else {
            let m = margin as i32;
            IRect::new(goal.x - m, goal.y - m, goal.x + m, goal.y + m)
        };
        self.build(actor, goal, region, start, DEFAULT_MAX_COST)
    }

    /// Build with a caller-supplied expansion rule. The rule receives every
    /// settled action and admits predecessors through `admit`; this is the
    /// hook for context-carrying searches layered on top of plain movement.
    pub fn build_with<A: PlatformerActor + ?Sized>(
        &mut self,
        actor: &A,
        goal: IVec2,
        region: IRect,
        start: Option<IVec2>,
        max_cost: u32,
        mut expand: impl FnMut(&mut Self, &A, IRect, usize, &Action),
    ) -> Option<ActionChain> {
        self.nodes.clear();
        self.index.clear();
        self.frontier.clear();
        self.seq = 0;
        self.start = start;

        let region = actor.grid_bounds().intersect(region);
        self.admit(Action::new(ActionKind::Finish, goal, 0, None), None);

        let mut settled = 0_u32;
        while let Some(entry) = self.frontier.pop() {
            let key = self.nodes[entry.id].action.key();
            // A cheaper admission for the same key supersedes this entry.
            if self.index.get(&key) != Some(&entry.id) {
                continue;
            }
            settled += 1;
            let action = self.nodes[entry.id].action.clone();
            if start == Some(action.cell) {
                debug!(
                    "plan found: goal={goal} start={} cost={} ({settled} settled)",
                    action.cell, action.cost
                );
                return Some(self.trace(entry.id));
            }
            if action.cost >= max_cost {
                continue;
            }
            expand(self, actor, region, entry.id, &action);
        }
        debug!("plan exhausted: goal={goal} start={start:?} ({settled} settled)");
        None
    }

    /// Admit a predecessor action linking to the settled node `next`. Kept
    /// only when no action with the same key exists at equal or lower cost.
    pub fn admit(&mut self, action: Action, next: Option<usize>) {
        let key = action.key();
        if let Some(&prev) = self.index.get(&key)
            && self.nodes[prev].action.cost <= action.cost
        {
            return;
        }
        let priority = match self.start {
            Some(s) => {
                let d = (action.cell - s).abs();
                action.cost.saturating_add((d.x + d.y) as u32)
            }
            None => action.cost,
        };
        let id = self.nodes.len();
        self.nodes.push(SearchNode { action, next });
        self.index.insert(key, id);
        self.frontier.push(FrontierEntry {
            id,
            priority,
            seq: self.seq,
        });
        self.seq += 1;
    }

    /// Cheapest admitted action at `cell` for the given context, if the last
    /// build reached it.
    pub fn action_at(&self, cell: IVec2, context: Option<&str>) -> Option<&Action> {
        let key = ActionKey {
            x: cell.x,
            y: cell.y,
            context: context.map(str::to_owned),
        };
        self.index.get(&key).map(|&id| &self.nodes[id].action)
    }

    /// Follow successor links from `id` to the Finish marker.
    fn trace(&self, id: usize) -> ActionChain {
        let mut actions = Vec::new();
        let mut cur = Some(id);
        while let Some(i) = cur {
            actions.push(self.nodes[i].action.clone());
            cur = self.nodes[i].next;
        }
        ActionChain::new(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_MAX_COST;
    use crate::testing::{AsciiWorld, TestActor};

    fn plan(world: &AsciiWorld, goal: IVec2, start: IVec2) -> Option<ActionChain> {
        let actor = TestActor::new(world, start);
        let mut map = PlanMap::new();
        map.build(&actor, goal, world.bounds(), Some(start), DEFAULT_MAX_COST)
    }

    #[test]
    fn test_flat_walk_chain() {
        let world = AsciiWorld::parse(
            "........\n\
             ########",
        );
        let start = IVec2::new(0, 0);
        let goal = IVec2::new(4, 0);
        let chain = plan(&world, goal, start).expect("walkable corridor");
        assert_eq!(chain.first_cell(), Some(start));
        assert_eq!(chain.goal_cell(), Some(goal));
        assert_eq!(chain.total_cost(), 4);
        let kinds: Vec<ActionKind> = chain.iter().map(|a| a.kind).collect();
        assert!(kinds[..kinds.len() - 1].iter().all(|k| *k == ActionKind::Walk));
        assert_eq!(*kinds.last().unwrap(), ActionKind::Finish);
        // Costs decrease by one per walk step down to the goal.
        let costs: Vec<u32> = chain.iter().map(|a| a.cost).collect();
        assert_eq!(costs, vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_walled_goal_is_unreachable() {
        let world = AsciiWorld::parse(
            "...#....\n\
             ########",
        );
        assert!(plan(&world, IVec2::new(5, 0), IVec2::new(0, 0)).is_none());
    }

    #[test]
    fn test_max_cost_prunes_the_search() {
        let world = AsciiWorld::parse(
            "........\n\
             ########",
        );
        let actor = TestActor::new(&world, IVec2::new(0, 0));
        let mut map = PlanMap::new();
        let found = map.build(
            &actor,
            IVec2::new(6, 0),
            world.bounds(),
            Some(IVec2::new(0, 0)),
            3,
        );
        assert!(found.is_none());
    }

    #[test]
    fn test_jump_reaches_a_raised_platform() {
        let world = AsciiWorld::parse(
            ".......\n\
             .......\n\
             ...=...\n\
             .......\n\
             #######",
        );
        let start = IVec2::new(0, 3);
        let goal = IVec2::new(3, 1);
        let chain = plan(&world, goal, start).expect("platform is jumpable");
        assert_eq!(chain.first_cell(), Some(start));
        assert_eq!(chain.goal_cell(), Some(goal));
        assert_eq!(chain.total_cost(), 5);
        let kinds: Vec<ActionKind> = chain.iter().map(|a| a.kind).collect();
        assert_eq!(kinds.iter().filter(|k| **k == ActionKind::Jump).count(), 1);
        // The takeoff is on the floor row; the step after it is the goal.
        let jump_at = kinds.iter().position(|k| *k == ActionKind::Jump).unwrap();
        assert_eq!(jump_at, chain.len() - 2);
        assert_eq!(chain.get(jump_at).unwrap().cell.y, 3);
    }

    #[test]
    fn test_fall_crosses_a_ledge_drop() {
        let world = AsciiWorld::parse(
            "......\n\
             ==....\n\
             ......\n\
             ......\n\
             ......\n\
             ######",
        );
        let start = IVec2::new(0, 0);
        let goal = IVec2::new(3, 4);
        let chain = plan(&world, goal, start).expect("drop is survivable");
        let kinds: Vec<ActionKind> = chain.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![ActionKind::Walk, ActionKind::Fall, ActionKind::Finish]
        );
        let cells: Vec<IVec2> = chain.iter().map(|a| a.cell).collect();
        assert_eq!(
            cells,
            vec![IVec2::new(0, 0), IVec2::new(1, 0), IVec2::new(3, 4)]
        );
        assert_eq!(chain.total_cost(), 7);
    }

    #[test]
    fn test_gap_crossing_falls_then_jumps_never_walks() {
        // The ledge and the goal platform are separated by a gap with a lower
        // shelf: the only route drops off the ledge onto the shelf and jumps
        // back up. A walk straight across row 0 must never be admitted.
        let world = AsciiWorld::parse(
            "......\n\
             ==....\n\
             ....==\n\
             ......\n\
             ...###",
        );
        let start = IVec2::new(0, 0);
        let goal = IVec2::new(4, 1);
        let chain = plan(&world, goal, start).expect("gap is crossable");
        let kinds: Vec<ActionKind> = chain.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ActionKind::Walk,
                ActionKind::Fall,
                ActionKind::Jump,
                ActionKind::Finish
            ]
        );
        let cells: Vec<IVec2> = chain.iter().map(|a| a.cell).collect();
        assert_eq!(
            cells,
            vec![
                IVec2::new(0, 0),
                IVec2::new(1, 0),
                IVec2::new(3, 3),
                IVec2::new(4, 1)
            ]
        );
        assert_eq!(chain.total_cost(), 9);
    }

    #[test]
    fn test_ladder_climb_up_and_down() {
        let world = AsciiWorld::parse(
            ".....\n\
             ..|..\n\
             ..|..\n\
             ..|..\n\
             #####",
        );
        let up = plan(&world, IVec2::new(2, 0), IVec2::new(0, 3)).expect("ladder up");
        let kinds: Vec<ActionKind> = up.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ActionKind::Walk,
                ActionKind::Walk,
                ActionKind::Climb,
                ActionKind::Climb,
                ActionKind::Climb,
                ActionKind::Finish
            ]
        );

        let down = plan(&world, IVec2::new(2, 3), IVec2::new(2, 0)).expect("ladder down");
        let kinds: Vec<ActionKind> = down.iter().map(|a| a.kind).collect();
        assert!(kinds[..kinds.len() - 1].iter().all(|k| *k == ActionKind::Climb));
        let cells: Vec<i32> = down.iter().map(|a| a.cell.y).collect();
        assert_eq!(cells, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_build_without_start_maps_the_region() {
        let world = AsciiWorld::parse(
            "........\n\
             ########",
        );
        let actor = TestActor::new(&world, IVec2::new(0, 0));
        let mut map = PlanMap::new();
        let goal = IVec2::new(3, 0);
        assert!(map.build(&actor, goal, world.bounds(), None, DEFAULT_MAX_COST).is_none());
        // Every floor cell is mapped with its walk distance to the goal.
        for x in 0..8 {
            let action = map.action_at(IVec2::new(x, 0), None).expect("mapped cell");
            assert_eq!(action.cost, (x - goal.x).unsigned_abs());
        }
    }

    #[test]
    fn test_build_around_pads_the_goal() {
        let world = AsciiWorld::parse(
            "........\n\
             ########",
        );
        let actor = TestActor::new(&world, IVec2::new(2, 0));
        let mut map = PlanMap::new();
        let goal = IVec2::new(4, 0);
        assert!(map.build_around(&actor, goal, 2, Some(IVec2::new(2, 0))).is_some());
        // A start outside the padded region is never admitted.
        assert!(map.build_around(&actor, goal, 1, Some(IVec2::new(0, 0))).is_none());
        // Margin 0 searches the whole map.
        assert!(map.build_around(&actor, goal, 0, Some(IVec2::new(0, 0))).is_some());
    }

    #[test]
    fn test_admission_keeps_the_cheaper_action() {
        let mut map = PlanMap::new();
        let cell = IVec2::new(2, 2);
        map.admit(Action::new(ActionKind::Walk, cell, 5, None), None);
        map.admit(Action::new(ActionKind::Walk, cell, 7, None), None);
        assert_eq!(map.action_at(cell, None).unwrap().cost, 5);
        map.admit(Action::new(ActionKind::Climb, cell, 3, None), None);
        let kept = map.action_at(cell, None).unwrap();
        assert_eq!(kept.cost, 3);
        assert_eq!(kept.kind, ActionKind::Climb);
    }

    #[test]
    fn test_contexts_occupy_separate_slots() {
        let world = AsciiWorld::parse(
            "....\n\
             ####",
        );
        let actor = TestActor::new(&world, IVec2::new(0, 0));
        let mut map = PlanMap::new();
        let goal = IVec2::new(3, 0);
        let found = map.build_with(
            &actor,
            goal,
            world.bounds(),
            None,
            10,
            |map, _actor, region, id, a0| {
                let p = IVec2::new(a0.cell.x - 1, a0.cell.y);
                if region.contains(p) {
                    map.admit(Action::new(ActionKind::Walk, p, a0.cost + 1, None), Some(id));
                    map.admit(
                        Action::new(ActionKind::Walk, p, a0.cost + 2, Some("laden".into())),
                        Some(id),
                    );
                }
            },
        );
        assert!(found.is_none());
        let p = IVec2::new(2, 0);
        assert_eq!(map.action_at(p, None).unwrap().cost, 1);
        assert_eq!(map.action_at(p, Some("laden")).unwrap().cost, 2);
        assert!(map.action_at(p, Some("other")).is_none());
    }

    #[test]
    fn test_builds_are_deterministic() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
        let mut text = String::new();
        for y in 0..6 {
            for _ in 0..12 {
                let solid = y == 5 || rng.gen_bool(0.2);
                text.push(if solid { '#' } else { '.' });
            }
            text.push('\n');
        }
        let world = AsciiWorld::parse(&text);
        let goal = IVec2::new(6, 4);
        let actor = TestActor::new(&world, IVec2::new(0, 0));

        let mut a = PlanMap::new();
        let mut b = PlanMap::new();
        a.build(&actor, goal, world.bounds(), None, DEFAULT_MAX_COST);
        b.build(&actor, goal, world.bounds(), None, DEFAULT_MAX_COST);
        for y in 0..6 {
            for x in 0..12 {
                let p = IVec2::new(x, y);
                let left = a.action_at(p, None).map(|a| (a.kind, a.cost));
                let right = b.action_at(p, None).map(|a| (a.kind, a.cost));
                assert_eq!(left, right, "divergence at {p}");
            }
        }
    }
}
