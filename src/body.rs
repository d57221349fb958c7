//! Footprint geometry backing the standard capability predicates
//!
//! The actor occupies multiple cells, so every predicate operates on its
//! footprint rectangle, never a bare cell. `GridBody` packages the standard
//! semantics so a host only supplies an `OccupancyOracle`; the corner-clip
//! wedge test is preserved exactly, including for footprints larger than one
//! cell.

use bevy::prelude::*;

use crate::actor::OccupancyOracle;
use crate::grid::GridTransform;
use crate::reachability::{JumpFn, ReachProfile};

fn shifted(rect: Rect, d: Vec2) -> Rect {
    Rect {
        min: rect.min + d,
        max: rect.max + d,
    }
}

/// Footprint, speed, and reachability data for one actor configuration.
#[derive(Clone, Debug)]
pub struct GridBody {
    pub grid: GridTransform,
    /// Tile edge length of the underlying map (the corner-clip test operates
    /// in tile space even when the plan grid subdivides tiles).
    pub tile_size: f32,
    /// Hitbox rounded up to whole cells.
    pub box_size: Vec2,
    /// Horizontal speed, world units per tick.
    pub speed: f32,
    pub reach: ReachProfile,
}

impl GridBody {
    pub fn new(
        grid: GridTransform,
        tile_size: f32,
        hitbox: Vec2,
        speed: f32,
        jump_fn: JumpFn,
    ) -> Self {
        assert!(tile_size > 0.0, "tile size must be positive");
        assert!(hitbox.x > 0.0 && hitbox.y > 0.0, "hitbox must be positive");
        assert!(speed > 0.0, "speed must be positive");
        let gs = grid.cell_size;
        let box_size = Vec2::new((hitbox.x / gs).ceil() * gs, (hitbox.y / gs).ceil() * gs);
        let reach = ReachProfile::compute(gs, speed, jump_fn);
        Self {
            grid,
            tile_size,
            box_size,
            speed,
            reach,
        }
    }

    /// Footprint rectangle centered on the cell's world center.
    pub fn box_at(&self, cell: IVec2) -> Rect {
        Rect::from_center_size(self.grid.grid_to_world(cell), self.box_size)
    }

    /// One bounded step from `from` toward the center of `cell`.
    pub fn step_toward(&self, from: Vec2, cell: IVec2) -> Vec2 {
        let v = self.box_at(cell).center() - from;
        v.clamp(Vec2::splat(-self.speed), Vec2::splat(self.speed))
    }

    pub fn can_move_to(&self, world: &impl OccupancyOracle, cell: IVec2) -> bool {
        !world.obstructed(self.box_at(cell))
    }

    pub fn can_grab_at(&self, world: &impl OccupancyOracle, cell: IVec2) -> bool {
        world.graspable(self.box_at(cell))
    }

    /// Stand = something stoppable one cell under the feet.
    pub fn can_stand_at(&self, world: &impl OccupancyOracle, cell: IVec2) -> bool {
        world.stoppable(shifted(self.box_at(cell), Vec2::new(0.0, self.grid.cell_size)))
    }

    pub fn can_climb_up(&self, world: &impl OccupancyOracle, cell: IVec2) -> bool {
        world.graspable(self.box_at(cell))
    }

    /// Climbing down needs something graspable below the whole footprint.
    pub fn can_climb_down(&self, world: &impl OccupancyOracle, cell: IVec2) -> bool {
        world.graspable(shifted(self.box_at(cell), Vec2::new(0.0, self.box_size.y)))
    }

    /// Nothing stoppable may span the corridor between the takeoff footprint
    /// at `p0` and the landing footprint at `p1`:
    /// ```text
    ///   +--+.....
    ///   |  |.....
    ///   +-X+..... (p0) takeoff
    ///  ##   .....
    ///       .+--+
    ///       .|  |
    ///       .+-X+ (p1) landing
    ///       ######
    /// ```
    pub fn can_fall_to(&self, world: &impl OccupancyOracle, p0: IVec2, p1: IVec2) -> bool {
        let hb0 = self.box_at(p0);
        let hb1 = self.box_at(p1);
        let xc = if hb0.min.x < hb1.min.x {
            hb0.max.x
        } else {
            hb0.min.x
        };
        let rect = Rect::new(
            xc.min(hb1.min.x),
            hb0.min.y.min(hb1.min.y),
            xc.max(hb1.max.x),
            hb0.max.y.max(hb1.max.y),
        );
        !world.stoppable(rect)
    }

    /// Jump admission: the corridor from the takeoff footprint at `p0` up to
    /// the tip-point footprint at `p1` must be free of solids, and the
    /// landing pocket must not form a corner wedge:
    /// ```text
    ///       .# <- blocked ahead, open behind
    ///     +--+
    ///     |  |   (the arc cannot thread this diagonal gap)
    ///     +-X+
    ///        # <- blocked below
    /// ```
    pub fn can_jump_to(&self, world: &impl OccupancyOracle, p0: IVec2, p1: IVec2) -> bool {
        let hb0 = self.box_at(p0);
        let hb1 = self.box_at(p1);
        let xc = if p0.x < p1.x { hb1.min.x } else { hb1.max.x };
        let rect = Rect::new(
            xc.min(hb0.min.x),
            hb0.min.y.min(hb1.min.y),
            xc.max(hb0.max.x),
            hb0.max.y.max(hb1.max.y),
        );
        if world.obstructed(rect) {
            return false;
        }

        let dx = (p1.x - p0.x).signum();
        if dx != 0 {
            let tiles = self.tile_span(hb1);
            let fwd_x = if dx > 0 { tiles.max.x } else { tiles.min.x };
            let top = IVec2::new(fwd_x, tiles.min.y);
            let bottom = IVec2::new(fwd_x, tiles.max.y);
            if world.obstructed(self.tile_rect(top))
                && !world.obstructed(self.tile_rect(top - IVec2::new(dx, 0)))
                && world.obstructed(self.tile_rect(bottom))
            {
                return false;
            }
        }
        true
    }

    /// Nothing stoppable between the actor's current footprint `cur` and the
    /// landing footprint at `p1`. Used by the runner before committing a leap.
    pub fn cleared_between(&self, world: &impl OccupancyOracle, cur: Rect, p1: IVec2) -> bool {
        let hb1 = self.box_at(p1);
        let xc = if cur.min.x < hb1.min.x {
            hb1.min.x
        } else {
            hb1.max.x
        };
        let rect = Rect::new(
            xc.min(cur.min.x),
            cur.min.y.min(hb1.min.y),
            xc.max(cur.max.x),
            cur.max.y.max(hb1.max.y),
        );
        !world.stoppable(rect)
    }

    /// Tile indices overlapped by a world rectangle.
    fn tile_span(&self, rect: Rect) -> IRect {
        let ts = self.tile_size;
        let min = (rect.min / ts).floor().as_ivec2();
        let max = ((rect.max / ts).ceil() - 1.0).as_ivec2();
        IRect {
            min,
            max: max.max(min),
        }
    }

    /// World rectangle of a single tile.
    fn tile_rect(&self, tile: IVec2) -> Rect {
        let min = tile.as_vec2() * self.tile_size;
        Rect {
            min,
            max: min + self.tile_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reachability::default_jump_fn;
    use crate::testing::AsciiWorld;

    fn body_for(world: &AsciiWorld, hitbox: Vec2) -> GridBody {
        GridBody::new(world.grid(), 16.0, hitbox, 4.0, default_jump_fn)
    }

    #[test]
    fn test_hitbox_rounds_up_to_whole_cells() {
        let world = AsciiWorld::parse(
            "....\n\
             ####",
        );
        let body = body_for(&world, Vec2::new(12.0, 28.0));
        assert_eq!(body.box_size, Vec2::new(16.0, 32.0));
    }

    #[test]
    fn test_stand_and_grab_predicates() {
        let world = AsciiWorld::parse(
            ".|..\n\
             .|..\n\
             ##..",
        );
        let body = body_for(&world, Vec2::splat(16.0));
        assert!(body.can_stand_at(&world, IVec2::new(0, 1)));
        assert!(!body.can_stand_at(&world, IVec2::new(2, 1)));
        assert!(body.can_grab_at(&world, IVec2::new(1, 0)));
        assert!(body.can_climb_up(&world, IVec2::new(1, 1)));
        // Climb-down probes one footprint-height below.
        assert!(body.can_climb_down(&world, IVec2::new(1, 0)));
        assert!(!body.can_climb_down(&world, IVec2::new(3, 0)));
    }

    #[test]
    fn test_fall_corridor_rejects_stoppable_overlap() {
        let blocked = AsciiWorld::parse(
            ".....\n\
             ..=..\n\
             .....\n\
             #####",
        );
        let body = body_for(&blocked, Vec2::splat(16.0));
        assert!(!body.can_fall_to(&blocked, IVec2::new(0, 0), IVec2::new(3, 2)));

        let open = AsciiWorld::parse(
            ".....\n\
             .....\n\
             .....\n\
             #####",
        );
        assert!(body.can_fall_to(&open, IVec2::new(0, 0), IVec2::new(3, 2)));
    }

    #[test]
    fn test_jump_corner_clip_rejects_diagonal_wedge() {
        // Tall (2-cell) footprint at the tip point (3,1); the wedge is a
        // solid ahead of the top corner, open behind it, solid below.
        let wedge = AsciiWorld::parse(
            "...#.\n\
             .....\n\
             ...#.\n\
             .....",
        );
        let body = body_for(&wedge, Vec2::new(16.0, 32.0));
        assert!(!body.can_jump_to(&wedge, IVec2::new(1, 2), IVec2::new(3, 1)));

        // Without the lower solid the wedge test passes.
        let no_bottom = AsciiWorld::parse(
            "...#.\n\
             .....\n\
             .....\n\
             .....",
        );
        assert!(body.can_jump_to(&no_bottom, IVec2::new(1, 2), IVec2::new(3, 1)));

        // Leftward mirror of the same wedge.
        let mirrored = AsciiWorld::parse(
            ".#...\n\
             .....\n\
             .#...\n\
             .....",
        );
        assert!(!body.can_jump_to(&mirrored, IVec2::new(3, 2), IVec2::new(1, 1)));
    }

    #[test]
    fn test_jump_corridor_rejects_solids_in_the_arc() {
        let world = AsciiWorld::parse(
            ".....\n\
             .#...\n\
             .....\n\
             #####",
        );
        let body = body_for(&world, Vec2::splat(16.0));
        // The corridor from (0,2) up to the tip at (2,0) sweeps through (1,1).
        assert!(!body.can_jump_to(&world, IVec2::new(0, 2), IVec2::new(2, 0)));
    }
}
