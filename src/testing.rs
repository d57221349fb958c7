//! Test support - ascii tile worlds and a kinematic test actor
//!
//! Maps are drawn with one character per tile: `#` solid, `=` one-way
//! platform (stoppable but not solid), `|` climbable, `.` empty. The test
//! actor implements the full capability contract over a `GridBody` with no
//! gravity of its own, so runner tests stay deterministic.

use bevy::prelude::*;

use crate::actor::{OccupancyOracle, PlatformerActor};
use crate::body::GridBody;
use crate::constants::DEFAULT_SPEED;
use crate::grid::GridTransform;
use crate::reachability::default_jump_fn;

pub const TEST_TILE: f32 = 16.0;

/// Tile world parsed from an ascii drawing. Out-of-bounds tiles read as
/// empty.
pub struct AsciiWorld {
    rows: Vec<Vec<u8>>,
    pub tile_size: f32,
}

impl AsciiWorld {
    pub fn parse(map: &str) -> Self {
        let rows: Vec<Vec<u8>> = map
            .lines()
            .map(|line| line.trim().bytes().collect::<Vec<u8>>())
            .filter(|row| !row.is_empty())
            .collect();
        assert!(!rows.is_empty(), "empty map");
        assert!(
            rows.iter().all(|row| row.len() == rows[0].len()),
            "ragged map"
        );
        Self {
            rows,
            tile_size: TEST_TILE,
        }
    }

    pub fn width(&self) -> i32 {
        self.rows[0].len() as i32
    }

    pub fn height(&self) -> i32 {
        self.rows.len() as i32
    }

    pub fn bounds(&self) -> IRect {
        IRect::new(0, 0, self.width() - 1, self.height() - 1)
    }

    pub fn grid(&self) -> GridTransform {
        GridTransform::new(self.tile_size, 1, self.bounds())
    }

    fn tile(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return b'.';
        }
        self.rows[y as usize][x as usize]
    }

    fn any_tile(&self, rect: Rect, pred: impl Fn(u8) -> bool) -> bool {
        let ts = self.tile_size;
        let x0 = (rect.min.x / ts).floor() as i32;
        let y0 = (rect.min.y / ts).floor() as i32;
        let x1 = (rect.max.x / ts).ceil() as i32 - 1;
        let y1 = (rect.max.y / ts).ceil() as i32 - 1;
        for y in y0..=y1 {
            for x in x0..=x1 {
                if pred(self.tile(x, y)) {
                    return true;
                }
            }
        }
        false
    }
}

impl OccupancyOracle for AsciiWorld {
    fn obstructed(&self, rect: Rect) -> bool {
        self.any_tile(rect, |t| t == b'#')
    }

    fn graspable(&self, rect: Rect) -> bool {
        self.any_tile(rect, |t| t == b'|')
    }

    fn stoppable(&self, rect: Rect) -> bool {
        self.any_tile(rect, |t| t == b'#' || t == b'=')
    }
}

/// Capability-complete actor over an `AsciiWorld`. Movement commands apply
/// directly when unobstructed; jumps are counted so tests can assert on
/// commit behavior.
pub struct TestActor<'a> {
    pub world: &'a AsciiWorld,
    pub body: GridBody,
    pub pos: Vec2,
    pub jumps: u32,
}

impl<'a> TestActor<'a> {
    pub fn new(world: &'a AsciiWorld, cell: IVec2) -> Self {
        let body = GridBody::new(
            world.grid(),
            world.tile_size,
            Vec2::splat(world.tile_size),
            DEFAULT_SPEED,
            default_jump_fn,
        );
        let pos = body.box_at(cell).center();
        Self {
            world,
            body,
            pos,
            jumps: 0,
        }
    }
}

impl PlatformerActor for TestActor<'_> {
    fn grid_pos(&self) -> IVec2 {
        self.body.grid.world_to_grid(self.pos)
    }

    fn grid_bounds(&self) -> IRect {
        self.body.grid.bounds
    }

    fn grid_box(&self) -> Rect {
        Rect::from_center_size(self.pos, self.body.box_size)
    }

    fn grid_box_at(&self, cell: IVec2) -> Rect {
        self.body.box_at(cell)
    }

    fn jump_offsets(&self) -> &[IVec2] {
        &self.body.reach.jump_offsets
    }

    fn fall_offsets(&self) -> &[IVec2] {
        &self.body.reach.fall_offsets
    }

    fn can_move_to(&self, cell: IVec2) -> bool {
        self.body.can_move_to(self.world, cell)
    }

    fn can_grab_at(&self, cell: IVec2) -> bool {
        self.body.can_grab_at(self.world, cell)
    }

    fn can_stand_at(&self, cell: IVec2) -> bool {
        self.body.can_stand_at(self.world, cell)
    }

    fn can_climb_up(&self, cell: IVec2) -> bool {
        self.body.can_climb_up(self.world, cell)
    }

    fn can_climb_down(&self, cell: IVec2) -> bool {
        self.body.can_climb_down(self.world, cell)
    }

    fn can_fall_to(&self, from: IVec2, to: IVec2) -> bool {
        self.body.can_fall_to(self.world, from, to)
    }

    fn can_jump_to(&self, from: IVec2, to: IVec2) -> bool {
        self.body.can_jump_to(self.world, from, to)
    }

    fn can_move(&self, v: Vec2) -> bool {
        let cur = self.grid_box();
        let moved = Rect {
            min: cur.min + v,
            max: cur.max + v,
        };
        !self.world.obstructed(cur.union(moved))
    }

    fn can_jump(&self) -> bool {
        self.can_stand_at(self.grid_pos())
    }

    fn can_fall(&self) -> bool {
        true
    }

    fn cleared_for(&self, cell: IVec2) -> bool {
        self.body.cleared_between(self.world, self.grid_box(), cell)
    }

    fn move_toward(&mut self, cell: IVec2) {
        let v = self.body.step_toward(self.pos, cell);
        if self.can_move(v) {
            self.pos += v;
        }
    }

    fn jump_toward(&mut self, cell: IVec2) {
        self.jumps += 1;
        self.move_toward(cell);
    }
}
