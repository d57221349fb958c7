//! Grid transform - maps continuous world coordinates to discrete plan cells
//!
//! The coordinate contract every other module relies on. Cells follow the
//! tile map's screen convention: x grows rightward, y grows downward (row
//! index). A plan grid may subdivide tiles by an integer resolution; the
//! offset keeps cell centers aligned under tile centers.

use bevy::prelude::*;

/// Immutable mapping between world space and plan-grid cells.
#[derive(Clone, Copy, Debug)]
pub struct GridTransform {
    /// Edge length of one cell, in world units.
    pub cell_size: f32,
    /// Sub-tile alignment shift applied on both axes.
    pub offset: f32,
    /// Full extent of the tile map, in cells (inclusive). `clip` never
    /// returns cells outside it.
    pub bounds: IRect,
}

impl GridTransform {
    pub fn new(tile_size: f32, resolution: u32, bounds: IRect) -> Self {
        assert!(tile_size > 0.0, "tile size must be positive");
        assert!(resolution >= 1, "resolution must be at least 1");
        let cell_size = tile_size / resolution as f32;
        let offset = (cell_size % tile_size) / 2.0;
        Self {
            cell_size,
            offset,
            bounds,
        }
    }

    /// Cell containing the world point `p`.
    pub fn world_to_grid(&self, p: Vec2) -> IVec2 {
        ((p - self.offset) / self.cell_size).floor().as_ivec2()
    }

    /// World position of the center of `cell`.
    pub fn grid_to_world(&self, cell: IVec2) -> Vec2 {
        ((cell.as_vec2() + 0.5) * self.cell_size).floor() + self.offset
    }

    /// Intersect a search region with the map bounds, keeping search cost
    /// bounded by the map extent.
    pub fn clip(&self, region: IRect) -> IRect {
        self.bounds.intersect(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(resolution: u32) -> GridTransform {
        GridTransform::new(16.0, resolution, IRect::new(0, 0, 9, 9))
    }

    #[test]
    fn test_offset_formula() {
        // Full-tile cells need no shift; half-tile cells shift by a quarter
        // tile so cell centers stay under tile centers.
        assert_eq!(grid(1).offset, 0.0);
        assert_eq!(grid(2).cell_size, 8.0);
        assert_eq!(grid(2).offset, 4.0);
    }

    #[test]
    fn test_round_trip_is_idempotent_on_centers() {
        for resolution in [1, 2, 4] {
            let g = grid(resolution);
            for cell in [IVec2::new(0, 0), IVec2::new(3, 7), IVec2::new(9, 1)] {
                let center = g.grid_to_world(cell);
                assert_eq!(g.world_to_grid(center), cell);
                // Recovering the cell and mapping back lands on the same center.
                assert_eq!(g.grid_to_world(g.world_to_grid(center)), center);
            }
        }
    }

    #[test]
    fn test_world_to_grid_rounds_down_within_cell() {
        let g = grid(1);
        assert_eq!(g.world_to_grid(Vec2::new(0.0, 0.0)), IVec2::new(0, 0));
        assert_eq!(g.world_to_grid(Vec2::new(15.9, 15.9)), IVec2::new(0, 0));
        assert_eq!(g.world_to_grid(Vec2::new(16.0, 31.9)), IVec2::new(1, 1));
    }

    #[test]
    fn test_clip_never_exceeds_bounds() {
        let g = grid(1);
        let clipped = g.clip(IRect::new(-5, 3, 40, 40));
        assert_eq!(clipped, IRect::new(0, 3, 9, 9));
    }
}
