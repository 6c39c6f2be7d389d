use blockwalk_common::{CELL_HALF_EXTENT, PlayerConfig};
use glam::{IVec3, Vec3};

use crate::world::VoxelWorld;

/// Vertical slack at the bottom and top of the blocking band. Contact
/// within it (standing on a cell, brushing a side at floor level) is not a
/// collision.
pub const VERTICAL_TOLERANCE: f32 = 0.1;

/// Gap left below a cell after a head strike.
pub const HEAD_CLEARANCE: f32 = 0.01;

/// Outcome of [`CollisionResolver::resolve_vertical`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalResolution {
    pub clamped_y: f32,
    pub velocity: f32,
    /// A supporting cell stopped a downward move.
    pub landed: bool,
    /// A cell stopped an upward move.
    pub head_hit: bool,
}

/// Conservative box-vs-cell collision for a player of fixed radius and height.
///
/// Horizontal overlap is the Minkowski sum `0.5 + radius` on each of `x` and
/// `z`. Queries look up only the lattice neighbourhood of the player and
/// visit candidates in insertion order, so results match a full scan of the
/// world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResolver {
    pub radius: f32,
    pub height: f32,
}

impl CollisionResolver {
    pub fn new(radius: f32, height: f32) -> Self {
        Self { radius, height }
    }

    pub fn from_config(config: &PlayerConfig) -> Self {
        Self::new(config.radius, config.height)
    }

    fn reach(&self) -> f32 {
        CELL_HALF_EXTENT + self.radius
    }

    fn overlaps_horizontally(&self, point: Vec3, cell: IVec3) -> bool {
        let reach = self.reach();
        (point.x - cell.x as f32).abs() < reach && (point.z - cell.z as f32).abs() < reach
    }

    fn in_blocking_band(&self, dy: f32) -> bool {
        dy > VERTICAL_TOLERANCE && dy < self.height - VERTICAL_TOLERANCE
    }

    fn in_support_band(&self, dy: f32) -> bool {
        dy > 0.0 && dy <= self.height
    }

    /// Whether a player at `point` intersects any cell.
    pub fn overlaps(&self, world: &VoxelWorld, point: Vec3) -> bool {
        self.candidates(world, point)
            .into_iter()
            .any(|cell| self.blocks(point, cell))
    }

    /// Clamp a tentative vertical move against the first cell (in insertion
    /// order) that supports or caps the player at `next`.
    pub fn resolve_vertical(
        &self,
        world: &VoxelWorld,
        next: Vec3,
        velocity: f32,
    ) -> VerticalResolution {
        let hit = self
            .candidates(world, next)
            .into_iter()
            .find(|&cell| self.supports(next, cell));
        self.apply_vertical(next, velocity, hit)
    }

    /// Reference form of [`Self::overlaps`]: a linear scan of every cell.
    pub fn overlaps_linear(&self, world: &VoxelWorld, point: Vec3) -> bool {
        world.cells().any(|cell| self.blocks(point, cell))
    }

    /// Reference form of [`Self::resolve_vertical`]: a linear scan of every cell.
    pub fn resolve_vertical_linear(
        &self,
        world: &VoxelWorld,
        next: Vec3,
        velocity: f32,
    ) -> VerticalResolution {
        let hit = world.cells().find(|&cell| self.supports(next, cell));
        self.apply_vertical(next, velocity, hit)
    }

    fn blocks(&self, point: Vec3, cell: IVec3) -> bool {
        self.overlaps_horizontally(point, cell) && self.in_blocking_band(point.y - cell.y as f32)
    }

    fn supports(&self, point: Vec3, cell: IVec3) -> bool {
        self.overlaps_horizontally(point, cell) && self.in_support_band(point.y - cell.y as f32)
    }

    fn apply_vertical(&self, next: Vec3, velocity: f32, hit: Option<IVec3>) -> VerticalResolution {
        match hit {
            Some(cell) if velocity <= 0.0 => VerticalResolution {
                clamped_y: cell.y as f32 + self.height,
                velocity: 0.0,
                landed: true,
                head_hit: false,
            },
            Some(cell) => VerticalResolution {
                clamped_y: cell.y as f32 - HEAD_CLEARANCE,
                velocity: 0.0,
                landed: false,
                head_hit: true,
            },
            None => VerticalResolution {
                clamped_y: next.y,
                velocity,
                landed: false,
                head_hit: false,
            },
        }
    }

    /// Cells that could interact with a player at `point`, in insertion order.
    ///
    /// Covers every `dy` in `[0, height]`; callers apply the exact band.
    fn candidates(&self, world: &VoxelWorld, point: Vec3) -> Vec<IVec3> {
        let reach = self.reach();
        let lo = IVec3::new(
            (point.x - reach).floor() as i32,
            (point.y - self.height).floor() as i32,
            (point.z - reach).floor() as i32,
        );
        let hi = IVec3::new(
            (point.x + reach).ceil() as i32,
            point.y.ceil() as i32,
            (point.z + reach).ceil() as i32,
        );
        let extent = (hi - lo + IVec3::ONE).as_i64vec3();
        let volume = (extent.x * extent.y * extent.z).max(0) as usize;

        // Small worlds are cheaper to scan than the neighbourhood.
        if volume >= world.len() {
            return world
                .cells()
                .filter(|c| c.cmpge(lo).all() && c.cmple(hi).all())
                .collect();
        }

        let mut found: Vec<(u64, IVec3)> = Vec::new();
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    let pos = IVec3::new(x, y, z);
                    if let Some(seq) = world.insertion_seq(pos) {
                        found.push((seq, pos));
                    }
                }
            }
        }
        found.sort_unstable_by_key(|&(seq, _)| seq);
        found.into_iter().map(|(_, pos)| pos).collect()
    }
}
