use blockwalk_common::{lattice_direction, lattice_of};
use glam::{IVec3, Vec3};

use crate::world::VoxelWorld;

/// The nearest cell a ray struck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub cell: IVec3,
    /// Outward normal of the face the ray entered through.
    pub normal: Vec3,
    /// Distance from the ray origin to the entry point.
    pub distance: f32,
}

impl RayHit {
    /// Lattice position adjacent to the struck face, where a new cell
    /// would be placed.
    pub fn adjacent(&self) -> IVec3 {
        self.cell + lattice_direction(self.normal)
    }
}

/// Find the nearest occupied cell along a ray within `max_distance`.
///
/// Walks the lattice one cell boundary at a time (Amanatides–Woo), so the
/// first occupied cell visited is the nearest. A ray starting inside a cell
/// hits it at distance 0 with the normal facing back along the ray.
///
/// Returns `None` for an unbounded `max_distance`, and when the walk would
/// leave the `i32` lattice.
pub fn cast_ray(
    world: &VoxelWorld,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Option<RayHit> {
    let dir = direction.try_normalize()?;
    if !origin.is_finite() || !max_distance.is_finite() || max_distance < 0.0 {
        return None;
    }

    let mut cell = lattice_of(origin);
    // Cell boundaries sit on half-integers; shift so they land on integers.
    let shifted = origin + Vec3::splat(0.5);

    let step = IVec3::new(axis_step(dir.x), axis_step(dir.y), axis_step(dir.z));
    let mut t_max = Vec3::new(
        first_crossing(shifted.x, cell.x, dir.x),
        first_crossing(shifted.y, cell.y, dir.y),
        first_crossing(shifted.z, cell.z, dir.z),
    );
    let t_delta = Vec3::new(
        crossing_interval(dir.x),
        crossing_interval(dir.y),
        crossing_interval(dir.z),
    );

    let mut normal = -lattice_direction(dir).as_vec3();
    let mut t = 0.0_f32;
    while t <= max_distance {
        if world.contains(cell) {
            return Some(RayHit {
                cell,
                normal,
                distance: t,
            });
        }

        if t_max.x < t_max.y && t_max.x < t_max.z {
            t = t_max.x;
            cell.x = cell.x.checked_add(step.x)?;
            t_max.x += t_delta.x;
            normal = Vec3::new(-step.x as f32, 0.0, 0.0);
        } else if t_max.y < t_max.z {
            t = t_max.y;
            cell.y = cell.y.checked_add(step.y)?;
            t_max.y += t_delta.y;
            normal = Vec3::new(0.0, -step.y as f32, 0.0);
        } else {
            t = t_max.z;
            cell.z = cell.z.checked_add(step.z)?;
            t_max.z += t_delta.z;
            normal = Vec3::new(0.0, 0.0, -step.z as f32);
        }
    }
    None
}

fn axis_step(d: f32) -> i32 {
    if d >= 0.0 { 1 } else { -1 }
}

/// Ray parameter at which the shifted coordinate first crosses an integer.
fn first_crossing(shifted: f32, cell: i32, d: f32) -> f32 {
    if d > 0.0 {
        (cell as f32 + 1.0 - shifted) / d
    } else if d < 0.0 {
        (cell as f32 - shifted) / d
    } else {
        f32::INFINITY
    }
}

fn crossing_interval(d: f32) -> f32 {
    if d != 0.0 {
        (1.0 / d).abs()
    } else {
        f32::INFINITY
    }
}
