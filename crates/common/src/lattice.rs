use glam::{IVec3, Vec3};

/// Half the edge length of a cell cube.
pub const CELL_HALF_EXTENT: f32 = 0.5;

/// World-space centre of the cell at `pos`.
pub fn cell_center(pos: IVec3) -> Vec3 {
    pos.as_vec3()
}

/// Lattice position of the cell whose cube contains `point`.
///
/// Points exactly on a shared face resolve to the cell on the positive side.
pub fn lattice_of(point: Vec3) -> IVec3 {
    (point + Vec3::splat(CELL_HALF_EXTENT)).floor().as_ivec3()
}

/// Round a (possibly drifted) face normal to the nearest lattice direction.
///
/// Picks the dominant axis and returns an exact unit vector along it. A zero
/// or non-finite normal yields `IVec3::ZERO`.
pub fn lattice_direction(normal: Vec3) -> IVec3 {
    if !normal.is_finite() {
        return IVec3::ZERO;
    }
    let abs = normal.abs();
    let max = abs.max_element();
    if max <= f32::EPSILON {
        return IVec3::ZERO;
    }
    if abs.x == max {
        IVec3::new(normal.x.signum() as i32, 0, 0)
    } else if abs.y == max {
        IVec3::new(0, normal.y.signum() as i32, 0)
    } else {
        IVec3::new(0, 0, normal.z.signum() as i32)
    }
}
