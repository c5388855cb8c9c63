//! # Cuboid Primitive
//!
//! Generates the axis-aligned box used as the dome cutter.

use crate::error::MeshError;
use crate::mesh::Mesh;
use glam::DVec3;

/// Corner quads, counter-clockwise seen from outside. Corner `i` sits at
/// `max` on axis `k` when bit `k` of `i` is set.
const FACES: [[u32; 4]; 6] = [
    [0, 2, 3, 1], // -Z
    [4, 5, 7, 6], // +Z
    [0, 1, 5, 4], // -Y
    [2, 6, 7, 3], // +Y
    [0, 4, 6, 2], // -X
    [1, 3, 7, 5], // +X
];

/// Axis-aligned box of edge lengths `size` centred at `center`.
///
/// Eight corners and twelve triangles, wound outward.
///
/// # Errors
///
/// [`MeshError::DegenerateGeometry`] for a non-positive or non-finite size
/// or a non-finite centre.
///
/// # Example
///
/// ```rust
/// use lattice_mesh::primitives::create_cuboid;
/// use glam::DVec3;
///
/// let mesh = create_cuboid(DVec3::splat(10.0), DVec3::new(0.0, 0.0, 5.0)).unwrap();
/// assert_eq!(mesh.vertex_count(), 8);
/// assert_eq!(mesh.triangle_count(), 12);
/// ```
pub fn create_cuboid(size: DVec3, center: DVec3) -> Result<Mesh, MeshError> {
    if !size.is_finite() || size.min_element() <= 0.0 {
        return Err(MeshError::degenerate(format!(
            "Cuboid size must be positive: {:?}",
            size
        )));
    }
    if !center.is_finite() {
        return Err(MeshError::degenerate(format!(
            "Cuboid centre must be finite: {:?}",
            center
        )));
    }

    let (lo, hi) = (center - size / 2.0, center + size / 2.0);
    let mut mesh = Mesh::with_capacity(8, 12);
    for corner in 0..8u32 {
        let pick = |bit: u32, a: f64, b: f64| if corner & bit == 0 { a } else { b };
        mesh.add_vertex(DVec3::new(
            pick(1, lo.x, hi.x),
            pick(2, lo.y, hi.y),
            pick(4, lo.z, hi.z),
        ));
    }
    for [a, b, c, d] in FACES {
        mesh.add_quad(a, b, c, d);
    }

    Ok(mesh)
}
