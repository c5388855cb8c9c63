//! # Icosphere Primitive
//!
//! Generates a geodesic sphere by repeated 4-to-1 midpoint subdivision of a
//! regular icosahedron, projecting every new vertex back onto the sphere.
//!
//! ## Counts
//!
//! For `n` subdivisions: `V = 10·4ⁿ + 2`, `F = 20·4ⁿ`, `E = 30·4ⁿ`.

use std::collections::HashMap;

use config::constants::MAX_ICOSPHERE_SUBDIVISIONS;
use glam::DVec3;

use crate::error::MeshError;
use crate::mesh::Mesh;

/// Icosahedron faces, counter-clockwise seen from outside.
const ICOSAHEDRON_FACES: [[u32; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Creates a subdivided icosahedron with all vertices on a sphere.
///
/// # Arguments
///
/// * `radius` - Sphere radius, centred at the origin
/// * `subdivisions` - Number of 4-to-1 midpoint subdivisions (0 = icosahedron)
///
/// # Example
///
/// ```rust
/// use lattice_mesh::primitives::create_icosphere;
///
/// let mesh = create_icosphere(1.0, 1).unwrap();
/// assert_eq!(mesh.vertex_count(), 42);
/// assert_eq!(mesh.triangle_count(), 80);
/// ```
pub fn create_icosphere(radius: f64, subdivisions: u32) -> Result<Mesh, MeshError> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(MeshError::degenerate(format!(
            "Icosphere radius must be positive: {}",
            radius
        )));
    }
    if subdivisions > MAX_ICOSPHERE_SUBDIVISIONS {
        return Err(MeshError::validation_failed(format!(
            "Icosphere subdivisions {} exceed maximum {}",
            subdivisions, MAX_ICOSPHERE_SUBDIVISIONS
        )));
    }

    let t = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let mut vertices: Vec<DVec3> = [
        DVec3::new(-1.0, t, 0.0),
        DVec3::new(1.0, t, 0.0),
        DVec3::new(-1.0, -t, 0.0),
        DVec3::new(1.0, -t, 0.0),
        DVec3::new(0.0, -1.0, t),
        DVec3::new(0.0, 1.0, t),
        DVec3::new(0.0, -1.0, -t),
        DVec3::new(0.0, 1.0, -t),
        DVec3::new(t, 0.0, -1.0),
        DVec3::new(t, 0.0, 1.0),
        DVec3::new(-t, 0.0, -1.0),
        DVec3::new(-t, 0.0, 1.0),
    ]
    .iter()
    .map(|v| v.normalize() * radius)
    .collect();
    let mut triangles: Vec<[u32; 3]> = ICOSAHEDRON_FACES.to_vec();

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::with_capacity(triangles.len() * 3 / 2);
        let mut next = Vec::with_capacity(triangles.len() * 4);

        for &[a, b, c] in &triangles {
            let ab = midpoint(&mut vertices, &mut midpoints, a, b, radius);
            let bc = midpoint(&mut vertices, &mut midpoints, b, c, radius);
            let ca = midpoint(&mut vertices, &mut midpoints, c, a, radius);

            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }

        triangles = next;
    }

    Mesh::from_parts(vertices, triangles)
}

/// Returns the index of the projected midpoint of edge `(a, b)`, creating it
/// on first use.
fn midpoint(
    vertices: &mut Vec<DVec3>,
    cache: &mut HashMap<(u32, u32), u32>,
    a: u32,
    b: u32,
    radius: f64,
) -> u32 {
    let key = (a.min(b), a.max(b));
    *cache.entry(key).or_insert_with(|| {
        let mid = (vertices[a as usize] + vertices[b as usize]) * 0.5;
        let index = vertices.len() as u32;
        vertices.push(mid.normalize() * radius);
        index
    })
}
