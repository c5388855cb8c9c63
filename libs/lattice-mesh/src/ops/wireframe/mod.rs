//! # Wireframe Solidify
//!
//! Replaces every polygon face by a frame of struts running along its edges.
//!
//! ## Construction
//!
//! For every face corner an inset point is placed in the face plane along
//! the bisector of the two inward edge normals. Original vertices and inset
//! points are each duplicated half a thickness above and below the surface
//! (along the vertex normal). Per face edge three quads are emitted:
//!
//! ```text
//!   top strip     V_i⁺ V_j⁺ P_j⁺ P_i⁺
//!   bottom strip  V_i⁻ P_i⁻ P_j⁻ V_j⁻
//!   hole wall     P_i⁺ P_j⁺ P_j⁻ P_i⁻
//! ```
//!
//! Strips of two faces meet at the shared `V⁺`/`V⁻` copies, so a closed,
//! consistently oriented input yields a closed 2-manifold output whose struts
//! are `thickness` wide and centred on the input edges. Edges bordered by a
//! single face can be closed with an outer wall.

use std::collections::HashMap;

use config::constants::{DEFAULT_STRUT_THICKNESS, MIN_INSET_COSINE};
use glam::DVec3;
use tracing::debug;

use crate::error::MeshError;
use crate::mesh::Mesh;


// =============================================================================
// OPTIONS
// =============================================================================

/// Options for [`wireframe`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireframeOptions {
    /// Strut width and depth.
    pub thickness: f64,
    /// Drop the original faces (true) or keep them alongside the frame.
    pub replace_faces: bool,
    /// Close edges that border a single face with an outer wall.
    pub include_boundary: bool,
    /// Scale corner insets so strut width stays even at sharp corners.
    pub even_offset: bool,
}

impl WireframeOptions {
    /// Options producing a closed frame of struts of the given thickness.
    pub fn new(thickness: f64) -> Self {
        Self {
            thickness,
            replace_faces: true,
            include_boundary: true,
            even_offset: true,
        }
    }
}

impl Default for WireframeOptions {
    fn default() -> Self {
        Self::new(DEFAULT_STRUT_THICKNESS)
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Builds a strut frame from a polygon mesh.
///
/// ## Parameters
///
/// - `vertices`: Vertex positions
/// - `faces`: Faces as cyclic vertex index lists, counter-clockwise seen from
///   outside
/// - `options`: Thickness and frame options
///
/// ## Errors
///
/// - [`MeshError::DegenerateGeometry`] for a non-positive or non-finite
///   thickness
/// - [`MeshError::InvalidTopology`] for faces with fewer than three corners
///   or indices outside the vertex list
///
/// ## Example
///
/// ```rust
/// use lattice_mesh::ops::wireframe::{wireframe, WireframeOptions};
/// use glam::DVec3;
///
/// let vertices = [DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y];
/// let faces = [vec![0u32, 1, 2, 3]];
/// let frame = wireframe(&vertices, &faces, &WireframeOptions::new(0.1)).unwrap();
/// assert!(frame.is_watertight());
/// ```
pub fn wireframe<F: AsRef<[u32]>>(
    vertices: &[DVec3],
    faces: &[F],
    options: &WireframeOptions,
) -> Result<Mesh, MeshError> {
    if !options.thickness.is_finite() || options.thickness <= 0.0 {
        return Err(MeshError::degenerate(format!(
            "Wireframe thickness must be positive: {}",
            options.thickness
        )));
    }
    validate_faces(vertices.len(), faces)?;

    let half = options.thickness / 2.0;
    let area_vectors: Vec<DVec3> = faces
        .iter()
        .map(|face| newell_normal(vertices, face.as_ref()))
        .collect();
    let vertex_normals = vertex_normals(vertices, faces, &area_vectors);
    let edge_faces = edge_face_counts(faces);

    let corner_count: usize = faces.iter().map(|f| f.as_ref().len()).sum();
    let mut mesh = Mesh::with_capacity(
        2 * vertices.len() + 2 * corner_count,
        6 * corner_count + 2 * edge_faces.len(),
    );

    // Shell copies of the input vertices: 2v above, 2v + 1 below
    for (position, normal) in vertices.iter().zip(&vertex_normals) {
        mesh.add_vertex(*position + *normal * half);
        mesh.add_vertex(*position - *normal * half);
    }
    let top = |v: u32| 2 * v;
    let bottom = |v: u32| 2 * v + 1;

    let mut boundary_walls = 0usize;
    for (face, area) in faces.iter().zip(&area_vectors) {
        let corners = face.as_ref();
        let count = corners.len();
        let normal = area.normalize_or_zero();

        let base = mesh.vertex_count() as u32;
        for i in 0..count {
            let prev = vertices[corners[(i + count - 1) % count] as usize];
            let current = vertices[corners[i] as usize];
            let next = vertices[corners[(i + 1) % count] as usize];
            let inset = inset_point(prev, current, next, normal, half, options.even_offset);
            let offset = vertex_normals[corners[i] as usize] * half;
            mesh.add_vertex(inset + offset);
            mesh.add_vertex(inset - offset);
        }

        for i in 0..count {
            let j = (i + 1) % count;
            let (a, b) = (corners[i], corners[j]);
            let (pi_top, pi_bottom) = (base + 2 * i as u32, base + 2 * i as u32 + 1);
            let (pj_top, pj_bottom) = (base + 2 * j as u32, base + 2 * j as u32 + 1);

            mesh.add_quad(top(a), top(b), pj_top, pi_top);
            mesh.add_quad(bottom(a), pi_bottom, pj_bottom, bottom(b));
            mesh.add_quad(pi_top, pj_top, pj_bottom, pi_bottom);

            if options.include_boundary && edge_faces.get(&edge_key(a, b)) == Some(&1) {
                mesh.add_quad(top(a), bottom(a), bottom(b), top(b));
                boundary_walls += 1;
            }
        }
    }

    if !options.replace_faces {
        let base = mesh.vertex_count() as u32;
        for &position in vertices {
            mesh.add_vertex(position);
        }
        for face in faces {
            let corners = face.as_ref();
            for i in 1..corners.len() - 1 {
                mesh.add_triangle(base + corners[0], base + corners[i], base + corners[i + 1]);
            }
        }
    }

    debug!(
        faces = faces.len(),
        boundary_walls,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "wireframe built"
    );

    Ok(mesh)
}

// =============================================================================
// HELPERS
// =============================================================================

/// Rejects faces with fewer than three corners or out-of-range indices.
fn validate_faces<F: AsRef<[u32]>>(vertex_count: usize, faces: &[F]) -> Result<(), MeshError> {
    for (index, face) in faces.iter().enumerate() {
        let corners = face.as_ref();
        if corners.len() < 3 {
            return Err(MeshError::invalid_topology(format!(
                "face {} has {} corners",
                index,
                corners.len()
            )));
        }
        if let Some(&bad) = corners.iter().find(|&&v| v as usize >= vertex_count) {
            return Err(MeshError::invalid_topology(format!(
                "face {} references vertex {} (vertex count {})",
                index, bad, vertex_count
            )));
        }
    }
    Ok(())
}

/// Newell's method: area-weighted normal of a possibly non-planar polygon.
fn newell_normal(vertices: &[DVec3], corners: &[u32]) -> DVec3 {
    let mut normal = DVec3::ZERO;
    for i in 0..corners.len() {
        let current = vertices[corners[i] as usize];
        let next = vertices[corners[(i + 1) % corners.len()] as usize];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal * 0.5
}

/// Vertex normals from summed face area vectors, falling back to the
/// normalized position and finally +Z.
fn vertex_normals<F: AsRef<[u32]>>(vertices: &[DVec3], faces: &[F], area_vectors: &[DVec3]) -> Vec<DVec3> {
    let mut sums = vec![DVec3::ZERO; vertices.len()];
    for (face, area) in faces.iter().zip(area_vectors) {
        for &v in face.as_ref() {
            sums[v as usize] += *area;
        }
    }

    sums.iter()
        .zip(vertices)
        .map(|(sum, position)| {
            let normal = sum.normalize_or_zero();
            if normal != DVec3::ZERO {
                return normal;
            }
            let radial = position.normalize_or_zero();
            if radial != DVec3::ZERO {
                radial
            } else {
                DVec3::Z
            }
        })
        .collect()
}

#[inline]
fn edge_key(a: u32, b: u32) -> (u32, u32) {
    (a.min(b), a.max(b))
}

/// Number of faces bordering each undirected edge.
fn edge_face_counts<F: AsRef<[u32]>>(faces: &[F]) -> HashMap<(u32, u32), u32> {
    let mut counts = HashMap::new();
    for face in faces {
        let corners = face.as_ref();
        for i in 0..corners.len() {
            let key = edge_key(corners[i], corners[(i + 1) % corners.len()]);
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    counts
}

/// Corner inset point inside the face plane.
///
/// The point lies on the bisector of the two inward edge normals. With
/// `even` the distance is divided by the half-angle cosine (clamped) so that
/// both adjacent struts keep their full width.
fn inset_point(prev: DVec3, current: DVec3, next: DVec3, normal: DVec3, half: f64, even: bool) -> DVec3 {
    let inward_in = normal.cross((current - prev).normalize_or_zero());
    let inward_out = normal.cross((next - current).normalize_or_zero());

    let bisector = (inward_in + inward_out).normalize_or_zero();
    if bisector == DVec3::ZERO {
        return current + inward_in * half;
    }

    let distance = if even {
        half / bisector.dot(inward_in).max(MIN_INSET_COSINE)
    } else {
        half
    };
    current + bisector * distance
}
