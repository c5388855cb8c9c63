//! # Dual Builder
//!
//! Converts a closed triangulated sphere into its topological dual.
//!
//! ## Construction
//!
//! - Face `f` of the (triangulated) input becomes dual vertex `f`, placed at
//!   the face centroid.
//! - Every input vertex with at least three incident faces becomes one dual
//!   face. Its corners are the dual vertices of the incident faces, sorted by
//!   their angle around the vertex in its local tangent frame.
//!
//! An icosphere therefore turns into a mesh of 12 pentagons and hexagons.
//! Vertices with fewer than three faces and faces the builder rejects are
//! omitted and recorded in the [`DualMesh`]; building a dual never fails.

use config::constants::DEGENERATE_DIRECTION_EPSILON;
use glam::DVec3;
use tracing::{debug, info};

use crate::frame::tangent_basis;
use crate::graph::{FaceError, FaceId, PolyMesh, PolyMeshBuilder, VertexId};


/// Dual mesh plus a record of what was omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct DualMesh {
    /// Dual polygon mesh; vertex `f` is generated by input face `f`.
    pub mesh: PolyMesh,
    /// Dual face generated by each input vertex, if any.
    pub vertex_faces: Vec<Option<FaceId>>,
    /// Input vertices with fewer than three incident faces.
    pub skipped: Vec<VertexId>,
    /// Input vertices whose dual face was rejected, with the reason.
    pub rejected: Vec<(VertexId, FaceError)>,
}

impl DualMesh {
    /// True if every input vertex produced a dual face.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.rejected.is_empty()
    }

    /// Number of input vertices without a dual face.
    pub fn omitted_count(&self) -> usize {
        self.skipped.len() + self.rejected.len()
    }

    /// Consumes the record and returns the dual mesh.
    pub fn into_mesh(self) -> PolyMesh {
        self.mesh
    }
}

/// Builds the dual of a triangulated, origin-centred closed mesh.
///
/// Faces with more than three corners are fan-split first.
///
/// ## Example
///
/// ```rust
/// use geodesic_lattice::dual::build_dual;
/// use geodesic_lattice::graph::PolyMesh;
/// use glam::DVec3;
///
/// let tetrahedron = PolyMesh::from_triangles(
///     vec![
///         DVec3::new(1.0, 1.0, 1.0),
///         DVec3::new(1.0, -1.0, -1.0),
///         DVec3::new(-1.0, 1.0, -1.0),
///         DVec3::new(-1.0, -1.0, 1.0),
///     ],
///     &[[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]],
/// )
/// .unwrap();
///
/// let dual = build_dual(&tetrahedron);
/// assert_eq!(dual.mesh.vertex_count(), 4);
/// assert_eq!(dual.mesh.face_count(), 4);
/// assert!(dual.is_complete());
/// ```
pub fn build_dual(mesh: &PolyMesh) -> DualMesh {
    let source = mesh.triangulated();

    let centroids: Vec<DVec3> = (0..source.face_count() as FaceId)
        .map(|f| source.centroid(f))
        .collect();

    let mut builder = PolyMeshBuilder::with_capacity(centroids.len(), source.vertex_count());
    for &centroid in &centroids {
        builder.add_vertex(centroid);
    }

    let mut vertex_faces = Vec::with_capacity(source.vertex_count());
    let mut skipped = Vec::new();
    let mut rejected = Vec::new();

    for v in 0..source.vertex_count() as VertexId {
        let incident = source.vertex_faces(v);
        if incident.len() < 3 {
            debug!(vertex = v, faces = incident.len(), "dual: vertex skipped");
            skipped.push(v);
            vertex_faces.push(None);
            continue;
        }

        let corners = fan_order(source.position(v), incident, &centroids);
        match builder.add_face(&corners) {
            Ok(face) => vertex_faces.push(Some(face)),
            Err(err) => {
                debug!(vertex = v, error = %err, "dual: face rejected");
                rejected.push((v, err));
                vertex_faces.push(None);
            }
        }
    }

    let dual = builder.build();
    info!(
        vertices = dual.vertex_count(),
        faces = dual.face_count(),
        skipped = skipped.len(),
        rejected = rejected.len(),
        "dual built"
    );

    DualMesh {
        mesh: dual,
        vertex_faces,
        skipped,
        rejected,
    }
}

/// Sorts the faces around a vertex counter-clockwise (seen from outside).
///
/// Returns the face ids, which double as dual vertex ids. Ties keep their
/// input order.
pub fn fan_order(center: DVec3, faces: &[FaceId], centroids: &[DVec3]) -> Vec<FaceId> {
    let normal = center.normalize_or_zero();
    let (t, b) = tangent_basis(normal);

    let mut items: Vec<(f64, FaceId)> = faces
        .iter()
        .map(|&f| (tangent_angle(centroids[f as usize] - center, normal, t, b), f))
        .collect();
    items.sort_by(|x, y| x.0.total_cmp(&y.0));
    items.into_iter().map(|(_, f)| f).collect()
}

/// Angle of `direction` in the tangent plane spanned by `t` and `b`.
///
/// Directions that vanish after removing the normal component get angle 0.
pub fn tangent_angle(direction: DVec3, normal: DVec3, t: DVec3, b: DVec3) -> f64 {
    let planar = direction - normal * direction.dot(normal);
    if planar.length() < DEGENERATE_DIRECTION_EPSILON {
        return 0.0;
    }
    let planar = planar.normalize();
    planar.dot(b).atan2(planar.dot(t))
}
