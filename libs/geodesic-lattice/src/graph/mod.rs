//! # Mesh Graph
//!
//! Polygon mesh with fixed topology and derived adjacency.
//!
//! Vertices and faces live in flat arrays and are addressed by `u32`
//! indices. Adjacency (incident faces per vertex, neighbour vertices,
//! unique undirected edges) is derived once when the topology is frozen by
//! [`PolyMeshBuilder::build`]; positions stay mutable afterwards.
//!
//! ## Example
//!
//! ```rust
//! use geodesic_lattice::graph::PolyMeshBuilder;
//! use glam::DVec3;
//!
//! let mut builder = PolyMeshBuilder::new();
//! let a = builder.add_vertex(DVec3::ZERO);
//! let b = builder.add_vertex(DVec3::X);
//! let c = builder.add_vertex(DVec3::Y);
//! builder.add_face(&[a, b, c]).unwrap();
//! let mesh = builder.build();
//! assert_eq!(mesh.edge_count(), 3);
//! assert_eq!(mesh.neighbors(a), &[b, c]);
//! ```

use std::collections::{HashMap, HashSet};

use glam::DVec3;
use thiserror::Error;


/// Index of a vertex in a [`PolyMesh`].
pub type VertexId = u32;

/// Index of a face in a [`PolyMesh`].
pub type FaceId = u32;

// =============================================================================
// FACE
// =============================================================================

/// Polygon face: cyclic list of at least three distinct vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    corners: Vec<VertexId>,
}

impl Face {
    /// Corner vertices in winding order.
    #[inline]
    pub fn corners(&self) -> &[VertexId] {
        &self.corners
    }

    /// Number of corners.
    #[inline]
    pub fn len(&self) -> usize {
        self.corners.len()
    }

    /// True for a face without corners, which the builder never creates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    /// Directed edges `(corner[i], corner[i + 1])`, wrapping around.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let n = self.corners.len();
        (0..n).map(move |i| (self.corners[i], self.corners[(i + 1) % n]))
    }
}

impl AsRef<[u32]> for Face {
    fn as_ref(&self) -> &[u32] {
        &self.corners
    }
}

/// Reasons a face cannot be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FaceError {
    /// Fewer than three corners.
    #[error("face needs at least 3 corners, got {0}")]
    TooFewCorners(usize),

    /// The same vertex appears twice in the corner list.
    #[error("vertex {0} appears more than once")]
    DuplicateCorner(VertexId),

    /// Corner index outside the vertex array.
    #[error("unknown vertex {0}")]
    UnknownVertex(VertexId),

    /// Another face already uses exactly the same vertices.
    #[error("same vertices as face {0}")]
    DuplicateFace(FaceId),
}

// =============================================================================
// BUILDER
// =============================================================================

/// Incrementally collects vertices and validated faces.
#[derive(Debug, Clone, Default)]
pub struct PolyMeshBuilder {
    positions: Vec<DVec3>,
    faces: Vec<Face>,
    face_keys: HashMap<Vec<VertexId>, FaceId>,
}

impl PolyMeshBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty builder with reserved capacity.
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
            face_keys: HashMap::with_capacity(face_count),
        }
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> VertexId {
        let id = self.positions.len() as VertexId;
        self.positions.push(position);
        id
    }

    /// Adds a face after validating its corner list.
    ///
    /// ## Errors
    ///
    /// Returns a [`FaceError`] and leaves the builder unchanged if the face
    /// has fewer than three corners, repeats a vertex, references an unknown
    /// vertex or uses the same vertex set as an existing face.
    pub fn add_face(&mut self, corners: &[VertexId]) -> Result<FaceId, FaceError> {
        if corners.len() < 3 {
            return Err(FaceError::TooFewCorners(corners.len()));
        }
        if let Some(&unknown) = corners
            .iter()
            .find(|&&v| v as usize >= self.positions.len())
        {
            return Err(FaceError::UnknownVertex(unknown));
        }

        let mut key = corners.to_vec();
        key.sort_unstable();
        if let Some(pair) = key.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(FaceError::DuplicateCorner(pair[0]));
        }
        if let Some(&existing) = self.face_keys.get(&key) {
            return Err(FaceError::DuplicateFace(existing));
        }

        let id = self.faces.len() as FaceId;
        self.face_keys.insert(key, id);
        self.faces.push(Face {
            corners: corners.to_vec(),
        });
        Ok(id)
    }

    /// Number of vertices added so far.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces added so far.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Freezes the topology and derives adjacency.
    pub fn build(self) -> PolyMesh {
        PolyMesh::assemble(self.positions, self.faces)
    }
}

// =============================================================================
// POLY MESH
// =============================================================================

/// Polygon mesh with frozen topology.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyMesh {
    positions: Vec<DVec3>,
    faces: Vec<Face>,
    vertex_faces: Vec<Vec<FaceId>>,
    neighbors: Vec<Vec<VertexId>>,
    edges: Vec<(VertexId, VertexId)>,
}

impl PolyMesh {
    /// Builds a mesh from positions and triangles.
    ///
    /// ## Errors
    ///
    /// The first [`FaceError`] hit while adding the triangles.
    pub fn from_triangles(positions: Vec<DVec3>, triangles: &[[u32; 3]]) -> Result<Self, FaceError> {
        let mut builder = PolyMeshBuilder::with_capacity(positions.len(), triangles.len());
        for position in positions {
            builder.add_vertex(position);
        }
        for triangle in triangles {
            builder.add_face(triangle)?;
        }
        Ok(builder.build())
    }

    /// Derives adjacency for already validated faces.
    fn assemble(positions: Vec<DVec3>, faces: Vec<Face>) -> Self {
        let mut vertex_faces = vec![Vec::new(); positions.len()];
        let mut neighbors = vec![Vec::new(); positions.len()];
        let mut edges = Vec::new();
        let mut seen = HashSet::new();

        for (face_id, face) in faces.iter().enumerate() {
            for &v in face.corners() {
                vertex_faces[v as usize].push(face_id as FaceId);
            }
            for (a, b) in face.edges() {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    edges.push(key);
                    neighbors[a as usize].push(b);
                    neighbors[b as usize].push(a);
                }
            }
        }

        Self {
            positions,
            faces,
            vertex_faces,
            neighbors,
            edges,
        }
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of unique undirected edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Vertex positions.
    #[inline]
    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    /// Mutable vertex positions. The topology cannot be changed through it.
    #[inline]
    pub fn positions_mut(&mut self) -> &mut [DVec3] {
        &mut self.positions
    }

    /// Position of one vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> DVec3 {
        self.positions[v as usize]
    }

    /// Faces.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// One face.
    #[inline]
    pub fn face(&self, f: FaceId) -> &Face {
        &self.faces[f as usize]
    }

    /// Faces incident to a vertex, in face order.
    #[inline]
    pub fn vertex_faces(&self, v: VertexId) -> &[FaceId] {
        &self.vertex_faces[v as usize]
    }

    /// Vertices sharing an edge with `v`.
    #[inline]
    pub fn neighbors(&self, v: VertexId) -> &[VertexId] {
        &self.neighbors[v as usize]
    }

    /// Unique undirected edges as `(min, max)` pairs in first-seen order.
    #[inline]
    pub fn edges(&self) -> &[(VertexId, VertexId)] {
        &self.edges
    }

    /// Mean of a face's corner positions.
    pub fn centroid(&self, f: FaceId) -> DVec3 {
        let corners = self.face(f).corners();
        let sum = corners
            .iter()
            .fold(DVec3::ZERO, |acc, &v| acc + self.position(v));
        sum / corners.len() as f64
    }

    /// Outward normal of a vertex on an origin-centred sphere-like mesh.
    ///
    /// Zero for a vertex at the origin.
    #[inline]
    pub fn vertex_normal(&self, v: VertexId) -> DVec3 {
        self.position(v).normalize_or_zero()
    }

    /// True if every face is a triangle.
    pub fn is_triangulated(&self) -> bool {
        self.faces.iter().all(|face| face.len() == 3)
    }

    /// Copy with every face of more than three corners fan-split.
    ///
    /// A triangle mesh is returned unchanged.
    pub fn triangulated(&self) -> PolyMesh {
        if self.is_triangulated() {
            return self.clone();
        }

        let mut faces = Vec::with_capacity(self.faces.len());
        for face in &self.faces {
            let c = face.corners();
            for i in 1..c.len() - 1 {
                faces.push(Face {
                    corners: vec![c[0], c[i], c[i + 1]],
                });
            }
        }
        Self::assemble(self.positions.clone(), faces)
    }

    /// Triangles of a triangulated copy, for handing to a triangle kernel.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        self.faces
            .iter()
            .flat_map(|face| {
                let c = face.corners();
                (1..c.len() - 1).map(move |i| [c[0], c[i], c[i + 1]])
            })
            .collect()
    }

    /// Number of edges bordered by exactly one face.
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_use_counts()
            .values()
            .filter(|&&count| count == 1)
            .count()
    }

    /// True if every edge is shared by exactly two faces.
    pub fn is_closed(&self) -> bool {
        let counts = self.edge_use_counts();
        !counts.is_empty() && counts.values().all(|&count| count == 2)
    }

    /// V − E + F.
    pub fn euler_characteristic(&self) -> i64 {
        self.vertex_count() as i64 - self.edge_count() as i64 + self.face_count() as i64
    }

    /// Number of faces using each undirected edge.
    fn edge_use_counts(&self) -> HashMap<(VertexId, VertexId), u32> {
        let mut counts = HashMap::with_capacity(self.edges.len());
        for face in &self.faces {
            for (a, b) in face.edges() {
                *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        counts
    }
}
