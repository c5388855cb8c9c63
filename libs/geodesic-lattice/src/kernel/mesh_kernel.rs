//! # Mesh Kernel
//!
//! [`GeometryKernel`] backed by the pure Rust `lattice-mesh` crate.

use glam::DVec3;
use lattice_mesh::ops::{boolean, remesh, wireframe};
use lattice_mesh::primitives::{create_cuboid, create_icosphere};
use lattice_mesh::Mesh;

use super::{BooleanOp, GeometryKernel, WireframeOptions};
use crate::error::LatticeResult;
use crate::graph::PolyMesh;

/// Stateless kernel whose solids are triangle [`Mesh`]es.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshKernel;

impl GeometryKernel for MeshKernel {
    type Solid = Mesh;

    fn create_icosphere(&self, radius: f64, subdivisions: u32) -> LatticeResult<PolyMesh> {
        let sphere = create_icosphere(radius, subdivisions)?;
        Ok(PolyMesh::from_triangles(
            sphere.vertices().to_vec(),
            sphere.triangles(),
        )?)
    }

    fn mesh_to_solid(&self, mesh: &PolyMesh) -> LatticeResult<Mesh> {
        Ok(Mesh::from_parts(mesh.positions().to_vec(), mesh.triangles())?)
    }

    fn wireframe_solidify(&self, mesh: &PolyMesh, options: &WireframeOptions) -> LatticeResult<Mesh> {
        Ok(wireframe::wireframe(mesh.positions(), mesh.faces(), options)?)
    }

    fn remesh_voxel(&self, solid: &Mesh, voxel_size: f64) -> LatticeResult<Mesh> {
        Ok(remesh::remesh_voxel(solid, voxel_size)?)
    }

    fn boolean(&self, a: &Mesh, b: &Mesh, op: BooleanOp, exact: bool) -> LatticeResult<Mesh> {
        let result = match op {
            BooleanOp::Intersect => boolean::intersection(a, b, exact)?,
            BooleanOp::Difference => boolean::difference(a, b, exact)?,
        };
        Ok(result)
    }

    fn create_cuboid(&self, size: DVec3, location: DVec3) -> LatticeResult<Mesh> {
        Ok(create_cuboid(size, location)?)
    }
}

// =============================================================================
// TESTS
// =============================================================================
