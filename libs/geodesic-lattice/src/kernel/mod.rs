//! # Geometry Kernel
//!
//! Capability interface for the solid-geometry steps of the pipeline.
//!
//! The dual builder and the jitter smoother only need [`PolyMesh`]. Strut
//! thickening, remeshing and booleans need a solid-geometry engine, which
//! the pipeline reaches through [`GeometryKernel`]. [`MeshKernel`] implements
//! it with `lattice-mesh`; tests plug in lightweight doubles.

mod mesh_kernel;

use glam::DVec3;

use crate::error::LatticeResult;
use crate::graph::PolyMesh;

pub use lattice_mesh::WireframeOptions;
pub use mesh_kernel::MeshKernel;

/// Boolean operation between two solids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    /// Keep the volume inside both solids.
    Intersect,
    /// Keep the volume of the first solid outside the second.
    Difference,
}

/// Solid-geometry operations required by the lattice pipeline.
///
/// Operations take their operands by reference and return new solids; a
/// kernel that works in place must copy internally.
pub trait GeometryKernel {
    /// Solid value produced and consumed by the kernel.
    type Solid: Clone;

    /// Triangulated geodesic sphere centred at the origin.
    ///
    /// `subdivisions` counts 4-to-1 midpoint subdivisions of the icosahedron.
    fn create_icosphere(&self, radius: f64, subdivisions: u32) -> LatticeResult<PolyMesh>;

    /// Closed polygon mesh as a boolean operand.
    fn mesh_to_solid(&self, mesh: &PolyMesh) -> LatticeResult<Self::Solid>;

    /// Replaces the faces of `mesh` by struts along its edges.
    fn wireframe_solidify(&self, mesh: &PolyMesh, options: &WireframeOptions) -> LatticeResult<Self::Solid>;

    /// Rebuilds a solid from a voxel grid of the given cell size.
    fn remesh_voxel(&self, solid: &Self::Solid, voxel_size: f64) -> LatticeResult<Self::Solid>;

    /// Boolean combination of two solids.
    fn boolean(&self, a: &Self::Solid, b: &Self::Solid, op: BooleanOp, exact: bool) -> LatticeResult<Self::Solid>;

    /// Axis-aligned box of the given edge lengths centred at `location`.
    fn create_cuboid(&self, size: DVec3, location: DVec3) -> LatticeResult<Self::Solid>;
}
