//! # Lattice Mesh
//!
//! Pure Rust triangle-mesh kernel used to build geodesic lattice shells.
//!
//! ## Architecture
//!
//! ```text
//! primitives (icosphere, cuboid) ─┐
//! wireframe (polygon faces) ──────┼→ Mesh → remesh / boolean → Mesh
//! ```
//!
//! ## Algorithms
//!
//! - **Boolean Operations**: BSP trees (csg.js algorithm) followed by a
//!   stitching pass that closes the cut seams
//! - **Wireframe**: Per-face inset frames joined along shared edges
//! - **Remesh**: Narrow-band signed distance grid + marching tetrahedra
//! - **Primitives**: Subdivided icosahedron, axis-aligned cuboid
//!
//! ## Usage
//!
//! ```rust
//! use lattice_mesh::primitives::{create_cuboid, create_icosphere};
//! use lattice_mesh::ops::boolean::intersection;
//! use glam::DVec3;
//!
//! let sphere = create_icosphere(10.0, 1).unwrap();
//! let cutter = create_cuboid(DVec3::splat(40.0), DVec3::new(0.0, 0.0, 20.0)).unwrap();
//! let dome = intersection(&sphere, &cutter, true).unwrap();
//! assert!(dome.triangle_count() > 0);
//! ```

pub mod error;
pub mod mesh;
pub mod ops;
pub mod primitives;

pub use error::MeshError;
pub use mesh::Mesh;
pub use ops::boolean::{difference, intersection};
pub use ops::remesh::remesh_voxel;
pub use ops::wireframe::{wireframe, WireframeOptions};
