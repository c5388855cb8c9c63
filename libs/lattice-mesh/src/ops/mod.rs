//! # Mesh Operations
//!
//! Operations on meshes: boolean operations (CSG), wireframe solidify and
//! voxel remeshing.

pub mod boolean;
pub mod remesh;
pub mod wireframe;

pub use boolean::{difference, intersection};
pub use remesh::remesh_voxel;
pub use wireframe::{wireframe, WireframeOptions};
