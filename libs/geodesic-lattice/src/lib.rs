//! # Geodesic Lattice
//!
//! Generates connected, printable geodesic lattice shells.
//!
//! ## Architecture
//!
//! ```text
//! icosphere → dual (hex/pent) → organic jitter → wireframe struts
//!           → [voxel remesh] → ∩ outer sphere → − inner sphere → [∩ dome cutter]
//! ```
//!
//! The dual builder and the jitter smoother work on [`PolyMesh`], a polygon
//! mesh graph with stable integer indices. Everything that needs solid
//! geometry goes through the [`GeometryKernel`] trait; [`MeshKernel`] is the
//! pure Rust implementation backed by `lattice-mesh`.
//!
//! ## Example
//!
//! ```rust
//! use geodesic_lattice::{LatticeGenerator, LatticeParams, MeshKernel};
//!
//! let params = LatticeParams {
//!     sphere_radius: 10.0,
//!     subdivisions: 1,
//!     strut_thickness: 1.0,
//!     organic_jitter_strength: 1.0,
//!     use_voxel_remesh: false,
//!     ..LatticeParams::default()
//! };
//! let mut generator = LatticeGenerator::new(MeshKernel, params);
//! let shell = generator.run().unwrap();
//! assert!(shell.triangle_count() > 0);
//! ```

pub mod dual;
pub mod error;
pub mod frame;
pub mod graph;
pub mod jitter;
pub mod kernel;
pub mod params;
pub mod pipeline;

pub use dual::{build_dual, DualMesh};
pub use error::{LatticeError, LatticeResult, Stage};
pub use graph::{Face, FaceError, FaceId, PolyMesh, PolyMeshBuilder, VertexId};
pub use jitter::{smooth_jitter, JitterParams};
pub use kernel::{BooleanOp, GeometryKernel, MeshKernel, WireframeOptions};
pub use params::LatticeParams;
pub use pipeline::{Artifacts, LatticeGenerator};
