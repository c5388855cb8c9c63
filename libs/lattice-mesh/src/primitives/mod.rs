//! # Primitives
//!
//! Mesh generation for the solids the lattice pipeline needs.

pub mod cuboid;
pub mod icosphere;

pub use cuboid::create_cuboid;
pub use icosphere::create_icosphere;
