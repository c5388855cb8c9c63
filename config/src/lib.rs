//! # Config Crate
//!
//! Centralized configuration constants for the geodesic lattice pipeline.
//! Every tolerance, default parameter and kernel limit is defined here so the
//! mesh kernel and the lattice core agree on the same numbers.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_SPHERE_RADIUS, DEFAULT_WALL_THICKNESS, INNER_RADIUS_FLOOR};
//!
//! let inner = (DEFAULT_SPHERE_RADIUS - DEFAULT_WALL_THICKNESS).max(INNER_RADIUS_FLOOR);
//! assert!(inner > 0.0);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Print Units**: Lengths are millimetre-like model units
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
