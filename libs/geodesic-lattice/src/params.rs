//! # Lattice Parameters
//!
//! Every knob of the generator in one serializable value. Missing fields
//! take their defaults when deserializing, so partial configs work:
//!
//! ```rust
//! use geodesic_lattice::LatticeParams;
//!
//! let params: LatticeParams = serde_json::from_str(r#"{ "make_dome": true }"#).unwrap();
//! assert!(params.make_dome);
//! assert_eq!(params.sphere_radius, 60.0);
//! ```

use config::constants::{
    DEFAULT_JITTER_STRENGTH, DEFAULT_SEED, DEFAULT_SMOOTH_ITERATIONS, DEFAULT_SMOOTH_LAMBDA,
    DEFAULT_SPHERE_RADIUS, DEFAULT_STRUT_THICKNESS, DEFAULT_SUBDIVISIONS, DEFAULT_VOXEL_SIZE,
    DEFAULT_WALL_THICKNESS, DOME_CUTTER_SCALE, INNER_RADIUS_FLOOR,
};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::jitter::JitterParams;
use crate::kernel::WireframeOptions;

/// Parameters of a lattice shell, in model units (1 unit = 1 mm when printed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeParams {
    /// Outer radius of the shell.
    pub sphere_radius: f64,
    /// Icosphere subdivisions; 1 gives 42 lattice cells.
    pub subdivisions: u32,
    /// Strut width and depth.
    pub strut_thickness: f64,
    /// Shell wall thickness below the outer radius.
    pub wall_thickness: f64,
    /// Keep only the half with z ≥ 0.
    pub make_dome: bool,
    /// Fuse the strut network through a voxel remesh before the booleans.
    pub use_voxel_remesh: bool,
    /// Voxel edge length of the remesh.
    pub voxel_size: f64,
    /// Seed of the organic jitter.
    pub seed: u64,
    /// Jitter displacement scale; 0 disables the jitter.
    pub organic_jitter_strength: f64,
    /// Smoothing passes over the jitter field.
    pub organic_smooth_iters: u32,
    /// Smoothing blend factor in `[0, 1]`.
    pub organic_smooth_lambda: f64,
    /// Drop helper solids and meshes once the shell is done.
    pub delete_helpers: bool,
}

impl Default for LatticeParams {
    fn default() -> Self {
        Self {
            sphere_radius: DEFAULT_SPHERE_RADIUS,
            subdivisions: DEFAULT_SUBDIVISIONS,
            strut_thickness: DEFAULT_STRUT_THICKNESS,
            wall_thickness: DEFAULT_WALL_THICKNESS,
            make_dome: false,
            use_voxel_remesh: true,
            voxel_size: DEFAULT_VOXEL_SIZE,
            seed: DEFAULT_SEED,
            organic_jitter_strength: DEFAULT_JITTER_STRENGTH,
            organic_smooth_iters: DEFAULT_SMOOTH_ITERATIONS,
            organic_smooth_lambda: DEFAULT_SMOOTH_LAMBDA,
            delete_helpers: true,
        }
    }
}

impl LatticeParams {
    /// Radius of the hollowing sphere, never below [`INNER_RADIUS_FLOOR`].
    pub fn inner_radius(&self) -> f64 {
        (self.sphere_radius - self.wall_thickness).max(INNER_RADIUS_FLOOR)
    }

    /// Jitter parameters for the dual vertices.
    pub fn jitter(&self) -> JitterParams {
        JitterParams {
            radius: self.sphere_radius,
            strength: self.organic_jitter_strength,
            iterations: self.organic_smooth_iters,
            lambda: self.organic_smooth_lambda,
            seed: self.seed,
        }
    }

    /// Wireframe options: replace faces, close boundaries, even offset.
    pub fn wireframe_options(&self) -> WireframeOptions {
        WireframeOptions::new(self.strut_thickness)
    }

    /// Size and centre of the box that keeps the z ≥ 0 half.
    pub fn dome_cutter(&self) -> (DVec3, DVec3) {
        let size = self.sphere_radius * DOME_CUTTER_SCALE;
        (DVec3::splat(size), DVec3::new(0.0, 0.0, size / 2.0))
    }
}

// =============================================================================
// TESTS
// =============================================================================
