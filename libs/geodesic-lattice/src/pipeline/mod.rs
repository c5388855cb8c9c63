//! # Lattice Pipeline
//!
//! Runs the full generator over a [`GeometryKernel`]:
//!
//! ```text
//! 1. base icosphere            → outer volume (copy of the base as a solid)
//! 2. dual of the base          → organic jitter
//! 3. wireframe of the dual     → [voxel remesh]
//! 4. struts ∩ outer volume
//! 5. struts − inner sphere     (radius max(0.01, r − wall))
//! 6. [struts ∩ dome cutter]    (keeps z ≥ 0)
//! ```
//!
//! All booleans use the exact solver. Steps run strictly in sequence. When a
//! step fails the error names it and every artifact produced so far stays
//! in [`Artifacts`] for inspection.

use tracing::{debug, info, warn};

use crate::dual::{build_dual, DualMesh};
use crate::error::{LatticeResult, Stage};
use crate::graph::PolyMesh;
use crate::jitter::smooth_jitter;
use crate::kernel::{BooleanOp, GeometryKernel};
use crate::params::LatticeParams;


/// Intermediate results of a run.
///
/// Helpers are cleared after a successful run unless
/// [`LatticeParams::delete_helpers`] is false. `struts` holds the strut solid
/// only while a step that failed had it as input.
#[derive(Debug, Clone)]
pub struct Artifacts<S> {
    /// Base icosphere.
    pub base: Option<PolyMesh>,
    /// Jittered dual of the base icosphere.
    pub dual: Option<DualMesh>,
    /// Outer sphere volume.
    pub outer: Option<S>,
    /// Inner sphere volume.
    pub inner: Option<S>,
    /// Dome cutter box.
    pub dome_cutter: Option<S>,
    /// Strut solid that a failed step received.
    pub struts: Option<S>,
}

impl<S> Default for Artifacts<S> {
    fn default() -> Self {
        Self {
            base: None,
            dual: None,
            outer: None,
            inner: None,
            dome_cutter: None,
            struts: None,
        }
    }
}

impl<S> Artifacts<S> {
    /// True if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.base.is_none()
            && self.dual.is_none()
            && self.outer.is_none()
            && self.inner.is_none()
            && self.dome_cutter.is_none()
            && self.struts.is_none()
    }
}

/// Lattice shell generator.
///
/// ## Example
///
/// ```rust
/// use geodesic_lattice::{LatticeGenerator, LatticeParams, MeshKernel};
///
/// let params = LatticeParams {
///     sphere_radius: 10.0,
///     subdivisions: 1,
///     strut_thickness: 1.0,
///     organic_jitter_strength: 1.0,
///     use_voxel_remesh: false,
///     delete_helpers: false,
///     ..LatticeParams::default()
/// };
/// let mut generator = LatticeGenerator::new(MeshKernel, params);
/// let shell = generator.run().unwrap();
///
/// assert!(shell.triangle_count() > 0);
/// assert_eq!(generator.artifacts().dual.as_ref().unwrap().mesh.face_count(), 42);
/// ```
pub struct LatticeGenerator<K: GeometryKernel> {
    kernel: K,
    params: LatticeParams,
    artifacts: Artifacts<K::Solid>,
}

impl<K: GeometryKernel> LatticeGenerator<K> {
    /// Creates a generator.
    pub fn new(kernel: K, params: LatticeParams) -> Self {
        Self {
            kernel,
            params,
            artifacts: Artifacts::default(),
        }
    }

    /// Parameters.
    pub fn params(&self) -> &LatticeParams {
        &self.params
    }

    /// Geometry kernel.
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Artifacts of the last run.
    pub fn artifacts(&self) -> &Artifacts<K::Solid> {
        &self.artifacts
    }

    /// Consumes the generator and returns the artifacts of the last run.
    pub fn into_artifacts(self) -> Artifacts<K::Solid> {
        self.artifacts
    }

    /// Generates the lattice shell.
    ///
    /// ## Errors
    ///
    /// The first kernel error, wrapped in [`LatticeError::Stage`](crate::LatticeError::Stage).
    pub fn run(&mut self) -> LatticeResult<K::Solid> {
        self.artifacts = Artifacts::default();
        let params = &self.params;
        let kernel = &self.kernel;
        let radius = params.sphere_radius;

        info!(
            radius,
            subdivisions = params.subdivisions,
            strut_thickness = params.strut_thickness,
            wall_thickness = params.wall_thickness,
            make_dome = params.make_dome,
            "lattice: start"
        );

        // 1. Base sphere and the outer volume copied from it
        let base = kernel
            .create_icosphere(radius, params.subdivisions)
            .map_err(|e| e.in_stage(Stage::BaseSphere))?;
        let base = &*self.artifacts.base.insert(base);
        info!(
            vertices = base.vertex_count(),
            faces = base.face_count(),
            "lattice: base sphere"
        );

        let outer = kernel
            .mesh_to_solid(base)
            .map_err(|e| e.in_stage(Stage::OuterVolume))?;
        let outer = &*self.artifacts.outer.insert(outer);

        // 2. Dual, then jitter along the sphere
        let mut dual = build_dual(base);
        if !dual.is_complete() {
            warn!(
                omitted = dual.omitted_count(),
                "lattice: dual has gaps, continuing"
            );
        }
        smooth_jitter(&mut dual.mesh, &params.jitter());
        let dual = &*self.artifacts.dual.insert(dual);
        info!(
            vertices = dual.mesh.vertex_count(),
            faces = dual.mesh.face_count(),
            edges = dual.mesh.edge_count(),
            "lattice: jittered dual"
        );

        // 3. Strut network
        let mut struts = kernel
            .wireframe_solidify(&dual.mesh, &params.wireframe_options())
            .map_err(|e| e.in_stage(Stage::Struts))?;
        info!("lattice: struts built");

        if params.use_voxel_remesh {
            struts = advance(&mut self.artifacts.struts, Stage::Remesh, struts, |s| {
                kernel.remesh_voxel(s, params.voxel_size)
            })?;
            info!(voxel_size = params.voxel_size, "lattice: struts remeshed");
        }

        // 4. Clip to the outer sphere
        struts = advance(&mut self.artifacts.struts, Stage::IntersectOuter, struts, |s| {
            kernel.boolean(s, outer, BooleanOp::Intersect, true)
        })?;
        info!("lattice: clipped to outer sphere");

        // 5. Hollow
        let inner_radius = params.inner_radius();
        let inner = match kernel
            .create_icosphere(inner_radius, params.subdivisions)
            .and_then(|sphere| kernel.mesh_to_solid(&sphere))
        {
            Ok(inner) => inner,
            Err(err) => {
                self.artifacts.struts = Some(struts);
                return Err(err.in_stage(Stage::InnerVolume));
            }
        };
        let inner = &*self.artifacts.inner.insert(inner);
        debug!(inner_radius, "lattice: inner volume");

        struts = advance(&mut self.artifacts.struts, Stage::Hollow, struts, |s| {
            kernel.boolean(s, inner, BooleanOp::Difference, true)
        })?;
        info!(inner_radius, "lattice: hollowed");

        // 6. Dome
        if params.make_dome {
            let (size, center) = params.dome_cutter();
            let cutter = match kernel.create_cuboid(size, center) {
                Ok(cutter) => cutter,
                Err(err) => {
                    self.artifacts.struts = Some(struts);
                    return Err(err.in_stage(Stage::DomeCutter));
                }
            };
            let cutter = &*self.artifacts.dome_cutter.insert(cutter);
            debug!(size = size.x, center_z = center.z, "lattice: dome cutter");

            struts = advance(&mut self.artifacts.struts, Stage::Dome, struts, |s| {
                kernel.boolean(s, cutter, BooleanOp::Intersect, true)
            })?;
            info!("lattice: cut to dome");
        }

        if params.delete_helpers {
            self.artifacts = Artifacts::default();
        }
        info!("lattice: done");

        Ok(struts)
    }
}

/// Runs one step on the strut solid.
///
/// On failure the input solid is parked in `slot` and the error is tagged
/// with `stage`.
fn advance<S>(
    slot: &mut Option<S>,
    stage: Stage,
    struts: S,
    step: impl FnOnce(&S) -> LatticeResult<S>,
) -> LatticeResult<S> {
    match step(&struts) {
        Ok(next) => Ok(next),
        Err(err) => {
            *slot = Some(struts);
            Err(err.in_stage(stage))
        }
    }
}
