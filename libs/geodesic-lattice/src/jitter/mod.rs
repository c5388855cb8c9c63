//! # Organic Jitter
//!
//! Moves the vertices of a sphere-like mesh along the surface with a smooth
//! random displacement field, then snaps them back onto the sphere.
//!
//! ## Passes
//!
//! 1. [`initial_offsets`]: one random tangent vector per vertex
//! 2. [`smooth_offsets`]: repeated blending towards the neighbour mean, which
//!    turns per-vertex noise into a low-frequency flow
//! 3. [`apply_offsets`]: strip the normal component, displace, reproject
//!
//! Only positions change; the topology of the mesh is untouched, so a
//! connected lattice stays connected.

use std::f64::consts::TAU;

use config::constants::{
    DEFAULT_JITTER_STRENGTH, DEFAULT_SEED, DEFAULT_SMOOTH_ITERATIONS, DEFAULT_SMOOTH_LAMBDA,
    DEFAULT_SPHERE_RADIUS, JITTER_MAX_MAGNITUDE, JITTER_MIN_MAGNITUDE,
};
use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::frame::{project_to_radius, tangent_basis};
use crate::graph::{PolyMesh, VertexId};

#[cfg(test)]
mod tests;

/// Per-vertex tangent displacement, indexed like the mesh vertices.
pub type OffsetField = Vec<DVec3>;

/// Parameters for [`smooth_jitter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JitterParams {
    /// Radius of the sphere the vertices are projected back onto.
    pub radius: f64,
    /// Maximum displacement length before smoothing.
    pub strength: f64,
    /// Number of smoothing passes.
    pub iterations: u32,
    /// Blend factor towards the neighbour mean per pass, in `[0, 1]`.
    pub lambda: f64,
    /// Random seed.
    pub seed: u64,
}

impl Default for JitterParams {
    fn default() -> Self {
        Self {
            radius: DEFAULT_SPHERE_RADIUS,
            strength: DEFAULT_JITTER_STRENGTH,
            iterations: DEFAULT_SMOOTH_ITERATIONS,
            lambda: DEFAULT_SMOOTH_LAMBDA,
            seed: DEFAULT_SEED,
        }
    }
}

/// Applies a smoothed tangential jitter to every vertex in place.
///
/// The result is deterministic: the same mesh, parameters and seed give
/// bit-identical positions on every platform.
///
/// ## Example
///
/// ```rust
/// use geodesic_lattice::graph::PolyMesh;
/// use geodesic_lattice::jitter::{smooth_jitter, JitterParams};
/// use glam::DVec3;
///
/// let mut mesh = PolyMesh::from_triangles(
///     vec![DVec3::X, DVec3::Y, DVec3::Z, -DVec3::X],
///     &[[0, 1, 2], [3, 2, 1]],
/// )
/// .unwrap();
/// let params = JitterParams { radius: 1.0, strength: 0.1, ..JitterParams::default() };
/// smooth_jitter(&mut mesh, &params);
///
/// for p in mesh.positions() {
///     assert!((p.length() - 1.0).abs() < 1e-12);
/// }
/// ```
pub fn smooth_jitter(mesh: &mut PolyMesh, params: &JitterParams) {
    let offsets = initial_offsets(mesh, params.strength, params.seed);
    let offsets = smooth_offsets(mesh, offsets, params.iterations, params.lambda);
    apply_offsets(mesh, &offsets, params.radius);

    debug!(
        vertices = mesh.vertex_count(),
        strength = params.strength,
        iterations = params.iterations,
        seed = params.seed,
        "jitter applied"
    );
}

/// Draws one random tangent offset per vertex.
///
/// Per vertex, in index order, an angle in `[0, 2π)` and then a magnitude in
/// `[0.2, 1.0] · strength` are drawn; the offset points along that angle in
/// the vertex's tangent frame.
pub fn initial_offsets(mesh: &PolyMesh, strength: f64, seed: u64) -> OffsetField {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    mesh.positions()
        .iter()
        .map(|position| {
            let (t, b) = tangent_basis(position.normalize_or_zero());
            let angle = rng.gen_range(0.0..TAU);
            let magnitude = rng.gen_range(JITTER_MIN_MAGNITUDE..=JITTER_MAX_MAGNITUDE) * strength;
            (t * angle.cos() + b * angle.sin()).normalize_or_zero() * magnitude
        })
        .collect()
}

/// Blends every offset towards the mean of its neighbours' offsets.
///
/// Each pass reads only the previous pass: `o'[v] = lerp(o[v], mean(o[n]), lambda)`.
/// Vertices without neighbours keep their offset.
pub fn smooth_offsets(mesh: &PolyMesh, offsets: OffsetField, iterations: u32, lambda: f64) -> OffsetField {
    let mut current = offsets;
    let mut next = current.clone();

    for _ in 0..iterations {
        for (v, slot) in next.iter_mut().enumerate() {
            let neighbors = mesh.neighbors(v as VertexId);
            if neighbors.is_empty() {
                *slot = current[v];
                continue;
            }
            let sum = neighbors
                .iter()
                .fold(DVec3::ZERO, |acc, &u| acc + current[u as usize]);
            let mean = sum / neighbors.len() as f64;
            *slot = current[v].lerp(mean, lambda);
        }
        std::mem::swap(&mut current, &mut next);
    }

    current
}

/// Displaces every vertex by the tangential part of its offset and projects
/// it onto the sphere of `radius`.
///
/// Extra offsets beyond the vertex count are ignored.
pub fn apply_offsets(mesh: &mut PolyMesh, offsets: &[DVec3], radius: f64) {
    for (position, &offset) in mesh.positions_mut().iter_mut().zip(offsets) {
        let normal = position.normalize_or_zero();
        *position = project_to_radius(*position + tangential(offset, normal), radius);
    }
}

/// Removes the component of `offset` along `normal` (a unit or zero vector).
#[inline]
pub fn tangential(offset: DVec3, normal: DVec3) -> DVec3 {
    offset - normal * offset.dot(normal)
}
