//! # Mesh Booleans
//!
//! Solid booleans on closed triangle meshes via BSP clipping. Each operand
//! becomes a BSP tree, the trees clip each other and the surviving polygons
//! are triangulated and welded back into one mesh. Both operations are
//! written as complements of a union:
//!
//! ```text
//! A − B = ¬(¬A ∪ B)
//! A ∩ B = ¬(¬A ∪ ¬B)
//! ```
//!
//! ## Cleanup
//!
//! Faces on either side of a cut are split independently, so the welded
//! result can have a vertex resting on a neighbour's edge. Such T-junctions
//! are stitched and the mesh is welded again at the stitching tolerance.
//! Back-to-back triangle pairs are then dropped and gaps no wider than
//! `HOLE_FILL_MAX_EXTENT` are fanned shut. Where separately cut sheets still
//! meet along a tiny edge shared by more than two faces, that edge is
//! collapsed and the two previous steps run again.
//!
//! ## Exactness
//!
//! Every operation takes an `exact` flag. With `exact = true` the cleaned
//! result must be a closed, consistently oriented manifold, otherwise the
//! operation fails with [`MeshError::BooleanFailed`]. With `exact = false`
//! whatever the cleanup produced is returned.
//!
//! ## Example
//!
//! ```rust
//! use lattice_mesh::ops::boolean::{difference, intersection};
//! use lattice_mesh::primitives::create_cuboid;
//! use glam::DVec3;
//!
//! let a = create_cuboid(DVec3::splat(2.0), DVec3::ZERO).unwrap();
//! let b = create_cuboid(DVec3::splat(2.0), DVec3::X).unwrap();
//! let overlap = intersection(&a, &b, true).unwrap();
//! assert!((overlap.volume() - 4.0).abs() < 1e-9);
//! ```

mod bsp;
mod plane;
mod polygon;


use config::constants::{
    HOLE_FILL_MAX_EDGES, HOLE_FILL_MAX_EXTENT, T_JUNCTION_TOLERANCE, VERTEX_MERGE_EPSILON,
};
use tracing::debug;

use crate::error::MeshError;
use crate::Mesh;
use bsp::BspTree;
use polygon::Polygon;

/// Rounds of pinch collapsing in the cleanup.
const PINCH_PASSES: usize = 3;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Solid covered by `a` but not by `b`.
///
/// An `a` without faces gives an empty mesh, a `b` without faces gives a
/// copy of `a`.
///
/// # Errors
///
/// [`MeshError::BooleanFailed`] when an operand or the result has
/// non-finite coordinates, or when `exact` is set and the result is not
/// closed.
pub fn difference(a: &Mesh, b: &Mesh, exact: bool) -> Result<Mesh, MeshError> {
    let polys_a = mesh_to_polygons(a)?;
    let polys_b = mesh_to_polygons(b)?;

    if polys_a.is_empty() {
        return Ok(Mesh::new());
    }
    if polys_b.is_empty() {
        return Ok(a.clone());
    }

    let mut bsp_a = BspTree::new(polys_a);
    let mut bsp_b = BspTree::new(polys_b);

    // A - B = ~(~A | B)
    bsp_a.invert();
    bsp_a.clip_to(&bsp_b);
    bsp_b.clip_to(&bsp_a);
    bsp_b.invert();
    bsp_b.clip_to(&bsp_a);
    bsp_b.invert();

    finish("difference", combine(bsp_a, bsp_b, true), exact)
}

/// Solid covered by both `a` and `b`; empty when either has no faces.
///
/// # Errors
///
/// As for [`difference`].
pub fn intersection(a: &Mesh, b: &Mesh, exact: bool) -> Result<Mesh, MeshError> {
    let polys_a = mesh_to_polygons(a)?;
    let polys_b = mesh_to_polygons(b)?;

    if polys_a.is_empty() || polys_b.is_empty() {
        return Ok(Mesh::new());
    }

    let mut bsp_a = BspTree::new(polys_a);
    let mut bsp_b = BspTree::new(polys_b);

    // A & B = ~(~A | ~B)
    bsp_a.invert();
    bsp_b.clip_to(&bsp_a);
    bsp_b.invert();
    bsp_a.clip_to(&bsp_b);
    bsp_b.clip_to(&bsp_a);

    finish("intersection", combine(bsp_a, bsp_b, true), exact)
}

// =============================================================================
// CONVERSION HELPERS
// =============================================================================

/// Polygons of every non-degenerate triangle.
fn mesh_to_polygons(mesh: &Mesh) -> Result<Vec<Polygon>, MeshError> {
    if !mesh.is_finite() {
        return Err(MeshError::boolean_failed(
            "operand has non-finite coordinates",
        ));
    }

    Ok((0..mesh.triangle_count())
        .filter_map(|i| Polygon::from_vertices(mesh.triangle_positions(i).to_vec()))
        .collect())
}

/// Polygons of both trees, complemented back when `complement` is set.
fn combine(a: BspTree, b: BspTree, complement: bool) -> Vec<Polygon> {
    let mut polygons = a.into_polygons();
    polygons.extend(b.into_polygons());
    if complement {
        polygons.iter_mut().for_each(Polygon::flip);
    }
    polygons
}

/// Fans each convex polygon into triangles. Corners are not shared yet.
fn polygons_to_mesh(polygons: &[Polygon]) -> Mesh {
    let mut mesh = Mesh::new();
    for corners in polygons.iter().map(Polygon::vertices) {
        let Some((&hub, rest)) = corners.split_first() else {
            continue;
        };
        let hub = mesh.add_vertex(hub);
        let mut previous = None;
        for &corner in rest {
            let current = mesh.add_vertex(corner);
            if let Some(previous) = previous {
                mesh.add_triangle(hub, previous, current);
            }
            previous = Some(current);
        }
    }
    mesh
}

/// Triangulates the result polygons, welds and stitches them and rejects
/// broken output.
fn finish(operation: &str, polygons: Vec<Polygon>, exact: bool) -> Result<Mesh, MeshError> {
    let polygon_count = polygons.len();
    let mut mesh = polygons_to_mesh(&polygons);

    if !mesh.is_finite() {
        return Err(MeshError::boolean_failed(format!(
            "{} produced non-finite coordinates",
            operation
        )));
    }

    mesh.weld(VERTEX_MERGE_EPSILON);
    // A second pass picks up corners that only became open after the first
    let stitched = mesh.split_t_junctions(T_JUNCTION_TOLERANCE)
        + mesh.split_t_junctions(T_JUNCTION_TOLERANCE);
    // Clusters of cut points closer than the stitching tolerance collapse
    mesh.weld(T_JUNCTION_TOLERANCE);
    let mut cancelled = mesh.remove_opposing_pairs();
    let mut filled = mesh.fill_small_holes(HOLE_FILL_MAX_EXTENT, HOLE_FILL_MAX_EDGES);
    let mut collapsed = 0;
    for _ in 0..PINCH_PASSES {
        let pinches = mesh.collapse_nonmanifold_edges(HOLE_FILL_MAX_EXTENT);
        if pinches == 0 {
            break;
        }
        collapsed += pinches;
        cancelled += mesh.remove_opposing_pairs();
        filled += mesh.fill_small_holes(HOLE_FILL_MAX_EXTENT, HOLE_FILL_MAX_EDGES);
    }
    mesh.compact();

    debug!(
        operation,
        polygons = polygon_count,
        stitched,
        cancelled,
        filled,
        collapsed,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "boolean finished"
    );

    if exact && !mesh.is_empty() && !mesh.is_watertight() {
        return Err(MeshError::boolean_failed(format!(
            "{} result is not a closed manifold",
            operation
        )));
    }

    Ok(mesh)
}
