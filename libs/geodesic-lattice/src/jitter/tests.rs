//! # Organic Jitter Tests

use super::*;
use crate::dual::build_dual;
use crate::graph::PolyMeshBuilder;
use approx::assert_relative_eq;
use lattice_mesh::primitives::create_icosphere;

/// Dual of an icosphere: the mesh the jitter runs on in the pipeline.
fn lattice(radius: f64, subdivisions: u32) -> PolyMesh {
    let sphere = create_icosphere(radius, subdivisions).unwrap();
    let base = PolyMesh::from_triangles(sphere.vertices().to_vec(), sphere.triangles()).unwrap();
    build_dual(&base).into_mesh()
}

fn params(radius: f64) -> JitterParams {
    JitterParams {
        radius,
        strength: 1.5,
        iterations: 10,
        lambda: 0.55,
        seed: 7,
    }
}

// =============================================================================
// DETERMINISM TESTS
// =============================================================================

#[test]
fn test_same_seed_is_bit_identical() {
    let mut a = lattice(10.0, 2);
    let mut b = a.clone();

    smooth_jitter(&mut a, &params(10.0));
    smooth_jitter(&mut b, &params(10.0));

    assert_eq!(a.positions(), b.positions());
}

#[test]
fn test_different_seeds_differ() {
    let mut a = lattice(10.0, 1);
    let mut b = a.clone();

    smooth_jitter(&mut a, &params(10.0));
    smooth_jitter(&mut b, &JitterParams { seed: 8, ..params(10.0) });

    assert_ne!(a.positions(), b.positions());
}

#[test]
fn test_topology_unchanged() {
    let mut mesh = lattice(10.0, 1);
    let faces = mesh.faces().to_vec();
    let edges = mesh.edges().to_vec();

    smooth_jitter(&mut mesh, &params(10.0));

    assert_eq!(mesh.faces(), faces.as_slice());
    assert_eq!(mesh.edges(), edges.as_slice());
}

// =============================================================================
// OFFSET FIELD TESTS
// =============================================================================

#[test]
fn test_initial_offsets_are_tangent_and_bounded() {
    let mesh = lattice(10.0, 1);
    let strength = 2.0;
    let offsets = initial_offsets(&mesh, strength, 3);

    assert_eq!(offsets.len(), mesh.vertex_count());
    for (offset, position) in offsets.iter().zip(mesh.positions()) {
        assert_relative_eq!(offset.dot(position.normalize()), 0.0, epsilon = 1e-12);
        let length = offset.length();
        assert!(length >= JITTER_MIN_MAGNITUDE * strength - 1e-12);
        assert!(length <= JITTER_MAX_MAGNITUDE * strength + 1e-12);
    }
}

#[test]
fn test_zero_strength_gives_zero_offsets() {
    let mesh = lattice(10.0, 1);
    let offsets = initial_offsets(&mesh, 0.0, 7);
    assert!(offsets.iter().all(|o| *o == DVec3::ZERO));
}

#[test]
fn test_full_lambda_is_neighbor_mean() {
    let mesh = lattice(10.0, 1);
    let offsets = initial_offsets(&mesh, 1.0, 11);

    let smoothed = smooth_offsets(&mesh, offsets.clone(), 1, 1.0);

    for v in 0..mesh.vertex_count() as VertexId {
        let neighbors = mesh.neighbors(v);
        let mean = neighbors
            .iter()
            .fold(DVec3::ZERO, |acc, &u| acc + offsets[u as usize])
            / neighbors.len() as f64;
        let got = smoothed[v as usize];
        assert_relative_eq!(got.x, mean.x, epsilon = 1e-12);
        assert_relative_eq!(got.y, mean.y, epsilon = 1e-12);
        assert_relative_eq!(got.z, mean.z, epsilon = 1e-12);
    }
}

#[test]
fn test_zero_lambda_and_zero_iterations_keep_offsets() {
    let mesh = lattice(10.0, 1);
    let offsets = initial_offsets(&mesh, 1.0, 5);

    assert_eq!(smooth_offsets(&mesh, offsets.clone(), 0, 0.8), offsets);
    assert_eq!(smooth_offsets(&mesh, offsets.clone(), 4, 0.0), offsets);
}

#[test]
fn test_isolated_vertex_keeps_offset() {
    let mut builder = PolyMeshBuilder::new();
    let a = builder.add_vertex(DVec3::X);
    let b = builder.add_vertex(DVec3::Y);
    let c = builder.add_vertex(DVec3::Z);
    builder.add_vertex(-DVec3::Z);
    builder.add_face(&[a, b, c]).unwrap();
    let mesh = builder.build();

    let offsets = vec![DVec3::X, DVec3::Y, DVec3::Z, DVec3::new(0.5, 0.5, 0.0)];
    let smoothed = smooth_offsets(&mesh, offsets, 3, 1.0);

    assert_eq!(smoothed[3], DVec3::new(0.5, 0.5, 0.0));
}

#[test]
fn test_smoothing_reduces_variation() {
    let mesh = lattice(10.0, 2);
    let offsets = initial_offsets(&mesh, 1.0, 7);

    let roughness = |field: &[DVec3]| -> f64 {
        mesh.edges()
            .iter()
            .map(|&(a, b)| (field[a as usize] - field[b as usize]).length_squared())
            .sum()
    };

    let smoothed = smooth_offsets(&mesh, offsets.clone(), 10, 0.55);
    assert!(roughness(&smoothed) < 0.25 * roughness(&offsets));
}

// =============================================================================
// APPLY TESTS
// =============================================================================

#[test]
fn test_tangential_removes_normal_component() {
    let normal = DVec3::new(1.0, 2.0, 2.0).normalize();
    let offset = DVec3::new(0.3, -4.0, 7.0);

    let t = tangential(offset, normal);
    assert_relative_eq!(t.dot(normal), 0.0, epsilon = 1e-12);
    assert_eq!(tangential(offset, DVec3::ZERO), offset);
}

#[test]
fn test_positions_end_on_sphere() {
    let mut mesh = lattice(25.0, 2);
    smooth_jitter(&mut mesh, &JitterParams { strength: 4.0, ..params(25.0) });

    for p in mesh.positions() {
        assert_relative_eq!(p.length(), 25.0, max_relative = 1e-12);
    }
}

#[test]
fn test_radial_offset_is_ignored() {
    let mut builder = PolyMeshBuilder::new();
    builder.add_vertex(DVec3::new(0.0, 0.0, 3.0));
    let mut mesh = builder.build();

    apply_offsets(&mut mesh, &[DVec3::new(0.0, 0.0, 50.0)], 5.0);
    assert_eq!(mesh.position(0), DVec3::new(0.0, 0.0, 5.0));
}

#[test]
fn test_origin_vertex_falls_back_to_x_axis() {
    let mut builder = PolyMeshBuilder::new();
    builder.add_vertex(DVec3::ZERO);
    let mut mesh = builder.build();

    smooth_jitter(&mut mesh, &params(4.0));
    assert_eq!(mesh.position(0), DVec3::new(4.0, 0.0, 0.0));
}

#[test]
fn test_zero_strength_only_reprojects() {
    let mut mesh = lattice(10.0, 1);
    let original = mesh.positions().to_vec();

    smooth_jitter(&mut mesh, &JitterParams { strength: 0.0, ..params(10.0) });

    for (p, o) in mesh.positions().iter().zip(&original) {
        assert_eq!(*p, project_to_radius(*o, 10.0));
    }
}
