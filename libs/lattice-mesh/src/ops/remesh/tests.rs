//! # Voxel Remesh Tests

use super::*;
use crate::primitives::{create_cuboid, create_icosphere};

/// Signed distance from `p` to an axis-aligned box.
fn box_distance(p: DVec3, center: DVec3, half: DVec3) -> f64 {
    let q = (p - center).abs() - half;
    q.max(DVec3::ZERO).length() + q.max_element().min(0.0)
}

#[test]
fn test_cube_remesh_is_closed_and_close() {
    let center = DVec3::new(0.1, 0.07, -0.3);
    let cube = create_cuboid(DVec3::splat(2.0), center).unwrap();
    let voxel = 0.25;

    let remeshed = remesh_voxel(&cube, voxel).unwrap();

    assert!(remeshed.is_watertight());
    for &v in remeshed.vertices() {
        let d = box_distance(v, center, DVec3::ONE);
        assert!(d.abs() < voxel, "vertex {:?} is {} from the cube", v, d);
    }

    // Corners and edges round off by less than a voxel
    let volume = remeshed.volume();
    assert!(volume > 0.0);
    assert!((volume - 8.0).abs() < 0.1 * 8.0, "volume {}", volume);
}

#[test]
fn test_sphere_remesh_radius() {
    let sphere = create_icosphere(3.0, 2).unwrap();
    let remeshed = remesh_voxel(&sphere, 0.3).unwrap();

    assert!(remeshed.is_watertight());
    for v in remeshed.vertices() {
        let r = v.length();
        assert!(r > 3.0 - 0.3 && r < 3.0 + 0.3, "radius {}", r);
    }
}

#[test]
fn test_overlapping_parts_fuse() {
    let mut mesh = create_cuboid(DVec3::splat(2.0), DVec3::ZERO).unwrap();
    mesh.merge(&create_cuboid(DVec3::splat(2.0), DVec3::X).unwrap());

    let fused = remesh_voxel(&mesh, 0.25).unwrap();

    // One closed surface around the 3x2x2 union
    assert!(fused.is_watertight());
    let volume = fused.volume();
    assert!((volume - 12.0).abs() < 0.1 * 12.0, "volume {}", volume);
    let (min, max) = fused.bounding_box();
    assert!(min.x > -1.25 && max.x < 2.25);
}

#[test]
fn test_edge_contact_stays_manifold() {
    // Two cubes touching along one edge: the grid face around that edge has
    // diagonal inside corners
    let mut mesh = create_cuboid(DVec3::ONE, DVec3::ZERO).unwrap();
    mesh.merge(&create_cuboid(DVec3::ONE, DVec3::new(1.0, 1.0, 0.0)).unwrap());

    let remeshed = remesh_voxel(&mesh, 0.25).unwrap();

    assert!(remeshed.is_watertight());
    let volume = remeshed.volume();
    assert!((volume - 2.0).abs() < 0.1 * 2.0, "volume {}", volume);
}

#[test]
fn test_crossing_keeps_margin_from_grid_points() {
    let mut grid = DistanceGrid {
        origin: DVec3::ZERO,
        spacing: 1.0,
        dims: [2, 1, 1],
        values: vec![0.01, -0.99],
    };
    let mut mesh = Mesh::new();
    let mut edge_vertices = EdgeVertices::new();

    let near = edge_vertex(&grid, [0, 0, 0], [1, 0, 0], &mut mesh, &mut edge_vertices);
    assert!((mesh.vertex(near).x - CROSSING_MARGIN).abs() < 1e-12);
    // Shared per grid edge, in either direction
    assert_eq!(edge_vertex(&grid, [1, 0, 0], [0, 0, 0], &mut mesh, &mut edge_vertices), near);

    grid.values = vec![0.4, -0.6];
    let mut edge_vertices = EdgeVertices::new();
    let mid = edge_vertex(&grid, [0, 0, 0], [1, 0, 0], &mut mesh, &mut edge_vertices);
    assert!((mesh.vertex(mid).x - 0.4).abs() < 1e-12);
}

#[test]
fn test_remesh_invalid_voxel_size() {
    let cube = create_cuboid(DVec3::ONE, DVec3::ZERO).unwrap();
    for size in [0.0, -0.5, f64::NAN] {
        assert!(matches!(
            remesh_voxel(&cube, size),
            Err(MeshError::DegenerateGeometry { .. })
        ));
    }
}

#[test]
fn test_remesh_empty_mesh() {
    assert!(matches!(
        remesh_voxel(&Mesh::new(), 0.5),
        Err(MeshError::ValidationFailed { .. })
    ));
}

#[test]
fn test_remesh_grid_limit() {
    let cube = create_cuboid(DVec3::splat(1000.0), DVec3::ZERO).unwrap();
    assert!(matches!(
        remesh_voxel(&cube, 0.1),
        Err(MeshError::ValidationFailed { .. })
    ));
}

#[test]
fn test_closest_point_regions() {
    let (a, b, c) = (DVec3::ZERO, DVec3::X, DVec3::Y);

    // Face interior
    let p = closest_point_on_triangle(DVec3::new(0.2, 0.2, 1.0), a, b, c);
    assert!((p - DVec3::new(0.2, 0.2, 0.0)).length() < 1e-12);
    // Vertex region
    assert_eq!(closest_point_on_triangle(DVec3::new(-1.0, -1.0, 0.0), a, b, c), a);
    // Edge region
    let p = closest_point_on_triangle(DVec3::new(0.5, -1.0, 0.0), a, b, c);
    assert!((p - DVec3::new(0.5, 0.0, 0.0)).length() < 1e-12);
}

#[test]
fn test_ray_crossing_winding() {
    // Triangle facing +X: a ray along +X leaves the solid there
    let (a, b, c) = (DVec3::ZERO, DVec3::Y, DVec3::Z);
    let normal = (b - a).cross(c - a);
    assert!(normal.x > 0.0);

    let (x, winding) = ray_x_crossing(0.2, 0.2, a, b, c).unwrap();
    assert_eq!(x, 0.0);
    assert_eq!(winding, -1);

    let (_, winding) = ray_x_crossing(0.2, 0.2, a, c, b).unwrap();
    assert_eq!(winding, 1);

    assert!(ray_x_crossing(2.0, 2.0, a, b, c).is_none());
}
