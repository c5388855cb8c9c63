//! # Tests for Config Constants
//!
//! Unit tests verifying the consistency of configuration constants.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
}

#[test]
fn test_vertex_merge_epsilon_larger_than_epsilon() {
    assert!(
        VERTEX_MERGE_EPSILON >= EPSILON,
        "VERTEX_MERGE_EPSILON should be >= EPSILON"
    );
}

#[test]
fn test_plane_epsilon_coarser_than_merge_epsilon() {
    // Welding must never merge points the BSP still tells apart
    assert!(PLANE_EPSILON > VERTEX_MERGE_EPSILON);
}

#[test]
fn test_boolean_cleanup_tolerances_ordered() {
    assert!(T_JUNCTION_TOLERANCE > PLANE_EPSILON);
    assert!(HOLE_FILL_MAX_EXTENT > T_JUNCTION_TOLERANCE);
    assert!(HOLE_FILL_MAX_EDGES >= 3);
}

#[test]
fn test_inner_radius_floor_is_small_positive() {
    assert!(INNER_RADIUS_FLOOR > 0.0);
    assert!(INNER_RADIUS_FLOOR < DEFAULT_WALL_THICKNESS);
}

// =============================================================================
// LATTICE DEFAULT TESTS
// =============================================================================

#[test]
fn test_default_wall_thinner_than_radius() {
    assert!(DEFAULT_WALL_THICKNESS > 0.0);
    assert!(DEFAULT_WALL_THICKNESS < DEFAULT_SPHERE_RADIUS);
}

#[test]
fn test_default_strut_and_voxel_positive() {
    assert!(DEFAULT_STRUT_THICKNESS > 0.0);
    assert!(DEFAULT_VOXEL_SIZE > 0.0);
    // The remesh must resolve a strut with a few voxels
    assert!(DEFAULT_VOXEL_SIZE < DEFAULT_STRUT_THICKNESS / 4.0);
}

#[test]
fn test_default_smoothing_lambda_in_unit_range() {
    assert!((0.0..=1.0).contains(&DEFAULT_SMOOTH_LAMBDA));
}

#[test]
fn test_default_subdivisions_within_kernel_limit() {
    assert!(DEFAULT_SUBDIVISIONS >= 1);
    assert!(DEFAULT_SUBDIVISIONS <= MAX_ICOSPHERE_SUBDIVISIONS);
}

#[test]
fn test_dome_cutter_reaches_origin_plane() {
    // Cube centred at scale/2 * r with edge scale * r: bottom face at z = 0
    let r = DEFAULT_SPHERE_RADIUS;
    let bottom = DOME_CUTTER_SCALE / 2.0 * r - DOME_CUTTER_SCALE * r / 2.0;
    assert_eq!(bottom, 0.0);
    assert!(DOME_CUTTER_SCALE / 2.0 * r + DOME_CUTTER_SCALE * r / 2.0 > r);
}

// =============================================================================
// JITTER TESTS
// =============================================================================

#[test]
fn test_jitter_magnitude_range_ordered() {
    assert!(JITTER_MIN_MAGNITUDE > 0.0);
    assert!(JITTER_MIN_MAGNITUDE < JITTER_MAX_MAGNITUDE);
}

#[test]
fn test_tangent_axis_switch_below_one() {
    assert!(TANGENT_AXIS_SWITCH > 0.5 && TANGENT_AXIS_SWITCH < 1.0);
}

// =============================================================================
// LIMIT TESTS
// =============================================================================

#[test]
fn test_min_inset_cosine_in_range() {
    assert!(MIN_INSET_COSINE > 0.0 && MIN_INSET_COSINE < 1.0);
}

#[test]
fn test_max_voxel_count_reasonable() {
    assert!(MAX_VOXEL_COUNT >= 1_000_000);
    assert!(MAX_VERTICES >= 1_000_000);
}
