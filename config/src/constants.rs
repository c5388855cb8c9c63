//! # Configuration Constants
//!
//! Centralized constants for the geodesic lattice pipeline. Geometry
//! tolerances, default lattice parameters and kernel safety limits are
//! defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Lattice Defaults**: Default values for every lattice parameter
//! - **Jitter**: Constants of the organic jitter field
//! - **Limits**: Maximum values for safety bounds

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Epsilon for vertex deduplication.
///
/// Used when welding nearly-identical vertices produced by boolean
/// operations and surface extraction.
///
/// # Example
///
/// ```rust
/// use config::constants::VERTEX_MERGE_EPSILON;
///
/// fn vertices_should_merge(v1: [f64; 3], v2: [f64; 3]) -> bool {
///     let dx = v1[0] - v2[0];
///     let dy = v1[1] - v2[1];
///     let dz = v1[2] - v2[2];
///     (dx * dx + dy * dy + dz * dz).sqrt() < VERTEX_MERGE_EPSILON
/// }
/// ```
pub const VERTEX_MERGE_EPSILON: f64 = 1e-8;

/// Half-width of the coplanarity band used by BSP plane classification.
///
/// Points closer than this to a splitting plane are treated as lying on it.
pub const PLANE_EPSILON: f64 = 1e-7;

/// Distance within which a boundary vertex counts as lying on an open edge
/// when boolean results are stitched.
///
/// Cut points may sit anywhere inside the coplanarity band on either side
/// of a shared edge, so this is a multiple of `PLANE_EPSILON`.
pub const T_JUNCTION_TOLERANCE: f64 = 1e-6;

/// Largest extent of a boundary loop that boolean cleanup closes with a
/// fan. Larger gaps are left open and reported.
pub const HOLE_FILL_MAX_EXTENT: f64 = 1e-3;

/// Longest boundary loop, in edges, that boolean cleanup closes.
pub const HOLE_FILL_MAX_EDGES: usize = 64;

/// Length below which a projected direction is considered degenerate.
///
/// The dual builder assigns angle zero to incident faces whose centroid
/// direction collapses below this length after tangent projection.
pub const DEGENERATE_DIRECTION_EPSILON: f64 = 1e-9;

/// Smallest allowed radius of the inner (hollowing) sphere.
///
/// # Example
///
/// ```rust
/// use config::constants::INNER_RADIUS_FLOOR;
///
/// let inner = (1.0_f64 - 5.0).max(INNER_RADIUS_FLOOR);
/// assert_eq!(inner, INNER_RADIUS_FLOOR);
/// ```
pub const INNER_RADIUS_FLOOR: f64 = 0.01;

/// Threshold on `|n.x|` above which the tangent frame is seeded from +Y
/// instead of +X.
pub const TANGENT_AXIS_SWITCH: f64 = 0.9;

// =============================================================================
// LATTICE DEFAULTS
// =============================================================================

/// Default outer radius of the lattice shell.
pub const DEFAULT_SPHERE_RADIUS: f64 = 60.0;

/// Default number of 4-to-1 subdivisions applied to the base icosahedron.
///
/// Level 3 yields the 642-vertex geodesic sphere.
pub const DEFAULT_SUBDIVISIONS: u32 = 3;

/// Default strut width.
pub const DEFAULT_STRUT_THICKNESS: f64 = 4.5;

/// Default radial wall thickness of the hollow shell.
pub const DEFAULT_WALL_THICKNESS: f64 = 1.5;

/// Default voxel edge length of the optional fusing remesh.
pub const DEFAULT_VOXEL_SIZE: f64 = 0.5;

/// Default seed of the organic jitter field.
pub const DEFAULT_SEED: u64 = 7;

/// Default peak tangential jitter displacement.
pub const DEFAULT_JITTER_STRENGTH: f64 = 3.0;

/// Default number of diffusion passes over the jitter field.
pub const DEFAULT_SMOOTH_ITERATIONS: u32 = 10;

/// Default blend factor of each diffusion pass.
pub const DEFAULT_SMOOTH_LAMBDA: f64 = 0.55;

/// Edge length of the dome cutter cube, as a multiple of the sphere radius.
///
/// The cube is centred at `z = DOME_CUTTER_SCALE / 2 * radius`, so its lower
/// face lies exactly on `z = 0`.
pub const DOME_CUTTER_SCALE: f64 = 4.0;

// =============================================================================
// JITTER CONSTANTS
// =============================================================================

/// Lower bound of the random jitter magnitude, as a fraction of the strength.
pub const JITTER_MIN_MAGNITUDE: f64 = 0.2;

/// Upper bound of the random jitter magnitude, as a fraction of the strength.
pub const JITTER_MAX_MAGNITUDE: f64 = 1.0;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Lower clamp for the half-angle cosine used by even-offset insets.
///
/// Keeps sharp or reflex corners from producing unbounded inset distances.
pub const MIN_INSET_COSINE: f64 = 0.25;

/// Maximum number of grid points the voxel remesher will allocate.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_VOXEL_COUNT;
///
/// let grid = 256_usize * 256 * 256;
/// assert!(grid < MAX_VOXEL_COUNT);
/// ```
pub const MAX_VOXEL_COUNT: usize = 64_000_000;

/// Maximum number of vertices in a single mesh.
pub const MAX_VERTICES: usize = 10_000_000;

/// Maximum number of icosphere subdivisions accepted by the mesh kernel.
///
/// Level 8 already produces 1.3 million triangles.
pub const MAX_ICOSPHERE_SUBDIVISIONS: u32 = 8;
