//! # Sphere Frame
//!
//! Local tangent frames and radial projection on an origin-centred sphere.

use config::constants::TANGENT_AXIS_SWITCH;
use glam::DVec3;

/// Orthonormal tangent vectors `(t, b)` for a normal `n`.
///
/// `t = normalize(n × a)` with `a = +X`, or `+Y` when `n` is too close to
/// the X axis, and `b = normalize(n × t)`. `(t, b, n)` is right-handed, so
/// increasing `atan2(u·b, u·t)` runs counter-clockwise seen from outside.
/// A zero normal yields zero tangents.
pub fn tangent_basis(normal: DVec3) -> (DVec3, DVec3) {
    let n = normal.normalize_or_zero();
    let axis = if n.x.abs() < TANGENT_AXIS_SWITCH {
        DVec3::X
    } else {
        DVec3::Y
    };
    let t = n.cross(axis).normalize_or_zero();
    let b = n.cross(t).normalize_or_zero();
    (t, b)
}

/// Scales `p` onto the sphere of `radius`; the origin maps to `(radius, 0, 0)`.
pub fn project_to_radius(p: DVec3, radius: f64) -> DVec3 {
    let direction = p.normalize_or_zero();
    if direction == DVec3::ZERO {
        return DVec3::new(radius, 0.0, 0.0);
    }
    direction * radius
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tangent_basis_orthonormal() {
        for n in [
            DVec3::X,
            DVec3::Y,
            DVec3::Z,
            DVec3::new(0.3, -0.8, 0.5),
            DVec3::new(-0.95, 0.1, 0.05),
        ] {
            let n = n.normalize();
            let (t, b) = tangent_basis(n);
            assert_relative_eq!(t.length(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(b.length(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(t.dot(n), 0.0, epsilon = 1e-12);
            assert_relative_eq!(b.dot(n), 0.0, epsilon = 1e-12);
            assert_relative_eq!(t.dot(b), 0.0, epsilon = 1e-12);
            assert_relative_eq!(t.cross(b).dot(n), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_tangent_basis_axis_switch() {
        // Near the X axis the helper axis switches to +Y
        let (t, _) = tangent_basis(DVec3::X);
        assert_relative_eq!(t.z, 1.0, epsilon = 1e-12);

        let (t, _) = tangent_basis(DVec3::Z);
        assert_relative_eq!(t.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tangent_basis_zero_normal() {
        assert_eq!(tangent_basis(DVec3::ZERO), (DVec3::ZERO, DVec3::ZERO));
    }

    #[test]
    fn test_project_to_radius() {
        let p = project_to_radius(DVec3::new(3.0, 4.0, 0.0), 10.0);
        assert_relative_eq!(p.x, 6.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 8.0, epsilon = 1e-12);
        assert_eq!(p.z, 0.0);
    }

    #[test]
    fn test_project_zero_falls_back_to_x_axis() {
        assert_eq!(project_to_radius(DVec3::ZERO, 7.5), DVec3::new(7.5, 0.0, 0.0));
    }
}
