//! # Splitting Plane
//!
//! Points are classified by their signed distance with a fixed band of
//! half-width `PLANE_EPSILON`. Every polygon asks the same plane about the
//! same corner and gets the same answer, so neighbouring faces are cut at
//! identical points.

use config::constants::{EPSILON, PLANE_EPSILON};
use glam::DVec3;

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Side of a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Positive side, where the normal points.
    Front,
    /// Negative side.
    Back,
    /// Within the band around the plane.
    Coplanar,
    /// Polygons only: corners on both sides.
    Spanning,
}

// =============================================================================
// PLANE
// =============================================================================

/// Oriented plane `normal · p = w`.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Unit length.
    normal: DVec3,
    w: f64,
}

impl Plane {
    /// Plane through `a`, `b`, `c`, facing the side they appear
    /// counter-clockwise from. `None` when they are (nearly) collinear.
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        let cross = (b - a).cross(c - a);
        let length = cross.length();
        if !length.is_finite() || length < EPSILON {
            return None;
        }

        let normal = cross / length;
        Some(Self {
            normal,
            w: normal.dot(a),
        })
    }

    /// Unit normal.
    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    /// Swaps front and back.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Distance of `point` along the normal; positive in front.
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.w
    }

    /// Side of the plane `point` lies on. Points no farther than
    /// `PLANE_EPSILON` count as `Coplanar`.
    pub fn classify_point(&self, point: DVec3) -> Classification {
        let distance = self.signed_distance(point);
        if distance > PLANE_EPSILON {
            Classification::Front
        } else if distance < -PLANE_EPSILON {
            Classification::Back
        } else {
            Classification::Coplanar
        }
    }
}

#[cfg(test)]
impl Plane {
    /// Offset along the normal.
    pub fn w(&self) -> f64 {
        self.w
    }
}

// =============================================================================
// TESTS
// =============================================================================
