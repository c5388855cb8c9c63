//! # BSP Polygon
//!
//! Convex face fragment carried through the BSP trees, with the plane it was
//! cut from.

use glam::DVec3;

use super::plane::{Classification, Plane};

// =============================================================================
// SPLIT OUTPUT
// =============================================================================

/// Destination lists for [`Polygon::split`].
#[derive(Debug, Default)]
pub struct SplitBuffers {
    /// On the plane, normal agreeing with it.
    pub coplanar_front: Vec<Polygon>,
    /// On the plane, normal opposing it.
    pub coplanar_back: Vec<Polygon>,
    /// Strictly on the positive side.
    pub front: Vec<Polygon>,
    /// Strictly on the negative side.
    pub back: Vec<Polygon>,
}

// =============================================================================
// POLYGON
// =============================================================================

/// Convex planar polygon.
///
/// Pieces produced by splitting keep the plane of the polygon they came
/// from, so repeated splits never re-derive a plane from sliver geometry.
#[derive(Debug, Clone)]
pub struct Polygon {
    /// Corners, counter-clockwise around `plane`'s normal.
    vertices: Vec<DVec3>,
    plane: Plane,
}

impl Polygon {
    /// Builds a polygon whose plane runs through its first three corners.
    ///
    /// `None` for fewer than three corners or when those three are collinear.
    pub fn from_vertices(vertices: Vec<DVec3>) -> Option<Self> {
        let plane = match vertices.as_slice() {
            [a, b, c, ..] => Plane::from_points(*a, *b, *c)?,
            _ => return None,
        };
        Some(Self { vertices, plane })
    }

    /// Corners in winding order.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Supporting plane.
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Turns the polygon inside out.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    /// Side of `plane` the whole polygon lies on.
    ///
    /// A piece cut from a plane keeps that plane, so asking it again about
    /// its own plane finds every corner in the band and reports `Coplanar`.
    pub fn classify(&self, plane: &Plane) -> Classification {
        let (front, back) = self
            .vertices
            .iter()
            .fold((false, false), |(front, back), &v| match plane.classify_point(v) {
                Classification::Front => (true, back),
                Classification::Back => (front, true),
                _ => (front, back),
            });

        match (front, back) {
            (true, true) => Classification::Spanning,
            (true, false) => Classification::Front,
            (false, true) => Classification::Back,
            (false, false) => Classification::Coplanar,
        }
    }

    /// Sorts the polygon into `out` by its side of `plane`, cutting it in two
    /// when it straddles.
    pub fn split(self, plane: &Plane, out: &mut SplitBuffers) {
        match self.classify(plane) {
            Classification::Front => out.front.push(self),
            Classification::Back => out.back.push(self),
            Classification::Coplanar => {
                if self.plane.normal().dot(plane.normal()) > 0.0 {
                    out.coplanar_front.push(self);
                } else {
                    out.coplanar_back.push(self);
                }
            }
            Classification::Spanning => {
                let (front, back) = self.cut(plane);
                for (vertices, side) in [(front, &mut out.front), (back, &mut out.back)] {
                    if vertices.len() >= 3 {
                        side.push(Polygon {
                            vertices,
                            plane: self.plane,
                        });
                    }
                }
            }
        }
    }

    /// Corner lists of the two halves of a spanning polygon.
    ///
    /// The band only decides whether to cut. The cut itself follows the raw
    /// signed distances, so corners that sit inside the band on opposite
    /// sides of a shallow plane end up in different halves and the halves
    /// never overlap. Corners exactly on the plane go to both.
    fn cut(&self, plane: &Plane) -> (Vec<DVec3>, Vec<DVec3>) {
        let sides: Vec<Classification> = self
            .vertices
            .iter()
            .map(|&v| {
                let distance = plane.signed_distance(v);
                if distance > 0.0 {
                    Classification::Front
                } else if distance < 0.0 {
                    Classification::Back
                } else {
                    Classification::Coplanar
                }
            })
            .collect();
        let n = self.vertices.len();
        let mut front = Vec::with_capacity(n + 1);
        let mut back = Vec::with_capacity(n + 1);

        for i in 0..n {
            let (start, end) = (self.vertices[i], self.vertices[(i + 1) % n]);
            let (from, to) = (sides[i], sides[(i + 1) % n]);

            if from != Classification::Back {
                front.push(start);
            }
            if from != Classification::Front {
                back.push(start);
            }

            let crosses = matches!(
                (from, to),
                (Classification::Front, Classification::Back)
                    | (Classification::Back, Classification::Front)
            );
            if crosses {
                let (ds, de) = (plane.signed_distance(start), plane.signed_distance(end));
                let t = if ds != de {
                    (ds / (ds - de)).clamp(0.0, 1.0)
                } else {
                    0.5
                };
                let hit = start.lerp(end, t);
                front.push(hit);
                back.push(hit);
            }
        }

        (front, back)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use config::constants::PLANE_EPSILON;

    fn triangle_at(z: f64) -> Polygon {
        Polygon::from_vertices(vec![
            DVec3::new(0.0, 0.0, z),
            DVec3::new(1.0, 0.0, z),
            DVec3::new(0.5, 1.0, z),
        ])
        .unwrap()
    }

    fn xy_plane() -> Plane {
        Plane::from_points(DVec3::ZERO, DVec3::X, DVec3::Y).unwrap()
    }

    #[test]
    fn test_polygon_needs_three_independent_corners() {
        assert_eq!(triangle_at(0.0).vertices().len(), 3);
        assert!(Polygon::from_vertices(vec![DVec3::ZERO, DVec3::X]).is_none());
        assert!(Polygon::from_vertices(vec![DVec3::ZERO, DVec3::X, DVec3::X * 2.0]).is_none());
    }

    #[test]
    fn test_polygon_flip() {
        let poly = triangle_at(0.0);
        let mut flipped = poly.clone();
        flipped.flip();

        assert_eq!(flipped.vertices()[0], poly.vertices()[2]);
        assert_eq!(flipped.vertices()[2], poly.vertices()[0]);
        assert!(flipped.plane().normal().z < 0.0);
    }

    #[test]
    fn test_polygon_classify() {
        let plane = xy_plane();
        assert_eq!(triangle_at(1.0).classify(&plane), Classification::Front);
        assert_eq!(triangle_at(-1.0).classify(&plane), Classification::Back);
        assert_eq!(triangle_at(0.0).classify(&plane), Classification::Coplanar);
    }

    #[test]
    fn test_polygon_split_coplanar_orientation() {
        let plane = xy_plane();
        let mut out = SplitBuffers::default();

        triangle_at(0.0).split(&plane, &mut out);
        let mut flipped = triangle_at(0.0);
        flipped.flip();
        flipped.split(&plane, &mut out);

        assert_eq!(out.coplanar_front.len(), 1);
        assert_eq!(out.coplanar_back.len(), 1);
    }

    #[test]
    fn test_polygon_split_spanning() {
        // Apex above z = 0, base below
        let poly = Polygon::from_vertices(vec![
            DVec3::new(0.0, 0.0, -1.0),
            DVec3::new(1.0, 0.0, -1.0),
            DVec3::new(0.5, 0.0, 1.0),
        ])
        .unwrap();
        let poly_normal = poly.plane().normal();
        let plane = xy_plane();
        let mut out = SplitBuffers::default();

        poly.split(&plane, &mut out);

        assert_eq!((out.front.len(), out.back.len()), (1, 1));
        assert_eq!(out.front[0].vertices().len(), 3);
        assert_eq!(out.back[0].vertices().len(), 4);
        assert!(out.front[0].vertices().iter().all(|v| v.z >= 0.0));
        assert!(out.back[0].vertices().iter().all(|v| v.z <= 0.0));
        // Pieces keep the parent plane
        assert_eq!(out.back[0].plane().normal(), poly_normal);
    }

    #[test]
    fn test_polygon_cut_piece_is_coplanar_with_its_own_plane() {
        let poly = Polygon::from_vertices(vec![
            DVec3::new(0.3, -0.7, 0.1),
            DVec3::new(2.9, 0.45, -1.3),
            DVec3::new(-0.6, 1.7, 2.2),
        ])
        .unwrap();
        let cutter = Plane::from_points(
            DVec3::new(0.7, 0.0, 0.0),
            DVec3::new(0.9, 1.0, 0.3),
            DVec3::new(0.8, 0.2, 1.0),
        )
        .unwrap();
        let mut out = SplitBuffers::default();
        poly.split(&cutter, &mut out);
        assert_eq!((out.front.len(), out.back.len()), (1, 1));

        for piece in out.front.iter().chain(&out.back) {
            assert_eq!(piece.classify(piece.plane()), Classification::Coplanar);
            let mut again = SplitBuffers::default();
            piece.clone().split(piece.plane(), &mut again);
            assert_eq!(again.coplanar_front.len(), 1);
            assert!(again.front.is_empty() && again.back.is_empty());
        }
    }

    #[test]
    fn test_polygon_touching_corner_does_not_split() {
        // One corner a hair above z = 0, the rest well below
        let poly = Polygon::from_vertices(vec![
            DVec3::new(0.0, 0.0, 1e-9),
            DVec3::new(1.0, 0.0, -1.0),
            DVec3::new(0.0, 1.0, -1.0),
        ])
        .unwrap();
        let plane = xy_plane();
        assert_eq!(poly.classify(&plane), Classification::Back);

        let mut out = SplitBuffers::default();
        poly.split(&plane, &mut out);
        assert_eq!(out.back.len(), 1);
        assert_eq!(out.back[0].vertices().len(), 3);
        assert!(out.front.is_empty() && out.coplanar_front.is_empty() && out.coplanar_back.is_empty());
    }

    #[test]
    fn test_polygon_cut_keeps_halves_on_their_side() {
        // Third corner inside the band, just above z = 0
        let poly = Polygon::from_vertices(vec![
            DVec3::new(0.0, 0.0, -1.0),
            DVec3::new(1.0, 0.0, 1.0),
            DVec3::new(0.5, 1.0, 0.5 * PLANE_EPSILON),
        ])
        .unwrap();
        let area = polygon_area(poly.vertices());
        let plane = xy_plane();
        let mut out = SplitBuffers::default();
        poly.split(&plane, &mut out);

        assert_eq!((out.front.len(), out.back.len()), (1, 1));
        assert!(out.front[0].vertices().iter().all(|v| v.z >= -1e-15));
        assert!(out.back[0].vertices().iter().all(|v| v.z <= 1e-15));
        let pieces = polygon_area(out.front[0].vertices()) + polygon_area(out.back[0].vertices());
        assert_relative_eq!(pieces, area, max_relative = 1e-12);
    }

    fn polygon_area(vertices: &[DVec3]) -> f64 {
        (1..vertices.len() - 1)
            .map(|k| (vertices[k] - vertices[0]).cross(vertices[k + 1] - vertices[0]))
            .sum::<DVec3>()
            .length()
            / 2.0
    }
}
