//! # Triangle Mesh
//!
//! Indexed triangle soup used for every solid the lattice kernel produces:
//! primitives, strut networks, remesh output and boolean results.

use std::collections::{HashMap, HashSet};

use config::constants::{MAX_VERTICES, VERTEX_MERGE_EPSILON};
use glam::DVec3;

use crate::error::MeshError;

/// Indexed triangle mesh.
///
/// Triangles are wound counter-clockwise when viewed from outside, so face
/// normals computed as `(b - a) × (c - a)` point outward for closed solids.
///
/// # Example
///
/// ```rust
/// use lattice_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<DVec3>,
    triangles: Vec<[u32; 3]>,
}

impl Mesh {
    /// Empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty mesh with room for `vertex_count` positions and `triangle_count` faces.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Wraps existing position and index buffers after checking them.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidTopology`] if a triangle references a
    /// vertex that does not exist and [`MeshError::TooManyVertices`] if the
    /// vertex buffer exceeds `MAX_VERTICES`.
    pub fn from_parts(vertices: Vec<DVec3>, triangles: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        if vertices.len() > MAX_VERTICES {
            return Err(MeshError::TooManyVertices {
                count: vertices.len(),
                max: MAX_VERTICES,
            });
        }

        let vertex_count = vertices.len() as u32;
        if let Some(tri) = triangles.iter().find(|tri| tri.iter().any(|&i| i >= vertex_count)) {
            return Err(MeshError::invalid_topology(format!(
                "triangle {:?} references a vertex outside 0..{}",
                tri, vertex_count
            )));
        }

        Ok(Self {
            vertices,
            triangles,
        })
    }

    /// Number of positions.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// True when there is no face, regardless of stray positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Appends a position; the result is its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        self.vertices.push(position);
        (self.vertices.len() - 1) as u32
    }

    /// Appends the face `(a, b, c)`; indices are not checked.
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.triangles.push([a, b, c]);
    }

    /// Adds a quad as two triangles `(a, b, c)` and `(a, c, d)`.
    pub fn add_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.triangles.push([a, b, c]);
        self.triangles.push([a, c, d]);
    }

    /// Positions, indexed by vertex id.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Faces as index triples.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Position of vertex `index`.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Index triple of face `index`.
    #[inline]
    pub fn triangle(&self, index: usize) -> [u32; 3] {
        self.triangles[index]
    }

    /// Corner positions of face `index`.
    #[inline]
    pub fn triangle_positions(&self, index: usize) -> [DVec3; 3] {
        let [a, b, c] = self.triangles[index];
        [self.vertex(a), self.vertex(b), self.vertex(c)]
    }

    /// `(min, max)` corners of the axis-aligned box around all positions.
    ///
    /// An empty mesh yields two zero corners.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        let Some((&first, rest)) = self.vertices.split_first() else {
            return (DVec3::ZERO, DVec3::ZERO);
        };
        rest.iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)))
    }

    /// Moves every position by `offset`.
    pub fn translate(&mut self, offset: DVec3) {
        self.vertices.iter_mut().for_each(|p| *p += offset);
    }

    /// Appends `other` as a disjoint component.
    ///
    /// Nothing is welded; shared positions stay duplicated.
    pub fn merge(&mut self, other: &Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.triangles
            .extend(other.triangles.iter().map(|tri| tri.map(|i| i + base)));
    }

    /// Signed volume enclosed by the mesh (divergence theorem).
    ///
    /// Positive for closed meshes with outward-facing triangles. T-junctions
    /// do not affect the result as long as the surface is closed.
    pub fn volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                let (a, b, c) = (self.vertex(a), self.vertex(b), self.vertex(c));
                a.dot(b.cross(c))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Returns true if every directed edge is matched by exactly one edge
    /// running the opposite way.
    ///
    /// This is the closed, consistently oriented 2-manifold condition at the
    /// edge level.
    pub fn is_watertight(&self) -> bool {
        if self.triangles.is_empty() {
            return false;
        }

        let mut directed: HashMap<(u32, u32), u32> = HashMap::with_capacity(self.triangles.len() * 3);
        for tri in &self.triangles {
            for k in 0..3 {
                *directed.entry((tri[k], tri[(k + 1) % 3])).or_insert(0) += 1;
            }
        }

        directed
            .iter()
            .all(|(&(a, b), &count)| count == 1 && directed.get(&(b, a)) == Some(&1))
    }

    /// Merges vertices closer than `epsilon` and remaps triangles.
    ///
    /// Triangles that collapse onto a repeated index are removed. Uses a
    /// uniform hash grid with cell size `epsilon`, probing the 27 cells
    /// around each vertex.
    pub fn weld(&mut self, epsilon: f64) {
        let epsilon = epsilon.max(f64::MIN_POSITIVE);
        let cell_of = |p: DVec3| -> [i64; 3] {
            [
                (p.x / epsilon).floor() as i64,
                (p.y / epsilon).floor() as i64,
                (p.z / epsilon).floor() as i64,
            ]
        };

        let mut grid: HashMap<[i64; 3], Vec<u32>> = HashMap::new();
        let mut welded: Vec<DVec3> = Vec::with_capacity(self.vertices.len());
        let mut remap: Vec<u32> = Vec::with_capacity(self.vertices.len());

        for &position in &self.vertices {
            let cell = cell_of(position);
            let mut found = None;
            'search: for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let key = [cell[0] + dx, cell[1] + dy, cell[2] + dz];
                        if let Some(candidates) = grid.get(&key) {
                            if let Some(&index) = candidates
                                .iter()
                                .find(|&&i| welded[i as usize].distance(position) <= epsilon)
                            {
                                found = Some(index);
                                break 'search;
                            }
                        }
                    }
                }
            }

            let index = match found {
                Some(index) => index,
                None => {
                    let index = welded.len() as u32;
                    welded.push(position);
                    grid.entry(cell).or_default().push(index);
                    index
                }
            };
            remap.push(index);
        }

        self.triangles = self
            .triangles
            .iter()
            .map(|tri| tri.map(|i| remap[i as usize]))
            .filter(|tri| tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2])
            .collect();
        self.vertices = welded;
    }

    /// Stitches cracks where a vertex sits on the edge of a neighbouring
    /// triangle instead of at one of its corners.
    ///
    /// Only edges without a reverse partner are inspected, and only corners
    /// of such edges can be inserted. A triangle with new points on one edge
    /// is fanned from the opposite corner; one with points on several edges
    /// is fanned around a new centroid vertex. Returns the number of
    /// triangles replaced.
    pub fn split_t_junctions(&mut self, tolerance: f64) -> usize {
        let open = self.open_edges();
        if open.is_empty() {
            return 0;
        }

        let mut candidates: Vec<u32> = open.iter().flat_map(|&(a, b)| [a, b]).collect();
        candidates.sort_unstable();
        candidates.dedup();
        candidates.sort_by(|&i, &j| self.vertex(i).x.total_cmp(&self.vertex(j).x));
        let xs: Vec<f64> = candidates.iter().map(|&i| self.vertex(i).x).collect();

        let mut inserts: HashMap<(u32, u32), Vec<u32>> = HashMap::new();
        for &(a, b) in &open {
            let (start, end) = (self.vertex(a), self.vertex(b));
            let along = end - start;
            let length_sq = along.length_squared();
            if length_sq == 0.0 {
                continue;
            }

            let lo = xs.partition_point(|&x| x < start.x.min(end.x) - tolerance);
            let hi = xs.partition_point(|&x| x <= start.x.max(end.x) + tolerance);
            let mut on_edge: Vec<(f64, u32)> = candidates[lo..hi]
                .iter()
                .filter(|&&i| i != a && i != b)
                .filter_map(|&i| {
                    let p = self.vertex(i);
                    let t = (p - start).dot(along) / length_sq;
                    let inside = t > 0.0 && t < 1.0 && p.distance(start + along * t) <= tolerance;
                    inside.then_some((t, i))
                })
                .collect();
            if on_edge.is_empty() {
                continue;
            }
            on_edge.sort_by(|x, y| x.0.total_cmp(&y.0));
            inserts.insert((a, b), on_edge.into_iter().map(|(_, i)| i).collect());
        }
        if inserts.is_empty() {
            return 0;
        }

        let mut replaced = 0;
        let mut triangles = Vec::with_capacity(self.triangles.len() + 2 * inserts.len());
        for tri in std::mem::take(&mut self.triangles) {
            let extra: [&[u32]; 3] = [0, 1, 2].map(|k| {
                inserts
                    .get(&(tri[k], tri[(k + 1) % 3]))
                    .map_or(&[][..], Vec::as_slice)
            });
            let split: Vec<usize> = (0..3).filter(|&k| !extra[k].is_empty()).collect();

            let fan = match split.as_slice() {
                [] => {
                    triangles.push(tri);
                    continue;
                }
                &[k] => {
                    let hub = tri[(k + 2) % 3];
                    let chain: Vec<u32> = std::iter::once(tri[k])
                        .chain(extra[k].iter().copied())
                        .chain(std::iter::once(tri[(k + 1) % 3]))
                        .collect();
                    chain.windows(2).map(|w| [hub, w[0], w[1]]).collect::<Vec<_>>()
                }
                _ => {
                    let ring: Vec<u32> = (0..3)
                        .flat_map(|k| std::iter::once(tri[k]).chain(extra[k].iter().copied()))
                        .collect();
                    let [a, b, c] = tri.map(|i| self.vertex(i));
                    let hub = self.add_vertex((a + b + c) / 3.0);
                    (0..ring.len())
                        .map(|i| [hub, ring[i], ring[(i + 1) % ring.len()]])
                        .collect()
                }
            };

            replaced += 1;
            triangles.extend(
                fan.into_iter()
                    .filter(|t| t[0] != t[1] && t[1] != t[2] && t[0] != t[2]),
            );
        }
        self.triangles = triangles;
        replaced
    }

    /// Removes pairs of triangles over the same three corners with opposite
    /// winding, which enclose nothing. Returns the number of triangles
    /// removed.
    pub fn remove_opposing_pairs(&mut self) -> usize {
        let mut by_corners: HashMap<[u32; 3], Vec<usize>> = HashMap::new();
        for (i, &tri) in self.triangles.iter().enumerate() {
            let mut key = tri;
            key.sort_unstable();
            by_corners.entry(key).or_default().push(i);
        }

        let mut dropped = vec![false; self.triangles.len()];
        for group in by_corners.values().filter(|group| group.len() > 1) {
            for (n, &i) in group.iter().enumerate() {
                if dropped[i] {
                    continue;
                }
                let partner = group[n + 1..]
                    .iter()
                    .copied()
                    .find(|&j| !dropped[j] && !same_winding(self.triangles[i], self.triangles[j]));
                if let Some(j) = partner {
                    dropped[i] = true;
                    dropped[j] = true;
                }
            }
        }

        let removed = dropped.iter().filter(|&&d| d).count();
        if removed > 0 {
            let mut index = 0;
            self.triangles.retain(|_| {
                let keep = !dropped[index];
                index += 1;
                keep
            });
        }
        removed
    }

    /// Closes boundary loops of at most `max_edges` edges whose corners all
    /// lie within `max_extent` of each other, fanning each from its first
    /// corner. Returns the number of loops closed.
    ///
    /// A loop is followed only through vertices with a single unused open
    /// edge leaving them, so pinched boundaries stay open.
    pub fn fill_small_holes(&mut self, max_extent: f64, max_edges: usize) -> usize {
        let open = self.open_edges();
        let mut outgoing: HashMap<u32, Vec<u32>> = HashMap::new();
        for &(a, b) in &open {
            outgoing.entry(a).or_default().push(b);
        }

        let mut used: HashSet<(u32, u32)> = HashSet::new();
        let mut patches = Vec::new();
        for &(start, first) in &open {
            if used.contains(&(start, first)) {
                continue;
            }

            let mut ring = vec![start];
            let mut current = first;
            let mut closed = false;
            while ring.len() <= max_edges {
                if current == start {
                    closed = true;
                    break;
                }
                ring.push(current);
                let here = current;
                let mut leaving = outgoing
                    .get(&here)
                    .into_iter()
                    .flatten()
                    .filter(|&&next| !used.contains(&(here, next)));
                match (leaving.next(), leaving.next()) {
                    (Some(&next), None) => current = next,
                    _ => break,
                }
            }
            if !closed || ring.len() < 3 {
                continue;
            }

            for k in 0..ring.len() {
                used.insert((ring[k], ring[(k + 1) % ring.len()]));
            }
            let extent = ring
                .iter()
                .flat_map(|&a| ring.iter().map(move |&b| (a, b)))
                .map(|(a, b)| self.vertex(a).distance(self.vertex(b)))
                .fold(0.0, f64::max);
            if extent <= max_extent {
                patches.push(ring);
            }
        }

        for ring in &patches {
            // Reverse winding: the patch must use each open edge backwards
            for k in 1..ring.len() - 1 {
                self.add_triangle(ring[0], ring[k + 1], ring[k]);
            }
        }
        patches.len()
    }

    /// Merges the two ends of every edge that more than two triangles share
    /// in the same direction, when the ends are at most `max_length` apart.
    /// Triangles left with a repeated corner are dropped. Returns the number
    /// of edges collapsed.
    ///
    /// Such edges are pinches where separately cut sheets meet along a
    /// sliver; merging the ends turns the sliver triangles into opposing
    /// pairs or removes them.
    pub fn collapse_nonmanifold_edges(&mut self, max_length: f64) -> usize {
        let mut directed: HashMap<(u32, u32), u32> = HashMap::new();
        for tri in &self.triangles {
            for k in 0..3 {
                *directed.entry((tri[k], tri[(k + 1) % 3])).or_insert(0) += 1;
            }
        }
        let mut shared: Vec<(u32, u32)> = directed
            .into_iter()
            .filter(|&(_, count)| count > 1)
            .map(|(edge, _)| edge)
            .collect();
        if shared.is_empty() {
            return 0;
        }
        shared.sort_unstable();

        let mut parent: Vec<u32> = (0..self.vertices.len() as u32).collect();
        fn root(parent: &mut [u32], mut i: u32) -> u32 {
            while parent[i as usize] != i {
                parent[i as usize] = parent[parent[i as usize] as usize];
                i = parent[i as usize];
            }
            i
        }

        let mut collapsed = 0;
        for (a, b) in shared {
            let (ra, rb) = (root(&mut parent, a), root(&mut parent, b));
            if ra == rb || self.vertex(ra).distance(self.vertex(rb)) > max_length {
                continue;
            }
            self.vertices[ra as usize] = self.vertex(ra).lerp(self.vertex(rb), 0.5);
            parent[rb as usize] = ra;
            collapsed += 1;
        }

        if collapsed > 0 {
            for tri in &mut self.triangles {
                *tri = tri.map(|i| root(&mut parent, i));
            }
            self.triangles
                .retain(|t| t[0] != t[1] && t[1] != t[2] && t[0] != t[2]);
        }
        collapsed
    }

    /// Directed edges whose reverse is used by no triangle.
    fn open_edges(&self) -> Vec<(u32, u32)> {
        let directed: HashSet<(u32, u32)> = self
            .triangles
            .iter()
            .flat_map(|tri| (0..3).map(move |k| (tri[k], tri[(k + 1) % 3])))
            .collect();
        let mut open: Vec<(u32, u32)> = directed
            .iter()
            .filter(|&&(a, b)| !directed.contains(&(b, a)))
            .copied()
            .collect();
        open.sort_unstable();
        open
    }

    /// Drops unreferenced vertices, keeping the order of the remaining ones.
    pub fn compact(&mut self) {
        let mut used = vec![false; self.vertices.len()];
        for tri in &self.triangles {
            for &i in tri {
                used[i as usize] = true;
            }
        }

        let mut remap = vec![u32::MAX; self.vertices.len()];
        let mut vertices = Vec::with_capacity(self.vertices.len());
        for (i, &position) in self.vertices.iter().enumerate() {
            if used[i] {
                remap[i] = vertices.len() as u32;
                vertices.push(position);
            }
        }

        for tri in &mut self.triangles {
            *tri = tri.map(|i| remap[i as usize]);
        }
        self.vertices = vertices;
    }

    /// Returns true if every vertex coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.vertices.iter().all(|v| v.is_finite())
    }

    /// True if every face has three distinct in-range corners spanning a
    /// non-zero area.
    pub fn validate(&self) -> bool {
        let count = self.vertices.len() as u32;
        self.triangles.iter().all(|&[a, b, c]| {
            if a >= count || b >= count || c >= count || a == b || b == c || a == c {
                return false;
            }
            let (pa, pb, pc) = (self.vertex(a), self.vertex(b), self.vertex(c));
            (pb - pa).cross(pc - pa).length() >= VERTEX_MERGE_EPSILON
        })
    }
}

/// True when `b` lists the corners of `a` in the same cyclic order.
fn same_winding(a: [u32; 3], b: [u32; 3]) -> bool {
    (0..3).any(|r| [a[r], a[(r + 1) % 3], a[(r + 2) % 3]] == b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::create_cuboid;
    use approx::assert_relative_eq;

    /// Unit right triangle in the XY plane.
    fn unit_triangle() -> Mesh {
        Mesh::from_parts(vec![DVec3::ZERO, DVec3::X, DVec3::Y], vec![[0, 1, 2]]).unwrap()
    }

    #[test]
    fn test_default_mesh_is_empty() {
        let mesh = Mesh::default();
        assert!(mesh.is_empty());
        assert_eq!((mesh.vertex_count(), mesh.triangle_count()), (0, 0));
        assert_eq!(mesh.bounding_box(), (DVec3::ZERO, DVec3::ZERO));
    }

    #[test]
    fn test_stray_positions_do_not_count_as_faces() {
        let mut mesh = Mesh::with_capacity(2, 0);
        assert_eq!(mesh.add_vertex(DVec3::splat(7.0)), 0);
        assert_eq!(mesh.add_vertex(DVec3::splat(-7.0)), 1);
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex(1), DVec3::splat(-7.0));
    }

    #[test]
    fn test_quad_splits_along_first_diagonal() {
        let mut mesh = Mesh::new();
        for p in [DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y] {
            mesh.add_vertex(p);
        }
        mesh.add_quad(0, 1, 2, 3);
        assert_eq!(mesh.triangles(), &[[0, 1, 2], [0, 2, 3]]);
        assert_eq!(mesh.triangle_positions(1)[1], DVec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_from_parts_checks_indices() {
        let result = Mesh::from_parts(vec![DVec3::ZERO], vec![[0, 1, 2]]);
        assert!(matches!(result, Err(MeshError::InvalidTopology { .. })));
    }

    #[test]
    fn test_bounding_box_of_cuboid() {
        let cube = create_cuboid(DVec3::new(2.0, 4.0, 6.0), DVec3::new(1.0, 0.0, -1.0)).unwrap();
        let (lo, hi) = cube.bounding_box();
        assert_eq!(lo, DVec3::new(0.0, -2.0, -4.0));
        assert_eq!(hi, DVec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_validate_flags_bad_faces() {
        assert!(unit_triangle().validate());

        let mut out_of_range = unit_triangle();
        out_of_range.add_triangle(0, 1, 9);
        assert!(!out_of_range.validate());

        let mut repeated = unit_triangle();
        repeated.add_triangle(0, 0, 1);
        assert!(!repeated.validate());

        let mut sliver = unit_triangle();
        let far = sliver.add_vertex(DVec3::new(2.0, 0.0, 0.0));
        sliver.add_triangle(0, 1, far);
        assert!(!sliver.validate());
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut lower = unit_triangle();
        let mut upper = unit_triangle();
        upper.translate(DVec3::new(0.0, 0.0, 3.0));

        lower.merge(&upper);

        assert_eq!(lower.vertex_count(), 6);
        assert_eq!(lower.triangle(1), [3, 4, 5]);
        assert_eq!(lower.vertex(5), DVec3::new(0.0, 1.0, 3.0));
    }

    #[test]
    fn test_cube_volume_and_watertight() {
        let cube = create_cuboid(DVec3::new(2.0, 3.0, 4.0), DVec3::new(5.0, -1.0, 2.0)).unwrap();
        assert_relative_eq!(cube.volume(), 24.0, epsilon = 1e-9);
        assert!(cube.is_watertight());
    }

    #[test]
    fn test_open_mesh_not_watertight() {
        assert!(!unit_triangle().is_watertight());
        assert!(!Mesh::new().is_watertight());
    }

    #[test]
    fn test_weld_merges_duplicates() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::ZERO);
        mesh.add_vertex(DVec3::X);
        mesh.add_vertex(DVec3::Y);
        mesh.add_vertex(DVec3::X + DVec3::splat(1e-12));
        mesh.add_vertex(DVec3::new(1.0, 1.0, 0.0));
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(3, 4, 2);

        mesh.weld(1e-9);

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle(1), [1, 3, 2]);
    }

    #[test]
    fn test_weld_drops_collapsed_triangles() {
        let mut mesh = unit_triangle();
        mesh.add_vertex(DVec3::splat(1e-12));
        mesh.add_triangle(0, 3, 1);

        mesh.weld(1e-9);

        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_compact_drops_unused_positions() {
        let mut mesh = unit_triangle();
        mesh.add_vertex(DVec3::splat(9.0));
        mesh.compact();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle(0), [0, 1, 2]);
    }

    /// Square split along its diagonal, with the right half fanned from a
    /// midpoint the left half does not know about.
    /// Two thin tetrahedra sharing the edge from the origin to `(length, 0, 0)`.
    fn pinched_tetrahedra(length: f64) -> Mesh {
        let vertices = vec![
            DVec3::ZERO,
            DVec3::new(length, 0.0, 0.0),
            DVec3::Y,
            DVec3::Z,
            -DVec3::Y,
            -DVec3::Z,
        ];
        let mut triangles = Vec::new();
        for (c, d) in [(2, 3), (4, 5)] {
            triangles.extend([[0, c, 1], [0, 1, d], [1, c, d], [0, d, c]]);
        }
        Mesh::from_parts(vertices, triangles).unwrap()
    }

    #[test]
    fn test_collapse_nonmanifold_edges() {
        let mut mesh = pinched_tetrahedra(1e-6);
        assert!(!mesh.is_watertight());

        assert_eq!(mesh.collapse_nonmanifold_edges(1e-3), 1);
        // Each tetrahedron flattens into a back-to-back pair
        assert_eq!(mesh.triangle_count(), 4);
        assert!(mesh.is_watertight());
        assert_relative_eq!(mesh.vertex(0).x, 0.5e-6, epsilon = 1e-15);

        assert_eq!(mesh.remove_opposing_pairs(), 4);
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_collapse_nonmanifold_edges_respects_length() {
        let mut mesh = pinched_tetrahedra(0.5);
        assert_eq!(mesh.collapse_nonmanifold_edges(1e-3), 0);
        assert_eq!(mesh.triangle_count(), 8);

        let mut closed = create_cuboid(DVec3::splat(2.0), DVec3::ZERO).unwrap();
        assert_eq!(closed.collapse_nonmanifold_edges(10.0), 0);
        assert!(closed.is_watertight());
    }

    fn cracked_square(midpoint: DVec3) -> Mesh {
        let vertices = vec![
            DVec3::ZERO,
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(2.0, 2.0, 0.0),
            DVec3::new(0.0, 2.0, 0.0),
            midpoint,
        ];
        Mesh::from_parts(vertices, vec![[0, 1, 3], [1, 2, 4], [4, 2, 3]]).unwrap()
    }

    #[test]
    fn test_split_t_junctions_stitches_midpoint() {
        let mut mesh = cracked_square(DVec3::new(1.0, 1.0, 0.0));
        assert_eq!(mesh.open_edges().len(), 7);

        assert_eq!(mesh.split_t_junctions(1e-6), 1);

        assert_eq!(mesh.triangle_count(), 4);
        // Only the outline of the square is left open
        assert_eq!(mesh.open_edges().len(), 4);
        let area: f64 = (0..mesh.triangle_count())
            .map(|i| {
                let [a, b, c] = mesh.triangle_positions(i);
                0.5 * (b - a).cross(c - a).z
            })
            .sum();
        assert_relative_eq!(area, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_split_t_junctions_respects_tolerance() {
        let mut mesh = cracked_square(DVec3::new(1.0, 1.0, 1e-3));
        assert_eq!(mesh.split_t_junctions(1e-6), 0);
        assert_eq!(mesh.triangle_count(), 3);
    }

    #[test]
    fn test_remove_opposing_pairs() {
        let mut mesh = unit_triangle();
        mesh.add_triangle(1, 2, 0);
        assert_eq!(mesh.remove_opposing_pairs(), 0);

        mesh.add_triangle(0, 2, 1);
        assert_eq!(mesh.remove_opposing_pairs(), 2);
        assert_eq!(mesh.triangles(), &[[1, 2, 0]]);
    }

    #[test]
    fn test_fill_small_holes_closes_missing_face() {
        let cube = create_cuboid(DVec3::splat(2.0), DVec3::ZERO).unwrap();
        let holed = Mesh::from_parts(cube.vertices().to_vec(), cube.triangles()[1..].to_vec()).unwrap();
        assert!(!holed.is_watertight());

        let mut too_small = holed.clone();
        assert_eq!(too_small.fill_small_holes(1.0, 8), 0);
        assert!(!too_small.is_watertight());

        let mut filled = holed;
        assert_eq!(filled.fill_small_holes(3.0, 8), 1);
        assert!(filled.is_watertight());
        assert_relative_eq!(filled.volume(), 8.0, epsilon = 1e-9);
    }
}
