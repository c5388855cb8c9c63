//! # BSP Tree
//!
//! Solid-leaf BSP tree in the style of Evan Wallace's csg.js. A node owns
//! a splitting plane and the polygons lying on it; space behind a node
//! without a back child is solid, space in front of a node without a front
//! child is empty.
//!
//! ## Storage
//!
//! Nodes live in a flat arena and refer to their children by index. Every
//! traversal is an explicit work stack or a linear sweep over the arena, so
//! deep trees never recurse.

use super::polygon::{Polygon, SplitBuffers};
use super::plane::Plane;

/// Index of the root node in the arena.
const ROOT: usize = 0;

/// Arena node.
#[derive(Debug, Clone, Default)]
struct BspNode {
    /// Splitting plane, set by the first polygon routed to this node
    plane: Option<Plane>,
    /// Polygons lying on `plane`
    polygons: Vec<Polygon>,
    /// Arena index of the front child
    front: Option<usize>,
    /// Arena index of the back child
    back: Option<usize>,
}

/// Which child of a node to address.
#[derive(Debug, Clone, Copy)]
enum Side {
    Front,
    Back,
}

/// BSP tree over the boundary polygons of one solid.
///
/// # Example
///
/// ```rust,ignore
/// let tree = BspTree::new(mesh_to_polygons(&mesh));
/// let outside = tree.clip_polygons(other_polygons);
/// ```
#[derive(Debug, Clone)]
pub struct BspTree {
    nodes: Vec<BspNode>,
}

impl BspTree {
    /// Tree partitioned by the planes of `polygons`, in order.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let mut tree = Self {
            nodes: vec![BspNode::default()],
        };
        tree.build(polygons);
        tree
    }

    /// Inserts polygons into the tree, splitting them by existing planes and
    /// creating new nodes where a subtree is missing.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        let mut stack: Vec<(usize, Vec<Polygon>)> = vec![(ROOT, polygons)];

        while let Some((id, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }

            let plane = match self.nodes[id].plane {
                Some(plane) => plane,
                None => {
                    let plane = *polys[0].plane();
                    self.nodes[id].plane = Some(plane);
                    plane
                }
            };

            let mut parts = SplitBuffers::default();
            for poly in polys {
                poly.split(&plane, &mut parts);
            }

            let node = &mut self.nodes[id];
            node.polygons.append(&mut parts.coplanar_front);
            node.polygons.append(&mut parts.coplanar_back);

            if !parts.front.is_empty() {
                let child = self.child(id, Side::Front);
                stack.push((child, parts.front));
            }
            if !parts.back.is_empty() {
                let child = self.child(id, Side::Back);
                stack.push((child, parts.back));
            }
        }
    }

    /// Returns the child on `side`, creating an empty node if needed.
    fn child(&mut self, id: usize, side: Side) -> usize {
        let existing = match side {
            Side::Front => self.nodes[id].front,
            Side::Back => self.nodes[id].back,
        };
        if let Some(child) = existing {
            return child;
        }

        let child = self.nodes.len();
        self.nodes.push(BspNode::default());
        match side {
            Side::Front => self.nodes[id].front = Some(child),
            Side::Back => self.nodes[id].back = Some(child),
        }
        child
    }

    /// Complements the solid: every plane and polygon flips and the
    /// children trade places.
    pub fn invert(&mut self) {
        for node in &mut self.nodes {
            for poly in &mut node.polygons {
                poly.flip();
            }
            if let Some(plane) = &mut node.plane {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);
        }
    }

    /// Keeps the pieces of `polygons` lying outside this solid.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut kept = Vec::new();
        let mut stack: Vec<(usize, Vec<Polygon>)> = vec![(ROOT, polygons)];

        while let Some((id, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }

            let node = &self.nodes[id];
            let plane = match node.plane {
                Some(plane) => plane,
                None => {
                    kept.extend(polys);
                    continue;
                }
            };

            let mut parts = SplitBuffers::default();
            for poly in polys {
                poly.split(&plane, &mut parts);
            }
            let mut front = parts.front;
            front.append(&mut parts.coplanar_front);
            let mut back = parts.back;
            back.append(&mut parts.coplanar_back);

            match node.front {
                Some(child) => stack.push((child, front)),
                None => kept.extend(front),
            }

            // Without a back subtree the back side is solid: discard
            if let Some(child) = node.back {
                stack.push((child, back));
            }
        }

        kept
    }

    /// Drops the parts of this tree's polygons that lie inside `other`.
    /// Planes stay, so the partition is unchanged.
    pub fn clip_to(&mut self, other: &BspTree) {
        for node in &mut self.nodes {
            let polygons = std::mem::take(&mut node.polygons);
            node.polygons = other.clip_polygons(polygons);
        }
    }

    /// Stored polygons, by value.
    pub fn into_polygons(self) -> Vec<Polygon> {
        self.nodes
            .into_iter()
            .flat_map(|node| node.polygons)
            .collect()
    }
}

#[cfg(test)]
impl BspTree {
    /// Copies of every stored polygon.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        self.nodes
            .iter()
            .flat_map(|node| node.polygons.iter().cloned())
            .collect()
    }

    /// Stored polygon count.
    pub fn polygon_count(&self) -> usize {
        self.nodes.iter().map(|node| node.polygons.len()).sum()
    }

    /// Arena size.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Longest root-to-leaf path, counted in nodes.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(ROOT, 1)];
        while let Some((id, level)) = pending.pop() {
            deepest = deepest.max(level);
            let node = &self.nodes[id];
            pending.extend(node.front.into_iter().chain(node.back).map(|c| (c, level + 1)));
        }
        deepest
    }
}
