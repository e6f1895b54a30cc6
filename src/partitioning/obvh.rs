//! The 8-wide bounding-volume hierarchy.

use log::debug;
use simba::simd::{SimdBool, SimdValue};

use crate::bounding_volume::{Aabb, SimdAabb8};
use crate::math::{Point, Real, SimdReal8};
use crate::partitioning::splitter::{split_indices_at_center, split_indices_by_morton_bit};
use crate::partitioning::{precompute, BuildError, BuildStrategy, Child, RayHit};
use crate::query::{Ray, SimdRay};
use crate::shape::Primitive;

/// One SIMD node of an [`Obvh`]: the boxes of its eight children batched
/// into a single SoA AABB, and the children themselves.
#[derive(Copy, Clone, Debug)]
struct ObvhNode {
    simd_aabb: SimdAabb8,
    children: [Child; 8],
}

/// An 8-wide (octonary) bounding-volume hierarchy over a slice of
/// primitives.
///
/// Each internal node tests the boxes of its eight children with a single
/// SIMD slab test; empty slots hold an invalid box so their lane can never
/// be selected. The tree is immutable once built; queries only take `&self`,
/// so any number of threads may traverse the same tree concurrently.
#[derive(Clone, Debug)]
pub struct Obvh {
    nodes: Vec<ObvhNode>,
    root: Child,
    root_aabb: Aabb,
    leaf_count: u32,
}

impl Obvh {
    /// Builds a tree over `prims` with the given strategy.
    pub fn try_from_primitives<P: Primitive>(
        strategy: BuildStrategy,
        prims: &[P],
    ) -> Result<Self, BuildError> {
        let mut sets = precompute(prims)?;
        let mut result = Obvh {
            nodes: Vec::new(),
            root: Child::Empty,
            root_aabb: sets.root_aabb,
            leaf_count: prims.len() as u32,
        };

        result.root = match strategy {
            BuildStrategy::Median => {
                result
                    .build_median(&mut sets.indices, &sets.aabbs, &sets.centers)
                    .0
            }
            BuildStrategy::Morton => {
                let codes = sets.morton_codes();
                result.build_morton(&mut sets.indices, &sets.aabbs, &codes, 0).0
            }
        };

        debug!(
            "built obvh: strategy = {:?}, primitives = {}, nodes = {}, depth = {}",
            strategy,
            prims.len(),
            result.nodes.len(),
            result.depth()
        );

        Ok(result)
    }

    fn build_median(
        &mut self,
        indices: &mut [u32],
        aabbs: &[Aabb],
        centers: &[Point<Real>],
    ) -> (Child, Aabb) {
        match indices.len() {
            0 => (Child::Empty, Aabb::new_invalid()),
            1 => (Child::Primitive(indices[0]), aabbs[indices[0] as usize]),
            _ => {
                let mut lane_aabbs = [Aabb::new_invalid(); 8];
                let mut children = [Child::Empty; 8];

                if indices.len() <= 8 {
                    for (lane, i) in indices.iter().enumerate() {
                        children[lane] = Child::Primitive(*i);
                        lane_aabbs[lane] = aabbs[*i as usize];
                    }
                } else {
                    let (left, right) = split_indices_at_center(indices, aabbs, centers);
                    let (q0, q1) = split_indices_at_center(left, aabbs, centers);
                    let (q2, q3) = split_indices_at_center(right, aabbs, centers);
                    let (g0, g1) = split_indices_at_center(q0, aabbs, centers);
                    let (g2, g3) = split_indices_at_center(q1, aabbs, centers);
                    let (g4, g5) = split_indices_at_center(q2, aabbs, centers);
                    let (g6, g7) = split_indices_at_center(q3, aabbs, centers);

                    for (lane, group) in [g0, g1, g2, g3, g4, g5, g6, g7].into_iter().enumerate()
                    {
                        let (child, aabb) = self.build_median(group, aabbs, centers);
                        children[lane] = child;
                        lane_aabbs[lane] = aabb;
                    }
                }

                self.push_node(lane_aabbs, children)
            }
        }
    }

    fn build_morton(
        &mut self,
        indices: &mut [u32],
        aabbs: &[Aabb],
        codes: &[u32],
        level: u32,
    ) -> (Child, Aabb) {
        match indices.len() {
            0 => (Child::Empty, Aabb::new_invalid()),
            1 => (Child::Primitive(indices[0]), aabbs[indices[0] as usize]),
            _ => {
                let mut lane_aabbs = [Aabb::new_invalid(); 8];
                let mut children = [Child::Empty; 8];

                if indices.len() <= 8 {
                    for (lane, i) in indices.iter().enumerate() {
                        children[lane] = Child::Primitive(*i);
                        lane_aabbs[lane] = aabbs[*i as usize];
                    }
                } else {
                    // Three bit levels per node: halves, quarters, eighths.
                    let (left, right) = split_indices_by_morton_bit(indices, codes, level);
                    let (q0, q1) = split_indices_by_morton_bit(left, codes, level + 1);
                    let (q2, q3) = split_indices_by_morton_bit(right, codes, level + 1);
                    let (g0, g1) = split_indices_by_morton_bit(q0, codes, level + 2);
                    let (g2, g3) = split_indices_by_morton_bit(q1, codes, level + 2);
                    let (g4, g5) = split_indices_by_morton_bit(q2, codes, level + 2);
                    let (g6, g7) = split_indices_by_morton_bit(q3, codes, level + 2);

                    for (lane, group) in [g0, g1, g2, g3, g4, g5, g6, g7].into_iter().enumerate()
                    {
                        let (child, aabb) = self.build_morton(group, aabbs, codes, level + 3);
                        children[lane] = child;
                        lane_aabbs[lane] = aabb;
                    }
                }

                self.push_node(lane_aabbs, children)
            }
        }
    }

    fn push_node(&mut self, lane_aabbs: [Aabb; 8], children: [Child; 8]) -> (Child, Aabb) {
        let simd_aabb = SimdAabb8::from(lane_aabbs);
        let merged = simd_aabb.to_merged_aabb();
        let id = self.nodes.len() as u32;
        self.nodes.push(ObvhNode {
            simd_aabb,
            children,
        });
        (Child::Node(id), merged)
    }

    /// The nearest hit of `ray` on the primitives, at most `max_toi` away.
    pub fn cast_ray<P: Primitive>(
        &self,
        prims: &[P],
        ray: &Ray,
        max_toi: Real,
    ) -> Option<RayHit> {
        self.cast_ray_with_stack(prims, ray, max_toi, &mut Vec::new())
    }

    /// Same as [`Self::cast_ray`], reusing a caller-provided traversal stack
    /// to avoid per-ray allocations.
    pub fn cast_ray_with_stack<P: Primitive>(
        &self,
        prims: &[P],
        ray: &Ray,
        max_toi: Real,
        stack: &mut Vec<u32>,
    ) -> Option<RayHit> {
        stack.clear();

        let mut best = max_toi;
        let mut best_hit = None;

        match self.root {
            Child::Empty => return None,
            Child::Primitive(i) => {
                return prims[i as usize]
                    .cast_ray(ray, max_toi)
                    .map(|inter| RayHit::new(prims, i, ray, inter));
            }
            Child::Node(id) => {
                if self.root_aabb.intersects_local_ray(ray, max_toi) {
                    stack.push(id);
                }
            }
        }

        let simd_ray = SimdRay::splat(*ray);

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id as usize];
            let (hit, _) = node
                .simd_aabb
                .cast_local_ray(&simd_ray, SimdReal8::splat(best));
            let bitmask = hit.bitmask();

            for lane in 0..8 {
                if (bitmask & (1 << lane)) != 0 {
                    match node.children[lane] {
                        Child::Empty => {}
                        Child::Primitive(i) => {
                            if let Some(inter) = prims[i as usize].cast_ray(ray, best) {
                                if inter.time_of_impact < best {
                                    best = inter.time_of_impact;
                                    best_hit = Some((i, inter));
                                }
                            }
                        }
                        Child::Node(child) => stack.push(child),
                    }
                }
            }
        }

        best_hit.map(|(i, inter)| RayHit::new(prims, i, ray, inter))
    }

    /// Tests whether `ray` hits any primitive at most `max_toi` away.
    pub fn intersects_ray<P: Primitive>(&self, prims: &[P], ray: &Ray, max_toi: Real) -> bool {
        self.cast_ray(prims, ray, max_toi).is_some()
    }

    /// The box bounding every primitive of this tree.
    ///
    /// Invalid when the tree is empty.
    pub fn root_aabb(&self) -> Aabb {
        self.root_aabb
    }

    /// The number of primitives this tree was built from.
    pub fn leaf_count(&self) -> u32 {
        self.leaf_count
    }

    /// Does this tree contain no primitive?
    pub fn is_empty(&self) -> bool {
        self.leaf_count == 0
    }

    /// The number of internal nodes of this tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Calls `f` with the handle of every primitive reachable from the root.
    pub fn for_each_primitive(&self, mut f: impl FnMut(u32)) {
        let mut stack = vec![self.root];
        while let Some(child) = stack.pop() {
            match child {
                Child::Empty => {}
                Child::Primitive(i) => f(i),
                Child::Node(id) => stack.extend(self.nodes[id as usize].children),
            }
        }
    }

    /// The height of this tree: the longest root-to-leaf chain of nodes.
    pub fn depth(&self) -> u32 {
        self.child_depth(self.root)
    }

    fn child_depth(&self, child: Child) -> u32 {
        match child {
            Child::Empty | Child::Primitive(_) => 0,
            Child::Node(id) => {
                let node = &self.nodes[id as usize];
                1 + node
                    .children
                    .iter()
                    .map(|child| self.child_depth(*child))
                    .max()
                    .unwrap_or(0)
            }
        }
    }
}

#[cfg(test)]
impl Obvh {
    /// Asserts the structural invariants: every node lane contains its
    /// subtree, and every primitive is reachable exactly once.
    pub(super) fn assert_well_formed<P: Primitive>(&self, prims: &[P]) {
        let mut seen = vec![false; prims.len()];
        let merged = self.check_child(self.root, prims, &mut seen);
        if !self.is_empty() {
            assert!(self.root_aabb.contains(&merged));
        }
        assert!(
            seen.iter().all(|reached| *reached),
            "some primitives are unreachable"
        );
    }

    fn check_child<P: Primitive>(&self, child: Child, prims: &[P], seen: &mut [bool]) -> Aabb {
        match child {
            Child::Empty => Aabb::new_invalid(),
            Child::Primitive(i) => {
                assert!(!seen[i as usize], "primitive {i} is reachable twice");
                seen[i as usize] = true;
                prims[i as usize].aabb()
            }
            Child::Node(id) => {
                let node = &self.nodes[id as usize];
                let mut merged = Aabb::new_invalid();
                for (lane, child) in node.children.iter().enumerate() {
                    let sub = self.check_child(*child, prims, seen);
                    if !matches!(child, Child::Empty) {
                        assert!(
                            node.simd_aabb.extract(lane).contains(&sub),
                            "node {id} lane {lane} does not bound its subtree"
                        );
                    }
                    merged.merge(&sub);
                }
                merged
            }
        }
    }
}
