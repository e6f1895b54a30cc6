//! Spatial partitioning tools: the acceleration trees and their builders.

pub use self::bvh::Bvh;
pub use self::obvh::Obvh;
pub use self::qbvh::Qbvh;

mod bvh;
mod obvh;
mod qbvh;
mod splitter;


use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::query::{Ray, RayIntersection};
use crate::shape::{MaterialHandle, Primitive};
use crate::utils::morton;
use thiserror::Error;

/// The strategy used for the one-time build of a tree.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildStrategy {
    /// Top-down spatial-median splits: each node partitions its primitives
    /// at the center of their merged box, along its largest extent.
    #[default]
    Median,
    /// A single Morton-code pass over the primitive centroids followed by
    /// hierarchical radix partitions, one code bit per level.
    Morton,
}

/// Error produced when a tree cannot be built.
///
/// A failed build yields no tree at all, never a partially built one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Trees address primitives with 32-bit handles.
    #[error("cannot address {0} primitives with 32-bit handles")]
    TooManyPrimitives(usize),
}

/// One child slot of a tree node.
///
/// Nodes own their descendant nodes and merely borrow primitives: a
/// [`Child::Primitive`] is a handle into the slice the tree was built from,
/// and dropping a tree never touches the primitives themselves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Child {
    /// An empty slot. Its bounding lanes are invalid, so no ray test ever
    /// reaches it.
    Empty,
    /// A primitive, identified by its index in the caller's slice.
    Primitive(u32),
    /// An internal node, identified by its index in the tree's node array.
    Node(u32),
}

/// The nearest hit found by a tree query.
#[derive(Copy, Clone, Debug)]
pub struct RayHit {
    /// The index of the primitive that was hit.
    pub primitive: u32,
    /// The time of impact along the ray.
    pub time_of_impact: Real,
    /// The hit point.
    pub point: Point<Real>,
    /// The surface normal at the hit point.
    pub normal: Vector<Real>,
    /// The material of the primitive that was hit, if any.
    pub material: Option<MaterialHandle>,
}

impl RayHit {
    fn new<P: Primitive>(
        prims: &[P],
        primitive: u32,
        ray: &Ray,
        inter: RayIntersection,
    ) -> Self {
        Self {
            primitive,
            time_of_impact: inter.time_of_impact,
            point: ray.point_at(inter.time_of_impact),
            normal: inter.normal,
            material: prims[primitive as usize].material(),
        }
    }
}

/// Per-primitive data shared by every builder: boxes and centroids are
/// computed once, and `indices` is the only storage the splitters permute.
struct BuildSets {
    aabbs: Vec<Aabb>,
    centers: Vec<Point<Real>>,
    indices: Vec<u32>,
    root_aabb: Aabb,
}

fn precompute<P: Primitive>(prims: &[P]) -> Result<BuildSets, BuildError> {
    if prims.len() > u32::MAX as usize {
        return Err(BuildError::TooManyPrimitives(prims.len()));
    }

    let mut aabbs = Vec::with_capacity(prims.len());
    let mut centers = Vec::with_capacity(prims.len());
    let mut root_aabb = Aabb::new_invalid();

    for prim in prims {
        let aabb = prim.aabb();
        root_aabb.merge(&aabb);
        aabbs.push(aabb);
        centers.push(prim.center());
    }

    Ok(BuildSets {
        aabbs,
        centers,
        indices: (0..prims.len() as u32).collect(),
        root_aabb,
    })
}

impl BuildSets {
    /// The Morton codes of all centroids, on the grid covering the whole set.
    fn morton_codes(&self) -> Vec<u32> {
        self.centers
            .iter()
            .map(|center| morton::morton_code(&self.root_aabb, center))
            .collect()
    }
}
