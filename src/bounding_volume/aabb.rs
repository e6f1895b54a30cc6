//! Axis Aligned Bounding Box.

use crate::math::{Point, Real, Vector};

/// An Axis-Aligned Bounding Box (AABB), defined by its minimum and maximum
/// corners.
///
/// Once built from at least one primitive, `mins <= maxs` holds
/// componentwise; a box bounding a single point is degenerate but valid.
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Aabb {
    /// The point with the smallest coordinates on each axis.
    pub mins: Point<Real>,
    /// The point with the largest coordinates on each axis.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates a new AABB from its minimum and maximum corners.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with inverted bounds.
    ///
    /// This is the identity of [`Aabb::merge`] and it fails every ray and
    /// containment test, which makes it the natural filler for the unused
    /// lanes of a wide node.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Point::from(Vector::repeat(Real::MAX)),
            Point::from(Vector::repeat(-Real::MAX)),
        )
    }

    /// The smallest AABB containing all the given points.
    pub fn from_points<'a>(pts: impl IntoIterator<Item = &'a Point<Real>>) -> Self {
        let mut result = Self::new_invalid();
        for pt in pts {
            result.mins = result.mins.inf(pt);
            result.maxs = result.maxs.sup(pt);
        }
        result
    }

    /// The center of this AABB.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The extents of this AABB along each axis.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// The half-extents of this AABB along each axis.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        self.extents() / 2.0
    }

    /// The smallest AABB containing both `self` and `other`.
    #[inline]
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }

    /// Enlarges this AABB so it also contains `other`.
    #[inline]
    pub fn merge(&mut self, other: &Aabb) {
        *self = self.merged(other);
    }

    /// Does this AABB fully contain `other`?
    #[inline]
    pub fn contains(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.mins) && na::partial_ge(&self.maxs, &other.maxs)
    }

    /// Does this AABB contain the given point?
    #[inline]
    pub fn contains_local_point(&self, point: &Point<Real>) -> bool {
        na::partial_le(&self.mins, point) && na::partial_ge(&self.maxs, point)
    }

    /// Does this AABB intersect `other`?
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.maxs) && na::partial_ge(&self.maxs, &other.mins)
    }

    /// The index of the axis with the largest extent.
    ///
    /// Ties go to `x` over `z` and to `y` over `z`; an `x`/`y` tie goes
    /// to `y`.
    #[inline]
    pub fn largest_extent_axis(&self) -> usize {
        let size = self.extents();
        if size.x > size.y {
            if size.z > size.x {
                2
            } else {
                0
            }
        } else if size.z > size.y {
            2
        } else {
            1
        }
    }
}
