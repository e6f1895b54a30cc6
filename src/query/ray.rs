//! Structures needed to cast rays.

use crate::math::{Point, Real, Vector};

/// A ray for ray-casting queries: a half-infinite line starting at `origin`
/// and extending in the `dir` direction.
///
/// The direction does not need to be normalized; times of impact are
/// expressed in units of `dir`'s length.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point<Real>,
    /// Direction of the ray.
    pub dir: Vector<Real>,
}

impl Ray {
    /// Creates a new ray from an origin point and a direction vector.
    pub fn new(origin: Point<Real>, dir: Vector<Real>) -> Ray {
        Ray { origin, dir }
    }

    /// The point along the ray at parameter `t`, i.e. `origin + dir * t`.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point<Real> {
        self.origin + self.dir * t
    }
}

/// Result of a successful ray cast against a primitive.
#[derive(Copy, Clone, Debug)]
pub struct RayIntersection {
    /// The time of impact (parameter `t`) where the ray hits the primitive.
    ///
    /// The exact hit point can be computed with `ray.point_at(time_of_impact)`.
    pub time_of_impact: Real,

    /// The surface normal at the intersection point.
    pub normal: Vector<Real>,
}

impl RayIntersection {
    /// Creates a new `RayIntersection`.
    #[inline]
    pub fn new(time_of_impact: Real, normal: Vector<Real>) -> RayIntersection {
        RayIntersection {
            time_of_impact,
            normal,
        }
    }
}
