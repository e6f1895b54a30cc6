use crate::math::{Point, Real, Vector};
use crate::query::Ray;
use simba::simd::SimdValue;

/// A ray with its coordinates splatted across SIMD lanes, for testing
/// against a [`crate::bounding_volume::SimdAabb`].
#[derive(Debug, Copy, Clone)]
pub struct SimdRay<N: na::Scalar> {
    /// The origin of the ray, on every lane.
    pub origin: Point<N>,
    /// The direction of the ray, on every lane.
    pub dir: Vector<N>,
}

impl<N> SimdRay<N>
where
    N: na::Scalar + SimdValue<Element = Real>,
{
    /// Builds a SIMD ray with all lanes equal to `ray`.
    pub fn splat(ray: Ray) -> Self {
        Self {
            origin: Point::splat(ray.origin),
            dir: Vector::splat(ray.dir),
        }
    }
}
