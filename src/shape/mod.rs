//! Primitives consumed by the acceleration structures.

pub use self::sphere::Sphere;
pub use self::triangle::Triangle;

mod sphere;
mod triangle;

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::query::{Ray, RayIntersection};

/// Hits closer to the ray origin than this are rejected, so that secondary
/// rays spawned from a surface cannot re-hit it.
pub(crate) const HIT_EPSILON: Real = 1.0e-4;

/// A handle to a material owned by the renderer's material table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u32);

/// The capability expected from anything stored in an acceleration
/// structure.
///
/// Primitives are allocated and owned by the caller; a tree only keeps
/// indices into the slice it was built from and never outlives or frees the
/// primitives.
pub trait Primitive {
    /// The axis-aligned box bounding this primitive.
    fn aabb(&self) -> Aabb;

    /// The centroid used by the builders to partition primitives.
    fn center(&self) -> Point<Real> {
        self.aabb().center()
    }

    /// The nearest intersection of `ray` with this primitive at most
    /// `max_toi` away, if any.
    ///
    /// Hits closer than the primitive's self-intersection epsilon do not
    /// qualify.
    fn cast_ray(&self, ray: &Ray, max_toi: Real) -> Option<RayIntersection>;

    /// The material attached to this primitive, if any.
    fn material(&self) -> Option<MaterialHandle> {
        None
    }
}
