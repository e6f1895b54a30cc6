//! SoA bounding boxes batching four or eight AABBs into one ray test.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, SimdReal4, SimdReal8, DIM};
use crate::query::SimdRay;
use crate::utils;
use num_traits::{One, Zero};
use simba::simd::{SimdPartialOrd, SimdRealField, SimdValue};

/// Several AABBs represented as a single SoA AABB with SIMD components.
///
/// Lane `i` holds the `i`-th box; unused lanes are filled with
/// [`Aabb::new_invalid`] so they can never pass a ray test.
#[derive(Debug, Copy, Clone)]
#[repr(C)]
pub struct SimdAabb<N: na::Scalar> {
    /// The min coordinates of the AABBs.
    pub mins: Point<N>,
    /// The max coordinates of the AABBs.
    pub maxs: Point<N>,
}

/// Four AABBs represented as a single SoA AABB, as stored by 4-wide nodes.
pub type SimdAabb4 = SimdAabb<SimdReal4>;

/// Eight AABBs represented as a single SoA AABB, as stored by 8-wide nodes.
pub type SimdAabb8 = SimdAabb<SimdReal8>;

impl<N> SimdAabb<N>
where
    N: SimdRealField + SimdPartialOrd + SimdValue<Element = Real> + na::Scalar + Zero + One + Copy,
{
    /// An invalid AABB on every lane.
    pub fn new_invalid() -> Self {
        Self::splat(Aabb::new_invalid())
    }

    /// Builds a SIMD AABB with all lanes equal to `aabb`.
    pub fn splat(aabb: Aabb) -> Self {
        Self {
            mins: Point::splat(aabb.mins),
            maxs: Point::splat(aabb.maxs),
        }
    }

    /// The AABB held by the `i`-th lane.
    pub fn extract(&self, i: usize) -> Aabb {
        Aabb::new(self.mins.extract(i), self.maxs.extract(i))
    }

    /// Replaces the `i`-th lane of `self` by the given AABB.
    pub fn replace(&mut self, i: usize, aabb: Aabb) {
        self.mins.replace(i, aabb.mins);
        self.maxs.replace(i, aabb.maxs);
    }

    /// Merges all the lanes of `self` into a single AABB.
    pub fn to_merged_aabb(&self) -> Aabb {
        Aabb::new(
            self.mins.coords.map(|e| e.simd_horizontal_min()).into(),
            self.maxs.coords.map(|e| e.simd_horizontal_max()).into(),
        )
    }

    /// Casts a ray on all the lanes of `self` at once.
    ///
    /// Returns the lane mask of the boxes hit before `max_toi` and the
    /// per-lane time of impact. A lane whose ray direction component is zero
    /// on some axis is constrained on that axis only by its origin lying
    /// inside the slab.
    pub fn cast_local_ray(&self, ray: &SimdRay<N>, max_toi: N) -> (N::SimdBool, N) {
        let zero = N::zero();
        let one = N::one();
        let infinity = N::splat(Real::MAX);

        // All-true lane mask.
        let mut hit = zero.simd_le(zero);
        let mut tmin = N::zero();
        let mut tmax = max_toi;

        for i in 0usize..DIM {
            let is_not_zero = ray.dir[i].simd_ne(zero);
            let is_zero_test =
                ray.origin[i].simd_ge(self.mins[i]) & ray.origin[i].simd_le(self.maxs[i]);
            let is_not_zero_test = {
                let denom = one / ray.dir[i];
                let mut inter_with_near_plane =
                    ((self.mins[i] - ray.origin[i]) * denom).select(is_not_zero, -infinity);
                let mut inter_with_far_plane =
                    ((self.maxs[i] - ray.origin[i]) * denom).select(is_not_zero, infinity);

                let gt = inter_with_near_plane.simd_gt(inter_with_far_plane);
                utils::simd_swap(gt, &mut inter_with_near_plane, &mut inter_with_far_plane);

                tmin = tmin.simd_max(inter_with_near_plane);
                tmax = tmax.simd_min(inter_with_far_plane);

                tmin.simd_le(tmax)
            };

            hit = hit & ((is_not_zero_test & is_not_zero) | (is_zero_test & !is_not_zero));
        }

        (hit, tmin)
    }
}

impl From<[Aabb; 4]> for SimdAabb4 {
    fn from(aabbs: [Aabb; 4]) -> Self {
        SimdAabb {
            mins: Point::from([aabbs[0].mins, aabbs[1].mins, aabbs[2].mins, aabbs[3].mins]),
            maxs: Point::from([aabbs[0].maxs, aabbs[1].maxs, aabbs[2].maxs, aabbs[3].maxs]),
        }
    }
}

impl From<[Aabb; 8]> for SimdAabb8 {
    fn from(aabbs: [Aabb; 8]) -> Self {
        SimdAabb {
            mins: Point::from([
                aabbs[0].mins,
                aabbs[1].mins,
                aabbs[2].mins,
                aabbs[3].mins,
                aabbs[4].mins,
                aabbs[5].mins,
                aabbs[6].mins,
                aabbs[7].mins,
            ]),
            maxs: Point::from([
                aabbs[0].maxs,
                aabbs[1].maxs,
                aabbs[2].maxs,
                aabbs[3].maxs,
                aabbs[4].maxs,
                aabbs[5].maxs,
                aabbs[6].maxs,
                aabbs[7].maxs,
            ]),
        }
    }
}

// The wide nodes rely on these layouts for aligned vector loads.
#[cfg(all(feature = "simd-stable", feature = "f32"))]
mod layout_checks {
    use super::{SimdAabb4, SimdAabb8};
    use core::mem::{align_of, size_of};

    static_assertions::const_assert_eq!(align_of::<SimdAabb4>(), 16);
    static_assertions::const_assert_eq!(size_of::<SimdAabb4>(), 96);
    static_assertions::const_assert_eq!(align_of::<SimdAabb8>(), 32);
    static_assertions::const_assert_eq!(size_of::<SimdAabb8>(), 192);
}

#[cfg(test)]
mod test {
    use super::{SimdAabb4, SimdAabb8};
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Real, SimdReal4, SimdReal8, Vector};
    use crate::query::{Ray, SimdRay};
    use simba::simd::{SimdBool, SimdValue};

    fn unit_box_at(x: Real) -> Aabb {
        Aabb::new(Point::new(x, -0.5, -0.5), Point::new(x + 1.0, 0.5, 0.5))
    }

    #[test]
    fn lane_roundtrip() {
        let boxes = [
            unit_box_at(0.0),
            unit_box_at(2.0),
            unit_box_at(4.0),
            Aabb::new_invalid(),
        ];
        let simd_aabb = SimdAabb4::from(boxes);

        for (i, aabb) in boxes.iter().enumerate() {
            assert_eq!(&simd_aabb.extract(i), aabb);
        }

        let merged = simd_aabb.to_merged_aabb();
        assert_eq!(merged.mins, Point::new(0.0, -0.5, -0.5));
        assert_eq!(merged.maxs, Point::new(5.0, 0.5, 0.5));
    }

    #[test]
    fn cast_ray_masks_the_hit_lanes() {
        let simd_aabb = SimdAabb4::from([
            unit_box_at(0.0),
            unit_box_at(2.0),
            Aabb::new(Point::new(0.0, 10.0, 0.0), Point::new(1.0, 11.0, 1.0)),
            Aabb::new_invalid(),
        ]);

        let ray = SimdRay::splat(Ray::new(Point::new(-1.0, 0.0, 0.0), Vector::x()));
        let (hit, toi) = simd_aabb.cast_local_ray(&ray, SimdReal4::splat(Real::MAX));

        assert_eq!(hit.bitmask() & 0b1111, 0b0011);
        assert_eq!(toi.extract(0), 1.0);
        assert_eq!(toi.extract(1), 3.0);
    }

    #[test]
    fn cast_ray_respects_max_toi() {
        let simd_aabb = SimdAabb4::from([
            unit_box_at(0.0),
            unit_box_at(2.0),
            unit_box_at(4.0),
            unit_box_at(6.0),
        ]);

        let ray = SimdRay::splat(Ray::new(Point::new(-1.0, 0.0, 0.0), Vector::x()));
        let (hit, _) = simd_aabb.cast_local_ray(&ray, SimdReal4::splat(3.5));

        // Only the first two boxes (entered at t = 1 and t = 3) qualify.
        assert_eq!(hit.bitmask() & 0b1111, 0b0011);
    }

    #[test]
    fn zero_direction_component_is_not_a_constraint() {
        let lanes = [unit_box_at(0.0); 8];
        let simd_aabb = SimdAabb8::from(lanes);

        // Axis-aligned ray inside the y/z slabs: hits.
        let inside = SimdRay::splat(Ray::new(Point::new(-1.0, 0.25, 0.0), Vector::x()));
        let (hit, _) = simd_aabb.cast_local_ray(&inside, SimdReal8::splat(Real::MAX));
        assert_eq!(hit.bitmask() & 0xff, 0xff);

        // Same direction but outside the y slab: misses every lane.
        let outside = SimdRay::splat(Ray::new(Point::new(-1.0, 2.0, 0.0), Vector::x()));
        let (miss, _) = simd_aabb.cast_local_ray(&outside, SimdReal8::splat(Real::MAX));
        assert_eq!(miss.bitmask() & 0xff, 0);
    }

    #[test]
    fn invalid_lanes_never_hit() {
        let simd_aabb = SimdAabb8::new_invalid();
        let ray = SimdRay::splat(Ray::new(Point::origin(), Vector::x()));
        let (hit, _) = simd_aabb.cast_local_ray(&ray, SimdReal8::splat(Real::MAX));
        assert_eq!(hit.bitmask() & 0xff, 0);
    }
}
