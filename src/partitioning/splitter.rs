//! In-place partitions of the index array driving the recursive builders.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::utils::morton::MORTON_BITS;

/// Partitions `indices` in place around the center of the merged box of the
/// indexed primitives, along its largest extent: indices whose centroid lies
/// strictly below the pivot end up in the left half.
///
/// Neither returned half is empty (for `indices.len() >= 2`): when the
/// natural partition degenerates because the centroids coincide along the
/// chosen axis, the slice is split at its midpoint instead, so recursion
/// always makes progress and the tree depth stays bounded.
pub(super) fn split_indices_at_center<'a>(
    indices: &'a mut [u32],
    aabbs: &[Aabb],
    centers: &[Point<Real>],
) -> (&'a mut [u32], &'a mut [u32]) {
    let mut merged = Aabb::new_invalid();
    for i in indices.iter() {
        merged.merge(&aabbs[*i as usize]);
    }

    let axis = merged.largest_extent_axis();
    let pivot = merged.center()[axis];

    let mid = partition_in_place(indices, |i| centers[i as usize][axis] < pivot);

    if mid == 0 || mid == indices.len() {
        let half = indices.len() / 2;
        indices.split_at_mut(half)
    } else {
        indices.split_at_mut(mid)
    }
}

/// Partitions `indices` in place by bit `MORTON_BITS - 1 - level` of their
/// Morton codes (level 0 tests the most significant bit). Either side may
/// come out empty; past the 30-bit budget the slice is halved instead, so
/// that identical codes still terminate.
pub(super) fn split_indices_by_morton_bit<'a>(
    indices: &'a mut [u32],
    codes: &[u32],
    level: u32,
) -> (&'a mut [u32], &'a mut [u32]) {
    if level >= MORTON_BITS {
        let half = indices.len() / 2;
        return indices.split_at_mut(half);
    }

    let bit = MORTON_BITS - 1 - level;
    let mid = partition_in_place(indices, |i| (codes[i as usize] & (1 << bit)) == 0);
    indices.split_at_mut(mid)
}

/// Moves every index satisfying `goes_left` to the front of the slice and
/// returns their count. Looks at each element exactly once.
fn partition_in_place(indices: &mut [u32], goes_left: impl Fn(u32) -> bool) -> usize {
    let mut icurr = 0;
    let mut ilast = indices.len();

    for _ in 0..indices.len() {
        if goes_left(indices[icurr]) {
            icurr += 1;
        } else {
            ilast -= 1;
            indices.swap(icurr, ilast);
        }
    }

    icurr
}
