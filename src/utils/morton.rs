//! Morton encoding of 3D centroids.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};

/// Number of Morton bits encoded per axis.
pub const BITS_PER_AXIS: u32 = 10;

/// Total number of bits of a Morton code.
pub const MORTON_BITS: u32 = 3 * BITS_PER_AXIS;

const GRID_CELLS: Real = (1 << BITS_PER_AXIS) as Real;

/// Expands the low 10 bits of `x` by inserting two zeros between each bit.
#[inline]
pub fn part1by2(mut x: u32) -> u32 {
    x &= 0x0000_03ff;
    x = (x ^ (x << 16)) & 0xff00_00ff;
    x = (x ^ (x << 8)) & 0x0300_f00f;
    x = (x ^ (x << 4)) & 0x030c_30c3;
    x = (x ^ (x << 2)) & 0x0924_9249;
    x
}

/// Interleaves three 10-bit grid coordinates into a 30-bit Morton code.
#[inline]
pub fn morton_encode(x: u32, y: u32, z: u32) -> u32 {
    (part1by2(z) << 2) | (part1by2(y) << 1) | part1by2(x)
}

/// The Morton code of `point` on the 1024³ grid covering `bounds`.
///
/// Coordinates are clamped into the grid; an axis along which `bounds` is
/// degenerate maps every point to cell 0.
pub fn morton_code(bounds: &Aabb, point: &Point<Real>) -> u32 {
    let extents = bounds.extents();
    let cell = |min: Real, extent: Real, v: Real| -> u32 {
        if extent > 0.0 {
            ((v - min) / extent * GRID_CELLS).clamp(0.0, GRID_CELLS - 1.0) as u32
        } else {
            0
        }
    };

    morton_encode(
        cell(bounds.mins.x, extents.x, point.x),
        cell(bounds.mins.y, extents.y, point.y),
        cell(bounds.mins.z, extents.z, point.z),
    )
}

#[cfg(test)]
mod test {
    use super::{morton_code, morton_encode, part1by2, MORTON_BITS};
    use crate::bounding_volume::Aabb;
    use crate::math::Point;

    #[test]
    fn part1by2_spreads_bits() {
        assert_eq!(part1by2(0), 0);
        assert_eq!(part1by2(1), 1);
        assert_eq!(part1by2(0b11), 0b1001);
        assert_eq!(part1by2(0b101), 0b1000001);
        // The topmost of the 10 bits lands on bit 27.
        assert_eq!(part1by2(0b10_0000_0000), 1 << 27);
        // Bits above the 10-bit budget are ignored.
        assert_eq!(part1by2(0b100_0000_0000), 0);
    }

    #[test]
    fn codes_fit_in_30_bits() {
        assert_eq!(morton_encode(1023, 1023, 1023), (1 << MORTON_BITS) - 1);
        assert_eq!(morton_encode(1, 0, 0), 0b001);
        assert_eq!(morton_encode(0, 1, 0), 0b010);
        assert_eq!(morton_encode(0, 0, 1), 0b100);
    }

    #[test]
    fn nearby_points_share_prefixes() {
        let bounds = Aabb::new(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0));

        let origin = morton_code(&bounds, &Point::new(0.0, 0.0, 0.0));
        let far = morton_code(&bounds, &Point::new(1.0, 1.0, 1.0));
        assert_eq!(origin, 0);
        assert_eq!(far, (1 << MORTON_BITS) - 1);

        // The most significant bit splits the z halves.
        let low_z = morton_code(&bounds, &Point::new(0.9, 0.9, 0.2));
        let high_z = morton_code(&bounds, &Point::new(0.9, 0.9, 0.7));
        assert_eq!(low_z >> (MORTON_BITS - 1), 0);
        assert_eq!(high_z >> (MORTON_BITS - 1), 1);
    }

    #[test]
    fn degenerate_bounds_map_to_cell_zero() {
        let bounds = Aabb::new(Point::new(0.0, 0.0, 0.0), Point::new(0.0, 1.0, 1.0));
        let code = morton_code(&bounds, &Point::new(0.0, 1.0, 1.0));
        // x contributes nothing, y and z are both 1023.
        assert_eq!(code, morton_encode(0, 1023, 1023));
    }
}
