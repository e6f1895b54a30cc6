//! Bounding volumes.

pub use self::aabb::Aabb;
pub use self::simd_aabb::{SimdAabb, SimdAabb4, SimdAabb8};

mod aabb;
mod simd_aabb;
