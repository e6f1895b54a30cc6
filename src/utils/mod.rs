//! Internal utilities.

pub mod morton;

pub(crate) use self::wops::simd_swap;

mod wops;
