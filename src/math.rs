//! Linear algebra and SIMD type aliases.

/// The scalar type used throughout this crate.
#[cfg(feature = "f64")]
pub type Real = f64;

/// The scalar type used throughout this crate.
#[cfg(feature = "f32")]
pub type Real = f32;

/// The dimension of the space.
pub const DIM: usize = 3;

/// The point type.
pub type Point<N> = na::Point3<N>;

/// The vector type.
pub type Vector<N> = na::Vector3<N>;

pub use simd::*;

#[cfg(not(all(feature = "simd-is-enabled", feature = "f32")))]
mod simd {
    /// A SIMD float with four lanes.
    #[cfg(feature = "f32")]
    pub type SimdReal4 = simba::simd::AutoF32x4;

    /// A SIMD float with eight lanes.
    #[cfg(feature = "f32")]
    pub type SimdReal8 = simba::simd::AutoF32x8;

    /// A SIMD float with four lanes.
    #[cfg(feature = "f64")]
    pub type SimdReal4 = simba::simd::AutoF64x4;

    /// A SIMD float with eight lanes.
    #[cfg(feature = "f64")]
    pub type SimdReal8 = simba::simd::AutoF64x8;

    /// A SIMD bool with four lanes.
    pub type SimdBool4 = simba::simd::AutoBoolx4;

    /// A SIMD bool with eight lanes.
    pub type SimdBool8 = simba::simd::AutoBoolx8;
}

#[cfg(all(feature = "simd-is-enabled", feature = "f32"))]
mod simd {
    /// A SIMD float with four lanes.
    #[cfg(feature = "simd-stable")]
    pub use simba::simd::WideF32x4 as SimdReal4;

    /// A SIMD float with eight lanes.
    #[cfg(feature = "simd-stable")]
    pub use simba::simd::WideF32x8 as SimdReal8;

    /// A SIMD bool with four lanes.
    #[cfg(feature = "simd-stable")]
    pub use simba::simd::WideBoolF32x4 as SimdBool4;

    /// A SIMD bool with eight lanes.
    #[cfg(feature = "simd-stable")]
    pub use simba::simd::WideBoolF32x8 as SimdBool8;

    /// A SIMD float with four lanes.
    #[cfg(feature = "simd-nightly")]
    pub use simba::simd::f32x4 as SimdReal4;

    /// A SIMD float with eight lanes.
    #[cfg(feature = "simd-nightly")]
    pub use simba::simd::f32x8 as SimdReal8;

    /// A SIMD bool with four lanes.
    #[cfg(feature = "simd-nightly")]
    pub use simba::simd::m32x4 as SimdBool4;

    /// A SIMD bool with eight lanes.
    #[cfg(feature = "simd-nightly")]
    pub use simba::simd::m32x8 as SimdBool8;
}
