/*!
canopy3d
========

**canopy3d** is a library of bounding-volume hierarchies for ray-tracing
renderers, written with the rust programming language.

It turns an unordered set of intersectable primitives into an immutable tree
— binary ([`partitioning::Bvh`]), 4-wide ([`partitioning::Qbvh`]) or 8-wide
([`partitioning::Obvh`]) — answering nearest-hit ray queries. Trees can be
built with a top-down spatial-median splitter or with a Morton-code radix
partition; both strategies produce the same node shapes and share the same
traversal.
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::module_inception)]

#[cfg(all(
    feature = "simd-is-enabled",
    not(feature = "simd-stable"),
    not(feature = "simd-nightly")
))]
std::compile_error!("The `simd-is-enabled` feature should not be enabled explicitly. Please enable the `simd-stable` or the `simd-nightly` feature instead.");

#[cfg(all(feature = "f32", feature = "f64"))]
std::compile_error!("The `f32` and `f64` features cannot be enabled at the same time.");

#[cfg(not(any(feature = "f32", feature = "f64")))]
std::compile_error!("Exactly one of the `f32` and `f64` features must be enabled.");

pub extern crate nalgebra as na;
pub extern crate simba;

pub mod bounding_volume;
pub mod math;
pub mod partitioning;
pub mod query;
pub mod shape;
pub mod utils;
