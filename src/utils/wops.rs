//! Lane-wise operations on SIMD values.

use simba::simd::{SimdRealField, SimdValue};

/// Swaps the lanes of `a` and `b` wherever `do_swap` is set.
pub(crate) fn simd_swap<N: SimdRealField + Copy>(do_swap: N::SimdBool, a: &mut N, b: &mut N) {
    let _a = *a;
    *a = b.select(do_swap, *a);
    *b = _a.select(do_swap, *b);
}
