//! Fast approximate logarithms via IEEE-754 bit decomposition.
//!
//! Port of Paul Mineiro's fastapprox kernels (https://github.com/romeric/fastapprox).
//! The bit masks and polynomial constants must not be changed: downstream
//! color scales are regression-tested against these exact outputs.

use rayon::prelude::*;

const MANTISSA_MASK: u32 = 0x007F_FFFF;
const ONE_HALF_BITS: u32 = 0x3F00_0000;

/// Approximate base-2 logarithm of a positive f32.
///
/// Relative error stays under 1% away from the zero crossing at `x == 1`.
/// The result is meaningless for `x <= 0`; callers are expected to guard.
/// Intermediate math runs in f64 so results match the reference
/// implementation, which computes on doubles.
#[inline]
pub fn fast_log2(x: f32) -> f32 {
    let vx_u = x.to_bits();
    let mx_f = f32::from_bits((vx_u & MANTISSA_MASK) | ONE_HALF_BITS) as f64;
    (vx_u as f64 * 1.192_092_895_507_812_5e-7
        - 124.225_514_99
        - 1.498_030_302 * mx_f
        - 1.725_879_99 / (0.352_088_706_8 + mx_f)) as f32
}

/// Cruder but cheaper base-2 logarithm, exact only at powers of two.
#[inline]
pub fn faster_log2(x: f32) -> f32 {
    (x.to_bits() as f64 * 1.192_092_895_507_812_5e-7 - 126.942_695_04) as f32
}

/// Natural-log variant of [`fast_log2`], with premultiplied constants.
#[inline]
pub fn fast_ln(x: f32) -> f32 {
    let vx_u = x.to_bits();
    let mx_f = f32::from_bits((vx_u & MANTISSA_MASK) | ONE_HALF_BITS) as f64;
    (vx_u as f64 * 8.262_958_288_192_749e-8
        - 86.106_565_399_366_22
        - 1.038_355_479_385_848_5 * mx_f
        - 1.196_288_848_086_928 / (0.352_088_706_8 + mx_f)) as f32
}

/// Natural-log variant of [`faster_log2`].
#[inline]
pub fn faster_ln(x: f32) -> f32 {
    (x.to_bits() as f64 * 8.262_958_288_192_749e-8 - 87.989_971_088_575_98) as f32
}

/// Signed, zero-safe log projection: `sign(x) * fast_log2(|x| + 1)`.
///
/// Maps zero to zero, is antisymmetric and continuous at the origin, which
/// makes it usable on attributes with negative entries (residuals, folds).
/// Non-finite inputs project to zero.
#[inline]
pub fn log_project(x: f32) -> f32 {
    if x == 0.0 || !x.is_finite() {
        return 0.0;
    }
    let multiplier = if x > 0.0 { 1.0f32 } else { -1.0 };
    // regardless of the sign of `x`, `multiplier * (x + multiplier)`
    // equals `|x| + 1`
    multiplier * fast_log2(multiplier * (x + multiplier))
}

/// In-place [`fast_log2`] over a whole buffer, punning through the raw bit
/// words the way the reference loops over a `Uint32Array` view.
pub fn fast_log2_in_place(values: &mut [f32]) {
    let words: &mut [u32] = bytemuck::cast_slice_mut(values);
    for w in words.iter_mut() {
        let vx_u = *w;
        let mx_f = f32::from_bits((vx_u & MANTISSA_MASK) | ONE_HALF_BITS) as f64;
        let out = (vx_u as f64 * 1.192_092_895_507_812_5e-7
            - 124.225_514_99
            - 1.498_030_302 * mx_f
            - 1.725_879_99 / (0.352_088_706_8 + mx_f)) as f32;
        *w = out.to_bits();
    }
}

/// In-place [`log_project`] over a whole buffer.
pub fn log_project_in_place(values: &mut [f32]) {
    for v in values.iter_mut() {
        *v = log_project(*v);
    }
}

/// Log-projected copy of `values`, computed in parallel. Worth it from
/// roughly 10^4 elements up, which is the common size for per-cell
/// attributes.
pub fn log_project_copy_par(values: &[f32]) -> Vec<f32> {
    values.par_iter().map(|&v| log_project(v)).collect()
}
