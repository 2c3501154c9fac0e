//! Uniform helpers over an injected random source.
//!
//! Every sampler in this crate draws its randomness through these helpers so that
//! a seeded [`rand::RngCore`] reproduces the exact same sequence of values.
use rand::RngCore;

/// Scale factor mapping the top 53 bits of a `u64` onto `[0, 1)`.
const UNIT_SCALE: f64 = 1.0 / (1u64 << 53) as f64;

/// Generate a random float in the range [0, 1).
///
/// Uses the 53 most significant bits of one `next_u64` call, so every result is
/// exactly representable and strictly below 1.
#[inline]
pub(crate) fn rand01<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    (rng.next_u64() >> 11) as f64 * UNIT_SCALE
}

/// Generate a random float in `[lo, hi)`. Returns `lo` when the range is empty.
#[inline]
pub(crate) fn rand_range<R: RngCore + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi <= lo {
        return lo;
    }
    let v = lo + rand01(rng) * (hi - lo);
    // Keep strictly below the upper edge.
    v.clamp(lo, next_down(hi))
}

/// Compute the next smaller representable float value.
///
/// Returns a value that is strictly less than the input. Handles edge cases
/// including very small positive values and zero.
#[inline]
pub(crate) fn next_down(val: f64) -> f64 {
    if val.is_nan() {
        return f64::NAN;
    }

    if val == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }

    if val == f64::INFINITY {
        return f64::MAX;
    }

    if val == 0.0 {
        return -f64::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f64::from_bits(bits.saturating_sub(1))
    } else {
        f64::from_bits(bits.saturating_add(1))
    }
}
