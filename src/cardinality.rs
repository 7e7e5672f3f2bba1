//! Cardinality estimation over set hash words
//!
//! All estimators read only the hash word of a set; they never see members.
//! Two algorithms with different sweet spots:
//! - **Linear counting**: accurate while the word is sparse; degrades toward
//!   saturation, where it reports the bit width with error 0.5
//! - **HyperLogLog-style**: buckets the word's bytes by trailing zeros;
//!   constant standard error `1.04/sqrt(64) ≈ 0.13`
//!
//! [`adaptive_estimate`] runs linear counting first and keeps it for small
//! estimates, deferring to HyperLogLog above 100. Estimates are bounded by
//! the information in the word: a filter near saturation cannot resolve
//! counts beyond its bit width, and the reported error rate says so.

use crate::approx::{compose_rates, Approx};
use crate::error::Error;
use crate::hash::HashWord;
use crate::sets::boolean::BooleanSet;

/// HyperLogLog precision: bucket count is `2^HLL_PRECISION`.
pub const HLL_PRECISION: usize = 6;

/// Number of HyperLogLog buckets.
pub const HLL_BUCKETS: usize = 1 << HLL_PRECISION;

/// Estimates below this stay with linear counting in
/// [`adaptive_estimate`].
const SMALL_CARDINALITY: f64 = 100.0;

/// Relative difference below which two cardinalities compare as equal.
const COMPARE_THRESHOLD: f64 = 0.1;

/// Linear counting: `-M * ln(z / M)` over the `M = 8N` bits of the word,
/// where `z` is the number of zero bits.
///
/// At saturation (no zero bits left) the estimate is pinned to `M` with
/// error rate 0.5.
pub fn linear_count<const N: usize>(word: &HashWord<N>) -> Approx<f64> {
    let total_bits = (N * 8) as f64;
    let set_bits = word.count_ones() as f64;
    let zero_bits = total_bits - set_bits;

    if zero_bits == 0.0 {
        tracing::warn!(bits = N * 8, "linear counter saturated");
        return Approx::new(total_bits, 0.5, 0.0);
    }

    let estimate = -total_bits * (zero_bits / total_bits).ln();

    let load = set_bits / total_bits;
    let sigma = (load.exp() - load - 1.0).sqrt() / total_bits.sqrt();

    Approx::new(estimate, sigma, 0.0)
}

/// HyperLogLog-style estimation over the word's bytes.
///
/// Byte `j` feeds bucket `j mod 64` with its trailing-zero count (8 for a
/// zero byte). The harmonic-mean estimate gets the standard small-range
/// correction `m * ln(m / zeros)` when it falls under `2.5 * m` and empty
/// buckets remain. Standard error is `1.04 / sqrt(64)`.
pub fn hll_estimate<const N: usize>(word: &HashWord<N>) -> Approx<f64> {
    let m = HLL_BUCKETS as f64;
    let alpha = 0.7213 / (1.0 + 1.079 / m);

    let mut buckets = [0u8; HLL_BUCKETS];
    for (j, &byte) in word.as_bytes().iter().take(HLL_BUCKETS).enumerate() {
        buckets[j % HLL_BUCKETS] = if byte == 0 {
            8
        } else {
            byte.trailing_zeros() as u8
        };
    }

    let sum: f64 = buckets.iter().map(|&b| 2f64.powi(-(b as i32))).sum();
    let mut estimate = alpha * m * m / sum;

    if estimate < 2.5 * m {
        let zeros = buckets.iter().filter(|&&b| b == 0).count();
        if zeros != 0 {
            estimate = m * (m / zeros as f64).ln();
        }
    }

    let sigma = 1.04 / m.sqrt();
    Approx::new(estimate, sigma, 0.0)
}

/// Run linear counting first; keep it for small estimates, otherwise use
/// HyperLogLog.
pub fn adaptive_estimate<const N: usize>(word: &HashWord<N>) -> Approx<f64> {
    let linear = linear_count(word);
    if *linear.value() < SMALL_CARDINALITY {
        tracing::debug!(estimate = *linear.value(), "adaptive: linear counting");
        linear
    } else {
        let hll = hll_estimate(word);
        tracing::debug!(estimate = *hll.value(), "adaptive: hyperloglog");
        hll
    }
}

/// Compare the cardinalities of two words without revealing counts.
///
/// Returns `-1`, `0` or `+1`: zero when the relative difference is under
/// 10%, otherwise the sign of `|a| - |b|`. The error rate composes both
/// estimators' errors.
pub fn compare<const N: usize>(a: &HashWord<N>, b: &HashWord<N>) -> Approx<i32> {
    let est_a = hll_estimate(a);
    let est_b = hll_estimate(b);
    let (va, vb) = (*est_a.value(), *est_b.value());

    let largest = va.max(vb);
    let ordering = if largest == 0.0 {
        0
    } else {
        let rel_diff = (va - vb).abs() / largest;
        if rel_diff < COMPARE_THRESHOLD {
            0
        } else if va < vb {
            -1
        } else {
            1
        }
    };

    let error = compose_rates(est_a.error_rate(), est_b.error_rate());
    Approx::new(ordering, error, 0.0)
}

/// Union cardinality of two Boolean sets via inclusion-exclusion:
/// `|A ∪ B| ≈ |A| + |B| - |A ∩ B|`, with all three estimator errors
/// composed.
pub fn union_cardinality<const N: usize>(
    a: &BooleanSet<N>,
    b: &BooleanSet<N>,
) -> Result<Approx<f64>, Error> {
    let intersection = a.intersect(b)?;

    let est_a = hll_estimate(a.hash());
    let est_b = hll_estimate(b.hash());
    let est_i = hll_estimate(intersection.hash());

    let union = (est_a.value() + est_b.value() - est_i.value()).max(0.0);
    let error = compose_rates(
        compose_rates(est_a.error_rate(), est_b.error_rate()),
        est_i.error_rate(),
    );

    Ok(Approx::new(union, error, 0.0))
}
