//! Jaccard similarity read directly off set hash words

use crate::approx::Approx;
use crate::cardinality::hll_estimate;
use crate::error::Error;
use crate::sets::boolean::BooleanSet;
use crate::sets::sym_diff::SymDiffSet;

/// Jaccard similarity of two Boolean sets via cardinality estimates:
/// `|A ∩ B| / |A ∪ B|`.
///
/// Both sets empty means identical, reported as 1.0 exactly. The estimate
/// is clamped into `[0, 1]`; the underlying estimators can disagree about
/// near-empty words, but a Jaccard value outside the unit interval is
/// meaningless. The error is the larger of the two estimator errors.
pub fn boolean_jaccard<const N: usize>(
    a: &BooleanSet<N>,
    b: &BooleanSet<N>,
) -> Result<Approx<f64>, Error> {
    let intersection = a.intersect(b)?;
    let union = a.union(b)?;

    if union.hash().is_zero() {
        return Ok(Approx::exact(1.0));
    }

    let est_i = hll_estimate(intersection.hash());
    let est_u = hll_estimate(union.hash());
    if *est_u.value() == 0.0 {
        return Ok(Approx::new(1.0, est_u.error_rate(), 0.0));
    }

    let ratio = (est_i.value() / est_u.value()).clamp(0.0, 1.0);
    let error = est_i.error_rate().max(est_u.error_rate());
    Ok(Approx::new(ratio, error, 0.0))
}

/// Jaccard similarity of two symmetric-difference sets as a direct bit
/// ratio: shared bits over occupied bits, with `σ = 1/sqrt(occupied)`.
pub fn sym_diff_jaccard<const N: usize>(
    a: &SymDiffSet<N>,
    b: &SymDiffSet<N>,
) -> Result<Approx<f64>, Error> {
    if a.fingerprint() != 0 && b.fingerprint() != 0 && a.fingerprint() != b.fingerprint() {
        return Err(Error::incompatible(a.fingerprint(), b.fingerprint()));
    }

    let common = (*a.hash() & *b.hash()).count_ones() as f64;
    let occupied = (*a.hash() | *b.hash()).count_ones() as f64;

    if occupied == 0.0 {
        return Ok(Approx::exact(1.0));
    }

    let sigma = (1.0 / occupied.sqrt()).min(1.0);
    Ok(Approx::new(common / occupied, sigma, 0.0))
}
