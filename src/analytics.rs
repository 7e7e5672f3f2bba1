//! Differentially private analytics over trapdoored values
//!
//! A thin Laplace-mechanism layer on top of the sketches: noisy sums, means
//! and variances under a privacy budget ε, plus a noisy histogram binned by
//! trapdoor hash. Noise scale is `sensitivity / ε`; the reported error rate
//! is `1/ε` capped at 1, so a spent-down budget reads as an unusable
//! answer rather than a confident one.
//!
//! Noise is sampled as the difference of two unit exponentials, which is
//! Laplace-distributed and avoids the log-of-zero edge of inverse-CDF
//! sampling. Noise randomness comes from the thread RNG, since unlike the
//! signature projections it must NOT be reproducible across runs.

use crate::approx::{compose_rates, Approx};
use crate::cardinality::linear_count;
use crate::crypto::{Encode, HkdfPrf, KeyedPrf};
use crate::hash::HashWord;
use crate::trapdoor::TrapdoorFactory;
use rand::Rng;

/// Sample Laplace(0, scale) noise as the difference of two exponentials.
fn laplace_noise<R: Rng>(rng: &mut R, scale: f64) -> f64 {
    let e1 = -(1.0 - rng.gen::<f64>()).ln();
    let e2 = -(1.0 - rng.gen::<f64>()).ln();
    scale * (e1 - e2)
}

/// Error rate implied by a privacy budget, capped into [0, 1].
fn budget_error(epsilon: f64) -> f64 {
    (1.0 / epsilon).min(1.0)
}

/// Laplace-noised aggregation under a privacy budget.
#[derive(Debug, Clone, Copy)]
pub struct PrivateAggregator {
    privacy_budget: f64,
}

impl PrivateAggregator {
    /// Build an aggregator with privacy budget `epsilon > 0`.
    pub fn new(epsilon: f64) -> Self {
        assert!(epsilon > 0.0, "privacy budget must be positive");
        PrivateAggregator {
            privacy_budget: epsilon,
        }
    }

    /// The privacy budget ε.
    pub fn epsilon(&self) -> f64 {
        self.privacy_budget
    }

    /// Noisy sum. `sensitivity` bounds the contribution of any single
    /// value.
    pub fn sum(&self, values: &[f64], sensitivity: f64) -> Approx<f64> {
        let total: f64 = values.iter().sum();
        let noise = laplace_noise(
            &mut rand::thread_rng(),
            sensitivity / self.privacy_budget,
        );
        Approx::new(total + noise, budget_error(self.privacy_budget), 0.0)
    }

    /// Noisy mean of values known to lie in `[min_val, max_val]`.
    pub fn mean(&self, values: &[f64], min_val: f64, max_val: f64) -> Approx<f64> {
        if values.is_empty() {
            return Approx::exact(0.0);
        }
        let noisy_total = self.sum(values, max_val - min_val);
        Approx::new(
            noisy_total.value() / values.len() as f64,
            noisy_total.error_rate(),
            0.0,
        )
    }

    /// Noisy variance of values known to lie in `[min_val, max_val]`.
    pub fn variance(&self, values: &[f64], min_val: f64, max_val: f64) -> Approx<f64> {
        if values.is_empty() {
            return Approx::exact(0.0);
        }

        let center = self.mean(values, min_val, max_val);
        let sum_sq: f64 = values.iter().map(|v| (v - center.value()).powi(2)).sum();
        let variance = sum_sq / values.len() as f64;

        let sensitivity = (max_val - min_val).powi(2);
        let noise = laplace_noise(
            &mut rand::thread_rng(),
            sensitivity / self.privacy_budget,
        );

        let error = compose_rates(center.error_rate(), budget_error(self.privacy_budget));
        Approx::new(variance + noise, error, 0.0)
    }
}

/// Noisy histogram binned by trapdoor hash.
pub struct PrivateHistogram<const N: usize, P: KeyedPrf = HkdfPrf> {
    factory: TrapdoorFactory<N, P>,
    privacy_budget: f64,
}

impl<const N: usize> PrivateHistogram<N, HkdfPrf> {
    /// Build a histogram generator with privacy budget `epsilon > 0`.
    pub fn new(key: &[u8], epsilon: f64) -> Self {
        assert!(epsilon > 0.0, "privacy budget must be positive");
        assert!(N >= 4, "hash width must cover the bin projection");
        PrivateHistogram {
            factory: TrapdoorFactory::new(key),
            privacy_budget: epsilon,
        }
    }
}

impl<const N: usize, P: KeyedPrf> PrivateHistogram<N, P> {
    /// Build a histogram generator around a caller-provided PRF.
    pub fn with_prf(prf: P, epsilon: f64) -> Self {
        assert!(epsilon > 0.0, "privacy budget must be positive");
        assert!(N >= 4, "hash width must cover the bin projection");
        PrivateHistogram {
            factory: TrapdoorFactory::with_prf(prf),
            privacy_budget: epsilon,
        }
    }

    /// Noisy per-bin counts. Values land in the bin selected by the first
    /// four bytes of their trapdoor hash, each contribution perturbed by
    /// Laplace noise and floored at zero.
    pub fn bins<V: Encode>(&self, values: &[V], num_bins: usize) -> Vec<Approx<f64>> {
        assert!(num_bins >= 1, "histogram needs at least one bin");

        let mut counts = vec![0.0f64; num_bins];
        let mut rng = rand::thread_rng();
        let noise_scale = 1.0 / self.privacy_budget;

        for value in values {
            let td = self.factory.create(value);
            let head: [u8; 4] = td.hash().as_bytes()[..4]
                .try_into()
                .expect("hash width checked at construction");
            let bin = u32::from_be_bytes(head) as usize % num_bins;
            counts[bin] += (1.0 + laplace_noise(&mut rng, noise_scale)).max(0.0);
        }

        let error = budget_error(self.privacy_budget).min(1.0);
        counts
            .into_iter()
            .map(|count| Approx::new(count, error, 0.0))
            .collect()
    }

    /// Distinct-count estimate over the XOR fold of the values' trapdoor
    /// hashes, via linear counting. The estimator's own σ is reported; no
    /// extra noise is added, since the fold already hides identities.
    pub fn count_distinct<V: Encode>(&self, values: &[V]) -> Approx<f64> {
        let folded = values.iter().fold(HashWord::<N>::zero(), |acc, value| {
            acc ^ *self.factory.create(value).hash()
        });
        linear_count(&folded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_is_centered_on_truth() {
        let agg = PrivateAggregator::new(10.0);
        let values = vec![1.0, 2.0, 3.0, 4.0];
        let noisy = agg.sum(&values, 1.0);
        // Laplace(0.1) noise: generous 10-sigma style bound.
        assert!((noisy.value() - 10.0).abs() < 5.0);
        assert!((noisy.error_rate() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_small_budget_caps_error_at_one() {
        let agg = PrivateAggregator::new(0.5);
        let noisy = agg.sum(&[1.0], 1.0);
        assert_eq!(noisy.error_rate(), 1.0);
    }

    #[test]
    fn test_mean_of_empty_is_exact_zero() {
        let agg = PrivateAggregator::new(1.0);
        let mean = agg.mean(&[], 0.0, 10.0);
        assert_eq!(*mean.value(), 0.0);
        assert!(mean.is_exact());
    }

    #[test]
    fn test_variance_is_finite() {
        let agg = PrivateAggregator::new(5.0);
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let var = agg.variance(&values, 0.0, 10.0);
        assert!(var.value().is_finite());
        assert!(var.error_rate() <= 1.0);
    }

    #[test]
    fn test_histogram_bins_cover_all_values() {
        let hist: PrivateHistogram<32> = PrivateHistogram::new(b"demo", 100.0);
        let values: Vec<u32> = (0..50).collect();
        let bins = hist.bins(&values, 8);
        assert_eq!(bins.len(), 8);
        let total: f64 = bins.iter().map(|b| *b.value()).sum();
        // With a large budget the noise is tiny; totals stay near 50.
        assert!((total - 50.0).abs() < 10.0);
    }

    #[test]
    fn test_histogram_binning_is_deterministic() {
        // Same key, same values: the bin assignment never moves, only the
        // noise does.
        let a: PrivateHistogram<32> = PrivateHistogram::new(b"demo", 1e6);
        let b: PrivateHistogram<32> = PrivateHistogram::new(b"demo", 1e6);
        let values: Vec<u32> = (0..20).collect();
        let bins_a: Vec<f64> = a.bins(&values, 4).iter().map(|x| *x.value()).collect();
        let bins_b: Vec<f64> = b.bins(&values, 4).iter().map(|x| *x.value()).collect();
        for (x, y) in bins_a.iter().zip(&bins_b) {
            assert!((x - y).abs() < 1.0, "bin masses should nearly agree");
        }
    }

    #[test]
    fn test_count_distinct_of_nothing_is_zero() {
        let hist: PrivateHistogram<32> = PrivateHistogram::new(b"demo", 1.0);
        let est = hist.count_distinct(&Vec::<u64>::new());
        assert_eq!(*est.value(), 0.0);
    }

    #[test]
    fn test_count_distinct_bounded_by_word_width() {
        let hist: PrivateHistogram<32> = PrivateHistogram::new(b"demo", 1.0);
        let est = hist.count_distinct(&[1u64, 2, 3]);
        assert!(*est.value() > 0.0);
        assert!(*est.value() <= 256.0);
    }
}
