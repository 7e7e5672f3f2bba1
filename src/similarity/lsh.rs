//! Banded locality-sensitive hashing over trapdoor tokens
//!
//! An index holds `B` bands of `R` bit positions each, sampled from a RNG
//! seeded with the key fingerprint, so the same key always yields the same
//! projections, across runs and processes. A token's signature packs, for
//! each band, its `R` selected bits into one band hash. Two tokens are
//! judged similar by counting matching bands and inverting the standard
//! LSH S-curve `P(match) ≈ 1 - (1 - s^R)^B`.

use crate::approx::ApproxBool;
use crate::crypto::{HkdfPrf, KeyedPrf};
use crate::error::Error;
use crate::trapdoor::{Trapdoor, TrapdoorFactory};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Default band count.
pub const DEFAULT_BANDS: usize = 20;

/// Default bits per band.
pub const DEFAULT_BAND_SIZE: usize = 5;

/// An LSH signature: one packed hash per band plus the key fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LshSignature {
    bands: Vec<u64>,
    fingerprint: u64,
}

impl LshSignature {
    /// Number of bands.
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Fingerprint of the key the signature was built under.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

/// A banded LSH index for one key and one `(B, R)` configuration.
pub struct LshIndex<const N: usize> {
    projections: Vec<Vec<usize>>,
    bands: usize,
    band_size: usize,
    fingerprint: u64,
}

impl<const N: usize> LshIndex<N> {
    /// Build an index with the default `(B, R)` configuration.
    pub fn new(key: &[u8]) -> Self {
        Self::with_config(key, DEFAULT_BANDS, DEFAULT_BAND_SIZE)
    }

    /// Build an index with explicit band count and band size.
    pub fn with_config(key: &[u8], bands: usize, band_size: usize) -> Self {
        Self::for_fingerprint(HkdfPrf::new(key).fingerprint(), bands, band_size)
    }

    /// Build an index compatible with tokens from an existing factory.
    pub fn for_factory<P: KeyedPrf>(
        factory: &TrapdoorFactory<N, P>,
        bands: usize,
        band_size: usize,
    ) -> Self {
        Self::for_fingerprint(factory.fingerprint(), bands, band_size)
    }

    fn for_fingerprint(fingerprint: u64, bands: usize, band_size: usize) -> Self {
        assert!(bands >= 1, "band count must be at least 1");
        assert!(
            (1..=64).contains(&band_size),
            "band size must fit a packed u64"
        );

        // Projections are a pure function of the key fingerprint, so
        // signatures agree across processes.
        let mut rng = StdRng::seed_from_u64(fingerprint);
        let projections = (0..bands)
            .map(|_| (0..band_size).map(|_| rng.gen_range(0..N * 8)).collect())
            .collect();

        LshIndex {
            projections,
            bands,
            band_size,
            fingerprint,
        }
    }

    /// Band count `B`.
    pub fn bands(&self) -> usize {
        self.bands
    }

    /// Bits per band `R`.
    pub fn band_size(&self) -> usize {
        self.band_size
    }

    /// Fingerprint of the key this index serves.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Generate the signature for a token.
    pub fn sign(&self, td: &Trapdoor<N>) -> Result<LshSignature, Error> {
        if td.fingerprint() != self.fingerprint {
            return Err(Error::incompatible(self.fingerprint, td.fingerprint()));
        }

        let bands = self
            .projections
            .iter()
            .map(|positions| {
                positions
                    .iter()
                    .fold(0u64, |acc, &pos| (acc << 1) | td.hash().bit(pos) as u64)
            })
            .collect();

        Ok(LshSignature {
            bands,
            fingerprint: self.fingerprint,
        })
    }

    /// Decide whether two signatures are similar above `threshold`.
    ///
    /// Counts matching bands, inverts the LSH curve to an estimated
    /// similarity `s ≈ (1 - (1 - r)^(1/B))^(1/R)` and compares against the
    /// threshold, with `fpr = 1/sqrt(B)`.
    pub fn are_similar(
        &self,
        a: &LshSignature,
        b: &LshSignature,
        threshold: f64,
    ) -> Result<ApproxBool, Error> {
        for sig in [a, b] {
            if sig.fingerprint != self.fingerprint {
                return Err(Error::incompatible(self.fingerprint, sig.fingerprint));
            }
            if sig.bands.len() != self.bands {
                return Err(Error::SizeMismatch {
                    left: self.bands,
                    right: sig.bands.len(),
                });
            }
        }

        let matches = a
            .bands
            .iter()
            .zip(&b.bands)
            .filter(|(x, y)| x == y)
            .count();
        let match_ratio = matches as f64 / self.bands as f64;

        let similarity = (1.0 - (1.0 - match_ratio).powf(1.0 / self.bands as f64))
            .powf(1.0 / self.band_size as f64);

        let sigma = 1.0 / (self.bands as f64).sqrt();
        Ok(ApproxBool::new(similarity >= threshold, sigma, 0.0))
    }

    /// Indices of `candidates` whose signatures pass
    /// [`LshIndex::are_similar`] against the query.
    pub fn find_similar(
        &self,
        query: &Trapdoor<N>,
        candidates: &[Trapdoor<N>],
        threshold: f64,
    ) -> Result<Vec<usize>, Error> {
        let query_sig = self.sign(query)?;

        let mut hits = Vec::new();
        for (i, candidate) in candidates.iter().enumerate() {
            let sig = self.sign(candidate)?;
            if *self.are_similar(&query_sig, &sig, threshold)?.value() {
                hits.push(i);
            }
        }
        Ok(hits)
    }
}
