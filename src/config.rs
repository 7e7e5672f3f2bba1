//! Sketch parameter configuration
//!
//! [`SketchParams`] gathers the tuning knobs a deployment chooses once and
//! shares between the writer and every reader: Bloom sub-hash count,
//! MinHash signature length, LSH banding. Serializable as TOML or any other
//! serde format so the numbers travel in deployment config rather than in
//! code. Secret keys are never part of this struct.
//!
//! The hash width is deliberately absent: it is the const generic `N` on
//! the value types, fixed at compile time (see the `Hash128`/`Hash256`/
//! `Hash512` aliases). HyperLogLog precision is likewise fixed at
//! [`crate::cardinality::HLL_PRECISION`].

use crate::error::Error;
use crate::homomorphic::ThresholdScheme;
use crate::sets::boolean::{BooleanSetFactory, DEFAULT_HASH_COUNT};
use crate::similarity::lsh::{LshIndex, DEFAULT_BANDS, DEFAULT_BAND_SIZE};
use crate::similarity::minhash::{MinHasher, DEFAULT_SIGNATURE_LEN};
use serde::{Deserialize, Serialize};

/// Default hash width in bytes (256-bit words).
pub const DEFAULT_HASH_BYTES: usize = 32;

/// Tuning parameters for the sketch layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SketchParams {
    /// Bloom sub-hashes per singleton
    #[serde(default = "default_bloom_hashes")]
    pub bloom_hashes: usize,

    /// MinHash signature length
    #[serde(default = "default_minhash_length")]
    pub minhash_length: usize,

    /// LSH band count
    #[serde(default = "default_lsh_bands")]
    pub lsh_bands: usize,

    /// Bits per LSH band
    #[serde(default = "default_lsh_band_size")]
    pub lsh_band_size: usize,

    /// Optional k-of-n share splitting configuration
    #[serde(default)]
    pub threshold: Option<ThresholdParams>,
}

/// k-of-n configuration for [`ThresholdScheme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdParams {
    /// Shares needed to reconstruct (k)
    pub required: usize,

    /// Shares produced (n)
    pub total: usize,
}

fn default_bloom_hashes() -> usize {
    DEFAULT_HASH_COUNT
}

fn default_minhash_length() -> usize {
    DEFAULT_SIGNATURE_LEN
}

fn default_lsh_bands() -> usize {
    DEFAULT_BANDS
}

fn default_lsh_band_size() -> usize {
    DEFAULT_BAND_SIZE
}

impl Default for SketchParams {
    fn default() -> Self {
        SketchParams {
            bloom_hashes: default_bloom_hashes(),
            minhash_length: default_minhash_length(),
            lsh_bands: default_lsh_bands(),
            lsh_band_size: default_lsh_band_size(),
            threshold: None,
        }
    }
}

impl SketchParams {
    /// Boolean-set factory configured with these parameters.
    pub fn boolean_factory<const N: usize>(&self, key: &[u8]) -> BooleanSetFactory<N> {
        BooleanSetFactory::with_hash_count(key, self.bloom_hashes)
    }

    /// MinHash signature generator configured with these parameters.
    pub fn min_hasher<const N: usize>(&self, key: &[u8]) -> MinHasher<N> {
        MinHasher::with_signature_len(key, self.minhash_length)
    }

    /// LSH index configured with these parameters.
    pub fn lsh_index<const N: usize>(&self, key: &[u8]) -> LshIndex<N> {
        LshIndex::with_config(key, self.lsh_bands, self.lsh_band_size)
    }

    /// Threshold scheme, when one is configured.
    pub fn threshold_scheme<const N: usize>(&self) -> Result<Option<ThresholdScheme<N>>, Error> {
        self.threshold
            .map(|t| ThresholdScheme::new(t.required, t.total))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let params = SketchParams::default();
        assert_eq!(params.bloom_hashes, 3);
        assert_eq!(params.minhash_length, 128);
        assert_eq!(params.lsh_bands, 20);
        assert_eq!(params.lsh_band_size, 5);
        assert!(params.threshold.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let params: SketchParams = toml::from_str("bloom_hashes = 5").unwrap();
        assert_eq!(params.bloom_hashes, 5);
        assert_eq!(params.minhash_length, 128);
        assert_eq!(params.lsh_bands, 20);
    }

    #[test]
    fn test_toml_round_trip() {
        let params = SketchParams {
            bloom_hashes: 4,
            threshold: Some(ThresholdParams {
                required: 3,
                total: 5,
            }),
            ..SketchParams::default()
        };
        let text = toml::to_string(&params).unwrap();
        let back: SketchParams = toml::from_str(&text).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_threshold_scheme_from_params() {
        let params = SketchParams {
            threshold: Some(ThresholdParams {
                required: 2,
                total: 4,
            }),
            ..SketchParams::default()
        };
        let scheme = params.threshold_scheme::<32>().unwrap().unwrap();
        assert_eq!(scheme.required(), 2);
        assert_eq!(scheme.total(), 4);

        let none = SketchParams::default().threshold_scheme::<32>().unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_invalid_threshold_surfaces() {
        let params = SketchParams {
            threshold: Some(ThresholdParams {
                required: 9,
                total: 3,
            }),
            ..SketchParams::default()
        };
        assert!(matches!(
            params.threshold_scheme::<32>(),
            Err(Error::InvalidThreshold { .. })
        ));
    }
}
