//! MinHash signatures for Jaccard similarity between collections
//!
//! A signature is `K` 32-bit coordinates; coordinate `i` is the minimum,
//! across all items, of a keyed 32-bit projection of `F(key, i ∥ item)`.
//! The fraction of matching coordinates between two signatures is an
//! unbiased estimate of the Jaccard similarity of the underlying
//! collections, with standard error `sqrt(p(1-p)/K)`.
//!
//! Signatures carry the key fingerprint; comparing signatures from
//! different keys is rejected rather than silently returning noise.

use crate::approx::Approx;
use crate::crypto::prf::domains;
use crate::crypto::{Encode, HkdfPrf, KeyedPrf};
use crate::error::Error;
use crate::trapdoor::TrapdoorFactory;
use serde::{Deserialize, Serialize};

/// Default signature length.
pub const DEFAULT_SIGNATURE_LEN: usize = 128;

/// A MinHash signature: per-coordinate minima plus the key fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinHashSignature {
    values: Vec<u32>,
    fingerprint: u64,
}

impl MinHashSignature {
    /// Number of coordinates.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the signature has no coordinates.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fingerprint of the key the signature was built under.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// The raw coordinates.
    pub fn values(&self) -> &[u32] {
        &self.values
    }
}

/// Signature generator under one key.
pub struct MinHasher<const N: usize, P: KeyedPrf = HkdfPrf> {
    factory: TrapdoorFactory<N, P>,
    signature_len: usize,
}

impl<const N: usize> MinHasher<N, HkdfPrf> {
    /// Build a hasher with the default signature length.
    pub fn new(key: &[u8]) -> Self {
        Self::with_signature_len(key, DEFAULT_SIGNATURE_LEN)
    }

    /// Build a hasher with an explicit signature length `K >= 1`.
    pub fn with_signature_len(key: &[u8], signature_len: usize) -> Self {
        assert!(signature_len >= 1, "signature length must be at least 1");
        assert!(N >= 4, "hash width must cover a 32-bit projection");
        MinHasher {
            factory: TrapdoorFactory::new(key),
            signature_len,
        }
    }
}

impl<const N: usize, P: KeyedPrf> MinHasher<N, P> {
    /// Build a hasher around a caller-provided PRF.
    pub fn with_prf(prf: P, signature_len: usize) -> Self {
        assert!(signature_len >= 1, "signature length must be at least 1");
        assert!(N >= 4, "hash width must cover a 32-bit projection");
        MinHasher {
            factory: TrapdoorFactory::with_prf(prf),
            signature_len,
        }
    }

    /// Fingerprint of this hasher's key.
    pub fn fingerprint(&self) -> u64 {
        self.factory.fingerprint()
    }

    /// Signature length `K`.
    pub fn signature_len(&self) -> usize {
        self.signature_len
    }

    /// Generate the signature for a collection of items.
    ///
    /// An empty collection yields the all-`u32::MAX` signature; two empty
    /// collections therefore compare as identical, which matches the
    /// convention that two empty sets have Jaccard similarity 1.
    pub fn sign<V, I>(&self, items: I) -> MinHashSignature
    where
        V: Encode,
        I: IntoIterator<Item = V>,
    {
        let mut values = vec![u32::MAX; self.signature_len];
        let mut payload = Vec::new();

        for item in items {
            let encoded = item.encoded();
            for (i, slot) in values.iter_mut().enumerate() {
                payload.clear();
                payload.extend_from_slice(&(i as u32).to_be_bytes());
                payload.extend_from_slice(&encoded);
                let word = self.factory.derive_word(domains::MINHASH, &payload);
                let head: [u8; 4] = word.as_bytes()[..4]
                    .try_into()
                    .expect("hash width checked at construction");
                let projection = u32::from_be_bytes(head);
                *slot = (*slot).min(projection);
            }
        }

        MinHashSignature {
            values,
            fingerprint: self.fingerprint(),
        }
    }
}

/// Estimate Jaccard similarity from two signatures.
///
/// Fails with `IncompatibleKey` when the signatures come from different
/// keys, and with `SizeMismatch` when their lengths differ.
pub fn signature_similarity(
    a: &MinHashSignature,
    b: &MinHashSignature,
) -> Result<Approx<f64>, Error> {
    if a.fingerprint != b.fingerprint {
        return Err(Error::incompatible(a.fingerprint, b.fingerprint));
    }
    if a.values.len() != b.values.len() {
        return Err(Error::SizeMismatch {
            left: a.values.len(),
            right: b.values.len(),
        });
    }

    let matches = a
        .values
        .iter()
        .zip(&b.values)
        .filter(|(x, y)| x == y)
        .count();
    let p = matches as f64 / a.values.len() as f64;
    let sigma = (p * (1.0 - p) / a.values.len() as f64).sqrt();

    Ok(Approx::new(p, sigma, 0.0))
}
