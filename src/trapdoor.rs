//! Keyed one-way hash tokens
//!
//! A [`Trapdoor`] stands in for a plaintext value: anyone holding the token
//! can test equality against other tokens from the same key, but recovering
//! the plaintext requires inverting the keyed hash. Tokens are created only
//! through a [`TrapdoorFactory`], which owns the key material; the token
//! itself carries just the hash word and the key fingerprint.
//!
//! # Security Properties
//!
//! - **Preimage resistance**: recovering the value from a token means
//!   inverting the keyed PRF
//! - **Determinism**: the same factory maps the same value to the same token
//! - **Compatibility checking**: tokens carry the key fingerprint, so mixing
//!   tokens from different keys is caught structurally, not probabilistically
//!
//! Equality is approximate: two distinct values collide with probability
//! `2^(-8N)` under the PRF assumption (a false positive), while equal values
//! always hash equally (no false negatives).

use crate::approx::ApproxBool;
use crate::crypto::prf::domains;
use crate::crypto::{Encode, HkdfPrf, KeyedPrf};
use crate::error::Error;
use crate::hash::HashWord;

/// Probability that two distinct inputs collide in an `N`-byte hash.
pub(crate) fn collision_fpr<const N: usize>() -> f64 {
    2f64.powi(-((N * 8) as i32))
}

/// An opaque keyed hash token for a plaintext value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Trapdoor<const N: usize> {
    hash: HashWord<N>,
    fingerprint: u64,
}

/// 128-bit trapdoor token
pub type Trapdoor128 = Trapdoor<16>;
/// 256-bit trapdoor token
pub type Trapdoor256 = Trapdoor<32>;
/// 512-bit trapdoor token
pub type Trapdoor512 = Trapdoor<64>;

impl<const N: usize> Trapdoor<N> {
    /// Reassemble a token from its wire parts. Used by deserialization and
    /// threshold reconstruction; does not validate the fingerprint.
    pub fn from_parts(hash: HashWord<N>, fingerprint: u64) -> Self {
        Trapdoor { hash, fingerprint }
    }

    /// The hash word of this token.
    pub fn hash(&self) -> &HashWord<N> {
        &self.hash
    }

    /// Fingerprint of the key this token was created under.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// True when both tokens were created under the same key.
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }

    /// Approximate equality against another token from the same key.
    ///
    /// Returns `Err(IncompatibleKey)` when the fingerprints differ.
    /// Otherwise the answer is true/false with `fpr = 2^(-8N)` and
    /// `fnr = 0`.
    pub fn equals(&self, other: &Self) -> Result<ApproxBool, Error> {
        if !self.is_compatible(other) {
            return Err(Error::incompatible(self.fingerprint, other.fingerprint));
        }
        Ok(ApproxBool::new(
            self.hash == other.hash,
            collision_fpr::<N>(),
            0.0,
        ))
    }
}

/// Factory owning the key material for token creation.
///
/// Immutable after construction, so it can be shared across threads freely.
pub struct TrapdoorFactory<const N: usize, P: KeyedPrf = HkdfPrf> {
    prf: P,
}

impl<const N: usize> TrapdoorFactory<N, HkdfPrf> {
    /// Build a factory from opaque secret key bytes using the default
    /// HKDF-SHA256 PRF.
    pub fn new(key: &[u8]) -> Self {
        TrapdoorFactory {
            prf: HkdfPrf::new(key),
        }
    }
}

impl<const N: usize, P: KeyedPrf> TrapdoorFactory<N, P> {
    /// Build a factory around a caller-provided PRF implementation.
    pub fn with_prf(prf: P) -> Self {
        TrapdoorFactory { prf }
    }

    /// Fingerprint of this factory's key.
    pub fn fingerprint(&self) -> u64 {
        self.prf.fingerprint()
    }

    /// Create a token for `value`.
    pub fn create<V: Encode + ?Sized>(&self, value: &V) -> Trapdoor<N> {
        let word = self.derive_word(domains::TRAPDOOR, &value.encoded());
        Trapdoor {
            hash: word,
            fingerprint: self.prf.fingerprint(),
        }
    }

    /// Derive a raw hash word under this factory's key. Shared by the set
    /// factories and the similarity signatures.
    pub(crate) fn derive_word(&self, domain: &[u8], payload: &[u8]) -> HashWord<N> {
        let mut out = [0u8; N];
        self.prf.fill(domain, payload, &mut out);
        HashWord::from_bytes(out)
    }
}
