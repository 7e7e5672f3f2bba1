//! Homomorphic-style aggregation over trapdoor tokens
//!
//! Everything here stays at the sketch level of the rest of the crate:
//! payload arithmetic is real, hash combination is XOR/AND bookkeeping that
//! keeps the result a valid token under the same key. There is no
//! decryption and no inversion.
//!
//! The k-of-n [`ThresholdScheme`] is XOR splitting, **not** Shamir secret
//! sharing: reconstruction is guaranteed only for the canonical subset
//! (the first `k - 1` random shares together with the last share) and is
//! undefined for other subsets. The name and docs state the limitation
//! rather than promising an "any k of n" property the math does not have.

use crate::approx::{Approx, ApproxBool};
use crate::crypto::{Encode, HkdfPrf, KeyedPrf};
use crate::error::Error;
use crate::hash::HashWord;
use crate::trapdoor::{Trapdoor, TrapdoorFactory};
use num_traits::{ToPrimitive, Zero};
use rand::rngs::OsRng;
use rand::RngCore;
use std::ops::Add;

/// Fixed error rate reported for aggregated sums and means.
const AGGREGATION_ERROR: f64 = 1e-3;

/// Per-component error compounding base for [`CompoundTrapdoor::all_satisfy`].
const COMPONENT_CONFIDENCE: f64 = 0.99;

/// A token paired with a numeric payload, closed under addition.
///
/// Addition requires matching key fingerprints; it adds the payloads and
/// XORs the hashes, so the combined token still belongs to the same key
/// space. There is no inverse operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdditiveTrapdoor<const N: usize, T> {
    hash: HashWord<N>,
    fingerprint: u64,
    payload: T,
}

impl<const N: usize, T> AdditiveTrapdoor<N, T>
where
    T: Copy + Add<Output = T> + Zero,
{
    /// Pair a token with its payload.
    pub fn new(td: &Trapdoor<N>, payload: T) -> Self {
        AdditiveTrapdoor {
            hash: *td.hash(),
            fingerprint: td.fingerprint(),
            payload,
        }
    }

    /// The combined hash word.
    pub fn hash(&self) -> &HashWord<N> {
        &self.hash
    }

    /// Fingerprint of the key the components were created under.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// The accumulated payload.
    pub fn payload(&self) -> T {
        self.payload
    }

    /// Homomorphic addition: payloads add, hashes XOR.
    pub fn add(&self, other: &Self) -> Result<Self, Error> {
        if self.fingerprint != other.fingerprint {
            return Err(Error::incompatible(self.fingerprint, other.fingerprint));
        }
        Ok(AdditiveTrapdoor {
            hash: self.hash ^ other.hash,
            fingerprint: self.fingerprint,
            payload: self.payload + other.payload,
        })
    }

    /// Scalar multiplication: the payload is summed `k` times and the hash
    /// XOR-folded `k - 1` times. `k = 0` zeroes the payload and leaves the
    /// hash untouched.
    pub fn scale(&self, k: u32) -> Self {
        let mut hash = self.hash;
        let mut payload = if k == 0 { T::zero() } else { self.payload };
        for _ in 1..k {
            hash = hash ^ self.hash;
            payload = payload + self.payload;
        }
        AdditiveTrapdoor {
            hash,
            fingerprint: self.fingerprint,
            payload,
        }
    }
}

/// Aggregates collections through per-element additive trapdoors.
pub struct SecureAggregator<const N: usize, P: KeyedPrf = HkdfPrf> {
    factory: TrapdoorFactory<N, P>,
}

impl<const N: usize> SecureAggregator<N, HkdfPrf> {
    /// Build an aggregator from opaque secret key bytes.
    pub fn new(key: &[u8]) -> Self {
        SecureAggregator {
            factory: TrapdoorFactory::new(key),
        }
    }
}

impl<const N: usize, P: KeyedPrf> SecureAggregator<N, P> {
    /// Build an aggregator around a caller-provided PRF.
    pub fn with_prf(prf: P) -> Self {
        SecureAggregator {
            factory: TrapdoorFactory::with_prf(prf),
        }
    }

    /// Sum a collection by combining one additive trapdoor per element.
    ///
    /// The empty collection sums to zero exactly; otherwise the result
    /// carries the fixed aggregation error rate.
    pub fn sum<T, I>(&self, values: I) -> Approx<T>
    where
        T: Copy + Add<Output = T> + Zero + Encode,
        I: IntoIterator<Item = T>,
    {
        let mut combined: Option<AdditiveTrapdoor<N, T>> = None;
        for value in values {
            let term = AdditiveTrapdoor::new(&self.factory.create(&value), value);
            combined = Some(match combined {
                // Same factory, same fingerprint: addition cannot fail.
                Some(acc) => AdditiveTrapdoor {
                    hash: *acc.hash() ^ *term.hash(),
                    fingerprint: acc.fingerprint(),
                    payload: acc.payload() + term.payload(),
                },
                None => term,
            });
        }

        match combined {
            Some(acc) => Approx::new(acc.payload(), AGGREGATION_ERROR, 0.0),
            None => Approx::exact(T::zero()),
        }
    }

    /// Mean of a collection, with the same error rate as [`Self::sum`].
    pub fn mean<T, I>(&self, values: I) -> Approx<f64>
    where
        T: Copy + Add<Output = T> + Zero + Encode + ToPrimitive,
        I: IntoIterator<Item = T>,
    {
        let values: Vec<T> = values.into_iter().collect();
        if values.is_empty() {
            return Approx::exact(0.0);
        }
        let count = values.len() as f64;
        let total = self.sum(values);
        let total_f = total
            .value()
            .to_f64()
            .expect("numeric payload converts to f64");
        Approx::new(total_f / count, total.error_rate(), 0.0)
    }
}

/// Collects same-key tokens for multiplicative combination.
#[derive(Debug, Clone)]
pub struct CompoundTrapdoor<const N: usize> {
    components: Vec<Trapdoor<N>>,
    fingerprint: u64,
}

impl<const N: usize> CompoundTrapdoor<N> {
    /// Start an empty compound bound to one key fingerprint.
    pub fn new(fingerprint: u64) -> Self {
        CompoundTrapdoor {
            components: Vec::new(),
            fingerprint,
        }
    }

    /// Start an empty compound bound to a factory's key.
    pub fn for_factory<P: KeyedPrf>(factory: &TrapdoorFactory<N, P>) -> Self {
        Self::new(factory.fingerprint())
    }

    /// Number of collected components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True when no components have been collected.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Add a component; rejects tokens from a different key.
    pub fn push(&mut self, td: Trapdoor<N>) -> Result<(), Error> {
        if td.fingerprint() != self.fingerprint {
            return Err(Error::incompatible(self.fingerprint, td.fingerprint()));
        }
        self.components.push(td);
        Ok(())
    }

    /// Multiplicative combination: AND-fold of the component hashes.
    pub fn multiply(&self) -> Result<Trapdoor<N>, Error> {
        let mut components = self.components.iter();
        let first = components.next().ok_or(Error::EmptyCompound)?;
        let hash = components.fold(*first.hash(), |acc, td| acc & *td.hash());
        Ok(Trapdoor::from_parts(hash, self.fingerprint))
    }

    /// Whether every component satisfies `predicate`, with error
    /// `fpr = 1 - 0.99^k` compounding over the component count.
    pub fn all_satisfy(&self, predicate: impl Fn(&Trapdoor<N>) -> bool) -> ApproxBool {
        let all = self.components.iter().all(predicate);
        let fpr = 1.0 - COMPONENT_CONFIDENCE.powi(self.components.len() as i32);
        ApproxBool::new(all, fpr, 0.0)
    }
}

/// k-of-n XOR share splitting for a token's hash.
///
/// See the module docs for the canonical-subset limitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdScheme<const N: usize> {
    required: usize,
    total: usize,
}

impl<const N: usize> ThresholdScheme<N> {
    /// Build a `required`-of-`total` scheme. Fails with `InvalidThreshold`
    /// when `required` is zero or exceeds `total`.
    pub fn new(required: usize, total: usize) -> Result<Self, Error> {
        if required == 0 || required > total {
            return Err(Error::InvalidThreshold { required, total });
        }
        Ok(ThresholdScheme { required, total })
    }

    /// Shares needed to reconstruct.
    pub fn required(&self) -> usize {
        self.required
    }

    /// Shares produced by [`Self::create_shares`].
    pub fn total(&self) -> usize {
        self.total
    }

    /// Split a token's hash into `total` shares.
    ///
    /// The first `total - 1` shares are sampled from OS randomness; the
    /// last is the token hash XORed with the first `required - 1` of them.
    /// The canonical subset (the first `required - 1` shares plus the last)
    /// XORs back to the token hash.
    pub fn create_shares(&self, td: &Trapdoor<N>) -> Vec<HashWord<N>> {
        let mut shares: Vec<HashWord<N>> = (0..self.total - 1)
            .map(|_| {
                let mut bytes = [0u8; N];
                OsRng.fill_bytes(&mut bytes);
                HashWord::from_bytes(bytes)
            })
            .collect();

        let last = shares[..self.required - 1]
            .iter()
            .fold(*td.hash(), |acc, share| acc ^ *share);
        shares.push(last);
        shares
    }

    /// Reconstruct a token from at least `required` shares, XORing the
    /// first `required` given. Fails with `InsufficientShares` otherwise.
    pub fn reconstruct(
        &self,
        shares: &[HashWord<N>],
        fingerprint: u64,
    ) -> Result<Trapdoor<N>, Error> {
        if shares.len() < self.required {
            return Err(Error::InsufficientShares {
                required: self.required,
                provided: shares.len(),
            });
        }

        let hash = shares[1..self.required]
            .iter()
            .fold(shares[0], |acc, share| acc ^ *share);
        Ok(Trapdoor::from_parts(hash, fingerprint))
    }

    /// At least `required` of the given tokens satisfy `predicate`.
    ///
    /// Too few participants is a definite no (`fnr = 1`); otherwise the
    /// error reflects how far the agreement is from unanimous.
    pub fn agreement(
        &self,
        participants: &[Trapdoor<N>],
        predicate: impl Fn(&Trapdoor<N>) -> bool,
    ) -> ApproxBool {
        if participants.len() < self.required {
            return ApproxBool::new(false, 0.0, 1.0);
        }

        let agreements = participants.iter().filter(|td| predicate(td)).count();
        let confidence = agreements as f64 / participants.len() as f64;
        ApproxBool::new(agreements >= self.required, 1.0 - confidence, 0.0)
    }
}
