//! Symmetric-difference sets: an abelian group under XOR
//!
//! The hash of a set built from distinct items `x1..xk` is
//! `F(key, x1) ^ ... ^ F(key, xk)`. XOR gives the group laws for free:
//! commutative, associative, the zero word is the identity, and every set is
//! its own inverse. The price is a narrow interface: only symmetric
//! difference, equality and emptiness are meaningful.
//!
//! The empty set is a universal identity: it carries fingerprint 0 and
//! adopts the peer's fingerprint on first combine, so `SymDiffSet::empty()`
//! works as a fold accumulator without knowing the key in advance.

use crate::approx::ApproxBool;
use crate::crypto::{Encode, HkdfPrf, KeyedPrf};
use crate::error::Error;
use crate::hash::HashWord;
use crate::trapdoor::{collision_fpr, Trapdoor, TrapdoorFactory};

/// A set represented as the XOR of its members' trapdoor hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymDiffSet<const N: usize> {
    hash: HashWord<N>,
    fingerprint: u64,
}

impl<const N: usize> SymDiffSet<N> {
    /// The empty set: zero hash, fingerprint 0. Identity under XOR with any
    /// peer; adopts the peer's fingerprint on first combine.
    pub fn empty() -> Self {
        SymDiffSet {
            hash: HashWord::zero(),
            fingerprint: 0,
        }
    }

    /// Reassemble a set from its wire parts.
    pub fn from_parts(hash: HashWord<N>, fingerprint: u64) -> Self {
        SymDiffSet { hash, fingerprint }
    }

    /// The hash word of this set.
    pub fn hash(&self) -> &HashWord<N> {
        &self.hash
    }

    /// Fingerprint of the key this set was built under (0 for the empty
    /// identity).
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// XOR-accumulate a single token into this set.
    ///
    /// Adding a member toggles it: inserting the same element twice cancels
    /// it out, which is the group law, not a bug.
    pub fn insert(&mut self, elem: &Trapdoor<N>) -> Result<(), Error> {
        if self.fingerprint != 0 && elem.fingerprint() != self.fingerprint {
            return Err(Error::incompatible(self.fingerprint, elem.fingerprint()));
        }
        self.fingerprint = elem.fingerprint();
        self.hash = self.hash ^ *elem.hash();
        Ok(())
    }

    /// Symmetric difference with another set. For disjoint sets this is the
    /// union.
    pub fn merge(&self, other: &Self) -> Result<Self, Error> {
        let fingerprint = self.combined_fingerprint(other)?;
        Ok(SymDiffSet {
            hash: self.hash ^ other.hash,
            fingerprint,
        })
    }

    /// Approximate emptiness test: `fpr = 2^(-8N)`, `fnr = 0`.
    pub fn is_empty(&self) -> ApproxBool {
        ApproxBool::new(self.hash.is_zero(), collision_fpr::<N>(), 0.0)
    }

    /// Approximate equality against another set from the same key.
    pub fn equals(&self, other: &Self) -> Result<ApproxBool, Error> {
        self.combined_fingerprint(other)?;
        Ok(ApproxBool::new(
            self.hash == other.hash,
            collision_fpr::<N>(),
            0.0,
        ))
    }

    /// Fingerprint the combination carries: the empty identity absorbs the
    /// peer's fingerprint; two concrete fingerprints must match.
    fn combined_fingerprint(&self, other: &Self) -> Result<u64, Error> {
        match (self.fingerprint, other.fingerprint) {
            (0, fp) => Ok(fp),
            (fp, 0) => Ok(fp),
            (a, b) if a == b => Ok(a),
            (a, b) => Err(Error::incompatible(a, b)),
        }
    }
}

impl<const N: usize> Default for SymDiffSet<N> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Factory for symmetric-difference sets under one key.
pub struct SymDiffSetFactory<const N: usize, P: KeyedPrf = HkdfPrf> {
    trapdoors: TrapdoorFactory<N, P>,
}

impl<const N: usize> SymDiffSetFactory<N, HkdfPrf> {
    /// Build a factory from opaque secret key bytes.
    pub fn new(key: &[u8]) -> Self {
        SymDiffSetFactory {
            trapdoors: TrapdoorFactory::new(key),
        }
    }
}

impl<const N: usize, P: KeyedPrf> SymDiffSetFactory<N, P> {
    /// Build a factory around a caller-provided PRF.
    pub fn with_prf(prf: P) -> Self {
        SymDiffSetFactory {
            trapdoors: TrapdoorFactory::with_prf(prf),
        }
    }

    /// Fingerprint of this factory's key.
    pub fn fingerprint(&self) -> u64 {
        self.trapdoors.fingerprint()
    }

    /// The underlying token factory, for callers that need raw tokens.
    pub fn trapdoors(&self) -> &TrapdoorFactory<N, P> {
        &self.trapdoors
    }

    /// The empty set.
    pub fn empty(&self) -> SymDiffSet<N> {
        SymDiffSet::empty()
    }

    /// A one-element set.
    pub fn singleton<V: Encode + ?Sized>(&self, value: &V) -> SymDiffSet<N> {
        let td = self.trapdoors.create(value);
        SymDiffSet {
            hash: *td.hash(),
            fingerprint: td.fingerprint(),
        }
    }

    /// Build a set from values that are pairwise distinct.
    ///
    /// Duplicates cancel silently under the group law; supplying them is a
    /// contract violation by the caller, not a detectable error.
    pub fn from_unique<V, I>(&self, values: I) -> SymDiffSet<N>
    where
        V: Encode,
        I: IntoIterator<Item = V>,
    {
        let mut hash = HashWord::zero();
        for value in values {
            hash = hash ^ *self.trapdoors.create(&value).hash();
        }
        SymDiffSet {
            hash,
            fingerprint: self.fingerprint(),
        }
    }
}
