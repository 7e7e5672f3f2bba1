//! Boolean sets: a Bloom-filter-backed lattice
//!
//! A [`BooleanSet`] is a fixed-width Bloom filter whose bit positions are
//! derived under the secret key. The Boolean algebra lifts directly onto the
//! hash word: union is OR, intersection is AND, complement is NOT,
//! difference is `a & ~b`, symmetric difference is XOR. Membership and
//! subset tests are approximate in the usual Bloom sense: false positives
//! are possible, false negatives are not.
//!
//! ## Singleton construction
//!
//! A singleton for value `x` starts from the zero word. For each sub-hash
//! index `i` in `[0, m)` the factory derives `t_i` from the value's trapdoor
//! hash, and sets bit `i mod 8` of result byte `j` wherever the low bit of
//! `t_i[j]` is one. Deriving from the token hash (rather than the plaintext)
//! means the mask is recomputable from a token alone, which is what makes
//! [`BooleanSetFactory::contains`] free of false negatives.
//!
//! The sub-hash count `m` is a per-factory parameter. Sets built under
//! different `m` have incomparable masks; factories must only combine sets
//! they produced. The membership false-positive rate is reported as the
//! conservative constant 0.5; no density model is assumed.

use crate::approx::ApproxBool;
use crate::crypto::prf::domains;
use crate::crypto::{Encode, HkdfPrf, KeyedPrf};
use crate::error::Error;
use crate::hash::HashWord;
use crate::trapdoor::{collision_fpr, Trapdoor, TrapdoorFactory};

/// Default number of sub-hashes per singleton.
pub const DEFAULT_HASH_COUNT: usize = 3;

/// Conservative membership/subset false-positive rate.
const MEMBERSHIP_FPR: f64 = 0.5;

/// A set represented as a keyed Bloom filter over an `N`-byte word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanSet<const N: usize> {
    hash: HashWord<N>,
    fingerprint: u64,
}

impl<const N: usize> BooleanSet<N> {
    /// Reassemble a set from its wire parts.
    pub fn from_parts(hash: HashWord<N>, fingerprint: u64) -> Self {
        BooleanSet { hash, fingerprint }
    }

    /// The hash word of this set.
    pub fn hash(&self) -> &HashWord<N> {
        &self.hash
    }

    /// Fingerprint of the key this set was built under.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Union: bitwise OR.
    pub fn union(&self, other: &Self) -> Result<Self, Error> {
        self.check_compatible(other)?;
        Ok(BooleanSet {
            hash: self.hash | other.hash,
            fingerprint: self.fingerprint,
        })
    }

    /// Intersection: bitwise AND.
    pub fn intersect(&self, other: &Self) -> Result<Self, Error> {
        self.check_compatible(other)?;
        Ok(BooleanSet {
            hash: self.hash & other.hash,
            fingerprint: self.fingerprint,
        })
    }

    /// Complement: bitwise NOT.
    pub fn complement(&self) -> Self {
        BooleanSet {
            hash: !self.hash,
            fingerprint: self.fingerprint,
        }
    }

    /// Difference: `a & ~b`.
    pub fn difference(&self, other: &Self) -> Result<Self, Error> {
        self.intersect(&other.complement())
    }

    /// Symmetric difference: bitwise XOR.
    pub fn sym_diff(&self, other: &Self) -> Result<Self, Error> {
        self.check_compatible(other)?;
        Ok(BooleanSet {
            hash: self.hash ^ other.hash,
            fingerprint: self.fingerprint,
        })
    }

    /// Approximate subset test: `a ⊆ b` iff `a & b == a`.
    pub fn is_subset_of(&self, other: &Self) -> Result<ApproxBool, Error> {
        self.check_compatible(other)?;
        Ok(ApproxBool::new(
            (self.hash & other.hash) == self.hash,
            MEMBERSHIP_FPR,
            0.0,
        ))
    }

    /// Approximate emptiness test: `fpr = 2^(-8N)`, `fnr = 0`.
    pub fn is_empty(&self) -> ApproxBool {
        ApproxBool::new(self.hash.is_zero(), collision_fpr::<N>(), 0.0)
    }

    /// Approximate universality test: `fpr = 2^(-8N)`, `fnr = 0`.
    pub fn is_universal(&self) -> ApproxBool {
        ApproxBool::new(self.hash.is_ones(), collision_fpr::<N>(), 0.0)
    }

    /// Approximate equality against another set from the same key.
    pub fn equals(&self, other: &Self) -> Result<ApproxBool, Error> {
        self.check_compatible(other)?;
        Ok(ApproxBool::new(
            self.hash == other.hash,
            collision_fpr::<N>(),
            0.0,
        ))
    }

    fn check_compatible(&self, other: &Self) -> Result<(), Error> {
        if self.fingerprint != other.fingerprint {
            return Err(Error::incompatible(self.fingerprint, other.fingerprint));
        }
        Ok(())
    }
}

/// Factory for Boolean sets under one key and one sub-hash count.
pub struct BooleanSetFactory<const N: usize, P: KeyedPrf = HkdfPrf> {
    trapdoors: TrapdoorFactory<N, P>,
    hash_count: usize,
}

impl<const N: usize> BooleanSetFactory<N, HkdfPrf> {
    /// Build a factory with the default sub-hash count.
    pub fn new(key: &[u8]) -> Self {
        Self::with_hash_count(key, DEFAULT_HASH_COUNT)
    }

    /// Build a factory with an explicit sub-hash count `m >= 1`.
    pub fn with_hash_count(key: &[u8], hash_count: usize) -> Self {
        assert!(hash_count >= 1, "hash count must be at least 1");
        BooleanSetFactory {
            trapdoors: TrapdoorFactory::new(key),
            hash_count,
        }
    }
}

impl<const N: usize, P: KeyedPrf> BooleanSetFactory<N, P> {
    /// Build a factory around a caller-provided PRF.
    pub fn with_prf(prf: P, hash_count: usize) -> Self {
        assert!(hash_count >= 1, "hash count must be at least 1");
        BooleanSetFactory {
            trapdoors: TrapdoorFactory::with_prf(prf),
            hash_count,
        }
    }

    /// Fingerprint of this factory's key.
    pub fn fingerprint(&self) -> u64 {
        self.trapdoors.fingerprint()
    }

    /// Sub-hash count this factory stamps into every singleton.
    pub fn hash_count(&self) -> usize {
        self.hash_count
    }

    /// The underlying token factory.
    pub fn trapdoors(&self) -> &TrapdoorFactory<N, P> {
        &self.trapdoors
    }

    /// The empty set.
    pub fn empty(&self) -> BooleanSet<N> {
        BooleanSet {
            hash: HashWord::zero(),
            fingerprint: self.fingerprint(),
        }
    }

    /// The universal set (all bits set).
    pub fn universal(&self) -> BooleanSet<N> {
        BooleanSet {
            hash: HashWord::ones(),
            fingerprint: self.fingerprint(),
        }
    }

    /// A one-element set for `value`.
    pub fn singleton<V: Encode + ?Sized>(&self, value: &V) -> BooleanSet<N> {
        let td = self.trapdoors.create(value);
        BooleanSet {
            hash: self.member_mask(&td),
            fingerprint: self.fingerprint(),
        }
    }

    /// Build a set as the union of singletons.
    pub fn from_collection<V, I>(&self, values: I) -> BooleanSet<N>
    where
        V: Encode,
        I: IntoIterator<Item = V>,
    {
        let mut hash = HashWord::zero();
        for value in values {
            let td = self.trapdoors.create(&value);
            hash = hash | self.member_mask(&td);
        }
        BooleanSet {
            hash,
            fingerprint: self.fingerprint(),
        }
    }

    /// Approximate membership test for a token against a set this factory
    /// produced.
    ///
    /// Recomputes the mask the token's singleton would have set and checks
    /// that every bit is present. Members always pass (`fnr = 0`);
    /// non-members pass with the conservative `fpr = 0.5`.
    pub fn contains(&self, set: &BooleanSet<N>, elem: &Trapdoor<N>) -> Result<ApproxBool, Error> {
        if elem.fingerprint() != self.fingerprint() {
            return Err(Error::incompatible(self.fingerprint(), elem.fingerprint()));
        }
        if set.fingerprint() != self.fingerprint() {
            return Err(Error::incompatible(self.fingerprint(), set.fingerprint()));
        }
        let mask = self.member_mask(elem);
        Ok(ApproxBool::new(
            (mask & *set.hash()) == mask,
            MEMBERSHIP_FPR,
            0.0,
        ))
    }

    /// The Bloom mask a token's singleton occupies.
    fn member_mask(&self, elem: &Trapdoor<N>) -> HashWord<N> {
        let mut mask = [0u8; N];
        let mut payload = Vec::with_capacity(4 + N);
        for i in 0..self.hash_count {
            payload.clear();
            payload.extend_from_slice(&(i as u32).to_be_bytes());
            payload.extend_from_slice(elem.hash().as_bytes());
            let sub = self.trapdoors.derive_word(domains::BLOOM_SUBHASH, &payload);
            let bit = 1u8 << (i % 8);
            for (j, slot) in mask.iter_mut().enumerate() {
                if sub.as_bytes()[j] & 1 == 1 {
                    *slot |= bit;
                }
            }
        }
        HashWord::from_bytes(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> BooleanSetFactory<32> {
        BooleanSetFactory::new(b"demo")
    }

    #[test]
    fn test_union_and_intersection_laws() {
        let f = factory();
        let a = f.from_collection(["apple", "banana"]);
        let b = f.from_collection(["banana", "cherry"]);
        assert_eq!(a.union(&b).unwrap(), b.union(&a).unwrap());
        assert_eq!(a.intersect(&b).unwrap(), b.intersect(&a).unwrap());
    }

    #[test]
    fn test_difference_is_and_not() {
        let f = factory();
        let a = f.from_collection(["apple", "banana"]);
        let b = f.singleton("banana");
        let diff = a.difference(&b).unwrap();
        let manual = a.intersect(&b.complement()).unwrap();
        assert_eq!(diff, manual);
    }

    #[test]
    fn test_sym_diff_decomposition() {
        let f = factory();
        let a = f.from_collection(["apple", "banana"]);
        let b = f.from_collection(["banana", "cherry"]);
        let xor = a.sym_diff(&b).unwrap();
        let or_and = a
            .union(&b)
            .unwrap()
            .intersect(&a.intersect(&b).unwrap().complement())
            .unwrap();
        assert_eq!(xor, or_and, "a ^ b must equal (a|b) & ~(a&b)");
    }

    #[test]
    fn test_member_always_contained() {
        let f = factory();
        let set = f.from_collection(["apple", "banana", "cherry"]);
        let td = f.trapdoors().create("banana");
        let hit = f.contains(&set, &td).unwrap();
        assert!(*hit.value(), "members must never be reported absent");
        assert_eq!(hit.fnr(), 0.0);
        assert_eq!(hit.fpr(), 0.5);
    }

    #[test]
    fn test_empty_and_universal() {
        let f = factory();
        assert!(*f.empty().is_empty().value());
        assert!(*f.universal().is_universal().value());
        assert!(!*f.singleton("x").is_empty().value());
    }

    #[test]
    fn test_singleton_subset_of_collection() {
        let f = factory();
        let set = f.from_collection(["apple", "banana"]);
        let single = f.singleton("apple");
        assert!(*single.is_subset_of(&set).unwrap().value());
    }

    #[test]
    fn test_incompatible_keys_rejected() {
        let f = factory();
        let g: BooleanSetFactory<32> = BooleanSetFactory::new(b"other-key");
        let a = f.singleton("x");
        let b = g.singleton("x");
        assert!(matches!(a.union(&b), Err(Error::IncompatibleKey { .. })));
        assert!(matches!(
            f.contains(&b, &f.trapdoors().create("x")),
            Err(Error::IncompatibleKey { .. })
        ));
    }

    #[test]
    fn test_hash_count_changes_masks() {
        let f3 = BooleanSetFactory::<32>::with_hash_count(b"demo", 3);
        let f5 = BooleanSetFactory::<32>::with_hash_count(b"demo", 5);
        assert_ne!(f3.singleton("apple"), f5.singleton("apple"));
    }
}
