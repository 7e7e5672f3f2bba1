//! Property-based tests for the set algebra
//!
//! Tests for:
//! - Hash words: XOR group laws, lattice laws, De Morgan
//! - Symmetric-difference sets: group laws over arbitrary member lists
//! - Boolean sets: lattice laws and the difference/sym-diff decompositions
//! - Approximate values: rate composition stays in [0, 1]

use crate::approx::{compose_rates, Approx};
use crate::hash::HashWord;
use crate::sets::boolean::BooleanSetFactory;
use crate::sets::sym_diff::SymDiffSetFactory;
use proptest::prelude::*;

fn word() -> impl Strategy<Value = HashWord<32>> {
    proptest::array::uniform32(any::<u8>()).prop_map(HashWord::from_bytes)
}

// ============================================================================
// HASH WORD LAWS
// ============================================================================

proptest! {
    /// Property: XOR is commutative, associative and self-inverse
    #[test]
    fn hash_word_xor_group_laws(a in word(), b in word(), c in word()) {
        prop_assert_eq!(a ^ b, b ^ a);
        prop_assert_eq!((a ^ b) ^ c, a ^ (b ^ c));
        prop_assert!((a ^ a).is_zero());
        prop_assert_eq!(a ^ HashWord::zero(), a);
    }

    /// Property: AND/OR are commutative and associative
    #[test]
    fn hash_word_lattice_laws(a in word(), b in word(), c in word()) {
        prop_assert_eq!(a & b, b & a);
        prop_assert_eq!(a | b, b | a);
        prop_assert_eq!((a & b) & c, a & (b & c));
        prop_assert_eq!((a | b) | c, a | (b | c));
    }

    /// Property: De Morgan and double complement
    #[test]
    fn hash_word_complement_laws(a in word(), b in word()) {
        prop_assert_eq!(!(a & b), !a | !b);
        prop_assert_eq!(!(a | b), !a & !b);
        prop_assert_eq!(!!a, a);
    }
}

// ============================================================================
// SYMMETRIC-DIFFERENCE GROUP LAWS
// ============================================================================

proptest! {
    /// Property: every set is its own inverse and the empty set is identity
    #[test]
    fn sym_diff_self_inverse(members in proptest::collection::hash_set(any::<u64>(), 0..20)) {
        let factory: SymDiffSetFactory<32> = SymDiffSetFactory::new(b"prop-key");
        let set = factory.from_unique(members.iter().copied());

        let cancelled = set.merge(&set).unwrap();
        prop_assert!(*cancelled.is_empty().value());

        let identity = set.merge(&factory.empty()).unwrap();
        prop_assert_eq!(identity, set);
    }

    /// Property: merge is commutative and associative
    #[test]
    fn sym_diff_commutes_and_associates(
        xs in proptest::collection::vec(any::<u64>(), 0..10),
        ys in proptest::collection::vec(any::<u64>(), 0..10),
        zs in proptest::collection::vec(any::<u64>(), 0..10),
    ) {
        let factory: SymDiffSetFactory<32> = SymDiffSetFactory::new(b"prop-key");
        let a = factory.from_unique(xs);
        let b = factory.from_unique(ys);
        let c = factory.from_unique(zs);

        prop_assert_eq!(a.merge(&b).unwrap(), b.merge(&a).unwrap());
        prop_assert_eq!(
            a.merge(&b).unwrap().merge(&c).unwrap(),
            a.merge(&b.merge(&c).unwrap()).unwrap()
        );
    }
}

// ============================================================================
// BOOLEAN LATTICE LAWS
// ============================================================================

proptest! {
    /// Property: difference and symmetric difference decompose into the
    /// primitive connectives
    #[test]
    fn boolean_set_decompositions(
        xs in proptest::collection::vec(any::<u32>(), 0..8),
        ys in proptest::collection::vec(any::<u32>(), 0..8),
    ) {
        let factory: BooleanSetFactory<32> = BooleanSetFactory::new(b"prop-key");
        let a = factory.from_collection(xs);
        let b = factory.from_collection(ys);

        let diff = a.difference(&b).unwrap();
        prop_assert_eq!(diff, a.intersect(&b.complement()).unwrap());

        let xor = a.sym_diff(&b).unwrap();
        let expanded = a
            .union(&b)
            .unwrap()
            .intersect(&a.intersect(&b).unwrap().complement())
            .unwrap();
        prop_assert_eq!(xor, expanded);
    }

    /// Property: union only adds bits, intersection only removes them
    #[test]
    fn boolean_set_monotone(
        xs in proptest::collection::vec(any::<u32>(), 0..8),
        ys in proptest::collection::vec(any::<u32>(), 0..8),
    ) {
        let factory: BooleanSetFactory<32> = BooleanSetFactory::new(b"prop-key");
        let a = factory.from_collection(xs);
        let b = factory.from_collection(ys);

        let union = a.union(&b).unwrap();
        let inter = a.intersect(&b).unwrap();
        prop_assert!(union.hash().count_ones() >= a.hash().count_ones());
        prop_assert!(inter.hash().count_ones() <= a.hash().count_ones());
        prop_assert!(*a.is_subset_of(&union).unwrap().value());
        prop_assert!(*inter.is_subset_of(&a).unwrap().value());
    }
}

// ============================================================================
// APPROXIMATE VALUE LAWS
// ============================================================================

proptest! {
    /// Property: rate composition maps [0,1]^2 into [0,1] and never
    /// decreases either operand
    #[test]
    fn compose_rates_bounded(e1 in 0.0f64..=1.0, e2 in 0.0f64..=1.0) {
        let e = compose_rates(e1, e2);
        prop_assert!((0.0..=1.0).contains(&e));
        prop_assert!(e >= e1 - 1e-12);
        prop_assert!(e >= e2 - 1e-12);
    }

    /// Property: double negation is an involution in value and rates
    #[test]
    fn double_negation_involution(
        value in any::<bool>(),
        fpr in 0.0f64..=1.0,
        fnr in 0.0f64..=1.0,
    ) {
        let a = Approx::new(value, fpr, fnr);
        let back = a.not().not();
        prop_assert_eq!(back.value(), a.value());
        prop_assert_eq!(back.fpr(), a.fpr());
        prop_assert_eq!(back.fnr(), a.fnr());
    }

    /// Property: conjunction composes rates componentwise
    #[test]
    fn conjunction_rate_law(
        v1 in any::<bool>(), v2 in any::<bool>(),
        f1 in 0.0f64..=1.0, f2 in 0.0f64..=1.0,
        n1 in 0.0f64..=1.0, n2 in 0.0f64..=1.0,
    ) {
        let a = Approx::new(v1, f1, n1);
        let b = Approx::new(v2, f2, n2);
        let c = a.and(&b);
        prop_assert_eq!(*c.value(), v1 && v2);
        prop_assert!((c.fpr() - compose_rates(f1, f2)).abs() < 1e-12);
        prop_assert!((c.fnr() - compose_rates(n1, n2)).abs() < 1e-12);
    }
}
