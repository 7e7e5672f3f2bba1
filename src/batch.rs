//! Batch operations over slices of tokens and sets
//!
//! Thin sweeps and folds used by callers processing many values at once.
//! All errors are detected up front: a size mismatch or an incompatible
//! fingerprint fails the whole batch before any result is produced.

use crate::approx::ApproxBool;
use crate::crypto::{Encode, KeyedPrf};
use crate::error::Error;
use crate::sets::boolean::{BooleanSet, BooleanSetFactory};
use crate::sets::sym_diff::SymDiffSet;
use crate::trapdoor::{Trapdoor, TrapdoorFactory};

/// Create a token per value.
pub fn create_trapdoors<const N: usize, P, V>(
    factory: &TrapdoorFactory<N, P>,
    values: &[V],
) -> Vec<Trapdoor<N>>
where
    P: KeyedPrf,
    V: Encode,
{
    values.iter().map(|v| factory.create(v)).collect()
}

/// Pairwise approximate equality of two equal-length token slices.
pub fn equals_pairwise<const N: usize>(
    left: &[Trapdoor<N>],
    right: &[Trapdoor<N>],
) -> Result<Vec<ApproxBool>, Error> {
    if left.len() != right.len() {
        return Err(Error::SizeMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    left.iter()
        .zip(right)
        .map(|(l, r)| l.equals(r))
        .collect()
}

/// XOR-fold a slice of symmetric-difference sets. The empty slice folds to
/// the empty identity.
pub fn union_sym_diff<const N: usize>(sets: &[SymDiffSet<N>]) -> Result<SymDiffSet<N>, Error> {
    sets.iter()
        .try_fold(SymDiffSet::empty(), |acc, set| acc.merge(set))
}

/// AND-fold a slice of Boolean sets. Returns `None` for the empty slice:
/// there is no key-free universal identity to start from.
pub fn intersect_boolean<const N: usize>(
    sets: &[BooleanSet<N>],
) -> Result<Option<BooleanSet<N>>, Error> {
    let mut iter = sets.iter();
    let first = match iter.next() {
        Some(first) => *first,
        None => return Ok(None),
    };
    iter.try_fold(first, |acc, set| acc.intersect(set)).map(Some)
}

/// Membership sweep: test every token against one set.
pub fn contains_each<const N: usize, P: KeyedPrf>(
    factory: &BooleanSetFactory<N, P>,
    set: &BooleanSet<N>,
    elements: &[Trapdoor<N>],
) -> Result<Vec<ApproxBool>, Error> {
    elements
        .iter()
        .map(|elem| factory.contains(set, elem))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sets::sym_diff::SymDiffSetFactory;

    #[test]
    fn test_create_and_compare() {
        let factory: TrapdoorFactory<32> = TrapdoorFactory::new(b"demo");
        let left = create_trapdoors(&factory, &["a", "b", "c"]);
        let right = create_trapdoors(&factory, &["a", "x", "c"]);
        let verdicts = equals_pairwise(&left, &right).unwrap();
        assert_eq!(
            verdicts.iter().map(|v| *v.value()).collect::<Vec<_>>(),
            vec![true, false, true]
        );
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let factory: TrapdoorFactory<32> = TrapdoorFactory::new(b"demo");
        let left = create_trapdoors(&factory, &["a", "b"]);
        let right = create_trapdoors(&factory, &["a"]);
        assert_eq!(
            equals_pairwise(&left, &right).unwrap_err(),
            Error::SizeMismatch { left: 2, right: 1 }
        );
    }

    #[test]
    fn test_union_fold_matches_flat_build() {
        let factory: SymDiffSetFactory<32> = SymDiffSetFactory::new(b"demo");
        let parts = [
            factory.from_unique([1u64, 2]),
            factory.from_unique([3u64]),
            factory.from_unique([4u64, 5]),
        ];
        let folded = union_sym_diff(&parts).unwrap();
        let flat = factory.from_unique([1u64, 2, 3, 4, 5]);
        assert_eq!(folded, flat);
    }

    #[test]
    fn test_union_fold_of_nothing_is_empty() {
        let folded = union_sym_diff::<32>(&[]).unwrap();
        assert!(*folded.is_empty().value());
    }

    #[test]
    fn test_intersect_fold() {
        let factory: BooleanSetFactory<32> = BooleanSetFactory::new(b"demo");
        let sets = [
            factory.from_collection(["a", "b", "c"]),
            factory.from_collection(["b", "c", "d"]),
        ];
        let folded = intersect_boolean(&sets).unwrap().unwrap();
        assert_eq!(folded, sets[0].intersect(&sets[1]).unwrap());
        assert!(intersect_boolean::<32>(&[]).unwrap().is_none());
    }

    #[test]
    fn test_membership_sweep() {
        let factory: BooleanSetFactory<32> = BooleanSetFactory::new(b"demo");
        let set = factory.from_collection(["a", "b"]);
        let elems = create_trapdoors(factory.trapdoors(), &["a", "b"]);
        let verdicts = contains_each(&factory, &set, &elems).unwrap();
        assert!(verdicts.iter().all(|v| *v.value()));
    }

    #[test]
    fn test_fold_rejects_mixed_keys() {
        let f: SymDiffSetFactory<32> = SymDiffSetFactory::new(b"demo");
        let g: SymDiffSetFactory<32> = SymDiffSetFactory::new(b"other");
        let sets = [f.singleton("x"), g.singleton("y")];
        assert!(matches!(
            union_sym_diff(&sets),
            Err(Error::IncompatibleKey { .. })
        ));
    }
}
