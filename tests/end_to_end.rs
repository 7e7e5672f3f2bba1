//! End-to-end scenarios across the whole primitive stack
//!
//! Exercises the library the way a deployment would: one secret key, the
//! default parameters (256-bit words, 3 Bloom sub-hashes, 128 MinHash
//! coordinates, 20x5 LSH banding), flows crossing several modules:
//! 1. Token equality with collision-bounded error
//! 2. XOR-set self-cancellation
//! 3. Bloom membership: no false negatives, bounded false positives
//! 4. Cardinality estimation across load levels, including the
//!    word-saturating regime (1000-element XOR set)
//! 5. Similarity against a known 100/60 overlap: word-level saturation on
//!    the Boolean filters, true-overlap resolution through MinHash
//! 6. Threshold share splitting and reconstruction

use velum::cardinality::{adaptive_estimate, hll_estimate, linear_count};
use velum::homomorphic::{SecureAggregator, ThresholdScheme};
use velum::similarity::minhash::MinHasher;
use velum::similarity::{boolean_jaccard, signature_similarity};
use velum::{BooleanSetFactory, Error, SymDiffSetFactory, TrapdoorFactory};

const KEY: &[u8] = b"demo";

#[test]
fn test_token_equality_flow() {
    let factory: TrapdoorFactory<32> = TrapdoorFactory::new(KEY);
    let alice = factory.create("Alice");
    let bob = factory.create("Bob");
    let alice_again = factory.create("Alice");

    let same = alice.equals(&alice_again).unwrap();
    assert!(*same.value());
    assert!(same.fpr() <= 2f64.powi(-256), "collision bound is 2^-256");
    assert_eq!(same.fnr(), 0.0);

    assert!(!*alice.equals(&bob).unwrap().value());
}

#[test]
fn test_xor_set_cancels_itself() {
    let factory: SymDiffSetFactory<32> = SymDiffSetFactory::new(KEY);
    let set = factory.from_unique([10, 20, 30]);

    let cancelled = set.merge(&set).unwrap();
    let verdict = cancelled.is_empty();
    assert!(*verdict.value(), "s ^ s must be the empty set");
    assert!(verdict.fpr() <= 2f64.powi(-256));
}

#[test]
fn test_bloom_membership_has_no_false_negatives() {
    let factory: BooleanSetFactory<32> = BooleanSetFactory::new(KEY);
    let set = factory.from_collection(["apple", "banana", "cherry"]);

    for member in ["apple", "banana", "cherry"] {
        let td = factory.trapdoors().create(member);
        let verdict = factory.contains(&set, &td).unwrap();
        assert!(*verdict.value(), "{member} must be reported present");
        assert_eq!(verdict.fnr(), 0.0);
    }
}

#[test]
fn test_bloom_false_positive_rate_within_bound() {
    let factory: BooleanSetFactory<32> = BooleanSetFactory::new(KEY);
    let set = factory.from_collection(["apple", "banana", "cherry"]);

    let mut hits = 0usize;
    let trials = 1000usize;
    for i in 0..trials {
        let outsider = factory.trapdoors().create(&format!("non-member-{i}"));
        if *factory.contains(&set, &outsider).unwrap().value() {
            hits += 1;
        }
    }
    let observed = hits as f64 / trials as f64;
    assert!(
        observed <= 0.5,
        "observed false-positive rate {observed} above the reported bound"
    );
}

#[test]
fn test_cardinality_estimates_track_load() {
    let factory: BooleanSetFactory<32> = BooleanSetFactory::new(KEY);

    // Estimates grow with membership while the filter has headroom.
    let small = factory.from_collection(0u32..2);
    let large = factory.from_collection(0u32..6);
    let est_small = linear_count(small.hash());
    let est_large = linear_count(large.hash());
    assert!(est_small.value() < est_large.value());

    // The adaptive selector keeps linear counting below its cutoff and
    // reports HyperLogLog's constant error above it.
    let sparse = factory.singleton("one");
    assert_eq!(
        adaptive_estimate(sparse.hash()).value(),
        linear_count(sparse.hash()).value()
    );

    let saturated = factory.universal();
    let est = adaptive_estimate(saturated.hash());
    assert_eq!(est.value(), hll_estimate(saturated.hash()).value());
    assert!((est.error_rate() - 0.13).abs() < 0.005);
}

#[test]
fn test_thousand_element_xor_set_estimate_is_word_bounded() {
    let factory: SymDiffSetFactory<32> = SymDiffSetFactory::new(KEY);
    let set = factory.from_unique(0u64..1000);

    // 1000 members exceed what a 256-bit XOR word can resolve: the word is
    // indistinguishable from random, the adaptive selector rejects linear
    // counting, and the HyperLogLog path reports its constant error.
    let est = adaptive_estimate(set.hash());
    assert_eq!(est.value(), hll_estimate(set.hash()).value());
    assert!((est.error_rate() - 0.13).abs() < 0.005);
    assert!(*est.value() > 0.0);
    assert!(
        *est.value() <= 256.0,
        "estimate {} cannot exceed the word's bit width",
        est.value()
    );
}

#[test]
fn test_hundred_element_boolean_sets_saturate_the_filter() {
    // 60 shared of 140 total, true Jaccard ≈ 0.429. At this load every
    // byte has all three sub-hash bits set, so both filters collapse to
    // the same saturated mask and the word-level estimate pins at 1.0;
    // test_minhash_tracks_known_overlap resolves the same populations to
    // the true overlap via signatures.
    let factory: BooleanSetFactory<32> = BooleanSetFactory::new(KEY);
    let a = factory.from_collection(0u32..100);
    let b = factory.from_collection(40u32..140);

    assert_eq!(
        a.union(&b).unwrap(),
        a.intersect(&b).unwrap(),
        "100-element filters saturate to one mask"
    );

    let j = boolean_jaccard(&a, &b).unwrap();
    assert!((0.0..=1.0).contains(j.value()));
    assert!(
        *j.value() >= 0.9,
        "saturated filters must read as near-identical, got {}",
        j.value()
    );
}

#[test]
fn test_jaccard_estimates_stay_in_unit_interval() {
    let factory: BooleanSetFactory<32> = BooleanSetFactory::new(KEY);
    let a = factory.from_collection(0u32..5);
    let b = factory.from_collection(3u32..8);

    let j = boolean_jaccard(&a, &b).unwrap();
    assert!((0.0..=1.0).contains(j.value()));
    assert_eq!(*boolean_jaccard(&a, &a).unwrap().value(), 1.0);
}

#[test]
fn test_minhash_tracks_known_overlap() {
    // 60 shared items out of 140 total: true Jaccard ≈ 0.429.
    let hasher: MinHasher<32> = MinHasher::new(KEY);
    let sig_a = hasher.sign(0u32..100);
    let sig_b = hasher.sign(40u32..140);

    let sim = signature_similarity(&sig_a, &sig_b).unwrap();
    assert!(
        (0.3..=0.7).contains(sim.value()),
        "estimate {} too far from true 0.43",
        sim.value()
    );
    assert!(sim.error_rate() < 0.1, "128 coordinates keep sigma small");
}

#[test]
fn test_aggregation_flow() {
    let aggregator: SecureAggregator<32> = SecureAggregator::new(KEY);
    let readings = vec![12i64, 7, 23, 8];

    let total = aggregator.sum(readings.clone());
    assert_eq!(*total.value(), 50);
    assert!(total.error_rate() > 0.0, "aggregation reports its uncertainty");

    let mean = aggregator.mean(readings);
    assert!((mean.value() - 12.5).abs() < 1e-12);
}

#[test]
fn test_threshold_share_lifecycle() {
    let factory: TrapdoorFactory<32> = TrapdoorFactory::new(KEY);
    let scheme = ThresholdScheme::<32>::new(3, 5).unwrap();
    let secret = factory.create("secret");

    let shares = scheme.create_shares(&secret);
    assert_eq!(shares.len(), 5);

    // The canonical subset (first k-1 shares plus the last) reconstructs.
    let canonical = [shares[0], shares[1], shares[4]];
    let restored = scheme.reconstruct(&canonical, factory.fingerprint()).unwrap();
    assert_eq!(restored.hash(), secret.hash());
    assert!(*restored.equals(&secret).unwrap().value());

    // Two shares are not enough.
    assert_eq!(
        scheme.reconstruct(&shares[..2], factory.fingerprint()),
        Err(Error::InsufficientShares {
            required: 3,
            provided: 2
        })
    );
}

#[test]
fn test_foreign_key_material_is_rejected_everywhere() {
    let ours: TrapdoorFactory<32> = TrapdoorFactory::new(KEY);
    let theirs: TrapdoorFactory<32> = TrapdoorFactory::new(b"someone-else");

    let mine = ours.create("value");
    let other = theirs.create("value");
    assert!(matches!(
        mine.equals(&other),
        Err(Error::IncompatibleKey { .. })
    ));

    let our_sets: SymDiffSetFactory<32> = SymDiffSetFactory::new(KEY);
    let their_sets: SymDiffSetFactory<32> = SymDiffSetFactory::new(b"someone-else");
    assert!(matches!(
        our_sets.singleton("x").merge(&their_sets.singleton("x")),
        Err(Error::IncompatibleKey { .. })
    ));
}
