/// Similarity estimation over trapdoored values and sets
///
/// Four estimators with different accuracy/cost trade-offs:
/// - [`jaccard`]: reads set overlap straight off the hash words
/// - [`minhash`]: per-value signatures; the accurate choice for Jaccard
///   similarity between collections
/// - [`lsh`]: banded signatures for cheap approximate similarity lookup
/// - [`cosine`]: treats hash words as byte vectors
///
/// Signature randomness is derived from the key fingerprint, never from a
/// process-wide RNG, so the same key produces the same signatures across
/// runs and machines.
pub mod cosine;
pub mod jaccard;
pub mod lsh;
pub mod minhash;

pub use cosine::{cosine, trapdoor_cosine};
pub use jaccard::{boolean_jaccard, sym_diff_jaccard};
pub use lsh::{LshIndex, LshSignature};
pub use minhash::{signature_similarity, MinHashSignature, MinHasher};
