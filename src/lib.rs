//! Velum - Privacy-Preserving Trapdoor Set Primitives
//!
//! A library of set primitives built on keyed one-way hashes. A holder of a
//! secret key turns plaintext values into opaque fixed-width tokens; tokens
//! and the sets built from them support equality tests, Boolean algebra,
//! cardinality estimation, similarity search, additive aggregation and
//! k-of-n share splitting, without ever recovering the plaintext and with
//! an explicit error bound on every answer.
//!
//! Key principles:
//! - Every probabilistic answer is an [`Approx`] carrying its fpr/fnr
//! - Tokens and sets are immutable values: one hash word plus a key
//!   fingerprint
//! - Mixing material from different keys is a typed error, never silence
//! - Signature randomness derives from the key, so results reproduce
//!   across processes
//!
//! # Example
//!
//! ```rust
//! use velum::{BooleanSetFactory, TrapdoorFactory};
//!
//! let tokens: TrapdoorFactory<32> = TrapdoorFactory::new(b"demo");
//! let alice = tokens.create("Alice");
//! assert!(*alice.equals(&tokens.create("Alice")).unwrap().value());
//!
//! let sets: BooleanSetFactory<32> = BooleanSetFactory::new(b"demo");
//! let fruit = sets.from_collection(["apple", "banana", "cherry"]);
//! let banana = sets.trapdoors().create("banana");
//! assert!(*sets.contains(&fruit, &banana).unwrap().value());
//! ```

pub mod analytics;
pub mod approx;
pub mod batch;
pub mod cardinality;
pub mod config;
pub mod crypto;
pub mod error;
pub mod hash;
pub mod homomorphic;
pub mod serialization;
pub mod sets;
pub mod similarity;
pub mod trapdoor;

pub use approx::{compose_rates, Approx, ApproxBool};
pub use config::{SketchParams, ThresholdParams};
pub use crypto::{Encode, HkdfPrf, KeyedPrf};
pub use error::Error;
pub use hash::{Hash128, Hash256, Hash512, HashWord};
pub use serialization::BinaryCodec;
pub use sets::{BooleanSet, BooleanSetFactory, SymDiffSet, SymDiffSetFactory};
pub use trapdoor::{Trapdoor, Trapdoor128, Trapdoor256, Trapdoor512, TrapdoorFactory};
