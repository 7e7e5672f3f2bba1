/// Keyed hashing primitives for trapdoor construction
///
/// This module implements:
/// - The [`KeyedPrf`] seam: a deterministic keyed pseudorandom function plus
///   a key fingerprint, the only cryptographic assumption the rest of the
///   crate makes
/// - [`HkdfPrf`], the default implementation (HKDF-SHA256 with versioned
///   domain separation)
/// - [`Encode`], the stable byte encoding used for every hashable value
pub mod encode;
pub mod prf;

pub use encode::Encode;
pub use prf::{HkdfPrf, KeyedPrf};
