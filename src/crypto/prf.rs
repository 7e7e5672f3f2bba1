//! Keyed pseudorandom function behind the trapdoor construction
//!
//! All key material flows through one seam: a [`KeyedPrf`] turns
//! `(domain, value)` pairs into pseudorandom bytes and exposes a short key
//! fingerprint for compatibility checks. Everything above this module is
//! agnostic to the hash algorithm; it relies only on determinism (same key,
//! same input, same output) and pseudorandomness (outputs under different
//! keys are independent).
//!
//! ## Key Derivation
//!
//! The default [`HkdfPrf`] follows the derivation hierarchy pattern:
//!
//! ```text
//! secret key bytes
//!         │
//!         ▼
//! HKDF-SHA256(salt="velum-prf-v1", key)
//!         │
//!         ├─► expand("prf-master")      → 32-byte master (zeroized on drop)
//!         └─► expand("key-fingerprint") → u64 fingerprint
//! ```
//!
//! Per-value derivations then expand the master with the caller's domain
//! string and encoded value. Domain strings keep the trapdoor, Bloom
//! sub-hash and MinHash coordinate spaces independent of each other.
//!
//! ## Security Properties
//!
//! - **Determinism**: same key and input always produce the same output
//! - **Key isolation**: different keys produce unrelated outputs
//! - **Zeroization**: the derived master key is cleared on drop
//! - **Fingerprint is not a secret**: it only gates compatibility checks

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

/// Domain separation salt for master derivation (versioned for rotation)
const PRF_SALT: &[u8] = b"velum-prf-v1";

/// HKDF info strings for the fixed derivation purposes
pub(crate) mod domains {
    pub const PRF_MASTER: &[u8] = b"prf-master";
    pub const FINGERPRINT: &[u8] = b"key-fingerprint";
    pub const TRAPDOOR: &[u8] = b"trapdoor-value";
    pub const BLOOM_SUBHASH: &[u8] = b"bloom-subhash";
    pub const MINHASH: &[u8] = b"minhash-coordinate";
}

/// A deterministic keyed pseudorandom function with a key fingerprint.
///
/// Implementations may use any collision-resistant keyed hash. The crate
/// never depends on the algorithm beyond determinism and pseudorandomness.
pub trait KeyedPrf {
    /// Fill `out` with pseudorandom bytes derived from `(domain, value)`
    /// under this key.
    fn fill(&self, domain: &[u8], value: &[u8], out: &mut [u8]);

    /// Short identifier of the key, used solely for compatibility checks
    /// between tokens and sets. Never zero; never a secret.
    fn fingerprint(&self) -> u64;
}

/// Default PRF: HKDF-SHA256 with a versioned salt and domain separation.
pub struct HkdfPrf {
    /// 32-byte master derived from the secret key; zeroized on drop
    master: [u8; 32],
    fingerprint: u64,
}

impl Drop for HkdfPrf {
    fn drop(&mut self) {
        self.master.zeroize();
    }
}

impl HkdfPrf {
    /// Derive the PRF state from opaque secret key bytes.
    ///
    /// The key itself is not stored; only the expanded master survives, and
    /// it is cleared when the PRF is dropped.
    pub fn new(key: &[u8]) -> Self {
        let hkdf = Hkdf::<Sha256>::new(Some(PRF_SALT), key);

        let mut master = [0u8; 32];
        hkdf.expand(domains::PRF_MASTER, &mut master)
            .expect("HKDF expand should never fail with valid length");

        let mut fp_bytes = [0u8; 8];
        hkdf.expand(domains::FINGERPRINT, &mut fp_bytes)
            .expect("HKDF expand should never fail with valid length");
        let raw = u64::from_be_bytes(fp_bytes);
        // 0 is reserved as the fingerprint of the empty-set identity.
        let fingerprint = if raw == 0 { 1 } else { raw };

        HkdfPrf {
            master,
            fingerprint,
        }
    }
}

impl KeyedPrf for HkdfPrf {
    fn fill(&self, domain: &[u8], value: &[u8], out: &mut [u8]) {
        let hkdf = Hkdf::<Sha256>::from_prk(&self.master)
            .expect("32-byte master is a valid PRK for SHA-256");
        hkdf.expand_multi_info(&[domain, value], out)
            .expect("HKDF expand should never fail with valid length");
    }

    fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}
