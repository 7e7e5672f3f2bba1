//! Cosine similarity over hash words as byte vectors

use crate::approx::Approx;
use crate::error::Error;
use crate::hash::HashWord;
use crate::trapdoor::Trapdoor;

/// Cosine similarity of two hash words, treating each byte as a real in
/// `[0, 255]`. Returns 0 when either vector has zero norm. The reported
/// error is the resolution bound `1/(8N)`.
pub fn cosine<const N: usize>(a: &HashWord<N>, b: &HashWord<N>) -> Approx<f64> {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for (&x, &y) in a.as_bytes().iter().zip(b.as_bytes()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Approx::exact(0.0);
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    Approx::new(similarity, 1.0 / (N as f64 * 8.0), 0.0)
}

/// Cosine similarity of two tokens from the same key.
pub fn trapdoor_cosine<const N: usize>(
    a: &Trapdoor<N>,
    b: &Trapdoor<N>,
) -> Result<Approx<f64>, Error> {
    if !a.is_compatible(b) {
        return Err(Error::incompatible(a.fingerprint(), b.fingerprint()));
    }
    Ok(cosine(a.hash(), b.hash()))
}
