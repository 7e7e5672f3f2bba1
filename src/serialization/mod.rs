//! Binary serialization for tokens and sets
//!
//! One fixed layout for all three carrier types: `N` bytes of hash followed
//! by the 8-byte big-endian key fingerprint, `N + 8` bytes total. No
//! framing, no length prefix, no type tag, no endianness detection. Both
//! ends of the wire agree on the canonical byte order or they do not
//! interoperate. Reading and writing the bytes somewhere is the caller's
//! concern; this module only defines the layout.

use crate::error::Error;
use crate::hash::HashWord;
use crate::sets::boolean::BooleanSet;
use crate::sets::sym_diff::SymDiffSet;
use crate::trapdoor::Trapdoor;

/// Width of the trailing fingerprint field.
pub const FINGERPRINT_BYTES: usize = 8;

/// Types with the fixed `hash ∥ fingerprint` wire layout.
pub trait BinaryCodec: Sized {
    /// Exact number of bytes [`BinaryCodec::to_bytes`] produces.
    const WIRE_SIZE: usize;

    /// Serialize to the canonical layout.
    fn to_bytes(&self) -> Vec<u8>;

    /// Deserialize from the canonical layout. Fails with `TruncatedInput`
    /// when fewer than [`BinaryCodec::WIRE_SIZE`] bytes are given; extra
    /// trailing bytes are ignored.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>;
}

fn encode_parts<const N: usize>(hash: &HashWord<N>, fingerprint: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(N + FINGERPRINT_BYTES);
    out.extend_from_slice(hash.as_bytes());
    out.extend_from_slice(&fingerprint.to_be_bytes());
    out
}

fn decode_parts<const N: usize>(bytes: &[u8]) -> Result<(HashWord<N>, u64), Error> {
    let expected = N + FINGERPRINT_BYTES;
    if bytes.len() < expected {
        return Err(Error::TruncatedInput {
            expected,
            actual: bytes.len(),
        });
    }

    let mut hash = [0u8; N];
    hash.copy_from_slice(&bytes[..N]);
    let fingerprint = u64::from_be_bytes(
        bytes[N..N + FINGERPRINT_BYTES]
            .try_into()
            .expect("sliced to exactly eight bytes"),
    );
    Ok((HashWord::from_bytes(hash), fingerprint))
}

macro_rules! wire_format {
    ($($ty:ident),*) => {
        $(
            impl<const N: usize> BinaryCodec for $ty<N> {
                const WIRE_SIZE: usize = N + FINGERPRINT_BYTES;

                fn to_bytes(&self) -> Vec<u8> {
                    encode_parts(self.hash(), self.fingerprint())
                }

                fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
                    let (hash, fingerprint) = decode_parts::<N>(bytes)?;
                    Ok($ty::from_parts(hash, fingerprint))
                }
            }
        )*
    };
}

wire_format!(Trapdoor, SymDiffSet, BooleanSet);
