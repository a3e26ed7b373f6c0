//! Cryptographic capabilities consumed by the seed garbling engine.
//!
//! The engine never talks to a concrete algorithm directly. It is handed
//! values implementing [`Prf`], [`Prg`] and [`CryptographicHash`], which are
//! selected by name at the configuration boundary through [`PrfAlgorithm`],
//! [`PrgAlgorithm`] and [`HashAlgorithm`].

mod error;
pub mod feistel;
pub mod hash;
pub mod kdf;
pub mod prf;
pub mod prg;
pub mod traits;

pub use error::PrimitiveError;
pub use feistel::{FeistelError, LubyRackoffPrp};
pub use hash::{AnyHash, Blake3Hash, HashAlgorithm, Sha256Hash};
pub use prf::{AnyPrf, Blake3Prf, HmacSha256Prf, PrfAlgorithm};
pub use prg::{Aes128CtrPrg, AnyPrg, ChaCha20Prg, PrgAlgorithm};
pub use traits::{CryptographicHash, Prf, Prg};

/// XORs `other` into `dst` byte by byte.
///
/// Only the common prefix of the two slices is touched.
#[inline]
pub fn xor_in_place(dst: &mut [u8], other: &[u8]) {
    for (d, o) in dst.iter_mut().zip(other) {
        *d ^= o;
    }
}
