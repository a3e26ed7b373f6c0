//! Capability traits.

use crate::PrimitiveError;

/// A keyed pseudorandom function with varying input and output length.
///
/// Implementations are keyed at construction and keep no other state, so a
/// single instance can be shared between threads.
pub trait Prf: Send + Sync {
    /// Fills `output` with the function's value on `input`.
    ///
    /// The output length is chosen by the caller. Variants with a bounded
    /// output length return [`PrimitiveError::OutputTooLong`].
    fn compute(&self, input: &[u8], output: &mut [u8]) -> Result<(), PrimitiveError>;
}

/// A seeded pseudorandom generator.
pub trait Prg {
    /// Seed length in bytes this generator requires.
    fn seed_len(&self) -> usize;

    /// Seeds (or re-seeds) the generator, restarting its output stream.
    fn seed(&mut self, seed: &[u8]) -> Result<(), PrimitiveError>;

    /// Fills `out` with the next bytes of the stream.
    ///
    /// Fails with [`PrimitiveError::Unseeded`] if [`Prg::seed`] was never
    /// called.
    fn fill_bytes(&mut self, out: &mut [u8]) -> Result<(), PrimitiveError>;
}

/// An incremental cryptographic hash with a fixed output size.
pub trait CryptographicHash {
    /// Digest size in bytes.
    fn output_len(&self) -> usize;

    /// Absorbs `data`.
    fn update(&mut self, data: &[u8]);

    /// Returns the digest of everything absorbed so far and resets the state
    /// so the instance can be reused.
    fn finalize_reset(&mut self) -> Vec<u8>;
}

impl<T: Prf + ?Sized> Prf for &T {
    fn compute(&self, input: &[u8], output: &mut [u8]) -> Result<(), PrimitiveError> {
        (**self).compute(input, output)
    }
}

impl<T: Prg + ?Sized> Prg for &mut T {
    fn seed_len(&self) -> usize {
        (**self).seed_len()
    }

    fn seed(&mut self, seed: &[u8]) -> Result<(), PrimitiveError> {
        (**self).seed(seed)
    }

    fn fill_bytes(&mut self, out: &mut [u8]) -> Result<(), PrimitiveError> {
        (**self).fill_bytes(out)
    }
}

impl<T: CryptographicHash + ?Sized> CryptographicHash for &mut T {
    fn output_len(&self) -> usize {
        (**self).output_len()
    }

    fn update(&mut self, data: &[u8]) {
        (**self).update(data)
    }

    fn finalize_reset(&mut self) -> Vec<u8> {
        (**self).finalize_reset()
    }
}
