//! Luby-Rackoff pseudorandom permutation over even-length byte strings.
//!
//! A balanced four-round Feistel network whose round function is any
//! varying-length [`Prf`]. There is a distinct permutation for every even
//! input length, so nothing about the block size needs to travel with the
//! data.
//!
//! ```text
//! L0 || R0 = x, |L0| = |R0| = L
//! for i in 1..=4:
//!     Li = R(i-1)
//!     Ri = L(i-1) ^ PRF(k, R(i-1) || i, L)
//! return L4 || R4
//! ```
//!
//! The round index is appended to the round function input as one trailing
//! byte. This keeps the encoding compatible with existing implementations and
//! caps the network at 255 rounds.

use crate::{PrimitiveError, traits::Prf, xor_in_place};

/// Number of Feistel rounds.
pub const ROUNDS: u8 = 4;

/// Errors from the Feistel PRP.
#[derive(Debug, thiserror::Error)]
pub enum FeistelError {
    /// The block length is odd.
    #[error("length of input must be even, got {0}")]
    InvalidBlockSize(usize),
    /// An offset and length do not describe a range inside a buffer.
    #[error("wrong offset for the given {buffer} buffer: {offset}+{len} exceeds {size}")]
    OutOfRange {
        /// Which buffer was addressed ("input" or "output").
        buffer: &'static str,
        /// Requested start offset.
        offset: usize,
        /// Requested length.
        len: usize,
        /// Actual buffer size.
        size: usize,
    },
    /// A fixed block size was requested from the varying-length PRP.
    #[error("varying-length prp has no fixed block size")]
    NoFixedBlockSize,
    /// The round function failed.
    #[error("round function failed: {0}")]
    Prf(#[from] PrimitiveError),
}

fn check_range(
    buffer: &'static str,
    size: usize,
    offset: usize,
    len: usize,
) -> Result<(), FeistelError> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(FeistelError::OutOfRange {
            buffer,
            offset,
            len,
            size,
        }),
    }
}

/// Four-round Luby-Rackoff PRP built on a varying-length PRF.
#[derive(Debug, Clone)]
pub struct LubyRackoffPrp<P> {
    prf: P,
}

impl<P: Prf> LubyRackoffPrp<P> {
    /// Wraps a keyed PRF.
    pub fn new(prf: P) -> Self {
        Self { prf }
    }

    /// The underlying round function.
    pub fn prf(&self) -> &P {
        &self.prf
    }

    /// Always fails: this construction accepts any even length.
    pub fn block_size(&self) -> Result<usize, FeistelError> {
        Err(FeistelError::NoFixedBlockSize)
    }

    /// Permutes `input[in_off..in_off + len]` into
    /// `output[out_off..out_off + len]`.
    ///
    /// The output range is only written once every round has succeeded.
    pub fn permute(
        &self,
        input: &[u8],
        in_off: usize,
        output: &mut [u8],
        out_off: usize,
        len: usize,
    ) -> Result<(), FeistelError> {
        let (mut left, mut right) = split_block(input, in_off, output.len(), out_off, len)?;
        let half = left.len();
        let mut scratch = vec![0u8; half];

        for round in 1..=ROUNDS {
            // scratch = L ^ PRF(R || i)
            right.push(round);
            self.prf.compute(&right, &mut scratch)?;
            right.truncate(half);
            xor_in_place(&mut scratch, &left);

            // (L, R) = (R, scratch), recycling the old left half as scratch
            std::mem::swap(&mut left, &mut right);
            std::mem::swap(&mut right, &mut scratch);
        }

        join_block(output, out_off, &left, &right);
        Ok(())
    }

    /// Inverts [`permute`](Self::permute) over the same ranges.
    pub fn invert(
        &self,
        input: &[u8],
        in_off: usize,
        output: &mut [u8],
        out_off: usize,
        len: usize,
    ) -> Result<(), FeistelError> {
        let (mut left, mut right) = split_block(input, in_off, output.len(), out_off, len)?;
        let half = left.len();
        let mut scratch = vec![0u8; half];

        for round in (1..=ROUNDS).rev() {
            // scratch = R ^ PRF(L || i), the previous left half
            left.push(round);
            self.prf.compute(&left, &mut scratch)?;
            left.truncate(half);
            xor_in_place(&mut scratch, &right);

            // (L, R) = (scratch, L)
            std::mem::swap(&mut right, &mut left);
            std::mem::swap(&mut left, &mut scratch);
        }

        join_block(output, out_off, &left, &right);
        Ok(())
    }

    /// Permutes a whole block into a new buffer.
    pub fn permute_block(&self, block: &[u8]) -> Result<Vec<u8>, FeistelError> {
        let mut out = vec![0u8; block.len()];
        self.permute(block, 0, &mut out, 0, block.len())?;
        Ok(out)
    }

    /// Inverts a whole block into a new buffer.
    pub fn invert_block(&self, block: &[u8]) -> Result<Vec<u8>, FeistelError> {
        let mut out = vec![0u8; block.len()];
        self.invert(block, 0, &mut out, 0, block.len())?;
        Ok(out)
    }
}

/// Validates the ranges and copies the two input halves out. The right half
/// gets one spare byte of capacity for the round index.
fn split_block(
    input: &[u8],
    in_off: usize,
    out_size: usize,
    out_off: usize,
    len: usize,
) -> Result<(Vec<u8>, Vec<u8>), FeistelError> {
    check_range("input", input.len(), in_off, len)?;
    check_range("output", out_size, out_off, len)?;
    if len % 2 != 0 {
        return Err(FeistelError::InvalidBlockSize(len));
    }

    let half = len / 2;
    let left = input[in_off..in_off + half].to_vec();
    let mut right = Vec::with_capacity(half + 1);
    right.extend_from_slice(&input[in_off + half..in_off + len]);
    Ok((left, right))
}

fn join_block(output: &mut [u8], out_off: usize, left: &[u8], right: &[u8]) {
    let half = left.len();
    output[out_off..out_off + half].copy_from_slice(left);
    output[out_off + half..out_off + 2 * half].copy_from_slice(right);
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{Blake3Prf, HmacSha256Prf};

    fn prp() -> LubyRackoffPrp<Blake3Prf> {
        LubyRackoffPrp::new(Blake3Prf::new(&[0x42; 32]).unwrap())
    }

    /// Straight transcription of the round equations, without buffer reuse.
    fn reference_permute<P: Prf>(prf: &P, x: &[u8]) -> Vec<u8> {
        let half = x.len() / 2;
        let (mut l, mut r) = (x[..half].to_vec(), x[half..].to_vec());
        for i in 1..=ROUNDS {
            let mut f_in = r.clone();
            f_in.push(i);
            let mut f = vec![0u8; half];
            prf.compute(&f_in, &mut f).unwrap();
            let next_r: Vec<u8> = l.iter().zip(&f).map(|(a, b)| a ^ b).collect();
            l = r;
            r = next_r;
        }
        [l, r].concat()
    }

    #[test]
    fn test_permute_matches_round_equations() {
        let prp = prp();
        let x: Vec<u8> = (0u8..48).collect();
        assert_eq!(prp.permute_block(&x).unwrap(), reference_permute(prp.prf(), &x));
    }

    #[test]
    fn test_permute_changes_block() {
        let x = [0u8; 32];
        let y = prp().permute_block(&x).unwrap();
        assert_eq!(y.len(), x.len());
        assert_ne!(y, x);
    }

    #[test]
    fn test_different_keys_different_permutations() {
        let a = LubyRackoffPrp::new(Blake3Prf::new(&[1; 32]).unwrap());
        let b = LubyRackoffPrp::new(Blake3Prf::new(&[2; 32]).unwrap());
        let x = [7u8; 20];
        assert_ne!(a.permute_block(&x).unwrap(), b.permute_block(&x).unwrap());
    }

    #[test]
    fn test_odd_length_rejected() {
        let prp = prp();
        let x = [0u8; 15];
        assert!(matches!(
            prp.permute_block(&x),
            Err(FeistelError::InvalidBlockSize(15))
        ));
        assert!(matches!(
            prp.invert_block(&x),
            Err(FeistelError::InvalidBlockSize(15))
        ));
    }

    #[test]
    fn test_out_of_range_offsets_rejected() {
        let prp = prp();
        let input = [0u8; 16];
        let mut output = [0u8; 16];

        assert!(matches!(
            prp.permute(&input, 4, &mut output, 0, 16),
            Err(FeistelError::OutOfRange { buffer: "input", .. })
        ));
        assert!(matches!(
            prp.invert(&input, 0, &mut output, 2, 16),
            Err(FeistelError::OutOfRange { buffer: "output", .. })
        ));
        assert!(matches!(
            prp.permute(&input, usize::MAX, &mut output, 0, 2),
            Err(FeistelError::OutOfRange { .. })
        ));
        // Nothing was written.
        assert_eq!(output, [0u8; 16]);
    }

    #[test]
    fn test_offsets_address_sub_ranges() {
        let prp = prp();
        let mut input = [0xeeu8; 40];
        input[8..32].copy_from_slice(&[3u8; 24]);
        let mut output = [0xaau8; 40];

        prp.permute(&input, 8, &mut output, 4, 24).unwrap();

        assert_eq!(output[..4], [0xaa; 4]);
        assert_eq!(output[28..], [0xaa; 12]);
        assert_eq!(output[4..28], prp.permute_block(&[3u8; 24]).unwrap()[..]);
    }

    #[test]
    fn test_empty_block() {
        assert!(prp().permute_block(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_block_size_is_a_contract_error() {
        assert!(matches!(
            prp().block_size(),
            Err(FeistelError::NoFixedBlockSize)
        ));
    }

    #[test]
    fn test_round_function_errors_propagate() {
        // HKDF-Expand caps output at 255 * 32 bytes per half.
        let prp = LubyRackoffPrp::new(HmacSha256Prf::new(&[0u8; 32]).unwrap());
        let x = vec![0u8; 2 * (255 * 32 + 1)];
        assert!(matches!(
            prp.permute_block(&x),
            Err(FeistelError::Prf(PrimitiveError::OutputTooLong { .. }))
        ));
    }

    proptest! {
        #[test]
        fn invert_undoes_permute(
            key in any::<[u8; 32]>(),
            x in prop::collection::vec(any::<u8>(), 0..64).prop_map(|mut v| {
                v.truncate(v.len() & !1);
                v
            }),
        ) {
            let prp = LubyRackoffPrp::new(Blake3Prf::new(&key).unwrap());
            let y = prp.permute_block(&x).unwrap();
            prop_assert_eq!(prp.invert_block(&y).unwrap(), x.clone());
            let z = prp.invert_block(&x).unwrap();
            prop_assert_eq!(prp.permute_block(&z).unwrap(), x);
        }

        #[test]
        fn hmac_round_function_is_invertible(x in prop::collection::vec(any::<u8>(), 1..32)) {
            let mut x = x;
            x.truncate(x.len() & !1);
            let prp = LubyRackoffPrp::new(HmacSha256Prf::new(&[5u8; 32]).unwrap());
            let y = prp.permute_block(&x).unwrap();
            prop_assert_eq!(prp.invert_block(&y).unwrap(), x);
        }
    }
}
