//! Pseudorandom functions with varying input and output length.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{PrimitiveError, kdf, traits::Prf};

/// Key length shared by every PRF variant.
pub const PRF_KEY_LEN: usize = 32;

fn key_array(key: &[u8]) -> Result<[u8; PRF_KEY_LEN], PrimitiveError> {
    key.try_into()
        .map_err(|_| PrimitiveError::key_length(PRF_KEY_LEN, key.len()))
}

/// Keyed blake3 in XOF mode.
#[derive(Clone)]
pub struct Blake3Prf {
    key: [u8; PRF_KEY_LEN],
}

impl Blake3Prf {
    /// Creates the PRF from a 32-byte key.
    pub fn new(key: &[u8]) -> Result<Self, PrimitiveError> {
        Ok(Self {
            key: key_array(key)?,
        })
    }
}

impl fmt::Debug for Blake3Prf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blake3Prf").finish_non_exhaustive()
    }
}

impl Prf for Blake3Prf {
    fn compute(&self, input: &[u8], output: &mut [u8]) -> Result<(), PrimitiveError> {
        let mut hasher = blake3::Hasher::new_keyed(&self.key);
        hasher.update(input);
        hasher.finalize_xof().fill(output);
        Ok(())
    }
}

/// `HKDF-Expand` keyed with a 32-byte pseudorandom key, the input acting as
/// the `info` string.
#[derive(Clone)]
pub struct HmacSha256Prf {
    prk: [u8; PRF_KEY_LEN],
}

impl HmacSha256Prf {
    /// Creates the PRF from a 32-byte key.
    pub fn new(key: &[u8]) -> Result<Self, PrimitiveError> {
        Ok(Self {
            prk: key_array(key)?,
        })
    }
}

impl fmt::Debug for HmacSha256Prf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSha256Prf").finish_non_exhaustive()
    }
}

impl Prf for HmacSha256Prf {
    fn compute(&self, input: &[u8], output: &mut [u8]) -> Result<(), PrimitiveError> {
        kdf::expand(&self.prk, input, output)
    }
}

/// Names of the available PRF variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrfAlgorithm {
    /// [`Blake3Prf`].
    #[default]
    #[serde(rename = "blake3")]
    Blake3,
    /// [`HmacSha256Prf`].
    #[serde(rename = "hmac-sha256")]
    HmacSha256,
}

impl PrfAlgorithm {
    /// All variants, in declaration order.
    pub const ALL: [PrfAlgorithm; 2] = [PrfAlgorithm::Blake3, PrfAlgorithm::HmacSha256];

    /// Canonical name of the variant.
    pub const fn name(self) -> &'static str {
        match self {
            PrfAlgorithm::Blake3 => "blake3",
            PrfAlgorithm::HmacSha256 => "hmac-sha256",
        }
    }

    /// Key length in bytes.
    pub const fn key_len(self) -> usize {
        PRF_KEY_LEN
    }

    /// Instantiates the variant under `key`.
    pub fn keyed(self, key: &[u8]) -> Result<AnyPrf, PrimitiveError> {
        Ok(match self {
            PrfAlgorithm::Blake3 => AnyPrf::Blake3(Blake3Prf::new(key)?),
            PrfAlgorithm::HmacSha256 => AnyPrf::HmacSha256(HmacSha256Prf::new(key)?),
        })
    }
}

impl fmt::Display for PrfAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrfAlgorithm {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == s)
            .ok_or_else(|| PrimitiveError::UnknownAlgorithm {
                kind: "prf",
                name: s.to_owned(),
            })
    }
}

/// A keyed PRF of any supported variant.
#[derive(Debug, Clone)]
pub enum AnyPrf {
    /// Keyed blake3.
    Blake3(Blake3Prf),
    /// HKDF-Expand over HMAC-SHA256.
    HmacSha256(HmacSha256Prf),
}

impl Prf for AnyPrf {
    fn compute(&self, input: &[u8], output: &mut [u8]) -> Result<(), PrimitiveError> {
        match self {
            AnyPrf::Blake3(prf) => prf.compute(input, output),
            AnyPrf::HmacSha256(prf) => prf.compute(input, output),
        }
    }
}
