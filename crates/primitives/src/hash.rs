//! Incremental cryptographic hashes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{PrimitiveError, traits::CryptographicHash};

/// blake3 with its default 32-byte output.
#[derive(Debug, Clone, Default)]
pub struct Blake3Hash {
    hasher: blake3::Hasher,
}

impl Blake3Hash {
    /// Creates a fresh hasher.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CryptographicHash for Blake3Hash {
    fn output_len(&self) -> usize {
        blake3::OUT_LEN
    }

    fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    fn finalize_reset(&mut self) -> Vec<u8> {
        let digest = self.hasher.finalize();
        self.hasher.reset();
        digest.as_bytes().to_vec()
    }
}

/// SHA-256.
#[derive(Clone, Default)]
pub struct Sha256Hash {
    hasher: Sha256,
}

impl Sha256Hash {
    /// Creates a fresh hasher.
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sha256Hash").finish_non_exhaustive()
    }
}

impl CryptographicHash for Sha256Hash {
    fn output_len(&self) -> usize {
        32
    }

    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.hasher, data);
    }

    fn finalize_reset(&mut self) -> Vec<u8> {
        Digest::finalize_reset(&mut self.hasher).to_vec()
    }
}

/// Names of the available hash variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// [`Blake3Hash`].
    #[default]
    #[serde(rename = "blake3")]
    Blake3,
    /// [`Sha256Hash`].
    #[serde(rename = "sha256")]
    Sha256,
}

impl HashAlgorithm {
    /// All variants, in declaration order.
    pub const ALL: [HashAlgorithm; 2] = [HashAlgorithm::Blake3, HashAlgorithm::Sha256];

    /// Canonical name of the variant.
    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::Sha256 => "sha256",
        }
    }

    /// Creates a fresh hasher of this variant.
    pub fn build(self) -> AnyHash {
        match self {
            HashAlgorithm::Blake3 => AnyHash::Blake3(Blake3Hash::new()),
            HashAlgorithm::Sha256 => AnyHash::Sha256(Sha256Hash::new()),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == s)
            .ok_or_else(|| PrimitiveError::UnknownAlgorithm {
                kind: "hash",
                name: s.to_owned(),
            })
    }
}

/// A hasher of any supported variant.
#[derive(Debug, Clone)]
pub enum AnyHash {
    /// blake3.
    Blake3(Blake3Hash),
    /// SHA-256.
    Sha256(Sha256Hash),
}

impl CryptographicHash for AnyHash {
    fn output_len(&self) -> usize {
        match self {
            AnyHash::Blake3(h) => h.output_len(),
            AnyHash::Sha256(h) => h.output_len(),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            AnyHash::Blake3(h) => h.update(data),
            AnyHash::Sha256(h) => h.update(data),
        }
    }

    fn finalize_reset(&mut self) -> Vec<u8> {
        match self {
            AnyHash::Blake3(h) => h.finalize_reset(),
            AnyHash::Sha256(h) => h.finalize_reset(),
        }
    }
}
