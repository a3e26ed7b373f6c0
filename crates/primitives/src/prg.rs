//! Seeded pseudorandom generators.

use std::fmt;
use std::str::FromStr;

use aes::Aes128;
use ctr::Ctr128BE;
use ctr::cipher::{KeyIvInit, StreamCipher};
use rand_chacha::ChaCha20Rng;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{PrimitiveError, traits::Prg};

/// ChaCha20 stream generator with a 32-byte seed.
#[derive(Debug, Clone, Default)]
pub struct ChaCha20Prg {
    rng: Option<ChaCha20Rng>,
}

impl ChaCha20Prg {
    /// Seed length in bytes.
    pub const SEED_LEN: usize = 32;

    /// Creates an unseeded generator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prg for ChaCha20Prg {
    fn seed_len(&self) -> usize {
        Self::SEED_LEN
    }

    fn seed(&mut self, seed: &[u8]) -> Result<(), PrimitiveError> {
        let seed: [u8; Self::SEED_LEN] = seed
            .try_into()
            .map_err(|_| PrimitiveError::key_length(Self::SEED_LEN, seed.len()))?;
        self.rng = Some(ChaCha20Rng::from_seed(seed));
        Ok(())
    }

    fn fill_bytes(&mut self, out: &mut [u8]) -> Result<(), PrimitiveError> {
        self.rng
            .as_mut()
            .ok_or(PrimitiveError::Unseeded)?
            .fill_bytes(out);
        Ok(())
    }
}

/// AES-128 in counter mode, keyed with the seed and a zero IV.
#[derive(Default)]
pub struct Aes128CtrPrg {
    cipher: Option<Ctr128BE<Aes128>>,
}

impl Aes128CtrPrg {
    /// Seed length in bytes.
    pub const SEED_LEN: usize = 16;

    /// Creates an unseeded generator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for Aes128CtrPrg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aes128CtrPrg")
            .field("seeded", &self.cipher.is_some())
            .finish()
    }
}

impl Prg for Aes128CtrPrg {
    fn seed_len(&self) -> usize {
        Self::SEED_LEN
    }

    fn seed(&mut self, seed: &[u8]) -> Result<(), PrimitiveError> {
        let key: [u8; Self::SEED_LEN] = seed
            .try_into()
            .map_err(|_| PrimitiveError::key_length(Self::SEED_LEN, seed.len()))?;
        let iv = [0u8; 16];
        self.cipher = Some(Ctr128BE::<Aes128>::new(&key.into(), &iv.into()));
        Ok(())
    }

    fn fill_bytes(&mut self, out: &mut [u8]) -> Result<(), PrimitiveError> {
        let cipher = self.cipher.as_mut().ok_or(PrimitiveError::Unseeded)?;
        out.fill(0);
        cipher.apply_keystream(out);
        Ok(())
    }
}

/// Names of the available PRG variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrgAlgorithm {
    /// [`ChaCha20Prg`].
    #[default]
    #[serde(rename = "chacha20")]
    ChaCha20,
    /// [`Aes128CtrPrg`].
    #[serde(rename = "aes128-ctr")]
    Aes128Ctr,
}

impl PrgAlgorithm {
    /// All variants, in declaration order.
    pub const ALL: [PrgAlgorithm; 2] = [PrgAlgorithm::ChaCha20, PrgAlgorithm::Aes128Ctr];

    /// Canonical name of the variant.
    pub const fn name(self) -> &'static str {
        match self {
            PrgAlgorithm::ChaCha20 => "chacha20",
            PrgAlgorithm::Aes128Ctr => "aes128-ctr",
        }
    }

    /// Seed length in bytes.
    pub const fn seed_len(self) -> usize {
        match self {
            PrgAlgorithm::ChaCha20 => ChaCha20Prg::SEED_LEN,
            PrgAlgorithm::Aes128Ctr => Aes128CtrPrg::SEED_LEN,
        }
    }

    /// Creates an unseeded generator of this variant.
    pub fn build(self) -> AnyPrg {
        match self {
            PrgAlgorithm::ChaCha20 => AnyPrg::ChaCha20(ChaCha20Prg::new()),
            PrgAlgorithm::Aes128Ctr => AnyPrg::Aes128Ctr(Aes128CtrPrg::new()),
        }
    }
}

impl fmt::Display for PrgAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrgAlgorithm {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == s)
            .ok_or_else(|| PrimitiveError::UnknownAlgorithm {
                kind: "prg",
                name: s.to_owned(),
            })
    }
}

/// A generator of any supported variant.
#[derive(Debug)]
pub enum AnyPrg {
    /// ChaCha20.
    ChaCha20(ChaCha20Prg),
    /// AES-128-CTR.
    Aes128Ctr(Aes128CtrPrg),
}

impl Prg for AnyPrg {
    fn seed_len(&self) -> usize {
        match self {
            AnyPrg::ChaCha20(prg) => prg.seed_len(),
            AnyPrg::Aes128Ctr(prg) => prg.seed_len(),
        }
    }

    fn seed(&mut self, seed: &[u8]) -> Result<(), PrimitiveError> {
        match self {
            AnyPrg::ChaCha20(prg) => prg.seed(seed),
            AnyPrg::Aes128Ctr(prg) => prg.seed(seed),
        }
    }

    fn fill_bytes(&mut self, out: &mut [u8]) -> Result<(), PrimitiveError> {
        match self {
            AnyPrg::ChaCha20(prg) => prg.fill_bytes(out),
            AnyPrg::Aes128Ctr(prg) => prg.fill_bytes(out),
        }
    }
}
