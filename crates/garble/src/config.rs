//! Algorithm selection for a garbling run.

use seedgc_primitives::{AnyHash, AnyPrg, HashAlgorithm, PrfAlgorithm, PrgAlgorithm};
use serde::{Deserialize, Serialize};

use crate::seed::SeedGarbler;

/// Algorithms used by garbler and verifier. Both sides must agree on every
/// field for audits to succeed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GarblingConfig {
    /// Generator expanding the seed.
    pub prg: PrgAlgorithm,
    /// PRF deriving labels and gate pads.
    pub prf: PrfAlgorithm,
    /// Hash producing the table commitment.
    pub hash: HashAlgorithm,
}

impl GarblingConfig {
    /// Engine for this configuration.
    pub fn garbler(&self) -> SeedGarbler {
        SeedGarbler::new(self.prf)
    }

    /// Fresh, unseeded generator.
    pub fn build_prg(&self) -> AnyPrg {
        self.prg.build()
    }

    /// Fresh hasher.
    pub fn build_hash(&self) -> AnyHash {
        self.hash.build()
    }

    /// Seed length expected by the generator.
    pub fn seed_len(&self) -> usize {
        self.prg.seed_len()
    }
}
