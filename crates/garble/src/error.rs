use seedgc_primitives::{FeistelError, PrimitiveError};

use crate::circuit::CircuitError;

/// Errors that stop garbling or audit from producing an answer.
///
/// A digest mismatch is not an error: verification returns `false`.
#[derive(Debug, thiserror::Error)]
pub enum GarbleError {
    /// The topology is malformed or does not match the container.
    #[error("malformed circuit: {0}")]
    Circuit(#[from] CircuitError),
    /// PRG or PRF key material is unusable.
    #[error("invalid key material: {0}")]
    Key(#[from] PrimitiveError),
    /// The gate permutation rejected its block.
    #[error("gate permutation failed: {0}")]
    Permutation(FeistelError),
}

impl From<FeistelError> for GarbleError {
    fn from(err: FeistelError) -> Self {
        match err {
            FeistelError::Prf(err) => Self::Key(err),
            other => Self::Permutation(other),
        }
    }
}
