/// Errors raised when a primitive is used with unusable key material or
/// asked for something it cannot produce.
#[derive(Debug, thiserror::Error)]
pub enum PrimitiveError {
    /// The key or seed handed to a primitive has the wrong length.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Length the primitive requires.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },
    /// A generator was asked for output before it was seeded.
    #[error("generator used before it was seeded")]
    Unseeded,
    /// More output was requested than the primitive can produce in one call.
    #[error("requested {requested} output bytes, at most {max} are supported")]
    OutputTooLong {
        /// Number of bytes requested.
        requested: usize,
        /// Upper bound for the primitive.
        max: usize,
    },
    /// An algorithm name did not resolve to a known variant.
    #[error("unknown {kind} algorithm: {name}")]
    UnknownAlgorithm {
        /// Capability family ("prf", "prg" or "hash").
        kind: &'static str,
        /// The name that failed to resolve.
        name: String,
    },
}

impl PrimitiveError {
    pub(crate) fn key_length(expected: usize, actual: usize) -> Self {
        Self::InvalidKeyLength { expected, actual }
    }
}
