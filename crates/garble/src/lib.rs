//! Seed-driven garbling of Boolean circuits and hash audit of the result.
//!
//! A [`SeedGarbler`] turns a [`BooleanCircuit`], a seed and a PRG into
//! garbled tables plus an output decoding table. Because the run is fully
//! determined by the seed, a verifier can later regenerate the tables and
//! compare their digest against the garbler's commitment (see [`audit`]),
//! which is what [`cut_and_choose`] builds on.

pub mod adder;
pub mod audit;
pub mod circuit;
pub mod config;
pub mod cut_and_choose;
mod error;
pub mod garbled;
pub mod seed;
pub mod types;

pub use adder::{MAX_ADDER_BITS, ripple_carry_adder};
pub use circuit::{BooleanCircuit, CircuitError, Gate, TruthTable, WireId};
pub use config::GarblingConfig;
pub use cut_and_choose::{CutAndChooseError, CutAndChooseGarbler, CutAndChooseVerifier, Opening};
pub use error::GarbleError;
pub use garbled::{CircuitCreationValues, GarbledBooleanCircuit};
pub use seed::{GarbleOutput, SeedGarbler};
pub use types::{GarbledTables, Label, OutputDecodingTable, WireLabels};
