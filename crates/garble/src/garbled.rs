//! Garbled circuit container.

use std::collections::BTreeMap;

use seedgc_primitives::{CryptographicHash, Prg};

use crate::audit;
use crate::circuit::{BooleanCircuit, CircuitError, WireId};
use crate::seed::{GarbleOutput, SeedGarbler};
use crate::types::{GarbledTables, OutputDecodingTable, WireLabels};
use crate::GarbleError;

/// Values the garbler keeps after garbling into a container.
#[derive(Debug, Clone)]
pub struct CircuitCreationValues {
    /// Label pairs of the primary inputs.
    pub input_labels: BTreeMap<WireId, WireLabels>,
    /// Label pairs of the circuit outputs.
    pub output_labels: BTreeMap<WireId, WireLabels>,
    /// Decoding table installed into the container.
    pub decoding: OutputDecodingTable,
    /// Digest of the installed tables, used as the commitment.
    pub digest: Vec<u8>,
}

/// Garbled tables and output decoding data for one circuit instance.
///
/// A container starts empty (every table slot absent) and is filled by a
/// single [`garble`](Self::garble) call, or built complete from material
/// received from a garbler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GarbledBooleanCircuit {
    input_wires: Vec<WireId>,
    output_wires: Vec<WireId>,
    tables: GarbledTables,
    decoding: OutputDecodingTable,
}

impl GarbledBooleanCircuit {
    /// An ungarbled container shaped after `circuit`.
    pub fn new(circuit: &BooleanCircuit) -> Self {
        Self {
            input_wires: circuit.input_wires().to_vec(),
            output_wires: circuit.output_wires().to_vec(),
            tables: GarbledTables::empty(circuit.num_gates()),
            decoding: OutputDecodingTable::default(),
        }
    }

    /// A container holding tables and a decoding table produced elsewhere.
    pub fn from_parts(
        circuit: &BooleanCircuit,
        tables: GarbledTables,
        decoding: OutputDecodingTable,
    ) -> Result<Self, CircuitError> {
        if tables.len() != circuit.num_gates() {
            return Err(CircuitError::TableCountMismatch {
                expected: circuit.num_gates(),
                actual: tables.len(),
            });
        }
        if !decoding.covers_exactly(circuit.output_wires()) {
            return Err(CircuitError::DecodingMismatch);
        }

        Ok(Self {
            input_wires: circuit.input_wires().to_vec(),
            output_wires: circuit.output_wires().to_vec(),
            tables,
            decoding,
        })
    }

    /// Garbles `circuit` from `seed` into this container.
    ///
    /// Tables and decoding table are replaced together once garbling has
    /// succeeded. On error the container is left untouched.
    pub fn garble<G, H>(
        &mut self,
        garbler: &SeedGarbler,
        circuit: &BooleanCircuit,
        prg: &mut G,
        seed: &[u8],
        hash: &mut H,
    ) -> Result<CircuitCreationValues, GarbleError>
    where
        G: Prg + ?Sized,
        H: CryptographicHash + ?Sized,
    {
        if circuit.num_gates() != self.tables.len() {
            return Err(CircuitError::TableCountMismatch {
                expected: self.tables.len(),
                actual: circuit.num_gates(),
            }
            .into());
        }
        if circuit.input_wires() != self.input_wires.as_slice()
            || circuit.output_wires() != self.output_wires.as_slice()
        {
            return Err(CircuitError::WireListMismatch.into());
        }

        let GarbleOutput {
            tables,
            decoding,
            input_labels,
            output_labels,
            digest,
        } = garbler.garble(circuit, prg, seed, hash)?;

        self.tables = tables;
        self.decoding = decoding.clone();

        Ok(CircuitCreationValues {
            input_labels,
            output_labels,
            decoding,
            digest,
        })
    }

    /// Regenerates the tables from `seed` and checks them against
    /// `committed`, without looking at the tables held here.
    pub fn verify<G, H>(
        &self,
        garbler: &SeedGarbler,
        circuit: &BooleanCircuit,
        prg: &mut G,
        seed: &[u8],
        hash: &mut H,
        committed: &[u8],
    ) -> Result<bool, GarbleError>
    where
        G: Prg + ?Sized,
        H: CryptographicHash + ?Sized,
    {
        audit::verify(garbler, circuit, prg, seed, hash, committed)
    }

    /// Checks the tables held here against `committed`.
    pub fn verify_garbled_tables<H: CryptographicHash + ?Sized>(
        &self,
        hash: &mut H,
        committed: &[u8],
    ) -> bool {
        audit::verify_garbled_tables(&self.tables, hash, committed)
    }

    /// Whether every gate has a table.
    pub fn is_garbled(&self) -> bool {
        self.tables.is_complete() && self.decoding.covers_exactly(&self.output_wires)
    }

    /// Garbled tables.
    pub fn garbled_tables(&self) -> &GarbledTables {
        &self.tables
    }

    /// Mutable garbled tables, for callers that patch received material.
    pub fn garbled_tables_mut(&mut self) -> &mut GarbledTables {
        &mut self.tables
    }

    /// Output decoding table; empty until garbled.
    pub fn decoding_table(&self) -> &OutputDecodingTable {
        &self.decoding
    }

    /// Primary input wires.
    pub fn input_wires(&self) -> &[WireId] {
        &self.input_wires
    }

    /// Circuit output wires.
    pub fn output_wires(&self) -> &[WireId] {
        &self.output_wires
    }

    /// Splits the container into its tables and decoding table.
    pub fn into_parts(self) -> (GarbledTables, OutputDecodingTable) {
        (self.tables, self.decoding)
    }
}
