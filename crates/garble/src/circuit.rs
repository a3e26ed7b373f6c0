//! Boolean circuit topology.
//!
//! A circuit is an ordered list of two-input gates. Wires are identified by
//! integers; primary inputs are declared up front and every other wire is
//! produced by exactly one gate that precedes all its readers.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Wire identifier.
pub type WireId = u32;

/// A two-input truth table.
///
/// Bit `2 * a + b` holds the output for inputs `(a, b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TruthTable(u8);

impl TruthTable {
    /// `a & b`
    pub const AND: Self = Self(0b1000);
    /// `a ^ b`
    pub const XOR: Self = Self(0b0110);
    /// `a | b`
    pub const OR: Self = Self(0b1110);
    /// `!(a & b)`
    pub const NAND: Self = Self(0b0111);
    /// `!(a | b)`
    pub const NOR: Self = Self(0b0001);
    /// `!(a ^ b)`
    pub const XNOR: Self = Self(0b1001);

    /// Builds a table from its low four bits.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1111)
    }

    /// Builds a table from the outputs for inputs `00, 01, 10, 11`.
    pub const fn from_rows(rows: [bool; 4]) -> Self {
        Self((rows[0] as u8) | (rows[1] as u8) << 1 | (rows[2] as u8) << 2 | (rows[3] as u8) << 3)
    }

    /// Raw bit encoding.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Output for inputs `(a, b)`.
    #[inline]
    pub const fn eval(self, a: bool, b: bool) -> bool {
        let idx = (a as u8) << 1 | b as u8;
        (self.0 >> idx) & 1 == 1
    }
}

/// A single gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    /// Left and right input wires.
    pub inputs: [WireId; 2],
    /// Output wire.
    pub output: WireId,
    /// Gate function.
    pub truth_table: TruthTable,
}

impl Gate {
    /// Creates a gate.
    pub const fn new(in1: WireId, in2: WireId, output: WireId, truth_table: TruthTable) -> Self {
        Self {
            inputs: [in1, in2],
            output,
            truth_table,
        }
    }
}

/// Errors describing a topology the engine cannot garble.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CircuitError {
    /// A gate reads a wire that is neither an input nor produced earlier.
    #[error("gate {gate} reads undefined wire {wire}")]
    DanglingWire {
        /// Gate index.
        gate: usize,
        /// Offending wire.
        wire: WireId,
    },
    /// A primary input wire is declared twice.
    #[error("input wire {0} is declared more than once")]
    InputRepeated(WireId),
    /// A gate drives a wire that is already defined.
    #[error("gate {gate} redefines wire {wire}")]
    WireRedefined {
        /// Gate index.
        gate: usize,
        /// Offending wire.
        wire: WireId,
    },
    /// A declared output wire is never produced.
    #[error("output wire {0} is not driven by any input or gate")]
    UndefinedOutput(WireId),
    /// A table set does not have one slot per gate.
    #[error("expected {expected} garbled tables, got {actual}")]
    TableCountMismatch {
        /// Number of gates.
        expected: usize,
        /// Number of table slots supplied.
        actual: usize,
    },
    /// A decoding table does not cover exactly the output wires.
    #[error("decoding table does not match the circuit output wires")]
    DecodingMismatch,
    /// Input or output wires differ from the ones a container was built for.
    #[error("circuit wires do not match the garbled container")]
    WireListMismatch,
    /// A generated circuit would run out of wire identifiers.
    #[error("{bits}-bit adder exceeds the maximum of {max} bits")]
    TooWide {
        /// Requested width.
        bits: u32,
        /// Largest supported width.
        max: u32,
    },
}

/// An immutable Boolean circuit topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanCircuit {
    gates: Vec<Gate>,
    input_wires: Vec<WireId>,
    output_wires: Vec<WireId>,
}

impl BooleanCircuit {
    /// Wraps already-built topology. Use [`BooleanCircuit::validate`] to
    /// check it.
    pub fn new(gates: Vec<Gate>, input_wires: Vec<WireId>, output_wires: Vec<WireId>) -> Self {
        Self {
            gates,
            input_wires,
            output_wires,
        }
    }

    /// Gates in evaluation order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Primary input wires.
    pub fn input_wires(&self) -> &[WireId] {
        &self.input_wires
    }

    /// Circuit output wires.
    pub fn output_wires(&self) -> &[WireId] {
        &self.output_wires
    }

    /// Number of gates.
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Checks that every wire is driven exactly once before it is read and
    /// that every output wire exists.
    pub fn validate(&self) -> Result<(), CircuitError> {
        let mut defined: HashSet<WireId> =
            HashSet::with_capacity(self.input_wires.len() + self.gates.len());

        for &wire in &self.input_wires {
            if !defined.insert(wire) {
                return Err(CircuitError::InputRepeated(wire));
            }
        }

        for (idx, gate) in self.gates.iter().enumerate() {
            for &wire in &gate.inputs {
                if !defined.contains(&wire) {
                    return Err(CircuitError::DanglingWire { gate: idx, wire });
                }
            }
            if !defined.insert(gate.output) {
                return Err(CircuitError::WireRedefined {
                    gate: idx,
                    wire: gate.output,
                });
            }
        }

        match self.output_wires.iter().find(|w| !defined.contains(w)) {
            Some(&wire) => Err(CircuitError::UndefinedOutput(wire)),
            None => Ok(()),
        }
    }
}
