//! Labels, garbled tables and the output decoding table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::circuit::WireId;

/// Label size in bytes.
pub const LABEL_LEN: usize = 16;

/// A 128-bit wire label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label(pub [u8; LABEL_LEN]);

impl Label {
    /// Label bytes.
    pub const fn as_bytes(&self) -> &[u8; LABEL_LEN] {
        &self.0
    }
}

impl From<[u8; LABEL_LEN]> for Label {
    fn from(bytes: [u8; LABEL_LEN]) -> Self {
        Label(bytes)
    }
}

impl From<Label> for [u8; LABEL_LEN] {
    fn from(label: Label) -> Self {
        label.0
    }
}

/// Both labels of a wire together with its permute bit.
///
/// The label encoding value `v` is presented to the evaluator alongside the
/// signal bit `v ^ permute_bit`, which selects the garbled row to decrypt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireLabels {
    /// Labels for semantic values 0 and 1.
    pub labels: [Label; 2],
    /// Permute bit of the wire.
    pub permute_bit: bool,
}

impl WireLabels {
    /// Label encoding `value`.
    #[inline]
    pub const fn label(&self, value: bool) -> Label {
        self.labels[value as usize]
    }

    /// Signal bit carried with the label for `value`.
    #[inline]
    pub const fn signal(&self, value: bool) -> bool {
        value ^ self.permute_bit
    }
}

/// Garbled tables indexed by gate.
///
/// A slot is `None` until its gate has been garbled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarbledTables {
    slots: Vec<Option<Vec<u8>>>,
}

impl GarbledTables {
    /// `num_gates` absent slots.
    pub fn empty(num_gates: usize) -> Self {
        Self {
            slots: vec![None; num_gates],
        }
    }

    /// A complete table set.
    pub fn from_tables(tables: Vec<Vec<u8>>) -> Self {
        Self {
            slots: tables.into_iter().map(Some).collect(),
        }
    }

    /// A table set with arbitrary absent slots.
    pub fn from_slots(slots: Vec<Option<Vec<u8>>>) -> Self {
        Self { slots }
    }

    /// Number of slots (one per gate).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no slots at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Table for gate `gate`, if present.
    pub fn get(&self, gate: usize) -> Option<&[u8]> {
        self.slots.get(gate)?.as_deref()
    }

    /// Mutable access to the table for gate `gate`, if present.
    pub fn get_mut(&mut self, gate: usize) -> Option<&mut Vec<u8>> {
        self.slots.get_mut(gate)?.as_mut()
    }

    /// Whether every slot holds a table.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Present tables in gate order, skipping absent slots.
    pub fn present(&self) -> impl Iterator<Item = &[u8]> {
        self.slots.iter().filter_map(|slot| slot.as_deref())
    }

    /// All slots in gate order.
    pub fn slots(&self) -> &[Option<Vec<u8>>] {
        &self.slots
    }
}

/// Maps each circuit-output wire to the bit that decodes its garbled value.
///
/// An evaluator holding signal bit `s` on output wire `w` learns the plaintext
/// value `s ^ table[w]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDecodingTable {
    entries: BTreeMap<WireId, bool>,
}

impl OutputDecodingTable {
    /// Decoding bit for `wire`.
    pub fn get(&self, wire: WireId) -> Option<bool> {
        self.entries.get(&wire).copied()
    }

    /// Plaintext value of `wire` given the evaluator's signal bit.
    pub fn decode(&self, wire: WireId, signal: bool) -> Option<bool> {
        self.get(wire).map(|bit| bit ^ signal)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (WireId, bool)> + '_ {
        self.entries.iter().map(|(w, b)| (*w, *b))
    }

    /// Whether the table has an entry for exactly the given wires.
    pub fn covers_exactly(&self, wires: &[WireId]) -> bool {
        wires.iter().all(|w| self.entries.contains_key(w))
            && self.entries.keys().all(|w| wires.contains(w))
    }
}

impl FromIterator<(WireId, bool)> for OutputDecodingTable {
    fn from_iter<I: IntoIterator<Item = (WireId, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
