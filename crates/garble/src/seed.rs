//! Seed-driven garbling.
//!
//! All randomness of a garbling run comes from one seed expanded by a
//! [`Prg`], so a verifier holding the seed regenerates byte-identical tables.
//!
//! The seed is expanded into a PRF key for wire labels. Wire `w` gets labels
//! and a permute bit from `PRF(label_key, w)`, which lets every gate be
//! garbled on its own. Each gate produces four rows, one per pair of signal
//! bits `(sa, sb)`:
//!
//! ```text
//! x      = label_a[va] || gate_le64 || label_b[vb] || row_le64
//! pad    = π(x) ^ x
//! row    = (label_c[vc] || vc ^ λc) ^ pad[..17]
//! ```
//!
//! where `va = sa ^ λa`, `vb = sb ^ λb`, `vc = table(va, vb)` and `π` is the
//! Luby-Rackoff PRP under [`GATE_PRP_KEY`].

use std::collections::BTreeMap;

use hex_literal::hex;
use rayon::prelude::*;
use seedgc_primitives::{
    AnyPrf, CryptographicHash, LubyRackoffPrp, Prf, PrfAlgorithm, Prg, PrimitiveError,
    xor_in_place,
};
use tracing::{debug, instrument};

use crate::circuit::{BooleanCircuit, Gate, WireId};
use crate::types::{GarbledTables, LABEL_LEN, Label, OutputDecodingTable, WireLabels};
use crate::GarbleError;

/// Key of the gate permutation.
///
/// Corresponds to the AES-256 key of FIPS 197 Appendix C.3.
///
/// Note that this key is intentionally arbitrary, fixed, and public.
pub const GATE_PRP_KEY: [u8; 32] =
    hex!("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f");

/// Size of one garbled row: an output label plus its signal bit.
pub const ROW_LEN: usize = LABEL_LEN + 1;

/// Size of one gate's garbled table.
pub const TABLE_LEN: usize = 4 * ROW_LEN;

const PAD_INPUT_LEN: usize = 2 * LABEL_LEN + 16;

/// Gates garbled per batch when only the digest is needed.
const HASH_BATCH_GATES: usize = 4096;

/// Everything a seed garbling run produces.
#[derive(Debug, Clone)]
pub struct GarbleOutput {
    /// One table per gate, in gate order.
    pub tables: GarbledTables,
    /// Decoding bit per circuit-output wire.
    pub decoding: OutputDecodingTable,
    /// Label pairs of the primary inputs.
    pub input_labels: BTreeMap<WireId, WireLabels>,
    /// Label pairs of the circuit outputs.
    pub output_labels: BTreeMap<WireId, WireLabels>,
    /// Digest of the tables in gate order.
    pub digest: Vec<u8>,
}

/// Deterministic garbling engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedGarbler {
    prf: PrfAlgorithm,
}

impl SeedGarbler {
    /// Creates an engine deriving labels and pads with `prf`.
    pub fn new(prf: PrfAlgorithm) -> Self {
        Self { prf }
    }

    /// PRF variant in use.
    pub fn prf(&self) -> PrfAlgorithm {
        self.prf
    }

    /// Garbles `circuit` from `seed`.
    ///
    /// The topology is validated before the generator is touched. `hash` is
    /// only used to produce [`GarbleOutput::digest`].
    #[instrument(level = "debug", skip_all, fields(gates = circuit.num_gates()), err)]
    pub fn garble<G, H>(
        &self,
        circuit: &BooleanCircuit,
        prg: &mut G,
        seed: &[u8],
        hash: &mut H,
    ) -> Result<GarbleOutput, GarbleError>
    where
        G: Prg + ?Sized,
        H: CryptographicHash + ?Sized,
    {
        circuit.validate()?;
        let cipher = self.gate_cipher(prg, seed)?;

        let tables = circuit
            .gates()
            .par_iter()
            .enumerate()
            .map(|(idx, gate)| cipher.garble_gate(idx as u64, gate))
            .collect::<Result<Vec<_>, _>>()?;

        let decoding = circuit
            .output_wires()
            .iter()
            .map(|&wire| Ok((wire, cipher.wire_labels(wire)?.permute_bit)))
            .collect::<Result<OutputDecodingTable, PrimitiveError>>()?;
        let input_labels = cipher.labels_for(circuit.input_wires())?;
        let output_labels = cipher.labels_for(circuit.output_wires())?;

        for table in &tables {
            hash.update(table);
        }
        let digest = hash.finalize_reset();

        debug!(outputs = decoding.len(), "garbled circuit from seed");

        Ok(GarbleOutput {
            tables: GarbledTables::from_tables(tables),
            decoding,
            input_labels,
            output_labels,
            digest,
        })
    }

    /// Regenerates the tables of [`garble`](Self::garble) and returns only
    /// their digest.
    ///
    /// Tables are produced in bounded batches and fed to `hash` in gate order,
    /// so the full set is never held at once.
    #[instrument(level = "debug", skip_all, fields(gates = circuit.num_gates()), err)]
    pub fn hashed_tables<G, H>(
        &self,
        circuit: &BooleanCircuit,
        prg: &mut G,
        seed: &[u8],
        hash: &mut H,
    ) -> Result<Vec<u8>, GarbleError>
    where
        G: Prg + ?Sized,
        H: CryptographicHash + ?Sized,
    {
        circuit.validate()?;
        let cipher = self.gate_cipher(prg, seed)?;

        for (batch_idx, batch) in circuit.gates().chunks(HASH_BATCH_GATES).enumerate() {
            let base = batch_idx * HASH_BATCH_GATES;
            let tables = batch
                .par_iter()
                .enumerate()
                .map(|(i, gate)| cipher.garble_gate((base + i) as u64, gate))
                .collect::<Result<Vec<_>, _>>();

            match tables {
                Ok(tables) => tables.iter().for_each(|table| hash.update(table)),
                Err(err) => {
                    // drop the partial digest state
                    let _ = hash.finalize_reset();
                    return Err(err);
                }
            }
        }

        Ok(hash.finalize_reset())
    }

    fn gate_cipher<G: Prg + ?Sized>(
        &self,
        prg: &mut G,
        seed: &[u8],
    ) -> Result<GateCipher, GarbleError> {
        prg.seed(seed)?;
        let mut label_key = vec![0u8; self.prf.key_len()];
        prg.fill_bytes(&mut label_key)?;

        Ok(GateCipher {
            labels: self.prf.keyed(&label_key)?,
            prp: LubyRackoffPrp::new(self.prf.keyed(&GATE_PRP_KEY)?),
        })
    }
}

/// Per-run garbling material: the seeded label PRF and the public gate PRP.
#[derive(Debug)]
struct GateCipher {
    labels: AnyPrf,
    prp: LubyRackoffPrp<AnyPrf>,
}

impl GateCipher {
    fn wire_labels(&self, wire: WireId) -> Result<WireLabels, PrimitiveError> {
        let mut out = [0u8; 2 * LABEL_LEN + 1];
        self.labels.compute(&wire.to_le_bytes(), &mut out)?;

        let mut zero = [0u8; LABEL_LEN];
        let mut one = [0u8; LABEL_LEN];
        zero.copy_from_slice(&out[..LABEL_LEN]);
        one.copy_from_slice(&out[LABEL_LEN..2 * LABEL_LEN]);

        Ok(WireLabels {
            labels: [Label(zero), Label(one)],
            permute_bit: out[2 * LABEL_LEN] & 1 == 1,
        })
    }

    fn labels_for(&self, wires: &[WireId]) -> Result<BTreeMap<WireId, WireLabels>, PrimitiveError> {
        wires
            .iter()
            .map(|&wire| Ok((wire, self.wire_labels(wire)?)))
            .collect()
    }

    fn row_pad(
        &self,
        gate_idx: u64,
        row: usize,
        left: &Label,
        right: &Label,
    ) -> Result<[u8; ROW_LEN], GarbleError> {
        let mut x = [0u8; PAD_INPUT_LEN];
        x[..16].copy_from_slice(left.as_bytes());
        x[16..24].copy_from_slice(&gate_idx.to_le_bytes());
        x[24..40].copy_from_slice(right.as_bytes());
        x[40..48].copy_from_slice(&(row as u64).to_le_bytes());

        let mut y = [0u8; PAD_INPUT_LEN];
        self.prp.permute(&x, 0, &mut y, 0, PAD_INPUT_LEN)?;
        xor_in_place(&mut y, &x);

        let mut pad = [0u8; ROW_LEN];
        pad.copy_from_slice(&y[..ROW_LEN]);
        Ok(pad)
    }

    fn garble_gate(&self, gate_idx: u64, gate: &Gate) -> Result<Vec<u8>, GarbleError> {
        let a = self.wire_labels(gate.inputs[0])?;
        let b = self.wire_labels(gate.inputs[1])?;
        let c = self.wire_labels(gate.output)?;

        let mut table = vec![0u8; TABLE_LEN];
        for sa in [false, true] {
            for sb in [false, true] {
                let va = sa ^ a.permute_bit;
                let vb = sb ^ b.permute_bit;
                let vc = gate.truth_table.eval(va, vb);

                let row = row_index(sa, sb);
                let pad = self.row_pad(gate_idx, row, &a.label(va), &b.label(vb))?;

                let dst = &mut table[row * ROW_LEN..(row + 1) * ROW_LEN];
                dst[..LABEL_LEN].copy_from_slice(c.label(vc).as_bytes());
                dst[LABEL_LEN] = c.signal(vc) as u8;
                xor_in_place(dst, &pad);
            }
        }

        Ok(table)
    }

    /// Recovers the output label and signal bit from one row.
    #[cfg(test)]
    fn open_row(
        &self,
        gate_idx: u64,
        table: &[u8],
        (left, sa): (Label, bool),
        (right, sb): (Label, bool),
    ) -> (Label, bool) {
        let row = row_index(sa, sb);
        let pad = self.row_pad(gate_idx, row, &left, &right).unwrap();
        let mut plain = [0u8; ROW_LEN];
        plain.copy_from_slice(&table[row * ROW_LEN..(row + 1) * ROW_LEN]);
        xor_in_place(&mut plain, &pad);

        let mut label = [0u8; LABEL_LEN];
        label.copy_from_slice(&plain[..LABEL_LEN]);
        (Label(label), plain[LABEL_LEN] == 1)
    }
}

#[inline]
fn row_index(sa: bool, sb: bool) -> usize {
    (sa as usize) << 1 | sb as usize
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use seedgc_primitives::{Blake3Hash, ChaCha20Prg, HashAlgorithm, PrgAlgorithm};

    use super::*;
    use crate::circuit::{CircuitError, TruthTable};

    const SEED: [u8; 32] = [7u8; 32];

    /// Counts how often the generator is seeded.
    #[derive(Debug, Default)]
    struct CountingPrg {
        inner: ChaCha20Prg,
        seeded: usize,
    }

    impl Prg for CountingPrg {
        fn seed_len(&self) -> usize {
            self.inner.seed_len()
        }

        fn seed(&mut self, seed: &[u8]) -> Result<(), PrimitiveError> {
            self.seeded += 1;
            self.inner.seed(seed)
        }

        fn fill_bytes(&mut self, out: &mut [u8]) -> Result<(), PrimitiveError> {
            self.inner.fill_bytes(out)
        }
    }

    fn single_gate(tt: TruthTable) -> BooleanCircuit {
        BooleanCircuit::new(vec![Gate::new(0, 1, 2, tt)], vec![0, 1], vec![2])
    }

    fn cipher(prf: PrfAlgorithm) -> GateCipher {
        let mut prg = ChaCha20Prg::new();
        SeedGarbler::new(prf).gate_cipher(&mut prg, &SEED).unwrap()
    }

    /// Evaluates the whole circuit through the garbled rows.
    fn evaluate(
        cipher: &GateCipher,
        circuit: &BooleanCircuit,
        out: &GarbleOutput,
        inputs: &[bool],
    ) -> Vec<bool> {
        let mut wires: BTreeMap<WireId, (Label, bool)> = circuit
            .input_wires()
            .iter()
            .zip(inputs)
            .map(|(w, v)| {
                let wl = out.input_labels[w];
                (*w, (wl.label(*v), wl.signal(*v)))
            })
            .collect();

        for (idx, gate) in circuit.gates().iter().enumerate() {
            let table = out.tables.get(idx).unwrap();
            let a = wires[&gate.inputs[0]];
            let b = wires[&gate.inputs[1]];
            wires.insert(gate.output, cipher.open_row(idx as u64, table, a, b));
        }

        circuit
            .output_wires()
            .iter()
            .map(|w| out.decoding.decode(*w, wires[w].1).unwrap())
            .collect()
    }

    #[rstest]
    #[case::and(TruthTable::AND)]
    #[case::xor(TruthTable::XOR)]
    #[case::or(TruthTable::OR)]
    #[case::nand(TruthTable::NAND)]
    #[case::nor(TruthTable::NOR)]
    #[case::xnor(TruthTable::XNOR)]
    fn test_every_row_decrypts_to_truth_table(#[case] tt: TruthTable) {
        for prf in PrfAlgorithm::ALL {
            let circuit = single_gate(tt);
            let garbler = SeedGarbler::new(prf);
            let out = garbler
                .garble(&circuit, &mut ChaCha20Prg::new(), &SEED, &mut Blake3Hash::new())
                .unwrap();
            let cipher = cipher(prf);

            let (a, b) = (out.input_labels[&0], out.input_labels[&1]);
            let c = out.output_labels[&2];
            let table = out.tables.get(0).unwrap();

            for va in [false, true] {
                for vb in [false, true] {
                    let (label, signal) = cipher.open_row(
                        0,
                        table,
                        (a.label(va), a.signal(va)),
                        (b.label(vb), b.signal(vb)),
                    );
                    let vc = tt.eval(va, vb);
                    assert_eq!(label, c.label(vc), "{prf} {va} {vb}");
                    assert_eq!(signal, c.signal(vc));
                    assert_eq!(out.decoding.decode(2, signal), Some(vc));
                }
            }
        }
    }

    #[test]
    fn test_full_adder_evaluates() {
        // inputs a=0, b=1, cin=2
        let circuit = BooleanCircuit::new(
            vec![
                Gate::new(0, 1, 3, TruthTable::XOR),
                Gate::new(3, 2, 4, TruthTable::XOR),
                Gate::new(0, 1, 5, TruthTable::AND),
                Gate::new(3, 2, 6, TruthTable::AND),
                Gate::new(5, 6, 7, TruthTable::OR),
            ],
            vec![0, 1, 2],
            vec![4, 7],
        );
        let garbler = SeedGarbler::default();
        let out = garbler
            .garble(&circuit, &mut ChaCha20Prg::new(), &SEED, &mut Blake3Hash::new())
            .unwrap();
        let cipher = cipher(PrfAlgorithm::default());

        for bits in 0u8..8 {
            let (a, b, cin) = (bits & 1 == 1, bits & 2 == 2, bits & 4 == 4);
            let total = a as u8 + b as u8 + cin as u8;
            let result = evaluate(&cipher, &circuit, &out, &[a, b, cin]);
            assert_eq!(result, vec![total & 1 == 1, total >= 2], "inputs {bits:03b}");
        }
    }

    #[test]
    fn test_tables_have_fixed_size() {
        let out = SeedGarbler::default()
            .garble(
                &single_gate(TruthTable::AND),
                &mut ChaCha20Prg::new(),
                &SEED,
                &mut Blake3Hash::new(),
            )
            .unwrap();
        assert!(out.tables.is_complete());
        assert_eq!(out.tables.get(0).unwrap().len(), TABLE_LEN);
    }

    #[test]
    fn test_same_wiring_different_gate_index_differs() {
        // Two identical gates must not share pads.
        let circuit = BooleanCircuit::new(
            vec![
                Gate::new(0, 1, 2, TruthTable::AND),
                Gate::new(0, 1, 3, TruthTable::AND),
            ],
            vec![0, 1],
            vec![2, 3],
        );
        let cipher = cipher(PrfAlgorithm::default());
        let label = Label([9; LABEL_LEN]);
        assert_ne!(
            cipher.row_pad(0, 0, &label, &label).unwrap(),
            cipher.row_pad(1, 0, &label, &label).unwrap()
        );
        assert_ne!(
            cipher.row_pad(0, 0, &label, &label).unwrap(),
            cipher.row_pad(0, 1, &label, &label).unwrap()
        );

        let out = SeedGarbler::default()
            .garble(&circuit, &mut ChaCha20Prg::new(), &SEED, &mut Blake3Hash::new())
            .unwrap();
        assert_ne!(out.tables.get(0), out.tables.get(1));
    }

    #[rstest]
    #[case::chacha20(PrgAlgorithm::ChaCha20)]
    #[case::aes128_ctr(PrgAlgorithm::Aes128Ctr)]
    fn test_garbling_is_deterministic(#[case] prg_alg: PrgAlgorithm) {
        let circuit = BooleanCircuit::new(
            vec![
                Gate::new(0, 1, 3, TruthTable::AND),
                Gate::new(3, 2, 4, TruthTable::XOR),
            ],
            vec![0, 1, 2],
            vec![4],
        );
        let seed = vec![3u8; prg_alg.seed_len()];
        let garbler = SeedGarbler::default();

        let first = garbler
            .garble(&circuit, &mut prg_alg.build(), &seed, &mut HashAlgorithm::Blake3.build())
            .unwrap();
        let second = garbler
            .garble(&circuit, &mut prg_alg.build(), &seed, &mut HashAlgorithm::Blake3.build())
            .unwrap();

        assert_eq!(first.tables, second.tables);
        assert_eq!(first.decoding, second.decoding);
        assert_eq!(first.input_labels, second.input_labels);
        assert_eq!(first.digest, second.digest);

        let mut other_seed = seed.clone();
        other_seed[0] ^= 1;
        let third = garbler
            .garble(&circuit, &mut prg_alg.build(), &other_seed, &mut HashAlgorithm::Blake3.build())
            .unwrap();
        assert_ne!(first.tables, third.tables);
    }

    #[test]
    fn test_hashed_tables_matches_garble_digest_across_batches() {
        let mut gates = vec![Gate::new(0, 1, 2, TruthTable::XOR)];
        for i in 0..(HASH_BATCH_GATES as u32 + 10) {
            gates.push(Gate::new(2 + i, i % 2, 3 + i, TruthTable::AND));
        }
        let last = 2 + HASH_BATCH_GATES as u32 + 10;
        let circuit = BooleanCircuit::new(gates, vec![0, 1], vec![last]);

        let garbler = SeedGarbler::default();
        let mut hash = Blake3Hash::new();
        let out = garbler
            .garble(&circuit, &mut ChaCha20Prg::new(), &SEED, &mut hash)
            .unwrap();
        let digest = garbler
            .hashed_tables(&circuit, &mut ChaCha20Prg::new(), &SEED, &mut hash)
            .unwrap();

        assert_eq!(out.digest, digest);
    }

    #[test]
    fn test_malformed_topology_reported_before_seeding() {
        let circuit = BooleanCircuit::new(
            vec![Gate::new(0, 5, 2, TruthTable::AND)],
            vec![0, 1],
            vec![2],
        );
        let mut prg = CountingPrg::default();
        let err = SeedGarbler::default()
            .garble(&circuit, &mut prg, &SEED, &mut Blake3Hash::new())
            .unwrap_err();

        assert!(matches!(
            err,
            GarbleError::Circuit(CircuitError::DanglingWire { gate: 0, wire: 5 })
        ));
        assert_eq!(prg.seeded, 0);

        let err = SeedGarbler::default()
            .hashed_tables(&circuit, &mut prg, &SEED, &mut Blake3Hash::new())
            .unwrap_err();
        assert!(matches!(err, GarbleError::Circuit(_)));
        assert_eq!(prg.seeded, 0);
    }

    #[test]
    fn test_wrong_seed_length_is_key_error() {
        let err = SeedGarbler::default()
            .garble(
                &single_gate(TruthTable::AND),
                &mut ChaCha20Prg::new(),
                &[0u8; 16],
                &mut Blake3Hash::new(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            GarbleError::Key(PrimitiveError::InvalidKeyLength {
                expected: 32,
                actual: 16
            })
        ));
    }

    #[test]
    fn test_empty_circuit() {
        let circuit = BooleanCircuit::new(vec![], vec![0], vec![0]);
        let mut hash = Blake3Hash::new();
        let out = SeedGarbler::default()
            .garble(&circuit, &mut ChaCha20Prg::new(), &SEED, &mut hash)
            .unwrap();
        assert!(out.tables.is_empty());
        assert_eq!(out.decoding.len(), 1);
        assert_eq!(out.digest, Blake3Hash::new().finalize_reset());
    }
}
