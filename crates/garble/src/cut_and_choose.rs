//! Cut-and-choose over seed-garbled circuits.
//!
//! The garbler commits to `n` garbled instances by their table digests. The
//! verifier picks a check set; check instances are opened by revealing their
//! seed and regenerated locally, while the remaining instances are sent in
//! full and audited against their commitments.

use std::collections::{BTreeMap, BTreeSet};

use rand::{CryptoRng, Rng};
use tracing::{debug, info, warn};

use crate::audit;
use crate::circuit::BooleanCircuit;
use crate::config::GarblingConfig;
use crate::garbled::{CircuitCreationValues, GarbledBooleanCircuit};
use crate::GarbleError;

/// Errors raised by the cut-and-choose exchange.
#[derive(Debug, thiserror::Error)]
pub enum CutAndChooseError {
    /// A committed instance failed its audit.
    #[error("cheating detected in circuit {index}")]
    CheatAttempt {
        /// Instance index.
        index: usize,
    },
    /// The verifier asked to check more circuits than exist.
    #[error("cannot check {checks} of {circuits} circuits")]
    TooManyChecks {
        /// Requested check count.
        checks: usize,
        /// Committed circuits.
        circuits: usize,
    },
    /// An opening does not line up with the commitments or the check set.
    #[error("invalid opening: {0}")]
    InvalidOpening(String),
    /// Garbling or regeneration could not run.
    #[error(transparent)]
    Garble(#[from] GarbleError),
}

/// What the garbler reveals once the check set is known.
#[derive(Debug, Clone, Default)]
pub struct Opening {
    /// Seeds of the check instances.
    pub seeds: BTreeMap<usize, Vec<u8>>,
    /// Full garbled circuits of the evaluation instances.
    pub evaluated: BTreeMap<usize, GarbledBooleanCircuit>,
}

#[derive(Debug)]
struct Instance {
    seed: Vec<u8>,
    garbled: GarbledBooleanCircuit,
    values: CircuitCreationValues,
}

/// Garbler side of cut-and-choose.
#[derive(Debug)]
pub struct CutAndChooseGarbler {
    config: GarblingConfig,
    circuit: BooleanCircuit,
    instances: Vec<Instance>,
}

impl CutAndChooseGarbler {
    /// Creates a garbler for `circuit`.
    pub fn new(config: GarblingConfig, circuit: BooleanCircuit) -> Self {
        Self {
            config,
            circuit,
            instances: Vec::new(),
        }
    }

    /// Garbles `n` instances from fresh seeds and returns their digests.
    ///
    /// Any previous commitment is discarded.
    pub fn commit<R>(&mut self, rng: &mut R, n: usize) -> Result<Vec<Vec<u8>>, CutAndChooseError>
    where
        R: Rng + CryptoRng,
    {
        let garbler = self.config.garbler();
        let mut prg = self.config.build_prg();
        let mut hash = self.config.build_hash();

        let mut instances = Vec::with_capacity(n);
        for _ in 0..n {
            let mut seed = vec![0u8; self.config.seed_len()];
            rng.fill(&mut seed[..]);

            let mut garbled = GarbledBooleanCircuit::new(&self.circuit);
            let values = garbled.garble(&garbler, &self.circuit, &mut prg, &seed, &mut hash)?;
            instances.push(Instance {
                seed,
                garbled,
                values,
            });
        }

        info!(circuits = n, "committed to garbled circuits");
        self.instances = instances;
        Ok(self.commitments())
    }

    /// Digests of the committed instances.
    pub fn commitments(&self) -> Vec<Vec<u8>> {
        self.instances
            .iter()
            .map(|instance| instance.values.digest.clone())
            .collect()
    }

    /// Reveals seeds for `checks` and full circuits for every other instance.
    pub fn open(&self, checks: &[usize]) -> Result<Opening, CutAndChooseError> {
        let checks = check_set(checks, self.instances.len())?;

        let mut opening = Opening::default();
        for (index, instance) in self.instances.iter().enumerate() {
            if checks.contains(&index) {
                opening.seeds.insert(index, instance.seed.clone());
            } else {
                opening.evaluated.insert(index, instance.garbled.clone());
            }
        }
        Ok(opening)
    }

    /// Labels and decoding data kept for instance `index`.
    pub fn creation_values(&self, index: usize) -> Option<&CircuitCreationValues> {
        self.instances.get(index).map(|instance| &instance.values)
    }
}

/// Verifier side of cut-and-choose.
#[derive(Debug)]
pub struct CutAndChooseVerifier {
    config: GarblingConfig,
    circuit: BooleanCircuit,
}

impl CutAndChooseVerifier {
    /// Creates a verifier for `circuit`.
    pub fn new(config: GarblingConfig, circuit: BooleanCircuit) -> Self {
        Self { config, circuit }
    }

    /// Picks `checks` distinct indices out of `n`, sorted.
    pub fn choose<R>(
        &self,
        rng: &mut R,
        n: usize,
        checks: usize,
    ) -> Result<Vec<usize>, CutAndChooseError>
    where
        R: Rng + CryptoRng,
    {
        if checks > n {
            return Err(CutAndChooseError::TooManyChecks {
                checks,
                circuits: n,
            });
        }
        let mut indices = rand::seq::index::sample(rng, n, checks).into_vec();
        indices.sort_unstable();
        Ok(indices)
    }

    /// Audits `opening` against `commitments` for the check set `checks`.
    ///
    /// Returns the evaluation circuits once every instance passed. The
    /// commitment binds the garbled tables only: an evaluation circuit's
    /// decoding table is checked for shape against the circuit's outputs,
    /// not for its bit values.
    pub fn audit(
        &self,
        commitments: &[Vec<u8>],
        checks: &[usize],
        opening: Opening,
    ) -> Result<BTreeMap<usize, GarbledBooleanCircuit>, CutAndChooseError> {
        let checks = check_set(checks, commitments.len())?;
        if opening.seeds.keys().copied().collect::<BTreeSet<_>>() != checks {
            return Err(CutAndChooseError::InvalidOpening(
                "seeds do not match the check set".into(),
            ));
        }
        let evaluated_ok = opening.evaluated.len() + checks.len() == commitments.len()
            && opening.evaluated.keys().all(|i| !checks.contains(i) && *i < commitments.len());
        if !evaluated_ok {
            return Err(CutAndChooseError::InvalidOpening(
                "evaluation circuits do not cover the unchecked instances".into(),
            ));
        }

        let garbler = self.config.garbler();
        let mut prg = self.config.build_prg();
        let mut hash = self.config.build_hash();

        for (&index, seed) in &opening.seeds {
            if seed.len() != self.config.seed_len() {
                warn!(index, len = seed.len(), "revealed seed has the wrong length");
                return Err(CutAndChooseError::CheatAttempt { index });
            }
            let ok = audit::verify(
                &garbler,
                &self.circuit,
                &mut prg,
                seed,
                &mut hash,
                &commitments[index],
            )?;
            if !ok {
                warn!(index, "regenerated check circuit does not match commitment");
                return Err(CutAndChooseError::CheatAttempt { index });
            }
        }

        for (&index, garbled) in &opening.evaluated {
            let ok = garbled.garbled_tables().len() == self.circuit.num_gates()
                && garbled.input_wires() == self.circuit.input_wires()
                && garbled.output_wires() == self.circuit.output_wires()
                && garbled.is_garbled()
                && garbled.verify_garbled_tables(&mut hash, &commitments[index]);
            if !ok {
                warn!(index, "evaluation circuit does not match commitment");
                return Err(CutAndChooseError::CheatAttempt { index });
            }
        }

        debug!(
            checked = opening.seeds.len(),
            evaluated = opening.evaluated.len(),
            "cut-and-choose audit passed"
        );
        Ok(opening.evaluated)
    }
}

fn check_set(checks: &[usize], n: usize) -> Result<BTreeSet<usize>, CutAndChooseError> {
    let set: BTreeSet<usize> = checks.iter().copied().collect();
    if set.len() != checks.len() {
        return Err(CutAndChooseError::InvalidOpening(
            "duplicate check index".into(),
        ));
    }
    if let Some(&index) = set.iter().find(|&&i| i >= n) {
        return Err(CutAndChooseError::InvalidOpening(format!(
            "check index {index} out of {n} circuits"
        )));
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::circuit::{Gate, TruthTable};
    use crate::types::OutputDecodingTable;

    fn circuit() -> BooleanCircuit {
        BooleanCircuit::new(
            vec![
                Gate::new(0, 1, 2, TruthTable::XOR),
                Gate::new(0, 1, 3, TruthTable::AND),
            ],
            vec![0, 1],
            vec![2, 3],
        )
    }

    fn setup(n: usize) -> (CutAndChooseGarbler, CutAndChooseVerifier, Vec<Vec<u8>>) {
        let config = GarblingConfig::default();
        let mut garbler = CutAndChooseGarbler::new(config, circuit());
        let commitments = garbler
            .commit(&mut StdRng::seed_from_u64(1), n)
            .unwrap();
        (garbler, CutAndChooseVerifier::new(config, circuit()), commitments)
    }

    #[test]
    fn test_choose_is_sorted_and_distinct() {
        let (_, verifier, _) = setup(0);
        let mut rng = StdRng::seed_from_u64(9);
        let picks = verifier.choose(&mut rng, 10, 6).unwrap();
        assert_eq!(picks.len(), 6);
        assert!(picks.windows(2).all(|w| w[0] < w[1]));
        assert!(picks.iter().all(|&i| i < 10));

        assert!(matches!(
            verifier.choose(&mut rng, 3, 4),
            Err(CutAndChooseError::TooManyChecks { checks: 4, circuits: 3 })
        ));
    }

    #[test]
    fn test_honest_run_passes() {
        let (garbler, verifier, commitments) = setup(5);
        assert_eq!(commitments.len(), 5);

        let checks = verifier
            .choose(&mut StdRng::seed_from_u64(2), 5, 3)
            .unwrap();
        let opening = garbler.open(&checks).unwrap();
        let evaluated = verifier.audit(&commitments, &checks, opening).unwrap();

        assert_eq!(evaluated.len(), 2);
        for index in evaluated.keys() {
            assert!(!checks.contains(index));
            assert!(garbler.creation_values(*index).is_some());
        }
    }

    #[test]
    fn test_tampered_seed_is_cheating() {
        let (garbler, verifier, commitments) = setup(4);
        let checks = vec![1, 2];
        let mut opening = garbler.open(&checks).unwrap();
        opening.seeds.get_mut(&2).unwrap()[0] ^= 1;

        assert!(matches!(
            verifier.audit(&commitments, &checks, opening),
            Err(CutAndChooseError::CheatAttempt { index: 2 })
        ));
    }

    #[test]
    fn test_tampered_evaluation_circuit_is_cheating() {
        let (garbler, verifier, commitments) = setup(4);
        let checks = vec![0, 1];
        let mut opening = garbler.open(&checks).unwrap();
        let gc = opening.evaluated.get_mut(&3).unwrap();
        gc.garbled_tables_mut().get_mut(1).unwrap()[5] ^= 0x10;

        assert!(matches!(
            verifier.audit(&commitments, &checks, opening),
            Err(CutAndChooseError::CheatAttempt { index: 3 })
        ));
    }

    #[test]
    fn test_evaluation_circuit_with_other_outputs_is_cheating() {
        let (garbler, verifier, commitments) = setup(3);
        let checks = vec![0];
        let mut opening = garbler.open(&checks).unwrap();

        // Genuine tables, but no outputs left to decode.
        let (tables, _) = opening.evaluated[&1].clone().into_parts();
        let reshaped = BooleanCircuit::new(circuit().gates().to_vec(), vec![0, 1], vec![]);
        let forged =
            GarbledBooleanCircuit::from_parts(&reshaped, tables, OutputDecodingTable::default())
                .unwrap();
        assert!(forged.is_garbled());
        opening.evaluated.insert(1, forged);

        assert!(matches!(
            verifier.audit(&commitments, &checks, opening),
            Err(CutAndChooseError::CheatAttempt { index: 1 })
        ));
    }

    #[test]
    fn test_malformed_openings() {
        let (garbler, verifier, commitments) = setup(3);

        assert!(matches!(
            garbler.open(&[0, 0]),
            Err(CutAndChooseError::InvalidOpening(_))
        ));
        assert!(matches!(
            garbler.open(&[3]),
            Err(CutAndChooseError::InvalidOpening(_))
        ));

        let mut opening = garbler.open(&[0]).unwrap();
        opening.evaluated.remove(&2);
        assert!(matches!(
            verifier.audit(&commitments, &[0], opening),
            Err(CutAndChooseError::InvalidOpening(_))
        ));

        let opening = garbler.open(&[0]).unwrap();
        assert!(matches!(
            verifier.audit(&commitments, &[1], opening),
            Err(CutAndChooseError::InvalidOpening(_))
        ));
    }

    #[test]
    fn test_short_seed_is_cheating() {
        let (garbler, verifier, commitments) = setup(2);
        let mut opening = garbler.open(&[0]).unwrap();
        opening.seeds.get_mut(&0).unwrap().truncate(5);

        assert!(matches!(
            verifier.audit(&commitments, &[0], opening),
            Err(CutAndChooseError::CheatAttempt { index: 0 })
        ));
    }

    #[test]
    fn test_long_seed_is_cheating() {
        let (garbler, verifier, commitments) = setup(3);
        let mut opening = garbler.open(&[1, 2]).unwrap();
        opening.seeds.get_mut(&2).unwrap().push(0);

        assert!(matches!(
            verifier.audit(&commitments, &[1, 2], opening),
            Err(CutAndChooseError::CheatAttempt { index: 2 })
        ));
    }
}
