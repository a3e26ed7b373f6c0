//! Hash audit of garbled tables against a committed digest.
//!
//! Both entry points answer with a plain `bool`. A mismatch is a normal
//! negative outcome; only unusable key material or a malformed topology
//! produce an error.

use seedgc_primitives::{CryptographicHash, Prg};
use tracing::debug;

use crate::circuit::BooleanCircuit;
use crate::seed::SeedGarbler;
use crate::types::GarbledTables;
use crate::GarbleError;

/// Compares a committed digest against a computed one.
///
/// Digests of different lengths never match. Equal-length digests are
/// compared over every byte.
pub fn digests_match(committed: &[u8], computed: &[u8]) -> bool {
    if committed.len() != computed.len() {
        return false;
    }
    committed
        .iter()
        .zip(computed)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Hashes the present tables in gate order.
pub fn hash_tables<H: CryptographicHash + ?Sized>(hash: &mut H, tables: &GarbledTables) -> Vec<u8> {
    for table in tables.present() {
        hash.update(table);
    }
    hash.finalize_reset()
}

/// Regenerates the tables from a revealed seed and checks them against
/// `committed`.
pub fn verify<G, H>(
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
    let computed = garbler.hashed_tables(circuit, prg, seed, hash)?;
    let accepted = digests_match(committed, &computed);
    debug!(accepted, "audited regenerated tables");
    Ok(accepted)
}

/// Checks tables held locally against `committed`.
pub fn verify_garbled_tables<H: CryptographicHash + ?Sized>(
    tables: &GarbledTables,
    hash: &mut H,
    committed: &[u8],
) -> bool {
    let computed = hash_tables(hash, tables);
    let accepted = digests_match(committed, &computed);
    debug!(accepted, tables = tables.len(), "audited materialized tables");
    accepted
}
