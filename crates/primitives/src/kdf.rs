//! HKDF over HMAC-SHA256, as defined in <https://datatracker.ietf.org/doc/html/rfc5869>.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::PrimitiveError;

type HmacSha256 = Hmac<Sha256>;

/// Output size of the underlying hash.
pub const HASH_LEN: usize = 32;

/// Largest output `HKDF-Expand` can produce.
pub const MAX_OUTPUT_LEN: usize = 255 * HASH_LEN;

fn new_mac(key: &[u8]) -> Result<HmacSha256, PrimitiveError> {
    HmacSha256::new_from_slice(key).map_err(|_| PrimitiveError::key_length(HASH_LEN, key.len()))
}

/// `HKDF-Extract(salt, ikm)`, returning the pseudorandom key.
pub fn extract(salt: &[u8], ikm: &[u8]) -> Result<[u8; HASH_LEN], PrimitiveError> {
    let mut mac = new_mac(salt)?;
    mac.update(ikm);

    let mut prk = [0u8; HASH_LEN];
    prk.copy_from_slice(&mac.finalize().into_bytes());
    Ok(prk)
}

/// `HKDF-Expand(prk, info, L)` with `L = okm.len()`.
pub fn expand(prk: &[u8], info: &[u8], okm: &mut [u8]) -> Result<(), PrimitiveError> {
    if okm.len() > MAX_OUTPUT_LEN {
        return Err(PrimitiveError::OutputTooLong {
            requested: okm.len(),
            max: MAX_OUTPUT_LEN,
        });
    }

    let mut prev: Option<[u8; HASH_LEN]> = None;
    for (i, chunk) in okm.chunks_mut(HASH_LEN).enumerate() {
        let mut mac = new_mac(prk)?;
        if let Some(t) = &prev {
            mac.update(t);
        }
        mac.update(info);
        // i < 255 is guaranteed by the length check above
        mac.update(&[(i + 1) as u8]);

        let mut t = [0u8; HASH_LEN];
        t.copy_from_slice(&mac.finalize().into_bytes());
        chunk.copy_from_slice(&t[..chunk.len()]);
        prev = Some(t);
    }

    Ok(())
}

/// Extract-then-expand in one call.
pub fn derive(salt: &[u8], ikm: &[u8], info: &[u8], okm: &mut [u8]) -> Result<(), PrimitiveError> {
    let prk = extract(salt, ikm)?;
    expand(&prk, info, okm)
}
