/*!
 * Password hashing and verification.
 *
 * Passwords are stored as an iterated, salted SHA-256 digest in the form
 * `v1$<iterations>$<salt hex>$<digest hex>`. The iteration count is part
 * of the stored value, so it can be raised later without invalidating
 * existing hashes.
 */

use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::errors::AccountError;

/// Hash format version tag
const HASH_VERSION: &str = "v1";

/// Default number of digest iterations for new hashes
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Salt length in bytes
const SALT_LEN: usize = 16;

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);

    let digest = derive_digest(password, DEFAULT_ITERATIONS, &salt);

    format!(
        "{}${}${}${}",
        HASH_VERSION,
        DEFAULT_ITERATIONS,
        hex_encode(&salt),
        hex_encode(&digest)
    )
}

/// Verify a password against a stored hash.
///
/// Returns `Ok(false)` for a wrong password; structural problems with the
/// stored value surface as `MalformedHash`.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, AccountError> {
    let parts: Vec<&str> = stored.split('$').collect();
    if parts.len() != 4 {
        return Err(AccountError::MalformedHash(
            "expected 4 dollar-separated fields".to_string(),
        ));
    }

    if parts[0] != HASH_VERSION {
        return Err(AccountError::MalformedHash(format!(
            "unknown hash version: {}",
            parts[0]
        )));
    }

    let iterations: u32 = parts[1]
        .parse()
        .map_err(|_| AccountError::MalformedHash(format!("bad iteration count: {}", parts[1])))?;
    if iterations == 0 {
        return Err(AccountError::MalformedHash(
            "iteration count must be positive".to_string(),
        ));
    }

    let salt = hex_decode(parts[2])?;
    let expected = hex_decode(parts[3])?;

    let digest = derive_digest(password, iterations, &salt);

    Ok(digest.as_slice() == expected.as_slice())
}

/// Derive the digest by seeding with salt and password, then iterating
fn derive_digest(password: &str, iterations: u32, salt: &[u8]) -> Vec<u8> {
    let mut digest = Sha256::new()
        .chain_update(salt)
        .chain_update(password.as_bytes())
        .finalize()
        .to_vec();

    for _ in 1..iterations {
        digest = Sha256::digest(&digest).to_vec();
    }

    digest
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hex_decode(text: &str) -> Result<Vec<u8>, AccountError> {
    if !text.is_ascii() || text.len() % 2 != 0 {
        return Err(AccountError::MalformedHash(format!(
            "invalid hex field: {}",
            text
        )));
    }

    (0..text.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&text[i..i + 2], 16).map_err(|_| {
                AccountError::MalformedHash(format!("invalid hex field: {}", text))
            })
        })
        .collect()
}
