//! Salted password hashing.
//!
//! Stored form is `base64(salt):base64(sha256(salt || password))`. Verification
//! recomputes the digest and compares in constant time so a mismatch position
//! never leaks through response timing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use constant_time_eq::constant_time_eq;
use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Hash a password with a fresh random salt.
#[must_use]
pub fn hash(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = digest_with_salt(&salt, password);
    format!("{}:{}", BASE64.encode(salt), BASE64.encode(digest))
}

/// Check a password against its stored hash.
///
/// Malformed stored values verify as `false` rather than erroring; a bad row
/// must not let anyone in.
#[must_use]
pub fn verify(password: &str, stored: &str) -> bool {
    let Some((salt_b64, digest_b64)) = stored.split_once(':') else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (BASE64.decode(salt_b64), BASE64.decode(digest_b64)) else {
        return false;
    };
    let actual = digest_with_salt(&salt, password);
    constant_time_eq(&actual, &expected)
}

fn digest_with_salt(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}
