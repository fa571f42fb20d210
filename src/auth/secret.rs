// src/auth/secret.rs
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

pub const SALT_BYTES: usize = 16;

/// Salt + digest pair as stored on the group row (both base64).
#[derive(Debug, Clone, PartialEq)]
pub struct HashedSecret {
    pub salt: String,
    pub hash: String,
}

/// Hash a new group secret with a fresh OS-random salt.
pub fn hash_new_secret(secret: &str) -> HashedSecret {
    let mut rng = OsRng;
    hash_secret_with(&mut rng, secret)
}

pub fn hash_secret_with<R: RngCore>(rng: &mut R, secret: &str) -> HashedSecret {
    let mut salt = [0u8; SALT_BYTES];
    rng.fill_bytes(&mut salt);
    let salt = b64(&salt);
    let hash = b64(&digest(&salt, secret));
    HashedSecret { salt, hash }
}

/// Check a submitted secret against the stored pair.
pub fn verify_secret(stored: &HashedSecret, submitted: &str) -> bool {
    let Ok(expected) = base64::engine::general_purpose::STANDARD_NO_PAD.decode(&stored.hash) else {
        return false;
    };
    let actual = digest(&stored.salt, submitted);
    hashes_equal(&expected, &actual)
}

fn digest(salt: &str, secret: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(secret.as_bytes());
    let out = hasher.finalize();
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}

/// Constant-time-ish compare for hashes (simple and sufficient here).
pub fn hashes_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn b64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD_NO_PAD.encode(bytes)
}
