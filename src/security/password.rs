// src/security/password.rs
//
// Salted SHA-512 password digests
//
// digest = lowercase_hex(SHA-512(salt || password))
//
// The salt is stored next to the digest as lowercase hex text and is fed to
// the hash as those text bytes.

use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

/// Random salt length in bytes (hex-encoded to twice as many chars)
pub const SALT_LEN: usize = 16;

/// Generate a fresh random salt, hex-encoded
pub fn generate_salt() -> String {
    let bytes: [u8; SALT_LEN] = rand::random();
    hex::encode(bytes)
}

/// Hash a password with the given salt
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a password against a stored digest in constant time
pub fn verify_password(password: &str, salt: &str, expected_hex: &str) -> bool {
    let actual = hash_password(password, salt);
    actual.as_bytes().ct_eq(expected_hex.as_bytes()).into()
}
