// src/security/mod.rs
//
// Credential handling. The password digest is the only security-relevant
// contract in the application.

pub mod password;

pub use password::{generate_salt, hash_password, verify_password, SALT_LEN};
