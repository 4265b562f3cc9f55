//! # Password hashing and verification — Argon2id
//!
//! - [`hash_password`] — random salt via [`OsRng`], default Argon2id
//!   parameters, PHC-format output stored in `users.password_hash`.
//! - [`verify_password`] — parses a PHC string and checks a plaintext
//!   against it: `Ok(true)` on match, `Ok(false)` on mismatch, `Err` when
//!   the stored hash is malformed.
//!
//! The same pair backs registration, login, the profile dialog's live
//! current-password check, and the password update itself.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| format!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| format!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
