//! Password hashing for the signup/sign-in flow.
//!
//! Hashes are Argon2id in PHC string format, so the parameters and salt
//! travel inside the stored string and can be rotated without a schema
//! change. Salts come from [`OsRng`]. Plaintext passwords never touch the
//! database; the `users` table only ever sees the output of
//! [`hash_password`].

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Shortest password accepted at signup.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a plaintext password, returning the PHC-formatted string to store.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// Check a plaintext password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; `Err` is reserved for malformed hashes and
/// other non-password failures, which callers treat as internal errors.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(other) => Err(other),
    }
}

/// Reject passwords shorter than [`MIN_PASSWORD_LENGTH`].
///
/// Runs before the verification code is consumed, so a rejected password
/// leaves the code available for a retry.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    Ok(())
}
