//! Argon2id password hashing and verification.
//!
//! Hashes are stored as PHC strings so that algorithm parameters and salt
//! travel with the hash.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

/// Minimum accepted password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// Returns `Ok(false)` on mismatch and `Err` only for malformed hashes.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Checks the password rules applied at registration: minimum length, not
/// purely numeric and not identical to the username.
pub fn validate_password_strength(password: &str, username: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Пароль должен содержать не менее {MIN_PASSWORD_LENGTH} символов."
        ));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err("Пароль не может состоять только из цифр.".to_string());
    }
    if password.to_lowercase() == username.trim().to_lowercase() {
        return Err("Пароль слишком похож на имя пользователя.".to_string());
    }
    Ok(())
}
