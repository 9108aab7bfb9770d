//! Password hashing and verification using Argon2.
//!
//! Uses the argon2id variant with default parameters. Hashes are stored in
//! PHC string format, which carries the salt and parameters.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use super::error::{IdentityError, Result};

/// Well-formed argon2id hash with default parameters that matches no password.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$\
                          AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Hashes a password with a fresh random salt.
///
/// # Errors
///
/// Returns an error if hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| IdentityError::Password(format!("Failed to hash password: {e}")))
}

/// Verifies a password against a stored PHC hash.
///
/// # Errors
///
/// Returns an error if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| IdentityError::Password(format!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Runs a full verification against [`DUMMY_HASH`].
///
/// Used when the account does not exist, so unknown usernames cost the
/// same argon2 work as a wrong password.
pub(crate) fn verify_dummy(password: &str) {
    let _ = verify_password(password, DUMMY_HASH);
}
