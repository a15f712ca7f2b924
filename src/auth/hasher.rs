use crate::models::user::UNUSABLE_PASSWORD_PREFIX;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};
use rand::RngCore;
use thiserror::Error;

/// Length of the random suffix appended to unusable passwords
const UNUSABLE_SUFFIX_BYTES: usize = 20;

#[derive(Error, Debug)]
#[error("{0}")]
pub struct HashError(String);

/// Turns plaintext passwords into stored hashes and checks them back
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, HashError>;

    /// Returns `false` for a wrong password and for any value that is not a
    /// parseable hash, unusable markers included.
    fn verify(&self, password: &str, encoded: &str) -> bool;
}

/// Argon2id with the crate's default parameters
#[derive(Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        let mut salt_bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut salt_bytes);

        let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| HashError(e.to_string()))?;

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashError(e.to_string()))
    }

    fn verify(&self, password: &str, encoded: &str) -> bool {
        if encoded.starts_with(UNUSABLE_PASSWORD_PREFIX) {
            return false;
        }

        match PasswordHash::new(encoded) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

/// A stored password value that no input will ever verify against
pub fn make_unusable_password() -> String {
    let mut bytes = [0u8; UNUSABLE_SUFFIX_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    format!("{}{}", UNUSABLE_PASSWORD_PREFIX, hex::encode(bytes))
}
