//! Argon2id password hashing.

use argon2::password_hash::{self, rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use storefront_core::{StorefrontError, StorefrontResult};
use tracing::debug;

/// Produces and checks PHC-format hashes (`$argon2id$v=19$...`).
///
/// Verification reads its parameters from the stored hash, so changing the
/// configured cost does not lock out existing accounts.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    #[must_use]
    pub fn new() -> Self {
        Self::from_params(Params::DEFAULT)
    }

    /// Argon2id with `cost` iterations and default memory and lanes.
    /// A zero cost falls back to the defaults.
    #[must_use]
    pub fn with_cost(cost: u32) -> Self {
        match Params::new(Params::DEFAULT_M_COST, cost, Params::DEFAULT_P_COST, None) {
            Ok(params) => Self::from_params(params),
            Err(_) => Self::new(),
        }
    }

    fn from_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hashes with a fresh random salt.
    pub fn hash(&self, password: &str) -> StorefrontResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| StorefrontError::internal(format!("password hashing failed: {e}")))
    }

    /// `Ok(false)` on mismatch. A stored value that is not a PHC string is an error.
    pub fn verify(&self, password: &str, stored: &str) -> StorefrontResult<bool> {
        let parsed = PasswordHash::new(stored)
            .map_err(|e| StorefrontError::internal(format!("stored password hash is malformed: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => {
                debug!("Password mismatch");
                Ok(false)
            }
            Err(e) => Err(StorefrontError::internal(format!("password verification failed: {e}"))),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("t_cost", &self.argon2.params().t_cost())
            .finish()
    }
}
