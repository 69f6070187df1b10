use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{self, SaltString},
};
use rand::{Rng, distr::Alphanumeric};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::OnceCell;

use crate::errors::InternalError;

/// Cryptographic operations provider
///
/// Hashes and verifies passwords with Argon2id, optionally keyed with a
/// server-side pepper. The hashing work runs on tokio's blocking pool.
#[derive(Clone)]
pub struct CryptoProvider {
    params: Params,
    pepper: Option<String>,
    dummy_hash: Arc<OnceCell<String>>,
    verifications: Arc<AtomicUsize>,
}

const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-accounts";

impl CryptoProvider {
    /// Create a new CryptoProvider
    ///
    /// # Arguments
    /// * `params` - Argon2 cost parameters
    /// * `pepper` - Optional secret mixed into every hash
    pub fn new(params: Params, pepper: Option<String>) -> Self {
        Self {
            params,
            pepper: pepper.filter(|p| !p.is_empty()),
            dummy_hash: Arc::new(OnceCell::new()),
            verifications: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a provider from raw cost settings
    ///
    /// # Returns
    /// * `Err(InternalError::Crypto)` - The costs are outside Argon2's limits
    pub fn from_costs(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
        pepper: Option<String>,
    ) -> Result<Self, InternalError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| InternalError::crypto("argon2_params", e.to_string()))?;
        Ok(Self::new(params, pepper))
    }

    fn argon2<'a>(params: Params, pepper: Option<&'a [u8]>) -> Result<Argon2<'a>, InternalError> {
        match pepper {
            Some(secret) => Argon2::new_with_secret(secret, Algorithm::Argon2id, Version::V0x13, params)
                .map_err(|e| InternalError::crypto("argon2_init", e.to_string())),
            None => Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params)),
        }
    }

    /// Hash a password with a fresh random salt
    ///
    /// # Returns
    /// * `Ok(String)` - PHC-formatted hash
    /// * `Err(InternalError::Crypto)` - Hashing failed
    pub async fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let params = self.params.clone();
        let pepper = self.pepper.clone();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || {
            let argon2 = Self::argon2(params, pepper.as_deref().map(str::as_bytes))?;
            let salt = SaltString::generate(&mut rand_core::OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| InternalError::crypto("argon2_hash", e.to_string()))
        })
        .await
        .map_err(|e| InternalError::crypto("argon2_hash", format!("hashing task failed: {}", e)))?
    }

    /// Verify a password against a stored hash
    ///
    /// # Returns
    /// * `Ok(true)` - Password matches
    /// * `Ok(false)` - Password does not match
    /// * `Err(InternalError::Crypto)` - Stored hash is malformed or verification could not run
    pub async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, InternalError> {
        self.verifications.fetch_add(1, Ordering::Relaxed);
        let params = self.params.clone();
        let pepper = self.pepper.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&hash)
                .map_err(|e| InternalError::crypto("argon2_parse_hash", e.to_string()))?;
            let argon2 = Self::argon2(params, pepper.as_deref().map(str::as_bytes))?;

            match argon2.verify_password(password.as_bytes(), &parsed_hash) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(e) => Err(InternalError::crypto("argon2_verify", e.to_string())),
            }
        })
        .await
        .map_err(|e| InternalError::crypto("argon2_verify", format!("verification task failed: {}", e)))?
    }

    /// Run a full verification against a hash no account owns
    ///
    /// Used when the account is unknown so the lookup costs the same Argon2
    /// work as a wrong password. The hash is built on first use with this
    /// provider's parameters and pepper.
    pub async fn verify_dummy(&self, password: &str) -> Result<(), InternalError> {
        let hash = self
            .dummy_hash
            .get_or_try_init(|| self.hash_password(DUMMY_PASSWORD))
            .await?;
        self.verify_password(password, hash).await.map(|_| ())
    }

    /// Number of password verifications run so far, across clones
    pub fn verifications(&self) -> usize {
        self.verifications.load(Ordering::Relaxed)
    }

    /// Generate a random alphanumeric secret
    pub fn generate_secret(length: usize) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    }
}

impl fmt::Debug for CryptoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoProvider")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .field("pepper", &self.pepper.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
