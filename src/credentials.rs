use std::sync::Arc;

use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher,
        PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;
use tokio::task;

/// Argon2 memory cost in kibibytes (~19 MB).
const ARGON2_MEMORY_COST: u32 = 19_456;
/// Argon2 time cost (iterations).
const ARGON2_TIME_COST: u32 = 2;
/// Argon2 parallelism (lanes).
const ARGON2_PARALLELISM: u32 = 1;
/// Length of the produced password hash output (bytes).
const ARGON2_OUTPUT_LENGTH: usize = 32;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Password hashing join error: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("Password hashing error: {0:?}")]
    PasswordHash(PasswordHashError),
    #[error("Argon2 error: {0:?}")]
    Argon2(argon2::Error),
}

/// Hashes and verifies share passwords with Argon2id.
///
/// The optional pepper is prepended to every password before it reaches
/// Argon2. All work runs on the blocking pool.
#[derive(Clone)]
pub struct CredentialHasher {
    params: Params,
    pepper: Option<Arc<str>>,
}

impl CredentialHasher {
    /// Hasher with the production cost parameters.
    pub fn new(pepper: Option<&str>) -> Result<Self, CredentialError> {
        let params = Params::new(
            ARGON2_MEMORY_COST,
            ARGON2_TIME_COST,
            ARGON2_PARALLELISM,
            Some(ARGON2_OUTPUT_LENGTH),
        )
        .map_err(CredentialError::Argon2)?;

        Ok(Self::with_params(params, pepper))
    }

    pub fn with_params(params: Params, pepper: Option<&str>) -> Self {
        Self {
            params,
            pepper: pepper.map(Arc::from),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    fn password_material(&self, password: &str) -> String {
        match self.pepper.as_deref() {
            Some(pepper) => {
                let mut combined = String::with_capacity(pepper.len() + password.len());
                combined.push_str(pepper);
                combined.push_str(password);
                combined
            }
            None => password.to_owned(),
        }
    }

    /// Produce a salted PHC hash string for `password`.
    pub async fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let hasher = self.clone();
        let password = password.to_owned();

        task::spawn_blocking(move || {
            let material = hasher.password_material(&password);
            let salt = SaltString::generate(&mut OsRng);
            let hash = hasher
                .argon2()
                .hash_password(material.as_bytes(), &salt)
                .map_err(CredentialError::PasswordHash)?
                .to_string();
            Ok::<_, CredentialError>(hash)
        })
        .await?
    }

    /// Check `password` against a stored PHC hash string.
    ///
    /// `Ok(false)` means the password does not match. Errors are reserved for
    /// hashes that cannot be parsed and for a failed blocking task. The digest
    /// comparison inside Argon2 is constant-time.
    pub async fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, CredentialError> {
        let hasher = self.clone();
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();

        task::spawn_blocking(move || -> Result<bool, CredentialError> {
            let parsed_hash =
                PasswordHash::new(&stored_hash).map_err(CredentialError::PasswordHash)?;
            let material = hasher.password_material(&password);

            match hasher
                .argon2()
                .verify_password(material.as_bytes(), &parsed_hash)
            {
                Ok(()) => Ok(true),
                Err(PasswordHashError::Password) => Ok(false),
                Err(err) => Err(CredentialError::PasswordHash(err)),
            }
        })
        .await?
    }

    /// Hash a fresh random secret that no caller can know.
    ///
    /// Used as a stand-in credential so lookups for absent shares perform the
    /// same verification work as lookups for present ones.
    pub async fn decoy_hash(&self) -> Result<String, CredentialError> {
        let secret = SaltString::generate(&mut OsRng);
        self.hash(secret.as_str()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher(pepper: Option<&str>) -> CredentialHasher {
        let params = Params::new(8, 1, 1, Some(32)).unwrap();
        CredentialHasher::with_params(params, pepper)
    }

    #[tokio::test]
    async fn verifies_matching_password() {
        let hasher = cheap_hasher(None);
        let hash = hasher.hash("correct-horse").await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("correct-horse"));
        assert!(hasher.verify("correct-horse", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn rejects_wrong_and_empty_passwords() {
        let hasher = cheap_hasher(None);
        let hash = hasher.hash("correct-horse").await.unwrap();

        assert!(!hasher.verify("wrong", &hash).await.unwrap());
        assert!(!hasher.verify("", &hash).await.unwrap());
        assert!(!hasher.verify("correct-horse ", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn pepper_is_part_of_the_credential() {
        let peppered = cheap_hasher(Some("server-pepper"));
        let hash = peppered.hash("correct-horse").await.unwrap();

        assert!(peppered.verify("correct-horse", &hash).await.unwrap());
        assert!(!cheap_hasher(None)
            .verify("correct-horse", &hash)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn same_password_gets_distinct_salts() {
        let hasher = cheap_hasher(None);
        let first = hasher.hash("correct-horse").await.unwrap();
        let second = hasher.hash("correct-horse").await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        let hasher = cheap_hasher(None);
        let result = hasher.verify("anything", "not-a-phc-string").await;

        assert!(matches!(result, Err(CredentialError::PasswordHash(_))));
    }

    #[tokio::test]
    async fn decoy_hash_rejects_ordinary_guesses() {
        let hasher = cheap_hasher(None);
        let decoy = hasher.decoy_hash().await.unwrap();

        assert!(!hasher.verify("", &decoy).await.unwrap());
        assert!(!hasher.verify("password", &decoy).await.unwrap());
    }
}
