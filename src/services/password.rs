//! Password hashing behind a trait so services never touch Argon2 directly.

use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHasher as _, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use tokio::task;

use crate::config::SecurityConfig;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Returns a PHC-formatted hash of `password`.
    ///
    /// # Errors
    ///
    /// Returns an error if the hashing parameters are invalid or the worker task fails.
    async fn hash(&self, password: &str) -> Result<String>;
}

/// Argon2id with the cost parameters from `[security]`.
pub struct Argon2PasswordHasher {
    config: SecurityConfig,
}

impl Argon2PasswordHasher {
    #[must_use]
    pub const fn new(config: SecurityConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let config = self.config.clone();

        // Argon2 is CPU-bound; keep it off the async workers
        task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .context("Password hashing task panicked")?
    }
}

fn hash_password(password: &str, cfg: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        cfg.argon2_memory_cost_kib,
        cfg.argon2_time_cost,
        cfg.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    fn cheap_config() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    #[tokio::test]
    async fn hash_is_argon2id_and_verifies() {
        let hasher = Argon2PasswordHasher::new(cheap_config());
        let hash = hasher.hash("correct horse").await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"correct horse", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"wrong horse", &parsed)
                .is_err()
        );
    }

    #[tokio::test]
    async fn same_password_gets_fresh_salt() {
        let hasher = Argon2PasswordHasher::new(cheap_config());
        let a = hasher.hash("password123").await.unwrap();
        let b = hasher.hash("password123").await.unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn invalid_params_are_reported() {
        let cfg = SecurityConfig {
            argon2_memory_cost_kib: 1,
            argon2_time_cost: 0,
            argon2_parallelism: 0,
        };
        assert!(hash_password("password123", &cfg).is_err());
    }
}
