use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

/// Argon2id hashing with a configurable work factor (time cost).
///
/// The async methods move the CPU-heavy work onto the blocking pool.
#[derive(Debug, Clone)]
pub struct Hasher {
    params: Params,
}

impl Hasher {
    pub fn new(work_factor: u32) -> anyhow::Result<Self> {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            work_factor,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| anyhow::anyhow!("invalid hash work factor {work_factor}: {e}"))?;
        Ok(Self { params })
    }

    /// Cheapest parameters argon2 accepts.
    #[cfg(test)]
    pub fn fast() -> Self {
        Self {
            params: Params::new(Params::MIN_M_COST, 1, 1, None).expect("min params"),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash_blocking(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// `Ok(false)` on mismatch; `Err` only when `hash` is not a PHC string.
    pub fn verify_blocking(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            anyhow::anyhow!(e.to_string())
        })?;
        Ok(self
            .argon2()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }

    pub async fn hash(&self, plain: String) -> anyhow::Result<String> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.hash_blocking(&plain)).await?
    }

    pub async fn verify(&self, plain: String, hash: String) -> anyhow::Result<bool> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.verify_blocking(&plain, &hash)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = Hasher::fast();
        let password = "Secur3P@ssw0rd!";
        let hash = hasher.hash_blocking(password).expect("hashing should succeed");
        assert!(hasher.verify_blocking(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = Hasher::fast();
        let hash = hasher
            .hash_blocking("correct-horse-battery-staple")
            .expect("hashing should succeed");
        assert!(!hasher
            .verify_blocking("wrong-password", &hash)
            .expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = Hasher::fast()
            .verify_blocking("anything", "not-a-valid-hash")
            .unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn same_secret_gets_distinct_salts() {
        let hasher = Hasher::fast();
        let a = hasher.hash_blocking("pw123456").unwrap();
        let b = hasher.hash_blocking("pw123456").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify_blocking("pw123456", &a).unwrap());
        assert!(hasher.verify_blocking("pw123456", &b).unwrap());
    }

    #[test]
    fn work_factor_is_encoded_in_hash() {
        let hasher = Hasher {
            params: Params::new(Params::MIN_M_COST, 3, 1, None).unwrap(),
        };
        let hash = hasher.hash_blocking("pw").unwrap();
        assert!(hash.contains("t=3"), "{hash}");
    }

    #[test]
    fn zero_work_factor_is_rejected() {
        assert!(Hasher::new(0).is_err());
        assert!(Hasher::new(10).is_ok());
    }

    #[tokio::test]
    async fn async_variants_run_off_the_runtime() {
        let hasher = Hasher::fast();
        let hash = hasher.hash("pw123456".into()).await.unwrap();
        assert!(hasher.verify("pw123456".into(), hash.clone()).await.unwrap());
        assert!(!hasher.verify("nope".into(), hash).await.unwrap());
    }
}
