use crate::errors::ApiError;

/// bcrypt hashing with a configurable cost. The salt and cost are embedded in
/// every hash, so raising the cost later leaves stored hashes verifiable.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        PasswordHasher { cost }
    }

    pub async fn hash(&self, password: &str) -> Result<String, ApiError> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| ApiError::Unexpected(format!("hashing task failed: {e}")))?
            .map_err(|e| ApiError::Unexpected(format!("failed to hash password: {e}")))
    }

    /// `false` on mismatch and on a malformed hash.
    pub async fn verify(&self, password: &str, hash: &str) -> bool {
        let password = password.to_owned();
        let hash = hash.to_owned();
        match tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await {
            Ok(Ok(matches)) => matches,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "stored password hash is unreadable");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "password verification task failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_verifies_only_the_original_password() {
        let hasher = PasswordHasher::new(4);
        let hash = hasher.hash("correct horse").await.unwrap();
        assert_ne!(hash, "correct horse");
        assert!(hasher.verify("correct horse", &hash).await);
        assert!(!hasher.verify("battery staple", &hash).await);
    }

    #[tokio::test]
    async fn same_password_gets_distinct_salts() {
        let hasher = PasswordHasher::new(4);
        let first = hasher.hash("repeat").await.unwrap();
        let second = hasher.hash("repeat").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn cost_change_keeps_old_hashes_valid() {
        let old = PasswordHasher::new(4).hash("rotate me").await.unwrap();
        assert!(PasswordHasher::new(6).verify("rotate me", &old).await);
    }

    #[tokio::test]
    async fn malformed_hash_is_a_mismatch() {
        assert!(!PasswordHasher::new(4).verify("anything", "not-a-bcrypt-hash").await);
    }
}
