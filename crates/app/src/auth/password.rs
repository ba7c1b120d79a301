//! Password hashing.
//!
//! bcrypt is deliberately slow, so hashing and verification run on the blocking
//! thread pool instead of stalling the async workers serving other requests.

use thiserror::Error;
use tokio::{
    sync::OnceCell,
    task::{self, JoinError},
};
use zeroize::Zeroizing;

/// bcrypt work factor applied to every new digest.
pub const PASSWORD_HASH_COST: u32 = 10;

/// Stand-in digest verified when no account matches, at the same cost.
static UNKNOWN_ACCOUNT_DIGEST: OnceCell<String> = OnceCell::const_new();

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed")]
    Hash(#[source] bcrypt::BcryptError),

    #[error("password hashing task failed")]
    Task(#[source] JoinError),
}

/// Produce a salted one-way digest of `plaintext`.
pub async fn hash_password(plaintext: &str) -> Result<String, PasswordError> {
    let plaintext = Zeroizing::new(plaintext.to_owned());

    task::spawn_blocking(move || bcrypt::hash(plaintext.as_bytes(), PASSWORD_HASH_COST))
        .await
        .map_err(PasswordError::Task)?
        .map_err(PasswordError::Hash)
}

/// Check `plaintext` against a digest produced by [`hash_password`].
pub async fn verify_password(plaintext: &str, digest: &str) -> Result<bool, PasswordError> {
    let plaintext = Zeroizing::new(plaintext.to_owned());
    let digest = digest.to_owned();

    task::spawn_blocking(move || bcrypt::verify(plaintext.as_bytes(), &digest))
        .await
        .map_err(PasswordError::Task)?
        .map_err(PasswordError::Hash)
}

async fn unknown_account_digest() -> Result<&'static str, PasswordError> {
    UNKNOWN_ACCOUNT_DIGEST
        .get_or_try_init(|| hash_password("unknown-account"))
        .await
        .map(String::as_str)
}

/// Spend one full verification on `plaintext` when no account was found.
///
/// Login then takes as long for an unknown email as for a wrong password.
pub async fn verify_unknown_account(plaintext: &str) -> Result<(), PasswordError> {
    let digest = unknown_account_digest().await?;

    verify_password(plaintext, digest).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn hash_never_contains_plaintext() -> TestResult {
        let digest = hash_password("Secret123").await?;

        assert!(!digest.contains("Secret123"));
        assert!(digest.starts_with("$2"), "expected a bcrypt digest, got {digest}");

        Ok(())
    }

    #[tokio::test]
    async fn verify_accepts_matching_password_only() -> TestResult {
        let digest = hash_password("Secret123").await?;

        assert!(verify_password("Secret123", &digest).await?);
        assert!(!verify_password("secret123", &digest).await?);

        Ok(())
    }

    #[tokio::test]
    async fn hashing_is_salted() -> TestResult {
        let first = hash_password("Secret123").await?;
        let second = hash_password("Secret123").await?;

        assert_ne!(first, second, "two digests of the same password must differ");

        Ok(())
    }

    #[tokio::test]
    async fn unknown_accounts_are_verified_at_full_cost() -> TestResult {
        let digest = unknown_account_digest().await?;

        assert!(
            digest.starts_with(&format!("$2b${PASSWORD_HASH_COST}$")),
            "expected a cost {PASSWORD_HASH_COST} digest, got {digest}"
        );
        assert_eq!(unknown_account_digest().await?, digest);
        assert!(!verify_password("Secret123", digest).await?);

        verify_unknown_account("Secret123").await?;

        Ok(())
    }

    #[tokio::test]
    async fn verify_rejects_malformed_digest() {
        let result = verify_password("Secret123", "not-a-digest").await;

        assert!(
            matches!(result, Err(PasswordError::Hash(_))),
            "expected Hash error, got {result:?}"
        );
    }
}
