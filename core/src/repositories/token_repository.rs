//! Token record store trait defining the interface for refresh token persistence.
//!
//! One record is kept per issued refresh token, keyed by its unique `jti`.
//! Only the token's hash is persisted; raw tokens never reach the store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

/// Repository trait for refresh token record persistence
///
/// Implementations must provide atomicity for the conditional update in
/// [`revoke_if_valid`](TokenRepository::revoke_if_valid): the session
/// manager's rotation guarantee (at most one success per presented token)
/// rests entirely on it.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Save a new refresh token record
    ///
    /// # Arguments
    /// * `record` - The record to persist
    ///
    /// # Returns
    /// * `Ok(RefreshTokenRecord)` - The saved record
    /// * `Err(TokenError::DuplicateJti)` - A record with this jti already exists
    ///
    /// # Example
    /// ```no_run
    /// # use uuid::Uuid;
    /// # use chrono::{Duration, Utc};
    /// # use gate_core::repositories::TokenRepository;
    /// # use gate_core::domain::entities::token::RefreshTokenRecord;
    /// # async fn example(repo: &impl TokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let record = RefreshTokenRecord::new(
    ///     Uuid::new_v4(),
    ///     42,
    ///     "sha256_hash_of_token".to_string(),
    ///     Utc::now() + Duration::days(7),
    /// );
    ///
    /// let saved = repo.save(record).await?;
    /// println!("Record saved with jti: {}", saved.jti);
    /// # Ok(())
    /// # }
    /// ```
    async fn save(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError>;

    /// Find a refresh token record by its jti
    ///
    /// # Returns
    /// * `Ok(Some(RefreshTokenRecord))` - Record found
    /// * `Ok(None)` - No record with the given jti
    /// * `Err(DomainError)` - Store error occurred
    async fn find_by_jti(&self, jti: Uuid) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Check whether a record is currently valid
    ///
    /// True iff a record exists with the given jti, its stored hash matches
    /// `token_hash`, it is not revoked, and it has not expired.
    async fn is_valid(&self, jti: Uuid, token_hash: &str) -> Result<bool, DomainError> {
        match self.find_by_jti(jti).await? {
            Some(record) => Ok(record.is_valid() && record.token_hash == token_hash),
            None => Ok(false),
        }
    }

    /// Revoke a record by jti
    ///
    /// Idempotent: revoking an already-revoked or unknown jti is a no-op
    /// success.
    async fn revoke(&self, jti: Uuid) -> Result<(), DomainError>;

    /// Conditionally revoke a record that is still valid
    ///
    /// Atomically sets `revoked` iff the record exists, matches `token_hash`,
    /// is not revoked, and has not expired. Returns whether THIS call flipped
    /// the flag; concurrent callers racing on the same jti see exactly one
    /// `true`.
    ///
    /// # Example
    /// ```no_run
    /// # use uuid::Uuid;
    /// # use gate_core::repositories::TokenRepository;
    /// # async fn example(repo: &impl TokenRepository, jti: Uuid) -> Result<(), Box<dyn std::error::Error>> {
    /// if repo.revoke_if_valid(jti, "sha256_hash_of_token").await? {
    ///     println!("Rotation claimed");
    /// } else {
    ///     println!("Token already spent");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn revoke_if_valid(&self, jti: Uuid, token_hash: &str) -> Result<bool, DomainError>;

    /// Revoke every non-revoked record for a user
    ///
    /// Used for "sign out everywhere".
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records revoked by this call
    async fn revoke_all_for_user(&self, user_id: i64) -> Result<usize, DomainError>;

    /// Hard-delete every record for a user
    ///
    /// Only used during user deletion, before the user row itself goes.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted
    async fn delete_all_for_user(&self, user_id: i64) -> Result<usize, DomainError>;

    /// Count records that a purge would delete
    ///
    /// Must evaluate the exact predicate of
    /// [`purge_expired_or_revoked`](TokenRepository::purge_expired_or_revoked)
    /// without mutating anything, so a dry run predicts the real run.
    async fn count_expired_or_revoked(&self) -> Result<usize, DomainError>;

    /// Delete records that are revoked or past their expiry
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted
    async fn purge_expired_or_revoked(&self) -> Result<usize, DomainError>;
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TokenError;
    use chrono::{Duration, Utc};

    fn record_for(user_id: i64, hash: &str) -> RefreshTokenRecord {
        RefreshTokenRecord::new(
            Uuid::new_v4(),
            user_id,
            hash.to_string(),
            Utc::now() + Duration::days(7),
        )
    }

    #[tokio::test]
    async fn test_mock_save_and_find() {
        let repo = mock::MockTokenRepository::new();
        let record = record_for(1, "hash_a");
        let jti = record.jti;

        repo.save(record).await.unwrap();

        let found = repo.find_by_jti(jti).await.unwrap();
        assert_eq!(found.unwrap().token_hash, "hash_a");
    }

    #[tokio::test]
    async fn test_mock_duplicate_jti() {
        let repo = mock::MockTokenRepository::new();
        let record = record_for(1, "hash_a");
        let duplicate = record.clone();

        repo.save(record).await.unwrap();
        let result = repo.save(duplicate).await;

        assert!(matches!(
            result,
            Err(DomainError::Token(TokenError::DuplicateJti))
        ));
    }

    #[tokio::test]
    async fn test_mock_is_valid_requires_matching_hash() {
        let repo = mock::MockTokenRepository::new();
        let record = record_for(1, "hash_a");
        let jti = record.jti;
        repo.save(record).await.unwrap();

        assert!(repo.is_valid(jti, "hash_a").await.unwrap());
        assert!(!repo.is_valid(jti, "hash_b").await.unwrap());
        assert!(!repo.is_valid(Uuid::new_v4(), "hash_a").await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_revoke_is_idempotent() {
        let repo = mock::MockTokenRepository::new();
        let record = record_for(1, "hash_a");
        let jti = record.jti;
        repo.save(record).await.unwrap();

        repo.revoke(jti).await.unwrap();
        repo.revoke(jti).await.unwrap();
        // Unknown jti is also a no-op success.
        repo.revoke(Uuid::new_v4()).await.unwrap();

        assert!(!repo.is_valid(jti, "hash_a").await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_revoke_if_valid_single_winner() {
        let repo = mock::MockTokenRepository::new();
        let record = record_for(1, "hash_a");
        let jti = record.jti;
        repo.save(record).await.unwrap();

        assert!(repo.revoke_if_valid(jti, "hash_a").await.unwrap());
        assert!(!repo.revoke_if_valid(jti, "hash_a").await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_revoke_if_valid_rejects_wrong_hash() {
        let repo = mock::MockTokenRepository::new();
        let record = record_for(1, "hash_a");
        let jti = record.jti;
        repo.save(record).await.unwrap();

        assert!(!repo.revoke_if_valid(jti, "hash_b").await.unwrap());
        assert!(repo.is_valid(jti, "hash_a").await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_expired_record_never_valid() {
        let repo = mock::MockTokenRepository::new();
        let mut record = record_for(1, "hash_a");
        record.expires_at = Utc::now() - Duration::days(1);
        let jti = record.jti;
        repo.save(record).await.unwrap();

        assert!(!repo.is_valid(jti, "hash_a").await.unwrap());
        assert!(!repo.revoke_if_valid(jti, "hash_a").await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_revoke_all_for_user() {
        let repo = mock::MockTokenRepository::new();
        for _ in 0..3 {
            repo.save(record_for(7, "hash")).await.unwrap();
        }
        repo.save(record_for(8, "hash")).await.unwrap();

        let count = repo.revoke_all_for_user(7).await.unwrap();
        assert_eq!(count, 3);

        // Second pass has nothing left to revoke.
        assert_eq!(repo.revoke_all_for_user(7).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mock_delete_all_for_user() {
        let repo = mock::MockTokenRepository::new();
        for _ in 0..3 {
            repo.save(record_for(7, "hash")).await.unwrap();
        }
        repo.save(record_for(8, "hash")).await.unwrap();

        let deleted = repo.delete_all_for_user(7).await.unwrap();
        assert_eq!(deleted, 3);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_mock_purge_matches_count() {
        let repo = mock::MockTokenRepository::new();

        let mut expired = record_for(1, "hash");
        expired.expires_at = Utc::now() - Duration::hours(1);
        repo.save(expired).await.unwrap();

        let revoked = record_for(1, "hash");
        let revoked_jti = revoked.jti;
        repo.save(revoked).await.unwrap();
        repo.revoke(revoked_jti).await.unwrap();

        repo.save(record_for(1, "hash")).await.unwrap();

        let counted = repo.count_expired_or_revoked().await.unwrap();
        assert_eq!(counted, 2);

        let purged = repo.purge_expired_or_revoked().await.unwrap();
        assert_eq!(purged, counted);

        assert_eq!(repo.count_expired_or_revoked().await.unwrap(), 0);
        assert_eq!(repo.len().await, 1);
    }
}
