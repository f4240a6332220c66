//! Unit tests for the token cleanup service

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::repositories::token_repository::mock::MockTokenRepository;
use crate::repositories::TokenRepository;
use crate::services::token::{TokenCleanupConfig, TokenCleanupService};

fn active_record() -> RefreshTokenRecord {
    RefreshTokenRecord::new(
        Uuid::new_v4(),
        1,
        "hash".to_string(),
        Utc::now() + Duration::days(7),
    )
}

fn expired_record() -> RefreshTokenRecord {
    RefreshTokenRecord::new(
        Uuid::new_v4(),
        1,
        "hash".to_string(),
        Utc::now() - Duration::hours(1),
    )
}

async fn seeded_repository() -> Arc<MockTokenRepository> {
    let repo = Arc::new(MockTokenRepository::new());

    repo.save(active_record()).await.unwrap();
    repo.save(expired_record()).await.unwrap();

    let revoked = active_record();
    let revoked_jti = revoked.jti;
    repo.save(revoked).await.unwrap();
    repo.revoke(revoked_jti).await.unwrap();

    repo
}

#[tokio::test]
async fn test_dry_run_does_not_mutate() {
    let repo = seeded_repository().await;
    let service = TokenCleanupService::new(Arc::clone(&repo), TokenCleanupConfig::default());

    let counted = service.purge(true).await.unwrap();

    assert_eq!(counted, 2);
    assert_eq!(repo.len().await, 3);
}

#[tokio::test]
async fn test_dry_run_predicts_real_run() {
    let repo = seeded_repository().await;
    let service = TokenCleanupService::new(Arc::clone(&repo), TokenCleanupConfig::default());

    let counted = service.purge(true).await.unwrap();
    let deleted = service.purge(false).await.unwrap();

    assert_eq!(counted, deleted);
    assert_eq!(service.purge(true).await.unwrap(), 0);
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_purge_on_empty_store() {
    let repo = Arc::new(MockTokenRepository::new());
    let service = TokenCleanupService::new(Arc::clone(&repo), TokenCleanupConfig::default());

    assert_eq!(service.purge(true).await.unwrap(), 0);
    assert_eq!(service.purge(false).await.unwrap(), 0);
}
