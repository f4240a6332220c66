//! Integration tests for the MySQL repositories
//!
//! These tests require a running MySQL instance with the gatehouse schema
//! and a DATABASE_URL pointing at it.
//! Run with: cargo test -p gate_infra --test mysql_integration -- --ignored

use chrono::{Duration, Utc};
use uuid::Uuid;

use gate_core::domain::entities::token::RefreshTokenRecord;
use gate_core::repositories::TokenRepository;
use gate_infra::database::create_pool;
use gate_infra::MySqlTokenRepository;
use gate_shared::config::DatabaseConfig;

async fn repository() -> MySqlTokenRepository {
    dotenvy::dotenv().ok();
    let pool = create_pool(&DatabaseConfig::from_env())
        .await
        .expect("Failed to connect to MySQL");
    MySqlTokenRepository::new(pool)
}

fn fresh_record() -> RefreshTokenRecord {
    RefreshTokenRecord::new(
        Uuid::new_v4(),
        1,
        format!("{:0>64}", "integration"),
        Utc::now() + Duration::days(7),
    )
}

#[tokio::test]
#[ignore] // Requires MySQL server
async fn test_save_and_find_round_trip() {
    let repo = repository().await;
    let record = fresh_record();
    let jti = record.jti;

    repo.save(record.clone()).await.unwrap();

    let found = repo.find_by_jti(jti).await.unwrap().unwrap();
    assert_eq!(found.jti, record.jti);
    assert_eq!(found.user_id, record.user_id);
    assert_eq!(found.token_hash, record.token_hash);
    assert!(!found.revoked);

    repo.delete_all_for_user(record.user_id).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires MySQL server
async fn test_duplicate_jti_rejected() {
    let repo = repository().await;
    let record = fresh_record();

    repo.save(record.clone()).await.unwrap();
    let result = repo.save(record.clone()).await;
    assert!(result.is_err());

    repo.delete_all_for_user(record.user_id).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires MySQL server
async fn test_revoke_if_valid_is_one_shot() {
    let repo = repository().await;
    let record = fresh_record();
    let jti = record.jti;
    let hash = record.token_hash.clone();

    repo.save(record.clone()).await.unwrap();

    assert!(repo.revoke_if_valid(jti, &hash).await.unwrap());
    assert!(!repo.revoke_if_valid(jti, &hash).await.unwrap());
    assert!(!repo.is_valid(jti, &hash).await.unwrap());

    repo.delete_all_for_user(record.user_id).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires MySQL server
async fn test_purge_dry_run_predicts_real_run() {
    let repo = repository().await;

    let record = fresh_record();
    let jti = record.jti;
    repo.save(record).await.unwrap();
    repo.revoke(jti).await.unwrap();

    let counted = repo.count_expired_or_revoked().await.unwrap();
    assert!(counted >= 1);

    let purged = repo.purge_expired_or_revoked().await.unwrap();
    assert_eq!(purged, counted);
    assert_eq!(repo.count_expired_or_revoked().await.unwrap(), 0);
}
