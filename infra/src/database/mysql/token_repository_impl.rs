//! MySQL implementation of the TokenRepository trait.
//!
//! Expected schema (`jti` is the primary lookup key; the `user_id` index
//! keeps the per-user bulk operations efficient):
//!
//! ```sql
//! CREATE TABLE refresh_tokens (
//!     jti        CHAR(36)    NOT NULL PRIMARY KEY,
//!     user_id    BIGINT      NOT NULL,
//!     token_hash CHAR(64)    NOT NULL,
//!     created_at DATETIME(6) NOT NULL,
//!     expires_at DATETIME(6) NOT NULL,
//!     revoked    BOOLEAN     NOT NULL DEFAULT FALSE,
//!     KEY idx_refresh_tokens_user_id (user_id)
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use gate_core::domain::entities::token::RefreshTokenRecord;
use gate_core::errors::{DomainError, TokenError};
use gate_core::repositories::TokenRepository;

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to RefreshTokenRecord entity
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<RefreshTokenRecord, DomainError> {
        let jti: String = row.try_get("jti").map_err(|e| DomainError::Internal {
            message: format!("Failed to get jti: {}", e),
        })?;

        Ok(RefreshTokenRecord {
            jti: Uuid::parse_str(&jti).map_err(|e| DomainError::Internal {
                message: format!("Invalid jti UUID: {}", e),
            })?,
            user_id: row.try_get("user_id").map_err(|e| DomainError::Internal {
                message: format!("Failed to get user_id: {}", e),
            })?,
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get token_hash: {}", e),
                })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get expires_at: {}", e),
                })?,
            revoked: row.try_get("revoked").map_err(|e| DomainError::Internal {
                message: format!("Failed to get revoked: {}", e),
            })?,
        })
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn save(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (
                jti, user_id, token_hash, created_at, expires_at, revoked
            ) VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.jti.to_string())
            .bind(record.user_id)
            .bind(&record.token_hash)
            .bind(record.created_at)
            .bind(record.expires_at)
            .bind(record.revoked)
            .execute(&self.pool)
            .await
            .map_err(|e| match e.as_database_error() {
                Some(db_err) if db_err.is_unique_violation() => {
                    DomainError::Token(TokenError::DuplicateJti)
                }
                _ => DomainError::Internal {
                    message: format!("Failed to save refresh token: {}", e),
                },
            })?;

        Ok(record)
    }

    async fn find_by_jti(&self, jti: Uuid) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let query = r#"
            SELECT jti, user_id, token_hash, created_at, expires_at, revoked
            FROM refresh_tokens
            WHERE jti = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(jti.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find refresh token: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn is_valid(&self, jti: Uuid, token_hash: &str) -> Result<bool, DomainError> {
        let query = r#"
            SELECT EXISTS(
                SELECT 1 FROM refresh_tokens
                WHERE jti = ?
                    AND token_hash = ?
                    AND revoked = FALSE
                    AND expires_at > ?
            ) AS valid
        "#;

        let row = sqlx::query(query)
            .bind(jti.to_string())
            .bind(token_hash)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to check token validity: {}", e),
            })?;

        let valid: i64 = row.try_get("valid").map_err(|e| DomainError::Internal {
            message: format!("Failed to get validity result: {}", e),
        })?;

        Ok(valid == 1)
    }

    async fn revoke(&self, jti: Uuid) -> Result<(), DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE jti = ? AND revoked = FALSE
        "#;

        sqlx::query(query)
            .bind(jti.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to revoke token: {}", e),
            })?;

        Ok(())
    }

    async fn revoke_if_valid(&self, jti: Uuid, token_hash: &str) -> Result<bool, DomainError> {
        // The row-level write lock of the conditional UPDATE makes this the
        // check-and-set the rotation sequence depends on: of two concurrent
        // callers exactly one observes rows_affected = 1.
        let query = r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE jti = ?
                AND token_hash = ?
                AND revoked = FALSE
                AND expires_at > ?
        "#;

        let result = sqlx::query(query)
            .bind(jti.to_string())
            .bind(token_hash)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to conditionally revoke token: {}", e),
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> Result<usize, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE user_id = ? AND revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to revoke user tokens: {}", e),
            })?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_all_for_user(&self, user_id: i64) -> Result<usize, DomainError> {
        let query = "DELETE FROM refresh_tokens WHERE user_id = ?";

        let result = sqlx::query(query)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete user tokens: {}", e),
            })?;

        Ok(result.rows_affected() as usize)
    }

    async fn count_expired_or_revoked(&self) -> Result<usize, DomainError> {
        // Same predicate as purge_expired_or_revoked, read-only.
        let query = r#"
            SELECT COUNT(*) AS stale
            FROM refresh_tokens
            WHERE revoked = TRUE OR expires_at <= ?
        "#;

        let row = sqlx::query(query)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to count stale tokens: {}", e),
            })?;

        let stale: i64 = row.try_get("stale").map_err(|e| DomainError::Internal {
            message: format!("Failed to get count result: {}", e),
        })?;

        Ok(stale as usize)
    }

    async fn purge_expired_or_revoked(&self) -> Result<usize, DomainError> {
        let query = r#"
            DELETE FROM refresh_tokens
            WHERE revoked = TRUE OR expires_at <= ?
        "#;

        let result = sqlx::query(query)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to purge stale tokens: {}", e),
            })?;

        Ok(result.rows_affected() as usize)
    }
}
