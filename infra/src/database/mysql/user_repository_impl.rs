//! MySQL implementation of the UserRepository trait.
//!
//! Expected schema (`username` carries a binary collation so lookups stay
//! case-sensitive):
//!
//! ```sql
//! CREATE TABLE users (
//!     id            BIGINT       NOT NULL AUTO_INCREMENT PRIMARY KEY,
//!     username      VARCHAR(64)  NOT NULL COLLATE utf8mb4_bin UNIQUE,
//!     password_hash VARCHAR(100) NOT NULL,
//!     email         VARCHAR(255) NULL,
//!     role          VARCHAR(32)  NOT NULL,
//!     status        VARCHAR(32)  NOT NULL,
//!     created_at    DATETIME(6)  NOT NULL,
//!     updated_at    DATETIME(6)  NOT NULL,
//!     last_login_at DATETIME(6)  NULL
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use gate_core::domain::entities::user::User;
use gate_core::errors::{AuthError, DomainError};
use gate_core::repositories::UserRepository;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        Ok(User {
            id: row.try_get("id").map_err(|e| DomainError::Internal {
                message: format!("Failed to get id: {}", e),
            })?,
            username: row.try_get("username").map_err(|e| DomainError::Internal {
                message: format!("Failed to get username: {}", e),
            })?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get password_hash: {}", e),
                })?,
            email: row.try_get("email").map_err(|e| DomainError::Internal {
                message: format!("Failed to get email: {}", e),
            })?,
            role: row.try_get("role").map_err(|e| DomainError::Internal {
                message: format!("Failed to get role: {}", e),
            })?,
            status: row.try_get("status").map_err(|e| DomainError::Internal {
                message: format!("Failed to get status: {}", e),
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get updated_at: {}", e),
                })?,
            last_login_at: row
                .try_get::<Option<DateTime<Utc>>, _>("last_login_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get last_login_at: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let query = r#"
            SELECT id, username, password_hash, email, role, status,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE username = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find user: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, mut user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                username, password_hash, email, role, status,
                created_at, updated_at, last_login_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.email)
            .bind(&user.role)
            .bind(&user.status)
            .bind(user.created_at)
            .bind(user.updated_at)
            .bind(user.last_login_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match e.as_database_error() {
                Some(db_err) if db_err.is_unique_violation() => {
                    DomainError::Auth(AuthError::UserAlreadyExists)
                }
                _ => DomainError::Internal {
                    message: format!("Failed to create user: {}", e),
                },
            })?;

        user.id = result.last_insert_id() as i64;
        Ok(user)
    }

    async fn update_last_login(&self, user_id: i64) -> Result<(), DomainError> {
        let query = r#"
            UPDATE users
            SET last_login_at = ?, updated_at = ?
            WHERE id = ?
        "#;

        let now = Utc::now();
        sqlx::query(query)
            .bind(now)
            .bind(now)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update last login: {}", e),
            })?;

        Ok(())
    }

    async fn delete_by_username(&self, username: &str) -> Result<bool, DomainError> {
        let query = "DELETE FROM users WHERE username = ?";

        let result = sqlx::query(query)
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete user: {}", e),
            })?;

        Ok(result.rows_affected() > 0)
    }
}
