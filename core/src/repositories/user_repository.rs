//! User directory trait defining the interface for user record access.
//!
//! The session core treats the directory as read-only apart from the
//! last-login timestamp and the provisioning/deletion paths.

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for user record access
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use gate_core::repositories::UserRepository;
/// use gate_core::domain::entities::user::User;
/// use gate_core::errors::DomainError;
///
/// struct MySqlUserRepository {
///     // database connection pool
/// }
///
/// #[async_trait]
/// impl UserRepository for MySqlUserRepository {
///     async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
///         // Implementation here
///         Ok(None)
///     }
///
///     # async fn create(&self, user: User) -> Result<User, DomainError> { Ok(user) }
///     # async fn update_last_login(&self, user_id: i64) -> Result<(), DomainError> { Ok(()) }
///     # async fn delete_by_username(&self, username: &str) -> Result<bool, DomainError> { Ok(false) }
///     // ... other methods
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by username
    ///
    /// The lookup is case-sensitive; `Admin` and `admin` are distinct.
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with the given username
    /// * `Err(DomainError)` - Directory error occurred
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user record
    ///
    /// # Returns
    /// * `Ok(User)` - The created user with its store-assigned id
    /// * `Err(AuthError::UserAlreadyExists)` - Username already taken
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Record a successful login for the user
    async fn update_last_login(&self, user_id: i64) -> Result<(), DomainError>;

    /// Delete a user record by username
    ///
    /// # Returns
    /// * `Ok(true)` - A user record was removed
    /// * `Ok(false)` - No record matched
    async fn delete_by_username(&self, username: &str) -> Result<bool, DomainError>;
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AuthError;

    #[tokio::test]
    async fn test_mock_create_assigns_id() {
        let repo = mock::MockUserRepository::new();
        let user = User::new("benwyw".to_string(), "hash".to_string());

        let created = repo.create(user).await.unwrap();
        assert!(created.id > 0);

        let found = repo.find_by_username("benwyw").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_mock_duplicate_username() {
        let repo = mock::MockUserRepository::new();
        repo.create(User::new("benwyw".to_string(), "hash".to_string()))
            .await
            .unwrap();

        let result = repo
            .create(User::new("benwyw".to_string(), "other".to_string()))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::UserAlreadyExists))
        ));
    }

    #[tokio::test]
    async fn test_mock_username_lookup_is_case_sensitive() {
        let repo = mock::MockUserRepository::new();
        repo.create(User::new("Benwyw".to_string(), "hash".to_string()))
            .await
            .unwrap();

        assert!(repo.find_by_username("Benwyw").await.unwrap().is_some());
        assert!(repo.find_by_username("benwyw").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mock_update_last_login() {
        let repo = mock::MockUserRepository::new();
        let created = repo
            .create(User::new("benwyw".to_string(), "hash".to_string()))
            .await
            .unwrap();
        assert!(created.last_login_at.is_none());

        repo.update_last_login(created.id).await.unwrap();

        let found = repo.find_by_username("benwyw").await.unwrap().unwrap();
        assert!(found.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_mock_delete_by_username() {
        let repo = mock::MockUserRepository::new();
        repo.create(User::new("benwyw".to_string(), "hash".to_string()))
            .await
            .unwrap();

        assert!(repo.delete_by_username("benwyw").await.unwrap());
        assert!(!repo.delete_by_username("benwyw").await.unwrap());
        assert!(repo.find_by_username("benwyw").await.unwrap().is_none());
    }
}
