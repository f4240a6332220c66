//! Credential verification against the user directory.

use std::sync::Arc;

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::UserRepository;

/// Verifies username/password pairs against stored bcrypt hashes
///
/// Returns fine-grained failures (`UserNotFound` vs `BadCredentials`) for
/// audit logging; the session manager collapses both into a single
/// `InvalidCredentials` before anything reaches a caller.
pub struct CredentialVerifier<U: UserRepository> {
    users: Arc<U>,
    /// Compared against when the user is absent, so a miss costs one bcrypt
    /// verification just like a wrong password does
    dummy_hash: String,
}

impl<U: UserRepository> CredentialVerifier<U> {
    /// Creates a new verifier
    ///
    /// # Arguments
    ///
    /// * `users` - User directory
    /// * `bcrypt_cost` - Cost factor matching the directory's stored hashes
    pub fn new(users: Arc<U>, bcrypt_cost: u32) -> DomainResult<Self> {
        let dummy_hash =
            bcrypt::hash("gatehouse-timing-pad", bcrypt_cost).map_err(|e| DomainError::Internal {
                message: format!("Failed to prepare credential verifier: {}", e),
            })?;

        Ok(Self { users, dummy_hash })
    }

    /// Checks a username/password pair
    ///
    /// # Returns
    /// * `Ok(User)` - Credentials match
    /// * `Err(AuthError::UserNotFound)` - No such user
    /// * `Err(AuthError::BadCredentials)` - Password mismatch
    pub async fn verify(&self, username: &str, password: &str) -> DomainResult<User> {
        match self.users.find_by_username(username).await? {
            Some(user) => {
                let matches =
                    bcrypt::verify(password, &user.password_hash).map_err(|e| {
                        DomainError::Internal {
                            message: format!("Password verification failed: {}", e),
                        }
                    })?;

                if matches {
                    Ok(user)
                } else {
                    Err(AuthError::BadCredentials.into())
                }
            }
            None => {
                // Keep the miss path as expensive as the mismatch path.
                let _ = bcrypt::verify(password, &self.dummy_hash);
                Err(AuthError::UserNotFound.into())
            }
        }
    }
}
