//! Session manager orchestrating login, refresh rotation, and logout.
//!
//! All durable state lives in the token record store and the user directory;
//! the service itself holds no mutable state and is shared freely across
//! concurrent callers.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::entities::token::{IssuedRefreshToken, RefreshTokenRecord, TokenPair};
use crate::domain::entities::user::{User, DEFAULT_ROLE, DEFAULT_STATUS};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::token::TokenCodec;

use super::config::AuthServiceConfig;
use super::credentials::CredentialVerifier;

/// Authentication service owning the session invariants
///
/// Per-refresh-token states run `ISSUED -> ACTIVE -> {ROTATED | REVOKED |
/// EXPIRED}`; the three terminal states are indistinguishable to validation
/// but logged distinctly for operators.
pub struct AuthService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    /// User directory for record lookups and last-login writes
    users: Arc<U>,
    /// Token record store, the only holder of durable session state
    tokens: Arc<T>,
    /// Stateless codec over the process-wide signing key
    codec: Arc<TokenCodec>,
    /// Credential verifier for the login path
    verifier: CredentialVerifier<U>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<U, T> AuthService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `users` - User directory
    /// * `tokens` - Token record store
    /// * `codec` - Token codec
    /// * `config` - Service configuration
    pub fn new(
        users: Arc<U>,
        tokens: Arc<T>,
        codec: Arc<TokenCodec>,
        config: AuthServiceConfig,
    ) -> DomainResult<Self> {
        let verifier = CredentialVerifier::new(Arc::clone(&users), config.bcrypt_cost)?;

        Ok(Self {
            users,
            tokens,
            codec,
            verifier,
            config,
        })
    }

    /// Authenticate a user and open a new session
    ///
    /// The only path that creates a first-generation refresh record. Whether
    /// the username or the password was wrong is logged but never surfaced:
    /// both fail as `InvalidCredentials`.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<TokenPair> {
        let user = match self.verifier.verify(username, password).await {
            Ok(user) => user,
            Err(DomainError::Auth(AuthError::UserNotFound)) => {
                info!(username, "Login failed: user not found");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(DomainError::Auth(AuthError::BadCredentials)) => {
                info!(username, "Login failed: bad credentials");
                return Err(AuthError::InvalidCredentials.into());
            }
            // Store and directory faults stay distinct from credential
            // failures.
            Err(other) => return Err(other),
        };

        let access = self.codec.issue_access_token(&user.username)?;
        let refresh = self.issue_and_persist_refresh(&user).await?;

        self.users.update_last_login(user.id).await?;

        info!(username = %user.username, jti = %refresh.jti, "Login success");
        Ok(TokenPair::new(access, refresh))
    }

    /// Redeem a refresh token for a new token pair, rotating it
    ///
    /// Rotation is one-shot: the presented record is revoked before the
    /// successor pair is issued, and the revocation is a conditional update
    /// so that of two concurrent calls with the same token exactly one
    /// succeeds. A legitimate client retry that lost the response fails the
    /// same way a replayed stolen token does.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        let claims = self.codec.parse_refresh_token(refresh_token)?;
        let token_hash = TokenCodec::hash_token(refresh_token);

        if !self.tokens.is_valid(claims.jti, &token_hash).await? {
            info!(jti = %claims.jti, "Refresh denied: token invalid or revoked");
            return Err(TokenError::InvalidOrRevokedToken.into());
        }

        let user = match self.users.find_by_username(&claims.username).await? {
            Some(user) => user,
            None => {
                // The user was deleted after issuance; the session dies with
                // the record rather than silently succeeding.
                info!(username = %claims.username, "Refresh denied: user not found");
                return Err(AuthError::UserNotFound.into());
            }
        };

        // Revoke-then-issue: claim the old record first. Losing this
        // check-and-set means another caller already rotated the token.
        if !self.tokens.revoke_if_valid(claims.jti, &token_hash).await? {
            info!(jti = %claims.jti, "Refresh denied: token already rotated");
            return Err(TokenError::InvalidOrRevokedToken.into());
        }

        let access = self.codec.issue_access_token(&user.username)?;
        let refresh = self.issue_and_persist_refresh(&user).await?;

        info!(
            username = %user.username,
            old_jti = %claims.jti,
            new_jti = %refresh.jti,
            "Refresh success"
        );
        Ok(TokenPair::new(access, refresh))
    }

    /// Close the session behind a refresh token
    ///
    /// Idempotent: malformed tokens, unknown jtis, and already-revoked
    /// records are all success. Only store faults propagate.
    pub async fn logout(&self, refresh_token: &str) -> DomainResult<()> {
        let claims = match self.codec.parse_refresh_token(refresh_token) {
            Ok(claims) => claims,
            Err(DomainError::Token(TokenError::InvalidTokenFormat)) => {
                info!("Logout with unparseable token, nothing to revoke");
                return Ok(());
            }
            Err(other) => return Err(other),
        };

        self.tokens.revoke(claims.jti).await?;
        info!(jti = %claims.jti, "Refresh token revoked");
        Ok(())
    }

    /// Revoke every active session of a user ("sign out everywhere")
    ///
    /// An unknown username is a no-op success.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of sessions revoked
    pub async fn logout_all(&self, username: &str) -> DomainResult<usize> {
        let user = match self.users.find_by_username(username).await? {
            Some(user) => user,
            None => {
                info!(username, "Logout-all for unknown user, nothing to revoke");
                return Ok(0);
            }
        };

        let count = self.tokens.revoke_all_for_user(user.id).await?;
        info!(username, count, "All refresh tokens revoked");
        Ok(count)
    }

    /// Delete a user and every refresh token record they own
    ///
    /// Token records go first so no record is ever left referencing a
    /// missing user id.
    ///
    /// # Returns
    /// * `Ok(bool)` - Whether a user record was removed
    pub async fn delete_user(&self, username: &str) -> DomainResult<bool> {
        if let Some(user) = self.users.find_by_username(username).await? {
            let deleted = self.tokens.delete_all_for_user(user.id).await?;
            info!(username, deleted, "Deleted refresh tokens ahead of user removal");
        }

        let removed = self.users.delete_by_username(username).await?;
        info!(username, removed, "User deletion executed");
        Ok(removed)
    }

    /// Provision a new user record
    ///
    /// The username is trimmed, the password bcrypt-hashed, and role/status
    /// normalized to uppercase with `USER`/`ACTIVE` defaults.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
        role: Option<&str>,
        status: Option<&str>,
    ) -> DomainResult<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DomainError::Validation {
                message: "Username must not be empty".to_string(),
            });
        }
        if password.is_empty() {
            return Err(DomainError::Validation {
                message: "Password must not be empty".to_string(),
            });
        }

        let password_hash =
            bcrypt::hash(password, self.config.bcrypt_cost).map_err(|e| DomainError::Internal {
                message: format!("Password hashing failed: {}", e),
            })?;

        let user = User::new(username.to_string(), password_hash)
            .with_email(email.map(str::to_string))
            .with_role(role.unwrap_or(DEFAULT_ROLE))
            .with_status(status.unwrap_or(DEFAULT_STATUS));

        let created = self.users.create(user).await?;
        info!(username = %created.username, id = created.id, "User created");
        Ok(created)
    }

    /// Issue a refresh token and persist its record, retrying on collision
    ///
    /// A jti collision cannot happen under correct v4 generation but is
    /// handled anyway: the colliding insert is retried with a fresh jti and
    /// never surfaced as a client error.
    async fn issue_and_persist_refresh(&self, user: &User) -> DomainResult<IssuedRefreshToken> {
        for attempt in 0..self.config.jti_retry_limit {
            let issued = self.codec.issue_refresh_token(&user.username)?;
            let record = RefreshTokenRecord::new(
                issued.jti,
                user.id,
                TokenCodec::hash_token(&issued.token),
                issued.expires_at,
            );

            match self.tokens.save(record).await {
                Ok(_) => return Ok(issued),
                Err(DomainError::Token(TokenError::DuplicateJti)) => {
                    warn!(jti = %issued.jti, attempt, "jti collision on insert, retrying");
                }
                Err(other) => return Err(other),
            }
        }

        Err(DomainError::Internal {
            message: "Exhausted jti generation attempts".to_string(),
        })
    }
}
