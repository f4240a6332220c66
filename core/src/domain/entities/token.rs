//! Token entities for JWT-based session management.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token expiration time (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Refresh token expiration time (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// JWT issuer
pub const JWT_ISSUER: &str = "gatehouse";

/// JWT audience
pub const JWT_AUDIENCE: &str = "gatehouse-api";

/// Discriminates the two token kinds carried in JWT claims.
///
/// A refresh token must never be accepted where an access token is expected,
/// so the kind is part of the signed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,

    /// Token kind (access or refresh)
    pub kind: TokenKind,
}

impl Claims {
    /// Creates new claims for an access token
    ///
    /// # Arguments
    ///
    /// * `username` - The authenticated username
    /// * `expires_in` - Access token lifetime
    pub fn new_access(username: &str, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiry = now + expires_in;

        Self {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: JWT_ISSUER.to_string(),
            aud: JWT_AUDIENCE.to_string(),
            jti: Uuid::new_v4().to_string(),
            kind: TokenKind::Access,
        }
    }

    /// Creates new claims for a refresh token
    ///
    /// The `jti` is supplied by the caller because it doubles as the lookup
    /// key of the persisted refresh record.
    pub fn new_refresh(username: &str, jti: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiry = now + expires_in;

        Self {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: JWT_ISSUER.to_string(),
            aud: JWT_AUDIENCE.to_string(),
            jti: jti.to_string(),
            kind: TokenKind::Refresh,
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.exp
    }

    /// Checks if the claims are valid (not expired and after nbf)
    pub fn is_valid(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.nbf && now < self.exp
    }

    /// Expiration as an absolute UTC timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.exp, 0)
    }
}

/// Refresh token record persisted in the token record store
///
/// Only the SHA-256 hash of the raw token is stored; the raw token string
/// exists in memory during issuance and presentation, never at rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Unique token identifier, embedded in the raw token and used as the
    /// lookup key
    pub jti: Uuid,

    /// User ID this token belongs to
    pub user_id: i64,

    /// Hashed token value
    pub token_hash: String,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Whether the token has been revoked; monotonic, never reset to false
    pub revoked: bool,
}

impl RefreshTokenRecord {
    /// Creates a new refresh token record
    pub fn new(jti: Uuid, user_id: i64, token_hash: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            jti,
            user_id,
            token_hash,
            created_at: Utc::now(),
            expires_at,
            revoked: false,
        }
    }

    /// Checks if the record has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Checks if the record is valid (neither expired nor revoked)
    pub fn is_valid(&self) -> bool {
        !self.is_expired() && !self.revoked
    }

    /// Revokes the record
    pub fn revoke(&mut self) {
        self.revoked = true;
    }
}

/// A freshly issued access token with its expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Signed JWT string
    pub token: String,

    /// Absolute expiry timestamp
    pub expires_at: DateTime<Utc>,
}

/// A freshly issued refresh token before persistence
///
/// The raw token is returned to the client; the caller persists a record
/// containing its hash under `jti`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedRefreshToken {
    /// Unique token identifier embedded in the raw token
    pub jti: Uuid,

    /// Raw signed JWT string
    pub token: String,

    /// Absolute expiry timestamp
    pub expires_at: DateTime<Utc>,
}

/// Identity recovered from a presented refresh token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenClaims {
    /// Unique token identifier
    pub jti: Uuid,

    /// Username the token was issued to
    pub username: String,
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token expiry timestamp
    pub access_expires_at: DateTime<Utc>,

    /// Refresh token expiry timestamp
    pub refresh_expires_at: DateTime<Utc>,
}

impl TokenPair {
    /// Creates a new token pair from freshly issued tokens
    pub fn new(access: AccessToken, refresh: IssuedRefreshToken) -> Self {
        Self {
            access_token: access.token,
            refresh_token: refresh.token,
            access_expires_at: access.expires_at,
            refresh_expires_at: refresh.expires_at,
        }
    }
}
