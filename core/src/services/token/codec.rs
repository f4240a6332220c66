//! Stateless codec producing and parsing the two token kinds.

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::entities::token::{
    AccessToken, Claims, IssuedRefreshToken, RefreshTokenClaims, TokenKind, JWT_AUDIENCE,
    JWT_ISSUER,
};
use crate::errors::{DomainError, DomainResult, TokenError};

use super::config::TokenCodecConfig;

/// Codec for JWT access and refresh tokens
///
/// Pure functions over a process-wide signing key; the codec never touches
/// the token record store. Refresh validity beyond signature and format is
/// the store's call.
pub struct TokenCodec {
    config: TokenCodecConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_validation: Validation,
    refresh_validation: Validation,
}

impl TokenCodec {
    /// Creates a new token codec from configuration
    pub fn new(config: TokenCodecConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut access_validation = Validation::new(Algorithm::HS256);
        access_validation.set_issuer(&[JWT_ISSUER]);
        access_validation.set_audience(&[JWT_AUDIENCE]);
        access_validation.validate_exp = true;
        access_validation.validate_nbf = true;

        // Expiry of a presented refresh token is enforced against the stored
        // record, the single authority; parsing checks signature and shape.
        let mut refresh_validation = Validation::new(Algorithm::HS256);
        refresh_validation.set_issuer(&[JWT_ISSUER]);
        refresh_validation.set_audience(&[JWT_AUDIENCE]);
        refresh_validation.validate_exp = false;
        refresh_validation.validate_nbf = true;

        Self {
            config,
            encoding_key,
            decoding_key,
            access_validation,
            refresh_validation,
        }
    }

    /// Issues a short-lived, self-contained access token
    ///
    /// Verification does not require a store lookup.
    pub fn issue_access_token(&self, username: &str) -> DomainResult<AccessToken> {
        let claims = Claims::new_access(
            username,
            Duration::minutes(self.config.access_token_expiry_minutes),
        );
        let token = self.encode_jwt(&claims)?;
        let expires_at = claims.expires_at().ok_or_else(|| DomainError::Internal {
            message: "Invalid expiry timestamp".to_string(),
        })?;

        Ok(AccessToken { token, expires_at })
    }

    /// Issues a long-lived refresh token with a fresh jti
    ///
    /// The jti is embedded in the raw token so it can be recovered on
    /// presentation without a store round trip; the caller persists the
    /// record under it.
    pub fn issue_refresh_token(&self, username: &str) -> DomainResult<IssuedRefreshToken> {
        let jti = Uuid::new_v4();
        let claims = Claims::new_refresh(
            username,
            jti,
            Duration::days(self.config.refresh_token_expiry_days),
        );
        let token = self.encode_jwt(&claims)?;
        let expires_at = claims.expires_at().ok_or_else(|| DomainError::Internal {
            message: "Invalid expiry timestamp".to_string(),
        })?;

        Ok(IssuedRefreshToken {
            jti,
            token,
            expires_at,
        })
    }

    /// Parses a presented refresh token and recovers its identity
    ///
    /// Fails with `InvalidTokenFormat` if the token is malformed, fails the
    /// signature check, or is not a refresh token.
    pub fn parse_refresh_token(&self, token: &str) -> DomainResult<RefreshTokenClaims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.refresh_validation)
            .map_err(|_| DomainError::Token(TokenError::InvalidTokenFormat))?;

        let claims = token_data.claims;
        if claims.kind != TokenKind::Refresh {
            return Err(TokenError::InvalidTokenFormat.into());
        }

        let jti = Uuid::parse_str(&claims.jti)
            .map_err(|_| DomainError::Token(TokenError::InvalidTokenFormat))?;

        Ok(RefreshTokenClaims {
            jti,
            username: claims.sub,
        })
    }

    /// Verifies an access token and returns its claims
    pub fn verify_access_token(&self, token: &str) -> DomainResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.access_validation)
            .map_err(|e| {
                if e.kind() == &jsonwebtoken::errors::ErrorKind::ExpiredSignature {
                    DomainError::Token(TokenError::InvalidOrRevokedToken)
                } else {
                    DomainError::Token(TokenError::InvalidTokenFormat)
                }
            })?;

        if token_data.claims.kind != TokenKind::Access {
            return Err(TokenError::InvalidTokenFormat.into());
        }

        Ok(token_data.claims)
    }

    /// Hashes a raw token for storage and lookup
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Encodes claims into a signed JWT
    fn encode_jwt(&self, claims: &Claims) -> DomainResult<String> {
        let header = Header::new(Algorithm::HS256);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::GenerationFailed))
    }
}
