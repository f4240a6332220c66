//! Domain-specific error types for authentication and token operations
//!
//! The outward-facing error messages are deliberately generic; the reason a
//! sub-check failed is logged, never returned to the caller.

use gate_shared::types::response::ErrorResponse;
use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The single credential failure surfaced to callers. Whether the
    /// username or the password was wrong is never distinguishable here.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Password mismatch, internal to the credential verifier; collapsed
    /// into `InvalidCredentials` at the session manager boundary.
    #[error("Bad credentials")]
    BadCredentials,

    /// No user record for the given username. Internal to the credential
    /// verifier on login (merged into `InvalidCredentials`); surfaced as-is
    /// on refresh when the token's user has been deleted.
    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserAlreadyExists,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed, unsigned, corrupt, or wrong-kind token
    #[error("Invalid token format")]
    InvalidTokenFormat,

    /// Well-formed token that is not currently valid: unknown jti, hash
    /// mismatch, expired, or already revoked. Callers cannot tell which.
    #[error("Invalid or revoked token")]
    InvalidOrRevokedToken,

    /// jti collision on insert. An internal fault retried with a fresh jti,
    /// never surfaced to clients.
    #[error("Duplicate token identifier")]
    DuplicateJti,

    #[error("Token generation failed")]
    GenerationFailed,
}

/// Convert AuthError to ErrorResponse
impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        let error_code = match &err {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            // Internal variants should be merged before reaching a response,
            // but map them to the generic code rather than leak the cause.
            AuthError::BadCredentials => "INVALID_CREDENTIALS",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::UserAlreadyExists => "USER_ALREADY_EXISTS",
        };

        ErrorResponse::new(error_code, err.to_string())
    }
}

/// Convert TokenError to ErrorResponse
impl From<TokenError> for ErrorResponse {
    fn from(err: TokenError) -> Self {
        let error_code = match &err {
            TokenError::InvalidTokenFormat => "INVALID_TOKEN_FORMAT",
            TokenError::InvalidOrRevokedToken => "INVALID_OR_REVOKED_TOKEN",
            TokenError::DuplicateJti => "INTERNAL_ERROR",
            TokenError::GenerationFailed => "INTERNAL_ERROR",
        };

        ErrorResponse::new(error_code, err.to_string())
    }
}
