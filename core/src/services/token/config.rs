//! Configuration for the token codec

use gate_shared::config::JwtConfig;

use crate::domain::entities::token::{ACCESS_TOKEN_EXPIRY_MINUTES, REFRESH_TOKEN_EXPIRY_DAYS};

/// Configuration for the token codec
///
/// Loaded once at process start and held immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct TokenCodecConfig {
    /// JWT signing secret
    pub secret: String,
    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,
    /// Refresh token expiry in days
    pub refresh_token_expiry_days: i64,
}

impl Default for TokenCodecConfig {
    fn default() -> Self {
        Self {
            secret: "development-secret-please-change-in-production".to_string(),
            access_token_expiry_minutes: ACCESS_TOKEN_EXPIRY_MINUTES,
            refresh_token_expiry_days: REFRESH_TOKEN_EXPIRY_DAYS,
        }
    }
}

impl From<&JwtConfig> for TokenCodecConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            access_token_expiry_minutes: config.access_token_expiry / 60,
            refresh_token_expiry_days: config.refresh_token_expiry / 86400,
        }
    }
}
