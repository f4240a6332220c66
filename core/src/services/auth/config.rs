//! Configuration for the authentication service

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// bcrypt cost factor used when provisioning users
    pub bcrypt_cost: u32,
    /// How many fresh jtis to try when an insert hits a collision
    pub jti_retry_limit: u32,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: bcrypt::DEFAULT_COST,
            jti_retry_limit: 3,
        }
    }
}
