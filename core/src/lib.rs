//! # Gatehouse Core
//!
//! Core business logic and domain layer for the Gatehouse backend.
//! This crate contains domain entities, the session services, repository
//! interfaces, and error types that form the authentication session core.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::{
    AuthService, AuthServiceConfig, CredentialVerifier, TokenCleanupConfig, TokenCleanupService,
    TokenCodec, TokenCodecConfig,
};
