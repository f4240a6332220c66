//! Token module for JWT management
//!
//! This module handles all token-related operations including:
//! - Access and refresh token issuance and parsing
//! - SHA-256 digests of raw refresh tokens
//! - Purge of expired and revoked token records

mod cleanup;
mod codec;
mod config;

#[cfg(test)]
mod tests;

pub use cleanup::{TokenCleanupConfig, TokenCleanupService};
pub use codec::TokenCodec;
pub use config::TokenCodecConfig;
