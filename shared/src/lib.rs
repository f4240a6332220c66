//! Shared utilities and common types for the Gatehouse server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Response structures consumed by the HTTP boundary

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{AppConfig, DatabaseConfig, Environment, JwtConfig, LoggingConfig};
pub use types::{ApiResponse, ErrorResponse};
