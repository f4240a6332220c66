//! # Infrastructure Layer
//!
//! Concrete implementations of the Gatehouse persistence boundaries:
//! MySQL-backed repositories for the token record store and the user
//! directory, plus connection pool management.

pub mod database;

pub use database::mysql::{MySqlTokenRepository, MySqlUserRepository};
pub use database::create_pool;
