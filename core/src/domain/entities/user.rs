//! User entity as supplied by the user directory.
//!
//! The session core reads user records and writes back a last-login
//! timestamp; everything else about the record is owned by the directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default role assigned to newly provisioned users
pub const DEFAULT_ROLE: &str = "USER";

/// Default status assigned to newly provisioned users
pub const DEFAULT_STATUS: &str = "ACTIVE";

/// User entity representing a registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, assigned by the store on insert (0 until persisted)
    pub id: i64,

    /// Unique username, case-sensitive and immutable after creation
    pub username: String,

    /// bcrypt hash of the user's password; never compared as plaintext
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Optional contact email
    pub email: Option<String>,

    /// Free-form role classification, not interpreted by the session core
    pub role: String,

    /// Free-form status classification, not interpreted by the session core
    pub status: String,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,

    /// Timestamp of the user's last successful login
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new User with default role and status
    pub fn new(username: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            username,
            password_hash,
            email: None,
            role: DEFAULT_ROLE.to_string(),
            status: DEFAULT_STATUS.to_string(),
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Sets the contact email
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    /// Sets the role, normalized to uppercase
    pub fn with_role(mut self, role: &str) -> Self {
        self.role = role.trim().to_uppercase();
        self
    }

    /// Sets the status, normalized to uppercase
    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.trim().to_uppercase();
        self
    }

    /// Updates the last login timestamp
    pub fn update_last_login(&mut self) {
        self.last_login_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }
}
