/*!
 * Account entity models.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full account management rights
    Admin,
    /// Regular account
    Member,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Member => write!(f, "member"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "member" => Ok(UserRole::Member),
            _ => Err(anyhow::anyhow!("Invalid user role: {}", s)),
        }
    }
}

/// A persisted user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Row id
    pub id: i64,

    /// Unique username
    pub username: String,

    /// Salted, iterated password digest
    pub password_hash: String,

    /// Account role
    pub role: UserRole,

    /// Creation timestamp (RFC 3339)
    pub created_at: String,

    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

impl UserRecord {
    /// Create a new user record with current timestamps.
    ///
    /// The id is zero until the record is inserted.
    pub fn new(username: String, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: 0,
            username,
            password_hash,
            role,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Whether this account has admin rights
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// A persisted login session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque session token
    pub token: String,

    /// Owning user id
    pub user_id: i64,

    /// Creation timestamp (RFC 3339)
    pub created_at: String,

    /// Expiry timestamp (RFC 3339)
    pub expires_at: String,
}

impl SessionRecord {
    /// Create a new session for a user with a fresh random token
    pub fn new(user_id: i64, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            token: Uuid::new_v4().to_string(),
            user_id,
            created_at: now.to_rfc3339(),
            expires_at: (now + ttl).to_rfc3339(),
        }
    }

    /// Whether the session has expired.
    ///
    /// An unparseable expiry timestamp counts as expired.
    pub fn is_expired(&self) -> bool {
        match DateTime::parse_from_rfc3339(&self.expires_at) {
            Ok(expires) => expires.with_timezone(&Utc) <= Utc::now(),
            Err(_) => true,
        }
    }

    /// Short token prefix for logging
    pub fn token_prefix(&self) -> &str {
        &self.token[..self.token.len().min(8)]
    }
}
