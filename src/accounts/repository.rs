/*!
 * Repository layer for account operations.
 *
 * This module provides a high-level API for user management, abstracting
 * away the SQL details and mapping storage failures onto typed errors.
 */

use chrono::Utc;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{params, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::{UserRecord, UserRole};
use super::password;
use crate::errors::AccountError;

/// Minimum password length in characters
pub const MIN_PASSWORD_LEN: usize = 8;

// Lowercase start, then lowercase alphanumerics, underscore, or hyphen
static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_-]{2,31}$").unwrap());

/// Repository for user account operations
#[derive(Clone)]
pub struct AccountRepository {
    /// Database connection
    db: DatabaseConnection,
}

fn map_user_row(row: &rusqlite::Row) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        role: row
            .get::<_, String>(3)?
            .parse()
            .unwrap_or(UserRole::Member),
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn validate_username(username: &str) -> Result<(), AccountError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(AccountError::InvalidUsername(username.to_string()))
    }
}

impl AccountRepository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self, AccountError> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, AccountError> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Get the underlying database connection
    pub fn database(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Seed the directory with its first admin account.
    ///
    /// Fails if any user already exists.
    pub async fn ensure_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserRecord, AccountError> {
        if self.count_users().await? > 0 {
            return Err(AccountError::Storage(
                "account directory is already initialized".to_string(),
            ));
        }

        self.create_user(username, password, UserRole::Admin).await
    }

    /// Create a new user account
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: UserRole,
    ) -> Result<UserRecord, AccountError> {
        validate_username(username)?;

        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::WeakPassword(MIN_PASSWORD_LEN));
        }

        if self.find_user(username).await?.is_some() {
            return Err(AccountError::UsernameTaken(username.to_string()));
        }

        let mut record = UserRecord::new(
            username.to_string(),
            password::hash_password(password),
            role,
        );

        let insert = record.clone();
        let id = self
            .db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO users (username, password_hash, role, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                    params![
                        insert.username,
                        insert.password_hash,
                        insert.role.to_string(),
                        insert.created_at,
                        insert.updated_at,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        record.id = id;
        info!("Created {} account '{}'", record.role, record.username);

        Ok(record)
    }

    /// Find a user by username
    pub async fn find_user(&self, username: &str) -> Result<Option<UserRecord>, AccountError> {
        let username = username.to_string();

        let user = self
            .db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT id, username, password_hash, role, created_at, updated_at
                        FROM users WHERE username = ?1
                        "#,
                        [username],
                        map_user_row,
                    )
                    .optional()?;

                Ok(result)
            })
            .await?;

        Ok(user)
    }

    /// Get a user by username, failing if it does not exist
    pub async fn get_user(&self, username: &str) -> Result<UserRecord, AccountError> {
        self.find_user(username)
            .await?
            .ok_or_else(|| AccountError::UserNotFound(username.to_string()))
    }

    /// Get a user by row id
    pub async fn get_user_by_id(&self, id: i64) -> Result<UserRecord, AccountError> {
        let user = self
            .db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT id, username, password_hash, role, created_at, updated_at
                        FROM users WHERE id = ?1
                        "#,
                        [id],
                        map_user_row,
                    )
                    .optional()?;

                Ok(result)
            })
            .await?;

        user.ok_or_else(|| AccountError::UserNotFound(format!("id {}", id)))
    }

    /// List all users ordered by username
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, AccountError> {
        let users = self
            .db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, username, password_hash, role, created_at, updated_at
                    FROM users ORDER BY username
                    "#,
                )?;

                let users = stmt
                    .query_map([], map_user_row)?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(users)
            })
            .await?;

        Ok(users)
    }

    /// Count all users
    pub async fn count_users(&self) -> Result<i64, AccountError> {
        let count = self
            .db
            .execute_async(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;

        Ok(count)
    }

    async fn count_admins(&self) -> Result<i64, AccountError> {
        let count = self
            .db
            .execute_async(|conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM users WHERE role = 'admin'",
                    [],
                    |row| row.get(0),
                )?;
                Ok(count)
            })
            .await?;

        Ok(count)
    }

    /// Delete a user account.
    ///
    /// The last remaining admin cannot be deleted. Sessions are removed
    /// by the foreign key cascade.
    pub async fn delete_user(&self, username: &str) -> Result<(), AccountError> {
        let user = self.get_user(username).await?;

        if user.is_admin() && self.count_admins().await? <= 1 {
            return Err(AccountError::LastAdmin(username.to_string()));
        }

        self.db
            .execute_async(move |conn| {
                conn.execute("DELETE FROM users WHERE id = ?1", [user.id])?;
                Ok(())
            })
            .await?;

        info!("Deleted account '{}'", username);
        Ok(())
    }

    /// Replace a user's password
    pub async fn update_password(
        &self,
        username: &str,
        new_password: &str,
    ) -> Result<(), AccountError> {
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::WeakPassword(MIN_PASSWORD_LEN));
        }

        let user = self.get_user(username).await?;
        let password_hash = password::hash_password(new_password);
        let now = Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "UPDATE users SET password_hash = ?1, updated_at = ?2 WHERE id = ?3",
                    params![password_hash, now, user.id],
                )?;
                Ok(())
            })
            .await?;

        info!("Updated password for '{}'", username);
        Ok(())
    }

    /// Verify a username and password pair.
    ///
    /// An unknown username and a wrong password fail with distinct errors.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserRecord, AccountError> {
        let user = self.get_user(username).await?;

        if password::verify_password(password, &user.password_hash)? {
            debug!("Verified credentials for '{}'", username);
            Ok(user)
        } else {
            Err(AccountError::InvalidPassword)
        }
    }
}
