/*!
 * Login session management.
 *
 * Sessions are opaque random tokens with a fixed time-to-live. Expired
 * sessions are rejected on validation and swept by `prune_expired`.
 */

use chrono::{Duration, Utc};
use log::{debug, info};
use rusqlite::{params, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::SessionRecord;
use crate::errors::AccountError;

/// Default session lifetime in days
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 30;

fn map_session_row(row: &rusqlite::Row) -> rusqlite::Result<SessionRecord> {
    Ok(SessionRecord {
        token: row.get(0)?,
        user_id: row.get(1)?,
        created_at: row.get(2)?,
        expires_at: row.get(3)?,
    })
}

/// Manager for login session lifecycle
#[derive(Clone)]
pub struct SessionManager {
    /// Database connection
    db: DatabaseConnection,

    /// Session lifetime
    ttl: Duration,
}

impl SessionManager {
    /// Create a session manager with the default lifetime
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            ttl: Duration::days(DEFAULT_SESSION_TTL_DAYS),
        }
    }

    /// Create a session manager with a custom lifetime
    pub fn with_ttl(db: DatabaseConnection, ttl: Duration) -> Self {
        Self { db, ttl }
    }

    /// Create and persist a new session for the given user
    pub async fn create_session(&self, user_id: i64) -> Result<SessionRecord, AccountError> {
        let session = SessionRecord::new(user_id, self.ttl);

        let insert = session.clone();
        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO sessions (token, user_id, created_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4)
                    "#,
                    params![
                        insert.token,
                        insert.user_id,
                        insert.created_at,
                        insert.expires_at,
                    ],
                )?;
                Ok(())
            })
            .await?;

        info!(
            "Created session {} for user id {} (expires {})",
            session.token_prefix(),
            session.user_id,
            session.expires_at
        );

        Ok(session)
    }

    /// Validate a session token.
    ///
    /// An expired session is deleted and reported as `SessionExpired`; an
    /// unknown token is `SessionNotFound`.
    pub async fn validate(&self, token: &str) -> Result<SessionRecord, AccountError> {
        let lookup = token.to_string();
        let session = self
            .db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT token, user_id, created_at, expires_at
                        FROM sessions WHERE token = ?1
                        "#,
                        [lookup],
                        map_session_row,
                    )
                    .optional()?;

                Ok(result)
            })
            .await?;

        let session = session.ok_or(AccountError::SessionNotFound)?;

        if session.is_expired() {
            debug!("Session {} is expired, removing", session.token_prefix());
            self.delete_token(&session.token).await?;
            return Err(AccountError::SessionExpired);
        }

        Ok(session)
    }

    /// Remove a session token
    pub async fn logout(&self, token: &str) -> Result<(), AccountError> {
        let removed = self.delete_token(token).await?;
        if removed == 0 {
            return Err(AccountError::SessionNotFound);
        }

        info!("Logged out session {}", &token[..token.len().min(8)]);
        Ok(())
    }

    /// Delete all expired sessions, returning how many were removed
    pub async fn prune_expired(&self) -> Result<usize, AccountError> {
        let now = Utc::now().to_rfc3339();
        let removed = self
            .db
            .execute_async(move |conn| {
                let removed = conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", [now])?;
                Ok(removed)
            })
            .await?;

        if removed > 0 {
            debug!("Pruned {} expired sessions", removed);
        }

        Ok(removed)
    }

    /// List all sessions, newest first
    pub async fn list_all(&self) -> Result<Vec<SessionRecord>, AccountError> {
        let sessions = self
            .db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT token, user_id, created_at, expires_at
                    FROM sessions ORDER BY created_at DESC
                    "#,
                )?;

                let sessions = stmt
                    .query_map([], map_session_row)?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(sessions)
            })
            .await?;

        Ok(sessions)
    }

    async fn delete_token(&self, token: &str) -> Result<usize, AccountError> {
        let token = token.to_string();
        let removed = self
            .db
            .execute_async(move |conn| {
                let removed = conn.execute("DELETE FROM sessions WHERE token = ?1", [token])?;
                Ok(removed)
            })
            .await?;

        Ok(removed)
    }
}
