/*!
 * Account module for persistent user storage and login sessions.
 *
 * This module provides SQLite-based persistence for:
 * - User records with salted, iterated password digests
 * - Login sessions with opaque tokens and expiry
 */

pub mod connection;
pub mod models;
pub mod password;
pub mod repository;
pub mod schema;
pub mod sessions;

// Re-export main types
pub use connection::DatabaseConnection;
pub use models::{SessionRecord, UserRecord, UserRole};
pub use repository::AccountRepository;
pub use sessions::SessionManager;
