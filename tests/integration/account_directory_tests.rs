/*!
 * Integration tests for the user directory and session layer working
 * together over one database.
 */

use chrono::Duration;
use creatorflow::accounts::{AccountRepository, DatabaseConnection, SessionManager, UserRole};
use creatorflow::errors::AccountError;

/// Repository and session manager sharing one in-memory database
fn directory() -> (AccountRepository, SessionManager) {
    let db = DatabaseConnection::new_in_memory().expect("in-memory database");
    (AccountRepository::new(db.clone()), SessionManager::new(db))
}

/// Test the full lifecycle: seed, login, session, logout
#[tokio::test]
async fn test_directory_withFullLifecycle_shouldSupportLoginAndLogout() {
    let (repo, sessions) = directory();

    // Seed the first admin
    let admin = repo.ensure_admin("admin", "admin-secret").await.unwrap();
    assert!(admin.is_admin());

    // Login: verify credentials, then open a session
    let user = repo.verify_credentials("admin", "admin-secret").await.unwrap();
    let session = sessions.create_session(user.id).await.unwrap();
    assert!(!session.token.is_empty());
    assert!(!session.is_expired());

    // The token validates back to the same user
    let validated = sessions.validate(&session.token).await.unwrap();
    assert_eq!(validated.user_id, user.id);

    // Logout removes the session
    sessions.logout(&session.token).await.unwrap();
    let after_logout = sessions.validate(&session.token).await;
    assert!(matches!(after_logout, Err(AccountError::SessionNotFound)));
}

/// Test seeding is refused once any user exists
#[tokio::test]
async fn test_ensure_admin_onPopulatedDirectory_shouldFail() {
    let (repo, _) = directory();

    repo.ensure_admin("admin", "admin-secret").await.unwrap();
    let second = repo.ensure_admin("admin2", "another-secret").await;

    assert!(second.is_err());
    assert_eq!(repo.count_users().await.unwrap(), 1);
}

/// Test member management around an admin account
#[tokio::test]
async fn test_directory_withMembers_shouldListAndDelete() {
    let (repo, _) = directory();
    repo.ensure_admin("admin", "admin-secret").await.unwrap();

    repo.create_user("alice", "alice-secret", UserRole::Member).await.unwrap();
    repo.create_user("bob", "bob-secret-pw", UserRole::Member).await.unwrap();

    let users = repo.list_users().await.unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["admin", "alice", "bob"]);

    repo.delete_user("bob").await.unwrap();
    assert_eq!(repo.count_users().await.unwrap(), 2);
    assert!(repo.find_user("bob").await.unwrap().is_none());
}

/// Test the last admin cannot be deleted while members remain
#[tokio::test]
async fn test_delete_user_withLastAdmin_shouldBeRefused() {
    let (repo, _) = directory();
    repo.ensure_admin("admin", "admin-secret").await.unwrap();
    repo.create_user("alice", "alice-secret", UserRole::Member).await.unwrap();

    let refused = repo.delete_user("admin").await;
    assert!(matches!(refused, Err(AccountError::LastAdmin(_))));

    // A second admin unblocks the deletion
    repo.create_user("root2", "root2-secret", UserRole::Admin).await.unwrap();
    repo.delete_user("admin").await.unwrap();
    assert!(repo.find_user("admin").await.unwrap().is_none());
}

/// Test password changes invalidate old sessions' credentials path
#[tokio::test]
async fn test_update_password_withOpenSession_shouldKeepSessionButRotateLogin() {
    let (repo, sessions) = directory();
    let admin = repo.ensure_admin("admin", "first-secret").await.unwrap();
    let session = sessions.create_session(admin.id).await.unwrap();

    repo.update_password("admin", "second-secret").await.unwrap();

    // Session tokens stay valid until logout or expiry
    assert!(sessions.validate(&session.token).await.is_ok());

    // The old password no longer verifies, the new one does
    let old = repo.verify_credentials("admin", "first-secret").await;
    assert!(matches!(old, Err(AccountError::InvalidPassword)));
    assert!(repo.verify_credentials("admin", "second-secret").await.is_ok());
}

/// Test login failures distinguish unknown users from bad passwords
#[tokio::test]
async fn test_verify_credentials_withBadInputs_shouldDistinguishFailures() {
    let (repo, _) = directory();
    repo.ensure_admin("admin", "admin-secret").await.unwrap();

    let unknown = repo.verify_credentials("ghost", "whatever-pw").await;
    assert!(matches!(unknown, Err(AccountError::UserNotFound(_))));

    let wrong = repo.verify_credentials("admin", "wrong-secret").await;
    assert!(matches!(wrong, Err(AccountError::InvalidPassword)));
}

/// Test expired sessions are rejected and pruned
#[tokio::test]
async fn test_sessions_withExpiredTtl_shouldRejectAndPrune() {
    let db = DatabaseConnection::new_in_memory().unwrap();
    let repo = AccountRepository::new(db.clone());
    let admin = repo.ensure_admin("admin", "admin-secret").await.unwrap();

    let fresh = SessionManager::new(db.clone());
    let stale = SessionManager::with_ttl(db.clone(), Duration::seconds(-60));

    let live = fresh.create_session(admin.id).await.unwrap();
    let expired = stale.create_session(admin.id).await.unwrap();

    let rejected = fresh.validate(&expired.token).await;
    assert!(matches!(rejected, Err(AccountError::SessionExpired)));

    // validate() already dropped the expired row, so there is nothing
    // left for prune_expired to remove
    assert_eq!(fresh.prune_expired().await.unwrap(), 0);

    let remaining = fresh.list_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].token, live.token);
}

/// Test pruning removes expired sessions in bulk
#[tokio::test]
async fn test_prune_expired_withMixedSessions_shouldRemoveOnlyExpired() {
    let db = DatabaseConnection::new_in_memory().unwrap();
    let repo = AccountRepository::new(db.clone());
    let admin = repo.ensure_admin("admin", "admin-secret").await.unwrap();

    let fresh = SessionManager::new(db.clone());
    let stale = SessionManager::with_ttl(db.clone(), Duration::seconds(-60));

    fresh.create_session(admin.id).await.unwrap();
    stale.create_session(admin.id).await.unwrap();
    stale.create_session(admin.id).await.unwrap();

    assert_eq!(fresh.prune_expired().await.unwrap(), 2);
    assert_eq!(fresh.list_all().await.unwrap().len(), 1);
}

/// Test deleting a user removes their sessions with them
#[tokio::test]
async fn test_delete_user_withOpenSessions_shouldCascade() {
    let db = DatabaseConnection::new_in_memory().unwrap();
    let repo = AccountRepository::new(db.clone());
    let sessions = SessionManager::new(db.clone());

    repo.ensure_admin("admin", "admin-secret").await.unwrap();
    let alice = repo.create_user("alice", "alice-secret", UserRole::Member).await.unwrap();
    let session = sessions.create_session(alice.id).await.unwrap();

    repo.delete_user("alice").await.unwrap();

    let gone = sessions.validate(&session.token).await;
    assert!(matches!(gone, Err(AccountError::SessionNotFound)));
    assert!(sessions.list_all().await.unwrap().is_empty());
}

/// Test database statistics reflect directory contents
#[tokio::test]
async fn test_stats_withUsersAndSessions_shouldCountRows() {
    let db = DatabaseConnection::new_in_memory().unwrap();
    let repo = AccountRepository::new(db.clone());
    let sessions = SessionManager::new(db.clone());

    let admin = repo.ensure_admin("admin", "admin-secret").await.unwrap();
    repo.create_user("alice", "alice-secret", UserRole::Member).await.unwrap();
    sessions.create_session(admin.id).await.unwrap();

    let stats = db.stats().unwrap();
    assert_eq!(stats.user_count, 2);
    assert_eq!(stats.session_count, 1);

    let rendered = stats.to_string();
    assert!(rendered.contains("Users: 2"), "got: {rendered}");
}
