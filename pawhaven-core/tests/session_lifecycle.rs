//! Session lifecycle integration tests.
//!
//! This test suite covers:
//! - Credential verification for registered accounts
//! - Login/logout and the persisted session record
//! - Session restoration across simulated process restarts
//! - Registration validation
//! - The "?" sentinel on display accessors
//!
//! Note: each test opens its own in-memory SQLite store; "process restart"
//! means building a fresh SessionManager over the same record file.

use pawhaven_core::{
    CredentialStore, PawhavenError, Profile, SessionManager, SessionRecord, ShelterStore, UNKNOWN,
};
use tempfile::TempDir;

async fn open_store() -> ShelterStore {
    ShelterStore::open(":memory:")
        .await
        .expect("in-memory store opens")
}

fn manager_for(store: &ShelterStore, dir: &TempDir) -> SessionManager {
    SessionManager::new(
        CredentialStore::new(store),
        SessionRecord::new(dir.path().join("session.txt")),
    )
}

// =============================================================================
// Credential Verification Tests
// =============================================================================

#[tokio::test]
async fn test_verify_registered_credentials() {
    let store = open_store().await;
    let credentials = CredentialStore::new(&store);

    credentials.register("a@b.com", "p").await.unwrap();

    assert!(credentials.verify("a@b.com", "p").await.unwrap());
    assert!(!credentials.verify("a@b.com", "px").await.unwrap());
    assert!(!credentials.verify("unknown@b.com", "p").await.unwrap());
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let store = open_store().await;
    let credentials = CredentialStore::new(&store);

    credentials.register("a@b.com", "p").await.unwrap();
    let err = credentials.register("a@b.com", "other").await.unwrap_err();
    assert!(matches!(err, PawhavenError::DuplicateIdentifier { .. }));

    // The original secret still verifies; the duplicate attempt changed nothing.
    assert!(credentials.verify("a@b.com", "p").await.unwrap());
}

// =============================================================================
// Login / Logout / Restore Tests
// =============================================================================

#[tokio::test]
async fn test_login_then_restore_across_restart() {
    let store = open_store().await;
    let dir = tempfile::tempdir().unwrap();
    CredentialStore::new(&store)
        .register("a@b.com", "p")
        .await
        .unwrap();

    let mut manager = manager_for(&store, &dir);
    manager.login("a@b.com", "p").await.unwrap();
    assert!(manager.state().is_active());
    assert_eq!(manager.identifier(), "a@b.com");

    // Simulated restart: a fresh manager over the same record file.
    let mut restarted = manager_for(&store, &dir);
    assert!(restarted.restore().await.unwrap());
    assert_eq!(restarted.identifier(), "a@b.com");
}

#[tokio::test]
async fn test_restore_after_logout_fails() {
    let store = open_store().await;
    let dir = tempfile::tempdir().unwrap();
    CredentialStore::new(&store)
        .register("a@b.com", "p")
        .await
        .unwrap();

    let mut manager = manager_for(&store, &dir);
    manager.login("a@b.com", "p").await.unwrap();
    manager.logout().await.unwrap();
    assert!(!manager.state().is_active());

    let mut restarted = manager_for(&store, &dir);
    assert!(!restarted.restore().await.unwrap());
    assert!(!restarted.state().is_active());
}

#[tokio::test]
async fn test_failed_login_leaves_no_session() {
    let store = open_store().await;
    let dir = tempfile::tempdir().unwrap();
    CredentialStore::new(&store)
        .register("u@x.com", "pw")
        .await
        .unwrap();

    let mut manager = manager_for(&store, &dir);
    let err = manager.login("u@x.com", "wrong").await.unwrap_err();
    assert!(matches!(err, PawhavenError::InvalidCredentials));

    assert!(!manager.state().is_active());
    assert_eq!(manager.identifier(), UNKNOWN);
}

#[tokio::test]
async fn test_restore_with_stale_secret_clears_record() {
    let store = open_store().await;
    let dir = tempfile::tempdir().unwrap();
    CredentialStore::new(&store)
        .register("a@b.com", "p")
        .await
        .unwrap();

    // A record that no longer verifies, e.g. the password changed elsewhere.
    let record = SessionRecord::new(dir.path().join("session.txt"));
    record.write("a@b.com", "stale").await.unwrap();

    let mut manager = manager_for(&store, &dir);
    assert!(!manager.restore().await.unwrap());
    assert!(!manager.state().is_active());

    // The failed restoration cleared the persisted record.
    assert!(record.read().await.unwrap().is_none());
}

#[tokio::test]
async fn test_restore_with_malformed_record_is_not_an_error() {
    let store = open_store().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.txt");
    tokio::fs::write(&path, "only-one-line").await.unwrap();

    let mut manager = manager_for(&store, &dir);
    assert!(!manager.restore().await.unwrap());
}

// =============================================================================
// Profile Tests
// =============================================================================

#[tokio::test]
async fn test_profile_survives_restart_when_persisted() {
    let store = open_store().await;
    let dir = tempfile::tempdir().unwrap();
    let credentials = CredentialStore::new(&store);
    credentials.register("a@b.com", "p").await.unwrap();

    let mut manager = manager_for(&store, &dir);
    manager.login("a@b.com", "p").await.unwrap();

    let profile = Profile {
        first_name: Some("Ana".to_string()),
        last_name: Some("Pop".to_string()),
        phone_number: Some("0700000000".to_string()),
        ..Profile::default()
    };
    // In-memory update and explicit persistence are separate steps.
    manager.update_profile(profile.clone()).unwrap();
    credentials.update_profile("a@b.com", &profile).await.unwrap();
    assert_eq!(manager.first_name(), "Ana");

    let mut restarted = manager_for(&store, &dir);
    assert!(restarted.restore().await.unwrap());
    assert_eq!(restarted.first_name(), "Ana");
    assert_eq!(restarted.last_name(), "Pop");
    assert_eq!(restarted.phone_number(), "0700000000");
    // Unset fields still render as the sentinel.
    assert_eq!(restarted.motivation(), UNKNOWN);
}

#[tokio::test]
async fn test_update_profile_without_session_fails() {
    let store = open_store().await;
    let dir = tempfile::tempdir().unwrap();

    let mut manager = manager_for(&store, &dir);
    let err = manager.update_profile(Profile::default()).unwrap_err();
    assert!(matches!(err, PawhavenError::NoActiveSession));
}

#[tokio::test]
async fn test_accessors_return_sentinel_without_session() {
    let store = open_store().await;
    let dir = tempfile::tempdir().unwrap();

    let manager = manager_for(&store, &dir);
    assert_eq!(manager.identifier(), UNKNOWN);
    assert_eq!(manager.secret(), UNKNOWN);
    assert_eq!(manager.first_name(), UNKNOWN);
    assert_eq!(manager.living_conditions(), UNKNOWN);
    assert_eq!(manager.date_of_birth(), None);
}

#[tokio::test]
async fn test_login_while_active_refreshes_profile() {
    let store = open_store().await;
    let dir = tempfile::tempdir().unwrap();
    let credentials = CredentialStore::new(&store);
    credentials.register("a@b.com", "p").await.unwrap();

    let mut manager = manager_for(&store, &dir);
    manager.login("a@b.com", "p").await.unwrap();
    assert_eq!(manager.first_name(), UNKNOWN);

    // Profile stored behind the manager's back, then a second login.
    let profile = Profile {
        first_name: Some("Ana".to_string()),
        ..Profile::default()
    };
    credentials.update_profile("a@b.com", &profile).await.unwrap();
    manager.login("a@b.com", "p").await.unwrap();
    assert_eq!(manager.first_name(), "Ana");
}

// =============================================================================
// Registration Validation Tests
// =============================================================================

#[test]
fn test_registration_validation() {
    assert!(SessionManager::validate_registration("a@b.com", "p", "p"));
    assert!(!SessionManager::validate_registration("bad-email", "p", "p"));
    assert!(!SessionManager::validate_registration("a@b.com", "p", "q"));
    assert!(!SessionManager::validate_registration("", "p", "p"));
}
