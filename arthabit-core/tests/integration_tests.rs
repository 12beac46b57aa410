//! Integration tests for arthabit-core services
//!
//! These tests verify session persistence and logging against the real
//! filesystem. Network-facing behavior is covered by the service tests
//! inside the crate, which run against a loopback mock backend.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::Arc;
use std::thread;

use tempfile::TempDir;

use arthabit_core::adapters::file_store::FileTokenStore;
use arthabit_core::ports::{TokenStore, ACCESS_TOKEN_KEY};
use arthabit_core::services::{EntryPoint, LogEvent, LoggingService, SessionService};
use arthabit_core::ArthabitContext;

// ============================================================================
// Test Helpers
// ============================================================================

/// Create a session service backed by a file store in the given directory
fn create_session_service(dir: &TempDir) -> SessionService {
    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(dir.path()));
    SessionService::new(store)
}

/// Create a logging service rooted at the given directory
fn create_logging_service(dir: &TempDir) -> LoggingService {
    LoggingService::new(dir.path(), EntryPoint::Cli, "0.0.0-test")
        .expect("Failed to create logging service")
}

// ============================================================================
// Session Persistence Tests
// ============================================================================

/// A session saved by one service instance must be visible to a fresh
/// instance over the same directory, the way consecutive CLI invocations
/// each build their own context.
#[test]
fn test_session_survives_across_service_instances() {
    let dir = TempDir::new().unwrap();

    let first = create_session_service(&dir);
    first
        .save_tokens("access-1", "refresh-1", Some("user-1"))
        .unwrap();
    drop(first);

    let second = create_session_service(&dir);
    let session = second
        .load_session()
        .unwrap()
        .expect("Session should survive a new service instance");

    assert_eq!(session.access_token, "access-1");
    assert_eq!(session.refresh_token, "refresh-1");
    assert_eq!(session.user_id.as_deref(), Some("user-1"));
}

/// A token rotation carries no user id; the stored one must survive it,
/// even when the rotation happens through a different instance.
#[test]
fn test_token_rotation_keeps_user_id_across_instances() {
    let dir = TempDir::new().unwrap();

    create_session_service(&dir)
        .save_tokens("access-1", "refresh-1", Some("user-1"))
        .unwrap();
    create_session_service(&dir)
        .save_tokens("access-2", "refresh-2", None)
        .unwrap();

    let session = create_session_service(&dir)
        .load_session()
        .unwrap()
        .expect("Session should still exist after rotation");

    assert_eq!(session.access_token, "access-2");
    assert_eq!(session.refresh_token, "refresh-2");
    assert_eq!(
        session.user_id.as_deref(),
        Some("user-1"),
        "Rotation must not drop the stored user id"
    );
}

/// Logout through one instance must leave nothing for later instances
#[test]
fn test_clear_tokens_is_visible_to_later_instances() {
    let dir = TempDir::new().unwrap();

    create_session_service(&dir)
        .save_tokens("access-1", "refresh-1", Some("user-1"))
        .unwrap();
    create_session_service(&dir).clear_tokens().unwrap();

    let session = create_session_service(&dir).load_session().unwrap();
    assert!(session.is_none(), "Cleared session should stay cleared");
}

/// A lone access token written around the service is not a session
#[test]
fn test_single_token_is_not_a_session() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(dir.path()));

    store.set(ACCESS_TOKEN_KEY, "access-only").unwrap();

    let service = SessionService::new(Arc::clone(&store));
    assert!(service.load_session().unwrap().is_none());
    assert_eq!(
        service.access_token().unwrap().as_deref(),
        Some("access-only"),
        "The stray token itself is still readable"
    );
}

/// The credentials file keeps the backend's field names, because the
/// desktop shell reads the same file
#[test]
fn test_credentials_file_uses_wire_field_names() {
    let dir = TempDir::new().unwrap();

    create_session_service(&dir)
        .save_tokens("access-1", "refresh-1", Some("user-1"))
        .unwrap();

    let contents = std::fs::read_to_string(dir.path().join("credentials.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();

    assert_eq!(value["accessToken"], "access-1");
    assert_eq!(value["refreshToken"], "refresh-1");
    assert_eq!(value["userId"], "user-1");
}

// ============================================================================
// Logging Lifecycle Tests
// ============================================================================

/// Entries written by one service instance are readable by the next
#[test]
fn test_log_entries_survive_reopen() {
    let dir = TempDir::new().unwrap();

    let service = create_logging_service(&dir);
    service.log(LogEvent::new("first")).unwrap();
    service
        .log(LogEvent::new("second").with_command("status"))
        .unwrap();
    drop(service);

    let reopened = create_logging_service(&dir);
    let entries = reopened.get_recent(10).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].event, "second", "Newest entry comes first");
    assert_eq!(entries[0].command.as_deref(), Some("status"));
    assert_eq!(entries[1].event, "first");
}

/// delete_before rewrites the file; later writes must still append cleanly
#[test]
fn test_delete_before_keeps_the_file_usable() {
    let dir = TempDir::new().unwrap();
    let service = create_logging_service(&dir);

    for i in 0..3 {
        service.log(LogEvent::new(format!("event_{}", i))).unwrap();
    }

    let far_future = chrono::Utc::now().timestamp_millis() + 60_000;
    let deleted = service.delete_before(far_future).unwrap();
    assert_eq!(deleted, 3);
    assert_eq!(service.count().unwrap(), 0);

    service.log(LogEvent::new("after_cleanup")).unwrap();
    assert_eq!(service.count().unwrap(), 1);

    let entries = service.get_recent(10).unwrap();
    assert_eq!(entries[0].event, "after_cleanup");
}

/// One service shared across threads must not lose or mangle entries
#[test]
fn test_shared_logging_service_accepts_concurrent_writes() {
    const WRITER_THREADS: usize = 4;
    const EVENTS_PER_THREAD: usize = 10;

    let dir = TempDir::new().unwrap();
    let service = Arc::new(create_logging_service(&dir));

    let mut handles = vec![];
    for thread_id in 0..WRITER_THREADS {
        let service = Arc::clone(&service);
        handles.push(thread::spawn(move || {
            for i in 0..EVENTS_PER_THREAD {
                service
                    .log(LogEvent::new(format!("t{}_e{}", thread_id, i)))
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let total = service.count().unwrap();
    assert_eq!(total as usize, WRITER_THREADS * EVENTS_PER_THREAD);

    // Every line must still parse as a full entry
    let entries = service.get_recent(100).unwrap();
    assert_eq!(entries.len(), WRITER_THREADS * EVENTS_PER_THREAD);
}

// ============================================================================
// Context Tests
// ============================================================================

/// A fresh directory yields a working context with default config and
/// no session
#[test]
fn test_context_initializes_on_fresh_directory() {
    let dir = TempDir::new().unwrap();

    let ctx = ArthabitContext::new(dir.path()).expect("Context should build from an empty dir");

    assert!(ctx.config.auth_base_url.starts_with("http://"));
    assert!(ctx.session_service.load_session().unwrap().is_none());
}

/// An unparseable base URL in config.json must fail context construction
#[test]
fn test_context_rejects_invalid_base_urls() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{"authBaseUrl": "not a url"}"#,
    )
    .unwrap();

    let err = ArthabitContext::new(dir.path()).unwrap_err();
    assert!(
        format!("{:#}", err).contains("Invalid auth base URL"),
        "Unexpected error: {:#}",
        err
    );
}

/// All services in a context share one store, so a write through the
/// store handle is visible to the session service
#[test]
fn test_context_services_share_one_store() {
    let dir = TempDir::new().unwrap();
    let ctx = ArthabitContext::new(dir.path()).unwrap();

    ctx.token_store.set(ACCESS_TOKEN_KEY, "shared-token").unwrap();

    assert_eq!(
        ctx.session_service.access_token().unwrap().as_deref(),
        Some("shared-token")
    );
}
