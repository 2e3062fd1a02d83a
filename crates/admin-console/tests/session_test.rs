use admin_console::credentials::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, IDENTITY_ENTRY, TOKEN_ENTRY,
};
use admin_console::model::AdminRole;
use admin_console::session::Session;
use admin_console::ConsoleError;
use serde_json::json;
use std::sync::Arc;
use store_framework::mock::MockTransport;
use store_framework::{CredentialSlot, Method, RequestBody, TransportError};
use tempfile::TempDir;

fn login_response() -> serde_json::Value {
    json!({
        "token": "tok-42",
        "user": {
            "id": "A1",
            "email": "ops@example.com",
            "name": "Ops",
            "role": "support",
            "createdAt": "2024-02-01T08:00:00Z"
        }
    })
}

fn session_with(transport: &MockTransport, credentials: Arc<dyn CredentialStore>) -> (Session, CredentialSlot) {
    let slot = CredentialSlot::new();
    let session = Session::new(Arc::new(transport.clone()), slot.clone(), credentials);
    (session, slot)
}

#[tokio::test]
async fn test_login_persists_and_restores_across_sessions() {
    let temp = TempDir::new().unwrap();
    let transport = MockTransport::new();
    transport
        .expect(Method::Post, "/auth/login")
        .return_ok(login_response());

    let (session, slot) = session_with(&transport, Arc::new(FileCredentialStore::new(temp.path())));
    let identity = session.login(" ops@example.com ", "secret").await.unwrap();

    assert_eq!(identity.role, AdminRole::Support);
    assert!(session.is_authenticated());
    assert_eq!(slot.get().as_deref(), Some("tok-42"));
    match &transport.requests()[0].body {
        RequestBody::Json(body) => {
            assert_eq!(body, &json!({ "email": "ops@example.com", "password": "secret" }))
        }
        other => panic!("expected JSON, got {other:?}"),
    }

    // A fresh process reading the same directory picks the session back up.
    let (restored, restored_slot) =
        session_with(&MockTransport::new(), Arc::new(FileCredentialStore::new(temp.path())));
    assert!(restored.restore().unwrap());
    assert_eq!(restored.snapshot().identity().map(|i| i.email.as_str()), Some("ops@example.com"));
    assert_eq!(restored_slot.get().as_deref(), Some("tok-42"));
    assert!(restored.has_role(AdminRole::Support));
    assert!(!restored.has_role(AdminRole::Admin));
    assert!(restored.has_any_role(&[AdminRole::Admin, AdminRole::Support]));
}

#[tokio::test]
async fn test_login_failure_surfaces_server_message() {
    let transport = MockTransport::new();
    transport
        .expect(Method::Post, "/auth/login")
        .return_err(TransportError::Status {
            status: 401,
            message: Some("Invalid credentials".into()),
        });
    transport
        .expect(Method::Post, "/auth/login")
        .return_err(TransportError::Network("timed out".into()));
    let credentials = Arc::new(MemoryCredentialStore::new());
    let (session, slot) = session_with(&transport, credentials.clone());

    let err = session.login("ops@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(session.snapshot().error(), Some("Invalid credentials"));

    let err = session.login("ops@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Login failed");

    let state = session.snapshot();
    assert!(!state.is_authenticated());
    assert!(!state.is_loading());
    assert_eq!(slot.get(), None);
    assert_eq!(credentials.read(TOKEN_ENTRY).unwrap(), None);
}

#[tokio::test]
async fn test_blank_credentials_never_reach_the_server() {
    let transport = MockTransport::new();
    let (session, _) = session_with(&transport, Arc::new(MemoryCredentialStore::new()));

    let err = session.login("   ", "secret").await.unwrap_err();

    assert!(matches!(err, ConsoleError::Auth(_)));
    assert_eq!(session.snapshot().error(), Some("Email and password are required"));
    assert!(transport.requests().is_empty());
}

#[test]
fn test_half_written_session_is_discarded() {
    let credentials = Arc::new(MemoryCredentialStore::new());
    credentials.write(TOKEN_ENTRY, "tok-1").unwrap();
    let (session, slot) = session_with(&MockTransport::new(), credentials.clone());

    assert!(!session.restore().unwrap());
    assert_eq!(slot.get(), None);
    assert_eq!(credentials.read(TOKEN_ENTRY).unwrap(), None);
}

#[test]
fn test_corrupt_identity_is_discarded() {
    let credentials = Arc::new(MemoryCredentialStore::new());
    credentials.write(TOKEN_ENTRY, "tok-1").unwrap();
    credentials.write(IDENTITY_ENTRY, "{ not json").unwrap();
    let (session, _) = session_with(&MockTransport::new(), credentials.clone());

    assert!(!session.restore().unwrap());
    assert!(!session.is_authenticated());
    assert_eq!(credentials.read(IDENTITY_ENTRY).unwrap(), None);
}

#[tokio::test]
async fn test_logout_clears_memory_slot_and_storage() {
    let transport = MockTransport::new();
    transport
        .expect(Method::Post, "/auth/login")
        .return_ok(login_response());
    let credentials = Arc::new(MemoryCredentialStore::new());
    let (session, slot) = session_with(&transport, credentials.clone());
    session.login("ops@example.com", "secret").await.unwrap();
    assert!(credentials.read(IDENTITY_ENTRY).unwrap().is_some());

    session.logout().unwrap();

    assert!(!session.is_authenticated());
    assert!(!session.has_any_role(&[AdminRole::Admin, AdminRole::Support, AdminRole::Viewer]));
    assert_eq!(slot.get(), None);
    assert_eq!(credentials.read(TOKEN_ENTRY).unwrap(), None);
    assert_eq!(credentials.read(IDENTITY_ENTRY).unwrap(), None);
}
