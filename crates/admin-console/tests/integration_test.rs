use admin_console::config::ConsoleConfig;
use admin_console::credentials::{CredentialStore, MemoryCredentialStore, TOKEN_ENTRY};
use admin_console::lifecycle::ConsoleSystem;
use admin_console::model::{
    ActiveState, MediaStatus, MediaUpload, OrderCreate, OrderFiltersPatch, OrderStatus,
    QueryStatus, ServiceCreate, ServiceOption, UserUpdate,
};
use admin_console::ConsoleError;
use serde_json::{json, Value};
use std::sync::Arc;
use store_framework::mock::MockTransport;
use store_framework::{
    CredentialSlot, EntityStore, FailureKind, FilterUpdate, Method, RequestBody, StoreError,
    TransportError,
};

// --- Fixtures ---

fn order(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "userId": "U1",
        "serviceId": "S1",
        "status": status,
        "totalAmount": 120.0,
        "partnerAssigned": "P3",
        "createdAt": "2024-05-01T09:00:00Z",
        "notes": "Gate code 4411"
    })
}

fn query(id: &str, status: &str, assigned_to: Option<&str>) -> Value {
    json!({
        "id": id,
        "userId": "U7",
        "userName": "Dana",
        "message": "Panels still dusty",
        "status": status,
        "assignedTo": assigned_to,
        "createdAt": "2024-05-02T10:00:00Z",
        "updatedAt": "2024-05-02T10:00:00Z"
    })
}

fn media(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "fileName": "after.jpg",
        "url": "https://cdn.example.com/after.jpg",
        "uploadedBy": "P3",
        "orderId": "O1",
        "uploadedAt": "2024-05-03T11:00:00Z",
        "status": status
    })
}

fn service(id: &str, category: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Service {id}"),
        "category": category,
        "price": 80.0,
        "duration": 90,
        "isActive": true,
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    })
}

fn user(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": "Sam Reyes",
        "email": "sam@example.com",
        "role": "partner",
        "status": status,
        "createdAt": "2024-01-10T08:00:00Z",
        "updatedAt": "2024-01-10T08:00:00Z"
    })
}

fn page(records: Vec<Value>, total: u64) -> Value {
    json!({ "records": records, "total": total })
}

fn identity() -> Value {
    json!({ "id": "A1", "email": "ops@example.com", "name": "Ops", "role": "admin" })
}

struct Harness {
    system: ConsoleSystem,
    transport: MockTransport,
    slot: CredentialSlot,
    credentials: Arc<MemoryCredentialStore>,
}

fn harness() -> Harness {
    let transport = MockTransport::new();
    let slot = CredentialSlot::new();
    let credentials = Arc::new(MemoryCredentialStore::new());
    let system = ConsoleSystem::with_transport(
        &ConsoleConfig::default(),
        Arc::new(transport.clone()),
        slot.clone(),
        credentials.clone(),
    );
    Harness {
        system,
        transport,
        slot,
        credentials,
    }
}

fn json_body(body: &RequestBody) -> &Value {
    match body {
        RequestBody::Json(value) => value,
        other => panic!("expected a JSON body, got {other:?}"),
    }
}

/// Reads fine but refuses to delete anything.
struct ReadOnlyCredentials(MemoryCredentialStore);

impl CredentialStore for ReadOnlyCredentials {
    fn read(&self, name: &str) -> Result<Option<String>, ConsoleError> {
        self.0.read(name)
    }

    fn write(&self, name: &str, value: &str) -> Result<(), ConsoleError> {
        self.0.write(name, value)
    }

    fn remove(&self, _name: &str) -> Result<(), ConsoleError> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
    }
}

// --- Tests ---

#[tokio::test]
async fn test_login_list_update_and_logout() {
    let h = harness();
    h.transport
        .expect(Method::Post, "/auth/login")
        .return_ok(json!({ "token": "tok-1", "user": identity() }));
    h.transport
        .expect(Method::Get, "/orders")
        .return_ok(page(vec![order("O1", "pending"), order("O2", "pending")], 14));
    h.transport
        .expect(Method::Patch, "/orders/O1")
        .return_ok(order("O1", "completed"));

    h.system.session.login("ops@example.com", "secret").await.unwrap();
    assert_eq!(h.slot.get().as_deref(), Some("tok-1"));

    h.system.orders.list().await.unwrap();
    let updated = h
        .system
        .orders
        .update_status("O1", OrderStatus::Completed)
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Completed);

    let snapshot = h.system.orders.snapshot();
    assert_eq!(snapshot.records()[0].status, OrderStatus::Completed);
    assert_eq!(snapshot.records()[0].partner_assigned.as_deref(), Some("P3"));
    assert_eq!(snapshot.records()[0].notes, "Gate code 4411");
    assert_eq!(snapshot.total(), 14);

    let requests = h.transport.requests();
    assert_eq!(json_body(&requests[2].body), &json!({ "status": "completed" }));

    h.system.logout().await.unwrap();

    assert!(!h.system.session.is_authenticated());
    assert_eq!(h.slot.get(), None);
    assert_eq!(h.credentials.read(TOKEN_ENTRY).unwrap(), None);
    let snapshot = h.system.orders.snapshot();
    assert!(snapshot.records().is_empty());
    assert_eq!(snapshot.total(), 0);

    h.transport.verify();
    h.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_order_filters_reach_the_query() {
    let h = harness();
    h.transport
        .expect(Method::Get, "/orders")
        .return_ok(page(vec![], 0));

    h.system
        .orders
        .inner()
        .list_with(FilterUpdate::filters(OrderFiltersPatch {
            status: Some(OrderStatus::InProgress.into()),
            partner_id: Some("P3".into()),
            ..Default::default()
        }))
        .await
        .unwrap();

    let request = &h.transport.requests()[0];
    assert_eq!(request.query_param("status"), Some("in-progress"));
    assert_eq!(request.query_param("partnerId"), Some("P3"));
    assert_eq!(request.query_param("startDate"), Some(""));
    assert_eq!(request.query_param("page"), Some("1"));
    assert_eq!(request.query_param("limit"), Some("10"));
    h.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_contact_assignment_patches_list_and_selection() {
    let h = harness();
    h.transport
        .expect(Method::Get, "/contact-queries")
        .return_ok(page(vec![query("Q1", "new", None)], 1));
    h.transport
        .expect(Method::Get, "/contact-queries/Q1")
        .return_ok(query("Q1", "new", None));
    h.transport
        .expect(Method::Patch, "/contact-queries/Q1")
        .return_ok(query("Q1", "in-progress", Some("A2")));

    h.system.contacts.list().await.unwrap();
    h.system.contacts.get_by_id(&"Q1".to_string()).await.unwrap();
    h.system.contacts.assign("Q1", "A2").await.unwrap();

    let snapshot = h.system.contacts.snapshot();
    assert_eq!(snapshot.records()[0].assigned_to.as_deref(), Some("A2"));
    assert_eq!(snapshot.records()[0].status, QueryStatus::InProgress);
    assert_eq!(snapshot.selected(), Some(&snapshot.records()[0]));

    let requests = h.transport.requests();
    assert_eq!(json_body(&requests[2].body), &json!({ "assignedTo": "A2" }));
    h.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_contact_status_failure_uses_its_fallback() {
    let h = harness();
    h.transport
        .expect(Method::Patch, "/contact-queries/Q1")
        .return_err(TransportError::Network("connection reset".into()));

    let err = h
        .system
        .contacts
        .update_status("Q1", QueryStatus::Resolved)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to update query status");
    let failure = h.system.contacts.snapshot().error().cloned().unwrap();
    assert_eq!(failure.kind, FailureKind::Transport);
    assert!(!h.system.contacts.snapshot().is_loading());
    h.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_media_upload_is_multipart_and_appends() {
    let h = harness();
    h.transport
        .expect(Method::Get, "/media")
        .return_ok(page(vec![media("M1", "approved")], 1));
    h.transport
        .expect(Method::Post, "/media/upload")
        .return_ok(media("M2", "pending"));

    h.system.media.list().await.unwrap();
    let item = h
        .system
        .media
        .upload(MediaUpload {
            order_id: "O1".into(),
            file_name: "after.jpg".into(),
            content_type: Some("image/jpeg".into()),
            bytes: vec![0xFF, 0xD8, 0xFF],
        })
        .await
        .unwrap();

    assert_eq!(item.id, "M2");
    let snapshot = h.system.media.snapshot();
    assert_eq!(snapshot.records().len(), 2);
    assert_eq!(snapshot.total(), 2);

    let requests = h.transport.requests();
    match &requests[1].body {
        RequestBody::Multipart(upload) => {
            assert_eq!(upload.file_field, "file");
            assert_eq!(upload.file_name, "after.jpg");
            assert_eq!(upload.fields, vec![("orderId".to_string(), "O1".to_string())]);
        }
        other => panic!("expected multipart, got {other:?}"),
    }
    h.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_empty_upload_is_rejected_without_a_request() {
    let h = harness();

    let err = h
        .system
        .media
        .upload(MediaUpload {
            order_id: "O1".into(),
            file_name: "after.jpg".into(),
            content_type: None,
            bytes: Vec::new(),
        })
        .await
        .unwrap_err();

    assert_eq!(err, StoreError::Validation("File is empty".into()));
    assert_eq!(
        h.system.media.snapshot().error().map(|f| f.kind),
        Some(FailureKind::Validation)
    );
    assert!(h.transport.requests().is_empty());
    h.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_media_review_failure_keeps_record() {
    let h = harness();
    h.transport
        .expect(Method::Get, "/media")
        .return_ok(page(vec![media("M1", "pending")], 1));
    h.transport
        .expect(Method::Patch, "/media/M1")
        .return_err(TransportError::Status {
            status: 500,
            message: None,
        });

    h.system.media.list().await.unwrap();
    let err = h
        .system
        .media
        .review("M1", MediaStatus::Approved, Some("Looks good".into()))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to update media status");
    assert_eq!(h.system.media.snapshot().records()[0].status, MediaStatus::Pending);
    assert_eq!(
        json_body(&h.transport.requests()[1].body),
        &json!({ "status": "approved", "notes": "Looks good" })
    );
    h.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_partners_are_filtered_by_the_server() {
    let h = harness();
    h.transport
        .expect(Method::Get, "/users")
        .return_ok(page(vec![], 0));

    h.system.users.partners().await.unwrap();

    let request = &h.transport.requests()[0];
    assert_eq!(request.query_param("role"), Some("partner"));
    assert_eq!(request.query_param("status"), Some("all"));
    assert_eq!(h.system.users.snapshot().filters().filters.role, "partner");

    // The narrowing sticks until the filters are reset.
    h.system.users.reset_filters().await.unwrap();
    assert_eq!(h.system.users.snapshot().filters().filters.role, "");
    h.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_service_categories_and_draft_options() {
    let h = harness();
    h.transport
        .expect(Method::Get, "/services")
        .return_ok(page(
            vec![
                service("S1", "Solar"),
                service("S2", "Cleaning"),
                service("S3", "Solar"),
            ],
            3,
        ));
    h.transport
        .expect(Method::Post, "/services")
        .return_ok(service("S4", "Gutters"));

    h.system.services.list().await.unwrap();
    assert_eq!(h.system.services.categories(), vec!["Cleaning", "Solar"]);

    h.system
        .services
        .create_service(ServiceCreate {
            name: "Gutter flush".into(),
            category: "Gutters".into(),
            price: 60.0,
            duration: 45,
            tags: vec![],
            is_active: true,
            images: vec![],
            options: vec![ServiceOption::draft("Downpipes", 15.0)],
        })
        .await
        .unwrap();

    let body = json_body(&h.transport.requests()[1].body).clone();
    assert_eq!(body["options"], json!([{ "name": "Downpipes", "price": 15.0 }]));
    assert_eq!(
        h.system.services.categories(),
        vec!["Cleaning", "Gutters", "Solar"]
    );
    h.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_remove_failure_is_returned_and_recorded() {
    let h = harness();
    h.transport
        .expect(Method::Get, "/services")
        .return_ok(page(vec![service("S1", "Solar")], 1));
    h.transport
        .expect(Method::Delete, "/services/S1")
        .return_err(TransportError::Status {
            status: 409,
            message: Some("Service has open orders".into()),
        });

    h.system.services.list().await.unwrap();
    let err = h.system.services.remove(&"S1".to_string()).await.unwrap_err();

    assert_eq!(err.to_string(), "Service has open orders");
    let snapshot = h.system.services.snapshot();
    assert_eq!(snapshot.records().len(), 1);
    assert_eq!(
        snapshot.error().map(|f| f.message.as_str()),
        Some("Service has open orders")
    );
    h.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_logout_resets_stores_when_credentials_cannot_be_removed() {
    let transport = MockTransport::new();
    transport
        .expect(Method::Post, "/auth/login")
        .return_ok(json!({ "token": "tok-1", "user": identity() }));
    transport
        .expect(Method::Get, "/orders")
        .return_ok(page(vec![order("O1", "pending")], 1));
    let slot = CredentialSlot::new();
    let system = ConsoleSystem::with_transport(
        &ConsoleConfig::default(),
        Arc::new(transport.clone()),
        slot.clone(),
        Arc::new(ReadOnlyCredentials(MemoryCredentialStore::new())),
    );
    system.session.login("ops@example.com", "secret").await.unwrap();
    system.orders.list().await.unwrap();

    let err = system.logout().await.unwrap_err();

    assert!(matches!(err, ConsoleError::Io(_)));
    assert!(!system.session.is_authenticated());
    assert_eq!(slot.get(), None);
    let snapshot = system.orders.snapshot();
    assert!(snapshot.records().is_empty());
    assert_eq!(snapshot.total(), 0);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_create_order_posts_draft_and_appends() {
    let h = harness();
    h.transport
        .expect(Method::Get, "/orders")
        .return_ok(page(vec![order("O1", "pending")], 1));
    h.transport
        .expect(Method::Post, "/orders")
        .return_ok(order("O2", "pending"));
    h.system.orders.list().await.unwrap();

    let created = h
        .system
        .orders
        .create_order(OrderCreate {
            user_id: "U1".into(),
            service_id: "S1".into(),
            total_amount: 120.0,
            notes: String::new(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, "O2");

    let requests = h.transport.requests();
    assert_eq!(
        json_body(&requests[1].body),
        &json!({ "userId": "U1", "serviceId": "S1", "totalAmount": 120.0 })
    );
    let snapshot = h.system.orders.snapshot();
    assert_eq!(snapshot.records().len(), 2);
    assert_eq!(snapshot.records()[1].id, "O2");
    assert_eq!(snapshot.total(), 2);
    h.transport.verify();
    h.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_partner_assignment_can_be_set_and_cleared() {
    let h = harness();
    let mut unassigned = order("O1", "pending");
    unassigned["partnerAssigned"] = Value::Null;
    let mut assigned = order("O1", "pending");
    assigned["partnerAssigned"] = json!("P9");
    h.transport
        .expect(Method::Get, "/orders")
        .return_ok(page(vec![order("O1", "pending")], 1));
    h.transport
        .expect(Method::Patch, "/orders/O1")
        .return_ok(assigned);
    h.transport
        .expect(Method::Patch, "/orders/O1")
        .return_ok(unassigned);
    h.system.orders.list().await.unwrap();

    h.system.orders.assign_partner("O1", "P9").await.unwrap();
    assert_eq!(
        h.system.orders.snapshot().records()[0].partner_assigned.as_deref(),
        Some("P9")
    );

    h.system.orders.unassign_partner("O1").await.unwrap();
    assert_eq!(h.system.orders.snapshot().records()[0].partner_assigned, None);

    let requests = h.transport.requests();
    assert_eq!(json_body(&requests[1].body), &json!({ "partnerAssigned": "P9" }));
    assert_eq!(json_body(&requests[2].body), &json!({ "partnerAssigned": null }));
    h.transport.verify();
    h.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_user_update_puts_and_status_patches() {
    let h = harness();
    h.transport
        .expect(Method::Get, "/users")
        .return_ok(page(vec![user("U1", "active")], 1));
    let mut renamed = user("U1", "active");
    renamed["name"] = json!("Sam R.");
    h.transport
        .expect(Method::Put, "/users/U1")
        .return_ok(renamed);
    let mut deactivated = user("U1", "inactive");
    deactivated["name"] = json!("Sam R.");
    h.transport
        .expect(Method::Patch, "/users/U1")
        .return_ok(deactivated);
    h.system.users.list().await.unwrap();

    h.system
        .users
        .update_user(
            "U1",
            UserUpdate {
                name: Some("Sam R.".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let updated = h
        .system
        .users
        .set_status("U1", ActiveState::Inactive)
        .await
        .unwrap();
    assert_eq!(updated.status, ActiveState::Inactive);

    let requests = h.transport.requests();
    assert_eq!(json_body(&requests[1].body), &json!({ "name": "Sam R." }));
    assert_eq!(json_body(&requests[2].body), &json!({ "status": "inactive" }));
    let snapshot = h.system.users.snapshot();
    assert_eq!(snapshot.records()[0].name, "Sam R.");
    assert_eq!(snapshot.records()[0].status, ActiveState::Inactive);
    assert_eq!(snapshot.total(), 1);
    h.transport.verify();
    h.system.shutdown().await.unwrap();
}
