#![allow(dead_code)]

//! In-process mock of the Satchel API for integration tests.
//!
//! [`MockApi::spawn`] binds an axum server on an ephemeral port and
//! returns a handle whose [`ServerState`] the tests inspect and seed
//! directly. Every request is appended to a log of `"METHOD path"`
//! labels plus the JSON body, so tests can assert call counts and
//! ordering. Failure rules inject error responses per endpoint.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use uuid::Uuid;

use satchel_client::config::ClientConfig;
use satchel_client::context::Session;
use satchel_client::notify::Notifier;
use satchel_client::storage::{MemoryStore, StateStore};

pub const TEST_EMAIL: &str = "maya@example.com";
pub const TEST_PASSWORD: &str = "plum-crag-otter-42";
pub const OTP_CODE: &str = "428613";
pub const USER_ID: &str = "5b9d2f64-7c31-4e94-8a15-2f6e0c7d93b1";
pub const IMPORTED_COLLECTION_ID: &str = "9a6a2c4e-8f1d-47b3-9f62-3d2a24b9f0aa";

type Shared = Arc<Mutex<ServerState>>;
type ApiResponse = (StatusCode, Json<Value>);

// ---------------------------------------------------------------------------
// Server state
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct FailRule {
    needle: String,
    status: u16,
    detail: String,
    once: bool,
}

#[derive(Clone)]
pub struct UploadField {
    pub name: String,
    pub file_name: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Clone)]
pub struct RecordedUpload {
    pub path: &'static str,
    pub fields: Vec<UploadField>,
}

#[derive(Default)]
pub struct ServerState {
    minted: u64,
    pub valid_access: HashSet<String>,
    pub valid_refresh: HashSet<String>,
    /// When set, freshly minted tokens are handed out but never marked
    /// valid, so the replayed request is rejected a second time.
    pub mint_dead_tokens: bool,
    pub refresh_calls: u64,
    pub log: Vec<(String, Value)>,
    pub failures: Vec<FailRule>,
    pub collections: Vec<Value>,
    pub records: Vec<Value>,
    pub activity: Vec<Value>,
    pub activity_query: Option<Vec<(String, String)>>,
    pub uploads: Vec<RecordedUpload>,
    pub preview_response: Option<Value>,
    pub upload_response: Option<Value>,
}

// ---------------------------------------------------------------------------
// Test handle
// ---------------------------------------------------------------------------

pub struct MockApi {
    pub base_url: String,
    state: Shared,
}

impl MockApi {
    /// Start the mock server on an ephemeral port.
    pub async fn spawn() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();

        let state: Shared = Arc::new(Mutex::new(ServerState::default()));
        let app = router(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock listener addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server");
        });

        MockApi {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// A fresh client session backed by this server, with a capturing
    /// notifier so tests can assert the surfaced messages.
    pub fn session(&self) -> (Session, Arc<CapturingNotifier>) {
        self.session_with_store(Arc::new(MemoryStore::new()))
    }

    /// Like [`Self::session`] but reusing `store`, for simulating a
    /// restart that picks up persisted tokens.
    pub fn session_with_store(&self, store: Arc<dyn StateStore>) -> (Session, Arc<CapturingNotifier>) {
        let notifier = Arc::new(CapturingNotifier::default());
        let session = Session::new(ClientConfig::new(&self.base_url), store, notifier.clone());
        (session, notifier)
    }

    /// A session already logged in as the mock's fixed user.
    pub async fn logged_in_session(&self) -> (Session, Arc<CapturingNotifier>) {
        let (session, notifier) = self.session();
        session
            .auth()
            .login(TEST_EMAIL, TEST_PASSWORD)
            .await
            .expect("login against mock");
        (session, notifier)
    }

    pub fn locked(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().expect("mock state lock")
    }

    /// Invalidate all outstanding access tokens, as if they expired.
    /// Refresh tokens stay valid.
    pub fn expire_access_tokens(&self) {
        self.locked().valid_access.clear();
    }

    /// Make every request whose `"METHOD path"` label contains `needle`
    /// answer `status` with the given `detail` body.
    pub fn fail(&self, needle: &str, status: u16, detail: &str) {
        self.locked().failures.push(FailRule {
            needle: needle.to_string(),
            status,
            detail: detail.to_string(),
            once: false,
        });
    }

    /// Like [`Self::fail`] but the rule is consumed by its first match.
    pub fn fail_once(&self, needle: &str, status: u16, detail: &str) {
        self.locked().failures.push(FailRule {
            needle: needle.to_string(),
            status,
            detail: detail.to_string(),
            once: true,
        });
    }

    pub fn clear_failures(&self) {
        self.locked().failures.clear();
    }

    /// Requests whose label equals `label` exactly.
    pub fn calls_to(&self, label: &str) -> usize {
        self.locked().log.iter().filter(|(l, _)| l == label).count()
    }

    /// Requests whose label contains `needle`.
    pub fn calls_matching(&self, needle: &str) -> usize {
        self.locked()
            .log
            .iter()
            .filter(|(l, _)| l.contains(needle))
            .count()
    }

    /// Bodies of requests whose label contains `needle`, in arrival order.
    pub fn bodies_matching(&self, needle: &str) -> Vec<Value> {
        self.locked()
            .log
            .iter()
            .filter(|(l, _)| l.contains(needle))
            .map(|(_, body)| body.clone())
            .collect()
    }

    pub fn refresh_calls(&self) -> u64 {
        self.locked().refresh_calls
    }

    pub fn seed_collections(&self, collections: Vec<Value>) {
        self.locked().collections = collections;
    }

    pub fn seed_records(&self, records: Vec<Value>) {
        self.locked().records = records;
    }

    pub fn seed_activity(&self, entries: Vec<Value>) {
        self.locked().activity = entries;
    }

    pub fn set_preview_response(&self, body: Value) {
        self.locked().preview_response = Some(body);
    }

    pub fn set_upload_response(&self, body: Value) {
        self.locked().upload_response = Some(body);
    }

    /// Multipart uploads the server accepted, in arrival order.
    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.locked().uploads.clone()
    }
}

/// Notifier that records every surfaced message for assertions.
#[derive(Default)]
pub struct CapturingNotifier {
    successes: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl CapturingNotifier {
    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().expect("notifier lock").clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().expect("notifier lock").clone()
    }
}

impl Notifier for CapturingNotifier {
    fn success(&self, message: &str) {
        self.successes
            .lock()
            .expect("notifier lock")
            .push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors
            .lock()
            .expect("notifier lock")
            .push(message.to_string());
    }
}

// ---------------------------------------------------------------------------
// Canned JSON
// ---------------------------------------------------------------------------

pub fn user_json() -> Value {
    json!({
        "id": USER_ID,
        "email": TEST_EMAIL,
        "full_name": "Maya Iyer",
        "email_verified": true,
        "is_active": true,
        "created_at": "2026-01-10T08:30:00Z",
        "last_login": "2026-02-01T12:00:00Z"
    })
}

pub fn collection_json(name: &str, created_at: &str) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "user_id": USER_ID,
        "name": name,
        "description": null,
        "schema": null,
        "is_deleted": false,
        "created_at": created_at,
        "updated_at": created_at,
        "record_count": 3
    })
}

pub fn record_json(collection_id: &str, data: Value, created_at: &str) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "collection_id": collection_id,
        "data": data,
        "is_deleted": false,
        "created_at": created_at,
        "updated_at": created_at
    })
}

pub fn activity_json(action: &str, entity_type: &str, created_at: &str) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "user_id": USER_ID,
        "action": action,
        "entity_type": entity_type,
        "entity_id": Uuid::new_v4(),
        "changes": null,
        "ip_address": null,
        "created_at": created_at
    })
}

/// Preview answered by `/import/preview` unless a test overrides it:
/// a 120-row, 3-column spreadsheet with 2 sample rows.
pub fn default_preview() -> Value {
    json!({
        "folder_name": "orders",
        "total_rows": 120,
        "total_columns": 3,
        "schema": {
            "fields": [
                { "name": "item", "label": "Item", "type": "text", "required": false },
                { "name": "qty", "label": "Qty", "type": "number", "required": false },
                {
                    "name": "status",
                    "label": "Status",
                    "type": "select",
                    "required": false,
                    "options": ["open", "done"]
                }
            ]
        },
        "preview": [
            { "item": "Notebook", "qty": 4, "status": "open" },
            { "item": "Stapler", "qty": 1, "status": "done" }
        ]
    })
}

fn default_outcome() -> Value {
    json!({
        "collection_id": IMPORTED_COLLECTION_ID,
        "folder_name": "orders",
        "items_created": 120,
        "message": "Successfully imported 120 items into 'orders'"
    })
}

// ---------------------------------------------------------------------------
// Routing and handlers
// ---------------------------------------------------------------------------

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/register/request-otp", post(register_request_otp))
        .route("/api/v1/auth/login/request-otp", post(login_request_otp))
        .route("/api/v1/auth/register/verify", post(register_verify))
        .route("/api/v1/auth/login/verify-otp", post(login_verify_otp))
        .route("/api/v1/auth/refresh", post(refresh))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/collections", get(list_collections).post(create_collection))
        .route(
            "/api/v1/collections/{id}",
            get(get_collection).put(update_collection).delete(delete_collection),
        )
        .route(
            "/api/v1/collections/{id}/records",
            get(list_records).post(create_record),
        )
        .route(
            "/api/v1/collections/{id}/records/{record_id}",
            put(update_record).delete(delete_record),
        )
        .route("/api/v1/activity", get(activity_feed))
        .route("/api/v1/import/preview", post(import_preview))
        .route("/api/v1/import/upload", post(import_upload))
        .with_state(state)
}

fn detail(status: StatusCode, message: &str) -> ApiResponse {
    (status, Json(json!({ "detail": message })))
}

fn unauthenticated() -> ApiResponse {
    detail(StatusCode::UNAUTHORIZED, "Not authenticated")
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::to_string)
}

fn authorized(state: &ServerState, headers: &HeaderMap) -> bool {
    bearer_token(headers).map_or(false, |token| state.valid_access.contains(&token))
}

fn forced(state: &mut ServerState, label: &str) -> Option<ApiResponse> {
    let idx = state
        .failures
        .iter()
        .position(|rule| label.contains(&rule.needle))?;
    let rule = if state.failures[idx].once {
        state.failures.remove(idx)
    } else {
        state.failures[idx].clone()
    };
    Some(detail(
        StatusCode::from_u16(rule.status).expect("valid status in fail rule"),
        &rule.detail,
    ))
}

fn mint_tokens(state: &mut ServerState) -> Value {
    state.minted += 1;
    let access = format!("access-{}", state.minted);
    let refresh = format!("refresh-{}", state.minted);
    if !state.mint_dead_tokens {
        state.valid_access.insert(access.clone());
        state.valid_refresh.insert(refresh.clone());
    }
    json!({
        "access_token": access,
        "refresh_token": refresh,
        "token_type": "bearer",
        "user": user_json(),
    })
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> ApiResponse {
    let mut state = state.lock().expect("mock state lock");
    state.log.push(("POST /auth/login".to_string(), body.clone()));
    if let Some(response) = forced(&mut state, "POST /auth/login") {
        return response;
    }
    if body["email"] == TEST_EMAIL && body["password"] == TEST_PASSWORD {
        let tokens = mint_tokens(&mut state);
        (StatusCode::OK, Json(tokens))
    } else {
        detail(StatusCode::UNAUTHORIZED, "Incorrect email or password")
    }
}

fn otp_request(state: &Shared, label: &str, body: Value) -> ApiResponse {
    let mut state = state.lock().expect("mock state lock");
    state.log.push((label.to_string(), body));
    if let Some(response) = forced(&mut state, label) {
        return response;
    }
    (
        StatusCode::OK,
        Json(json!({ "message": "Verification code sent", "detail": null })),
    )
}

async fn register_request_otp(State(state): State<Shared>, Json(body): Json<Value>) -> ApiResponse {
    otp_request(&state, "POST /auth/register/request-otp", body)
}

async fn login_request_otp(State(state): State<Shared>, Json(body): Json<Value>) -> ApiResponse {
    otp_request(&state, "POST /auth/login/request-otp", body)
}

fn otp_verify(state: &Shared, label: &str, body: Value) -> ApiResponse {
    let mut state = state.lock().expect("mock state lock");
    state.log.push((label.to_string(), body.clone()));
    if let Some(response) = forced(&mut state, label) {
        return response;
    }
    if body["code"] == OTP_CODE {
        let tokens = mint_tokens(&mut state);
        (StatusCode::OK, Json(tokens))
    } else {
        detail(StatusCode::BAD_REQUEST, "Invalid or expired verification code")
    }
}

async fn register_verify(State(state): State<Shared>, Json(body): Json<Value>) -> ApiResponse {
    otp_verify(&state, "POST /auth/register/verify", body)
}

async fn login_verify_otp(State(state): State<Shared>, Json(body): Json<Value>) -> ApiResponse {
    otp_verify(&state, "POST /auth/login/verify-otp", body)
}

async fn refresh(State(state): State<Shared>, Json(body): Json<Value>) -> ApiResponse {
    let mut state = state.lock().expect("mock state lock");
    state.log.push(("POST /auth/refresh".to_string(), body.clone()));
    state.refresh_calls += 1;
    if let Some(response) = forced(&mut state, "POST /auth/refresh") {
        return response;
    }
    let token = body["refresh_token"].as_str().unwrap_or_default().to_string();
    if state.valid_refresh.contains(&token) {
        state.valid_refresh.remove(&token);
        let tokens = mint_tokens(&mut state);
        (StatusCode::OK, Json(tokens))
    } else {
        detail(StatusCode::UNAUTHORIZED, "Invalid refresh token")
    }
}

async fn logout(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResponse {
    let mut state = state.lock().expect("mock state lock");
    state.log.push(("POST /auth/logout".to_string(), body.clone()));
    if let Some(response) = forced(&mut state, "POST /auth/logout") {
        return response;
    }
    if !authorized(&state, &headers) {
        return unauthenticated();
    }
    if let Some(token) = body["refresh_token"].as_str() {
        let token = token.to_string();
        state.valid_refresh.remove(&token);
    }
    (
        StatusCode::OK,
        Json(json!({ "message": "Logged out", "detail": null })),
    )
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> ApiResponse {
    let mut state = state.lock().expect("mock state lock");
    state.log.push(("GET /auth/me".to_string(), Value::Null));
    if let Some(response) = forced(&mut state, "GET /auth/me") {
        return response;
    }
    if !authorized(&state, &headers) {
        return unauthenticated();
    }
    (StatusCode::OK, Json(user_json()))
}

async fn list_collections(State(state): State<Shared>, headers: HeaderMap) -> ApiResponse {
    let mut state = state.lock().expect("mock state lock");
    state.log.push(("GET /collections".to_string(), Value::Null));
    if let Some(response) = forced(&mut state, "GET /collections") {
        return response;
    }
    if !authorized(&state, &headers) {
        return unauthenticated();
    }
    (StatusCode::OK, Json(Value::Array(state.collections.clone())))
}

async fn create_collection(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResponse {
    let mut state = state.lock().expect("mock state lock");
    state.log.push(("POST /collections".to_string(), body.clone()));
    if let Some(response) = forced(&mut state, "POST /collections") {
        return response;
    }
    if !authorized(&state, &headers) {
        return unauthenticated();
    }
    let collection = json!({
        "id": Uuid::new_v4(),
        "user_id": USER_ID,
        "name": body["name"],
        "description": body.get("description").cloned().unwrap_or(Value::Null),
        "schema": body.get("schema").cloned().unwrap_or(Value::Null),
        "is_deleted": false,
        "created_at": "2026-02-11T09:00:00Z",
        "updated_at": "2026-02-11T09:00:00Z",
        "record_count": 0
    });
    state.collections.insert(0, collection.clone());
    (StatusCode::CREATED, Json(collection))
}

async fn get_collection(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResponse {
    let label = format!("GET /collections/{id}");
    let mut state = state.lock().expect("mock state lock");
    state.log.push((label.clone(), Value::Null));
    if let Some(response) = forced(&mut state, &label) {
        return response;
    }
    if !authorized(&state, &headers) {
        return unauthenticated();
    }
    match state.collections.iter().find(|c| c["id"] == id.as_str()) {
        Some(collection) => (StatusCode::OK, Json(collection.clone())),
        None => detail(StatusCode::NOT_FOUND, "Collection not found"),
    }
}

async fn update_collection(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResponse {
    let label = format!("PUT /collections/{id}");
    let mut state = state.lock().expect("mock state lock");
    state.log.push((label.clone(), body.clone()));
    if let Some(response) = forced(&mut state, &label) {
        return response;
    }
    if !authorized(&state, &headers) {
        return unauthenticated();
    }
    let previous = state
        .collections
        .iter()
        .find(|c| c["id"] == id.as_str())
        .cloned();
    let updated = json!({
        "id": id,
        "user_id": USER_ID,
        "name": body["name"],
        "description": body.get("description").cloned().unwrap_or(Value::Null),
        "schema": previous.as_ref().map_or(Value::Null, |c| c["schema"].clone()),
        "is_deleted": false,
        "created_at": previous
            .as_ref()
            .map_or(json!("2026-02-11T09:00:00Z"), |c| c["created_at"].clone()),
        "updated_at": "2026-02-12T10:00:00Z",
        "record_count": previous.as_ref().map_or(json!(0), |c| c["record_count"].clone())
    });
    for slot in state.collections.iter_mut() {
        if slot["id"] == id.as_str() {
            *slot = updated.clone();
        }
    }
    (StatusCode::OK, Json(updated))
}

async fn delete_collection(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResponse {
    let label = format!("DELETE /collections/{id}");
    let mut state = state.lock().expect("mock state lock");
    state.log.push((label.clone(), Value::Null));
    if let Some(response) = forced(&mut state, &label) {
        return response;
    }
    if !authorized(&state, &headers) {
        return unauthenticated();
    }
    state.collections.retain(|c| c["id"] != id.as_str());
    (
        StatusCode::OK,
        Json(json!({ "message": "Collection deleted successfully", "detail": null })),
    )
}

async fn list_records(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResponse {
    let label = format!("GET /collections/{id}/records");
    let mut state = state.lock().expect("mock state lock");
    state.log.push((label.clone(), Value::Null));
    if let Some(response) = forced(&mut state, &label) {
        return response;
    }
    if !authorized(&state, &headers) {
        return unauthenticated();
    }
    (StatusCode::OK, Json(Value::Array(state.records.clone())))
}

async fn create_record(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResponse {
    let label = format!("POST /collections/{id}/records");
    let mut state = state.lock().expect("mock state lock");
    state.log.push((label.clone(), body.clone()));
    if let Some(response) = forced(&mut state, &label) {
        return response;
    }
    if !authorized(&state, &headers) {
        return unauthenticated();
    }
    let record = json!({
        "id": Uuid::new_v4(),
        "collection_id": id,
        "data": body["data"],
        "is_deleted": false,
        "created_at": "2026-02-11T09:05:00Z",
        "updated_at": "2026-02-11T09:05:00Z"
    });
    state.records.insert(0, record.clone());
    (StatusCode::CREATED, Json(record))
}

async fn update_record(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((collection_id, record_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> ApiResponse {
    let label = format!("PUT /collections/{collection_id}/records/{record_id}");
    let mut state = state.lock().expect("mock state lock");
    state.log.push((label.clone(), body.clone()));
    if let Some(response) = forced(&mut state, &label) {
        return response;
    }
    if !authorized(&state, &headers) {
        return unauthenticated();
    }
    let previous = state
        .records
        .iter()
        .find(|r| r["id"] == record_id.as_str())
        .cloned();
    let record = json!({
        "id": record_id,
        "collection_id": collection_id,
        "data": body["data"],
        "is_deleted": false,
        "created_at": previous
            .as_ref()
            .map_or(json!("2026-02-11T09:05:00Z"), |r| r["created_at"].clone()),
        "updated_at": "2026-02-12T11:00:00Z"
    });
    for slot in state.records.iter_mut() {
        if slot["id"] == record_id.as_str() {
            *slot = record.clone();
        }
    }
    (StatusCode::OK, Json(record))
}

async fn delete_record(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((collection_id, record_id)): Path<(String, String)>,
) -> ApiResponse {
    let label = format!("DELETE /collections/{collection_id}/records/{record_id}");
    let mut state = state.lock().expect("mock state lock");
    state.log.push((label.clone(), Value::Null));
    if let Some(response) = forced(&mut state, &label) {
        return response;
    }
    if !authorized(&state, &headers) {
        return unauthenticated();
    }
    state.records.retain(|r| r["id"] != record_id.as_str());
    (
        StatusCode::OK,
        Json(json!({ "message": "Record deleted successfully", "detail": null })),
    )
}

async fn activity_feed(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResponse {
    let mut state = state.lock().expect("mock state lock");
    state.log.push(("GET /activity".to_string(), json!(params.clone())));
    if let Some(response) = forced(&mut state, "GET /activity") {
        return response;
    }
    if !authorized(&state, &headers) {
        return unauthenticated();
    }
    state.activity_query = Some(params);
    (StatusCode::OK, Json(Value::Array(state.activity.clone())))
}

async fn read_multipart(multipart: &mut Multipart) -> Vec<UploadField> {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content = field.bytes().await.expect("multipart bytes").to_vec();
        fields.push(UploadField {
            name,
            file_name,
            content,
        });
    }
    fields
}

async fn import_preview(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResponse {
    let fields = read_multipart(&mut multipart).await;
    let mut state = state.lock().expect("mock state lock");
    state.log.push(("POST /import/preview".to_string(), Value::Null));
    if let Some(response) = forced(&mut state, "POST /import/preview") {
        return response;
    }
    if !authorized(&state, &headers) {
        return unauthenticated();
    }
    state.uploads.push(RecordedUpload {
        path: "/import/preview",
        fields,
    });
    let body = state.preview_response.clone().unwrap_or_else(default_preview);
    (StatusCode::OK, Json(body))
}

async fn import_upload(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResponse {
    let fields = read_multipart(&mut multipart).await;
    let mut state = state.lock().expect("mock state lock");
    state.log.push(("POST /import/upload".to_string(), Value::Null));
    if let Some(response) = forced(&mut state, "POST /import/upload") {
        return response;
    }
    if !authorized(&state, &headers) {
        return unauthenticated();
    }
    state.uploads.push(RecordedUpload {
        path: "/import/upload",
        fields,
    });
    let body = state.upload_response.clone().unwrap_or_else(default_outcome);
    (StatusCode::OK, Json(body))
}
