// system-tests/tests/helpers/service_stub.rs
// ============================================================================
// Module: Service Stub
// Description: In-memory Podium resource service for harness self-tests.
// Purpose: Exercise the verifier against conforming and faulty services.
// Dependencies: axum, podium-contract, serde_json, tokio, uuid
// ============================================================================

use std::collections::BTreeMap;
use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use podium_contract::ResourceKind;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use tokio::runtime::Builder;
use tokio::sync::oneshot;
use uuid::Uuid;

/// Contract violations the stub can be told to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubFault {
    /// POST succeeds but the body is a bare message without `id`.
    CreateWithoutId,
    /// DELETE answers 200 and keeps the item.
    DeleteIsNoop,
    /// Stored items carry a different value for the first round-trip field.
    MangleField,
    /// Date/time fields are not validated.
    AcceptMalformedDates,
    /// Undeclared fields are rejected with 422.
    RejectUnknownFields,
    /// Collection listings are always empty.
    OmitFromListing,
    /// Every request answers 500.
    InternalError,
}

type Store = Arc<Mutex<BTreeMap<ResourceKind, BTreeMap<String, Value>>>>;

#[derive(Clone)]
struct StubState {
    faults: Arc<Vec<StubFault>>,
    store: Store,
}

impl StubState {
    fn has(&self, fault: StubFault) -> bool {
        self.faults.contains(&fault)
    }
}

/// Handle for the in-process service stub.
pub struct ServiceStubHandle {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
    store: Store,
}

impl ServiceStubHandle {
    /// Returns the service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns how many items of `kind` are stored.
    pub fn stored(&self, kind: ResourceKind) -> usize {
        self.store
            .lock()
            .map_or(0, |store| store.get(&kind).map_or(0, BTreeMap::len))
    }

    /// Returns a stored item.
    pub fn item(&self, kind: ResourceKind, id: &str) -> Option<Value> {
        self.store.lock().ok()?.get(&kind)?.get(id).cloned()
    }
}

impl Drop for ServiceStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Spawns a stub that honours the resource contract apart from `faults`.
pub fn spawn_service_stub(faults: &[StubFault]) -> Result<ServiceStubHandle, String> {
    spawn_service_stub_at("", faults)
}

/// Spawns a stub whose routes live under `prefix` (for example `/api`).
pub fn spawn_service_stub_at(
    prefix: &str,
    faults: &[StubFault],
) -> Result<ServiceStubHandle, String> {
    let listener = StdTcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("service stub bind failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("service stub listener nonblocking failed: {err}"))?;
    let addr =
        listener.local_addr().map_err(|err| format!("service stub local addr failed: {err}"))?;
    let base_url = format!("http://{addr}{prefix}");

    let store: Store = Arc::new(Mutex::new(BTreeMap::new()));
    let state = StubState {
        faults: Arc::new(faults.to_vec()),
        store: Arc::clone(&store),
    };
    let routes = Router::new()
        .route("/{collection}", get(list_items).post(create_item))
        .route("/{collection}/{id}", get(read_item).delete(delete_item))
        .route("/users/{user_id}/follow/{athlete_id}", post(follow_athlete))
        .with_state(state);
    let app = if prefix.is_empty() { routes } else { Router::new().nest(prefix, routes) };

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = thread::spawn(move || {
        let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
            return;
        };
        runtime.block_on(async move {
            let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                return;
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
    });
    Ok(ServiceStubHandle {
        base_url,
        shutdown: Some(shutdown_tx),
        join: Some(join),
        store,
    })
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn resolve(state: &StubState, collection: &str) -> Result<ResourceKind, Response> {
    if state.has(StubFault::InternalError) {
        return Err(error(StatusCode::INTERNAL_SERVER_ERROR, "stub configured to fail"));
    }
    ResourceKind::from_segment(collection)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, format!("unknown collection {collection}")))
}

async fn create_item(
    State(state): State<StubState>,
    Path(collection): Path<String>,
    body: Bytes,
) -> Response {
    let kind = match resolve(&state, &collection) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    let fields = match validate(&state, kind, &body) {
        Ok(fields) => fields,
        Err(message) => return error(StatusCode::UNPROCESSABLE_ENTITY, message),
    };
    let id = Uuid::new_v4().to_string();
    let mut item = fields;
    if state.has(StubFault::MangleField)
        && let Some(field) = kind.round_trip_fields().first()
    {
        item.insert((*field).to_string(), json!("mangled"));
    }
    item.insert("id".to_string(), json!(id));
    let item = Value::Object(item);
    let Ok(mut store) = state.store.lock() else {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "store poisoned");
    };
    store.entry(kind).or_default().insert(id, item.clone());
    if state.has(StubFault::CreateWithoutId) {
        return Json(json!(format!("{kind} added successfully!"))).into_response();
    }
    Json(item).into_response()
}

/// Checks declared fields and strips undeclared ones.
fn validate(
    state: &StubState,
    kind: ResourceKind,
    body: &[u8],
) -> Result<Map<String, Value>, String> {
    let parsed: Value = serde_json::from_slice(body).map_err(|err| err.to_string())?;
    let Value::Object(mut fields) = parsed else {
        return Err("expected a json object".to_string());
    };
    for field in kind.declared_fields() {
        match fields.get(*field) {
            Some(Value::String(_) | Value::Array(_)) => {}
            Some(_) => return Err(format!("`{field}` has the wrong type")),
            None => return Err(format!("missing field `{field}`")),
        }
    }
    if let Some(date) = kind.date_field() {
        let raw = fields.get(date.name).and_then(Value::as_str).unwrap_or_default();
        if !state.has(StubFault::AcceptMalformedDates) && !date.format.accepts(raw) {
            return Err(format!("`{}` is not a valid date: {raw}", date.name));
        }
    }
    let unknown: Vec<String> =
        fields.keys().filter(|name| !kind.declares(name)).cloned().collect();
    if state.has(StubFault::RejectUnknownFields) && !unknown.is_empty() {
        return Err(format!("unknown fields: {}", unknown.join(", ")));
    }
    for name in unknown {
        fields.remove(&name);
    }
    Ok(fields)
}

async fn list_items(State(state): State<StubState>, Path(collection): Path<String>) -> Response {
    let kind = match resolve(&state, &collection) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    if !kind.has_listing() {
        return error(StatusCode::METHOD_NOT_ALLOWED, format!("{kind} has no listing"));
    }
    if state.has(StubFault::OmitFromListing) {
        return Json(json!([])).into_response();
    }
    let Ok(store) = state.store.lock() else {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "store poisoned");
    };
    let items: Vec<Value> =
        store.get(&kind).map(|items| items.values().cloned().collect()).unwrap_or_default();
    Json(Value::Array(items)).into_response()
}

async fn read_item(
    State(state): State<StubState>,
    Path((collection, id)): Path<(String, String)>,
) -> Response {
    let kind = match resolve(&state, &collection) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    let Ok(store) = state.store.lock() else {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "store poisoned");
    };
    match store.get(&kind).and_then(|items| items.get(&id)) {
        Some(item) => Json(item.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_item(
    State(state): State<StubState>,
    Path((collection, id)): Path<(String, String)>,
) -> Response {
    let kind = match resolve(&state, &collection) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    if state.has(StubFault::DeleteIsNoop) {
        return StatusCode::OK.into_response();
    }
    let Ok(mut store) = state.store.lock() else {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "store poisoned");
    };
    if let Some(items) = store.get_mut(&kind) {
        items.remove(&id);
    }
    StatusCode::OK.into_response()
}

async fn follow_athlete(
    State(state): State<StubState>,
    Path((user_id, athlete_id)): Path<(String, String)>,
) -> Response {
    if let Err(response) = resolve(&state, ResourceKind::User.segment()) {
        return response;
    }
    let Ok(mut store) = state.store.lock() else {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "store poisoned");
    };
    let Some(user) = store.get_mut(&ResourceKind::User).and_then(|users| users.get_mut(&user_id))
    else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let Some(Value::Array(following)) = user.get_mut("athletes_following") {
        following.push(json!(athlete_id));
    }
    StatusCode::OK.into_response()
}
