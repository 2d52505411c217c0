//! End-to-end tests against an in-process fake of the Plugged.in API.
//!
//! These tests verify the complete HTTP flow:
//! 1. Fake server starts on an ephemeral port
//! 2. `HttpTransport` sends authenticated requests
//! 3. Envelopes and status codes are interpreted by the services
//! 4. The blocking facade behaves exactly like the async one

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use pluggedin_sdk::{ClearStrategy, ClipboardVisibility, Error, PluggedIn, WriteOptions};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const API_KEY: &str = "pg_in_test_key";

#[derive(Default)]
struct FakeClipboard {
    named: BTreeMap<String, Value>,
    stack: Vec<Value>,
}

type Shared = Arc<Mutex<FakeClipboard>>;
type Reply = (StatusCode, Json<Value>);

fn reply(status: StatusCode, body: Value) -> Reply {
    (status, Json(body))
}

fn unauthorized(headers: &HeaderMap) -> Option<Reply> {
    let expected = format!("Bearer {}", API_KEY);
    let ok = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == expected)
        .unwrap_or(false);
    (!ok).then(|| reply(StatusCode::UNAUTHORIZED, json!({"error": "Invalid API key"})))
}

fn stored_entry(body: &Value, name: Option<&str>, idx: Option<usize>) -> Value {
    json!({
        "name": name,
        "idx": idx,
        "value": body["value"],
        "contentType": body["contentType"],
        "encoding": body["encoding"],
        "visibility": body["visibility"],
        "source": body["source"],
        "createdByTool": body.get("createdByTool"),
    })
}

async fn clipboard_get(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    let state = state.lock().unwrap();

    let found = if let Some(name) = params.get("name") {
        state.named.get(name).cloned()
    } else if let Some(idx) = params.get("idx") {
        let idx: usize = idx.parse().unwrap();
        state.stack.get(idx).cloned()
    } else {
        let entries: Vec<Value> = state
            .named
            .values()
            .chain(state.stack.iter())
            .cloned()
            .collect();
        return reply(StatusCode::OK, json!({"success": true, "entries": entries}));
    };

    match found {
        Some(entry) => reply(StatusCode::OK, json!({"success": true, "entry": entry})),
        None => reply(
            StatusCode::NOT_FOUND,
            json!({"success": false, "error": "Clipboard entry not found"}),
        ),
    }
}

async fn clipboard_set(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    let Some(name) = body["name"].as_str() else {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({"success": false, "error": "name is required"}),
        );
    };
    let entry = stored_entry(&body, Some(name), None);
    state.lock().unwrap().named.insert(name.to_string(), entry.clone());
    reply(StatusCode::OK, json!({"success": true, "entry": entry}))
}

async fn clipboard_push(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    let mut state = state.lock().unwrap();
    let entry = stored_entry(&body, None, Some(state.stack.len()));
    state.stack.push(entry.clone());
    reply(StatusCode::OK, json!({"success": true, "entry": entry}))
}

async fn clipboard_pop(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    match state.lock().unwrap().stack.pop() {
        Some(entry) => reply(StatusCode::OK, json!({"success": true, "entry": entry})),
        None => reply(
            StatusCode::NOT_FOUND,
            json!({"success": false, "error": "Clipboard is empty"}),
        ),
    }
}

async fn clipboard_delete(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    let mut state = state.lock().unwrap();

    if body["clearAll"] == json!(true) {
        let deleted = state.named.len() + state.stack.len();
        state.named.clear();
        state.stack.clear();
        return reply(StatusCode::OK, json!({"success": true, "deleted": deleted}));
    }

    let removed = if let Some(name) = body["name"].as_str() {
        state.named.remove(name).is_some()
    } else if let Some(idx) = body["idx"].as_u64() {
        let idx = idx as usize;
        if idx < state.stack.len() {
            state.stack.remove(idx);
            true
        } else {
            false
        }
    } else {
        false
    };
    reply(StatusCode::OK, json!({"success": true, "deleted": removed}))
}

async fn rag_query(headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    let query = body["query"].as_str().unwrap_or_default();
    reply(
        StatusCode::OK,
        json!({
            "response": format!("echo: {}", query),
            "sources": ["handbook.md"],
            "documentIds": ["doc-1", "doc-2"],
        }),
    )
}

fn router(state: Shared) -> Router {
    Router::new()
        .route(
            "/api/clipboard",
            get(clipboard_get).post(clipboard_set).delete(clipboard_delete),
        )
        .route("/api/clipboard/push", post(clipboard_push))
        .route("/api/clipboard/pop", post(clipboard_pop))
        .route("/api/rag/query", post(rag_query))
        .with_state(state)
}

/// Start the fake server and return its base URL.
async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(Shared::default());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: &str) -> PluggedIn {
    PluggedIn::builder()
        .base_url(base_url)
        .api_key(API_KEY)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_named_entries_over_http() {
    let url = spawn_server().await;
    let clipboard = client(&url).clipboard();

    let options = WriteOptions::new()
        .content_type("application/json")
        .visibility(ClipboardVisibility::Workspace)
        .created_by_tool("integration-test");
    let stored = clipboard.set("config", r#"{"a":1}"#, &options).await.unwrap();
    assert_eq!(stored.name.as_deref(), Some("config"));
    assert_eq!(stored.visibility, ClipboardVisibility::Workspace);

    let fetched = clipboard.get(Some("config"), None).await.unwrap().unwrap();
    assert_eq!(fetched.value, r#"{"a":1}"#);
    assert_eq!(fetched.content_type, "application/json");

    // 404 with an envelope is absence, not an error
    assert!(clipboard.get(Some("missing"), None).await.unwrap().is_none());

    assert_eq!(clipboard.delete(Some("config"), None).await.unwrap(), 1);
    assert_eq!(clipboard.delete(Some("config"), None).await.unwrap(), 0);
}

#[tokio::test]
async fn test_stack_over_http() {
    let url = spawn_server().await;
    let clipboard = client(&url).clipboard();

    clipboard.push("first", &WriteOptions::new()).await.unwrap();
    let second = clipboard.push("second", &WriteOptions::new()).await.unwrap();
    assert_eq!(second.idx, Some(1));

    let by_index = clipboard.get(None, Some(0)).await.unwrap().unwrap();
    assert_eq!(by_index.value, "first");

    assert_eq!(clipboard.pop().await.unwrap().unwrap().value, "second");
    assert_eq!(clipboard.pop().await.unwrap().unwrap().value, "first");
    assert!(clipboard.pop().await.unwrap().is_none());
}

#[tokio::test]
async fn test_clear_all_strategies_over_http() {
    let url = spawn_server().await;
    let clipboard = client(&url).clipboard();

    for value in ["a", "b", "c"] {
        clipboard.push(value, &WriteOptions::new()).await.unwrap();
    }
    clipboard.set("named", "x", &WriteOptions::new()).await.unwrap();

    let bulk = clipboard.clear_all().await.unwrap();
    assert_eq!(bulk.deleted, 4);
    assert_eq!(bulk.strategy, ClearStrategy::Bulk);
    assert!(clipboard.list().await.unwrap().is_empty());

    clipboard.set("one", "1", &WriteOptions::new()).await.unwrap();
    clipboard.set("two", "2", &WriteOptions::new()).await.unwrap();
    let iterative = clipboard.clear_all_with(ClearStrategy::Iterative).await.unwrap();
    assert_eq!(iterative.deleted, 2);
    assert!(iterative.success());
    assert!(clipboard.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rag_over_http() {
    let url = spawn_server().await;
    let rag = client(&url).rag();

    let result = rag.query_with_sources("holidays").await.unwrap();
    assert_eq!(result.answer, "echo: holidays");
    assert_eq!(result.sources.len(), 2);
    assert_eq!(result.sources[0].name, "handbook.md");
    assert_eq!(result.sources[1].name, "Document 2");

    assert!(rag.check_availability().await.available);
}

#[tokio::test]
async fn test_bad_key_is_auth_error() {
    let url = spawn_server().await;
    let client = PluggedIn::builder()
        .base_url(&url)
        .api_key("wrong")
        .build()
        .unwrap();

    let err = client.clipboard().list().await.unwrap_err();
    assert!(matches!(err, Error::Auth(ref m) if m == "Invalid API key"));

    let availability = client.rag().check_availability().await;
    assert!(!availability.available);
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    // bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .clipboard()
        .list()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}

#[test]
fn test_blocking_facade_over_http() {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            tx.send(spawn_server().await).unwrap();
            std::future::pending::<()>().await;
        });
    });
    let url = rx.recv().unwrap();

    let client = pluggedin_sdk::blocking::PluggedIn::new(client(&url)).unwrap();
    let clipboard = client.clipboard();

    clipboard.set("k", "v", &WriteOptions::new()).unwrap();
    clipboard.push("stacked", &WriteOptions::new()).unwrap();
    assert_eq!(clipboard.list().unwrap().len(), 2);
    assert_eq!(clipboard.get(Some("k"), None).unwrap().unwrap().value, "v");

    let cleared = clipboard.clear_all().unwrap();
    assert_eq!(cleared.deleted, 2);

    assert_eq!(client.rag().ask_question("ping").unwrap(), "echo: ping");
}
