use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedRequest {
    pub route: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Canned dream service: responses are keyed by `"METHOD /path"`.
#[derive(Clone, Default)]
pub(crate) struct StubState {
    responses: Arc<Mutex<HashMap<String, (StatusCode, Value)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubState {
    pub async fn respond(&self, route: &str, status: StatusCode, body: Value) {
        self.responses
            .lock()
            .await
            .insert(route.to_string(), (status, body));
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    async fn handle(&self, route: String, headers: &HeaderMap, body: Value) -> (StatusCode, Json<Value>) {
        let authorization = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.requests.lock().await.push(RecordedRequest {
            route: route.clone(),
            authorization,
            body,
        });
        let (status, body) = self
            .responses
            .lock()
            .await
            .get(&route)
            .cloned()
            .unwrap_or((StatusCode::OK, json!({ "data": [] })));
        (status, Json(body))
    }
}

async fn stub_login(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state
        .handle("POST /api/auth/login".to_string(), &headers, body)
        .await
}

async fn stub_create_dream(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state
        .handle("POST /api/dreams".to_string(), &headers, body)
        .await
}

async fn stub_list_dreams(
    State(state): State<StubState>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state
        .handle("GET /api/dreams".to_string(), &headers, Value::Null)
        .await
}

async fn stub_dream_detail(
    State(state): State<StubState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state
        .handle(format!("GET /api/dreams/{id}"), &headers, Value::Null)
        .await
}

pub(crate) async fn spawn_dream_server(state: StubState) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/api/auth/login", post(stub_login))
        .route("/api/dreams", post(stub_create_dream).get(stub_list_dreams))
        .route("/api/dreams/:id", get(stub_dream_detail))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}
