use super::*;
use crate::test_support::{spawn_dream_server, StubState};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde_json::json;

async fn stub_api() -> (HttpDreamApi, StubState) {
    let state = StubState::default();
    let url = spawn_dream_server(state.clone()).await.expect("spawn server");
    (HttpDreamApi::new(format!("{url}/")), state)
}

fn sample_request() -> CreateDreamRequest {
    let at: DateTime<Utc> = "2024-05-01T08:30:00Z".parse().expect("timestamp");
    CreateDreamRequest::new("새로운 꿈", "flying over the sea", at)
}

#[tokio::test]
async fn login_returns_access_token_from_envelope() {
    let (api, state) = stub_api().await;
    state
        .respond(
            "POST /api/auth/login",
            StatusCode::OK,
            json!({ "data": { "accessToken": "tok-1" }, "message": "환영합니다!" }),
        )
        .await;

    let token = api.login("a@b.c", "pw").await.expect("login");
    assert_eq!(token, "tok-1");

    let requests = state.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body, json!({ "email": "a@b.c", "password": "pw" }));
    assert_eq!(requests[0].authorization, None);
}

#[tokio::test]
async fn login_without_token_is_a_service_error() {
    let (api, state) = stub_api().await;
    state
        .respond("POST /api/auth/login", StatusCode::OK, json!({ "data": {} }))
        .await;

    let err = api.login("a@b.c", "pw").await.expect_err("must fail");
    assert!(matches!(err, FlowError::Service { status: 200, .. }), "{err:?}");
}

#[tokio::test]
async fn login_maps_unauthorized_and_bad_request() {
    let (api, state) = stub_api().await;
    state
        .respond("POST /api/auth/login", StatusCode::UNAUTHORIZED, json!({}))
        .await;
    let err = api.login("a@b.c", "bad").await.expect_err("401");
    assert_eq!(err, FlowError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string()));
    assert!(err.requires_reauth());

    state
        .respond(
            "POST /api/auth/login",
            StatusCode::BAD_REQUEST,
            json!({ "message": "email format" }),
        )
        .await;
    let err = api.login("nope", "pw").await.expect_err("400");
    assert_eq!(
        err,
        FlowError::Service {
            status: 400,
            message: "입력 오류: email format".to_string(),
        }
    );

    state
        .respond("POST /api/auth/login", StatusCode::BAD_GATEWAY, json!({}))
        .await;
    let err = api.login("a@b.c", "pw").await.expect_err("502");
    assert!(
        err.to_string().contains("상태 코드: 502"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn create_dream_sends_bearer_token_and_payload() {
    let (api, state) = stub_api().await;
    state
        .respond(
            "POST /api/dreams",
            StatusCode::OK,
            json!({ "data": [{ "interpretation": "X", "emotionCategory": "Calm" }] }),
        )
        .await;

    let records = api
        .create_dream("tok-1", &sample_request())
        .await
        .expect("create");
    assert_eq!(records.len(), 1);
    let first = records[0].as_ref().expect("record");
    assert_eq!(first.interpretation.as_deref(), Some("X"));

    let requests = state.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer tok-1"));
    assert_eq!(
        requests[0].body,
        json!({
            "title": "새로운 꿈",
            "content": "flying over the sea",
            "date": "2024-05-01T08:30:00.000Z",
        })
    );
}

#[tokio::test]
async fn create_dream_surfaces_service_message() {
    let (api, state) = stub_api().await;
    state
        .respond(
            "POST /api/dreams",
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "message": "model overloaded" }),
        )
        .await;

    let err = api
        .create_dream("tok-1", &sample_request())
        .await
        .expect_err("must fail");
    assert_eq!(
        err,
        FlowError::Service {
            status: 500,
            message: "model overloaded".to_string(),
        }
    );
}

#[tokio::test]
async fn create_dream_with_missing_data_yields_no_records() {
    let (api, state) = stub_api().await;
    state
        .respond("POST /api/dreams", StatusCode::OK, json!({ "message": "ok" }))
        .await;

    let records = api
        .create_dream("tok-1", &sample_request())
        .await
        .expect("create");
    assert!(records.is_empty());
}

#[tokio::test]
async fn null_analysis_entries_are_kept_in_place() {
    let (api, state) = stub_api().await;
    state
        .respond(
            "POST /api/dreams",
            StatusCode::OK,
            json!({ "data": [null, { "interpretation": "X" }] }),
        )
        .await;

    let records = api
        .create_dream("tok-1", &sample_request())
        .await
        .expect("create");
    assert_eq!(records.len(), 2);
    assert!(records[0].is_none());
    assert_eq!(
        records[1].as_ref().and_then(|r| r.interpretation.as_deref()),
        Some("X")
    );
}

#[tokio::test]
async fn undecodable_success_body_is_a_decode_error() {
    let (api, state) = stub_api().await;
    state
        .respond("POST /api/dreams", StatusCode::OK, json!({ "data": "oops" }))
        .await;

    let err = api
        .create_dream("tok-1", &sample_request())
        .await
        .expect_err("must fail");
    assert!(matches!(err, FlowError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let api = HttpDreamApi::new("http://127.0.0.1:1");
    let err = api
        .create_dream("tok-1", &sample_request())
        .await
        .expect_err("must fail");
    assert!(matches!(err, FlowError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn detail_uses_id_path() {
    let (api, state) = stub_api().await;
    state
        .respond(
            "GET /api/dreams/9",
            StatusCode::OK,
            json!({ "data": { "id": 9, "title": "t", "content": "c", "createdAt": "2024-01-02T10:00:00" } }),
        )
        .await;

    let entry = api.dream_detail("tok-1", DreamId(9)).await.expect("detail");
    assert_eq!(entry.id, DreamId(9));
    assert_eq!(entry.title, "t");
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let api = HttpDreamApi::new("http://localhost:8080/");
    assert_eq!(api.base_url(), "http://localhost:8080");
    assert_eq!(api.endpoint(DREAMS_PATH), "http://localhost:8080/api/dreams");
}
