//! Router-level tests for the roadmap API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use entities::{Roadmap, RoadmapCircle, User};
use roadmap_server::{
    config::{Config, KakaoConfig},
    create_app, create_state_with_generator,
    services::{SummaryError, SummaryGenerator},
    state::SharedState,
};
use roadmap_store::{MemoryRoadmapStore, RoadmapStore};
use serde_json::{Value, json};
use tower::ServiceExt;

struct EchoSummary;

#[async_trait]
impl SummaryGenerator for EchoSummary {
    async fn summarize(
        &self,
        roadmap: &Roadmap,
        circles: &[RoadmapCircle],
    ) -> Result<String, SummaryError> {
        Ok(format!("{} in {} steps", roadmap.title, circles.len()))
    }
}

fn test_config() -> Config {
    Config::new("integration-secret")
}

fn setup() -> (Router, SharedState<MemoryRoadmapStore>) {
    setup_with(test_config(), None)
}

fn setup_with(
    config: Config,
    generator: Option<Arc<dyn SummaryGenerator>>,
) -> (Router, SharedState<MemoryRoadmapStore>) {
    let state = create_state_with_generator(config, MemoryRoadmapStore::new(), generator);
    (create_app(state.clone()), state)
}

async fn login(state: &SharedState<MemoryRoadmapStore>, social_id: &str, name: &str) -> String {
    let user = state
        .store
        .create_user(User::new(social_id, name))
        .await
        .unwrap();
    state.jwt_manager.issue_access_token(user.id).unwrap()
}

async fn post_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, uri: &str, token: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn create_roadmap(app: &Router, token: &str, title: &str, circles: Value) -> String {
    let (status, body) = post_json(
        app,
        "/api/roadmap/create",
        Some(token),
        json!({ "title": title, "circles": circles }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["roadmap_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = setup();

    let response = get(&app, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_create_requires_authentication() {
    let (app, _state) = setup();

    let (status, body) = post_json(
        &app,
        "/api/roadmap/create",
        None,
        json!({ "title": "Rust", "circles": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], json!(-32001));

    let (status, _) = post_json(
        &app,
        "/api/roadmap/create",
        Some("not-a-jwt"),
        json!({ "title": "Rust", "circles": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_then_get_counts_views() {
    let (app, state) = setup();
    let token = login(&state, "kakao-1", "Alice").await;

    let roadmap_id = create_roadmap(
        &app,
        &token,
        "Rust",
        json!([
            { "title": "Ownership", "date": "2024-01-01", "content": "moves", "level": 1, "color_type": "RED" },
            { "title": "Traits", "date": "2024-02-01", "level": 3, "color_type": "GREEN" },
            { "title": "Async", "date": "2024-03-01", "level": 1, "color_type": "RED" }
        ]),
    )
    .await;

    let (status, body) = post_json(
        &app,
        "/api/roadmap/get",
        None,
        json!({ "roadmap_id": roadmap_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roadmap"]["roadmap"]["view"], json!(1));
    assert_eq!(body["roadmap"]["roadmap"]["user_name"], json!("Alice"));
    assert_eq!(body["roadmap"]["color"], json!("RED"));
    assert_eq!(body["circles"].as_array().unwrap().len(), 3);
    assert_eq!(body["circles"][1]["title"], json!("Traits"));
    assert_eq!(body["circles"][1]["roadmap"]["roadmap_id"], json!(roadmap_id));

    let (_, body) = post_json(
        &app,
        "/api/roadmap/get",
        None,
        json!({ "roadmap_id": roadmap_id }),
    )
    .await;
    assert_eq!(body["roadmap"]["roadmap"]["view"], json!(2));
}

#[tokio::test]
async fn test_get_with_bad_ids() {
    let (app, _state) = setup();

    let (status, body) = post_json(
        &app,
        "/api/roadmap/get",
        None,
        json!({ "roadmap_id": "nope" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!(-32600));

    let (status, body) = post_json(
        &app,
        "/api/roadmap/get",
        None,
        json!({ "roadmap_id": uuid::Uuid::new_v4().to_string() }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!(-32003));
}

#[tokio::test]
async fn test_list_orders_by_views() {
    let (app, state) = setup();
    let token = login(&state, "kakao-1", "Alice").await;

    let first = create_roadmap(&app, &token, "First", json!([])).await;
    let second = create_roadmap(&app, &token, "Second", json!([])).await;

    for _ in 0..2 {
        post_json(&app, "/api/roadmap/get", None, json!({ "roadmap_id": second })).await;
    }

    let (status, body) = post_json(&app, "/api/roadmap/list", None, json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<_> = body["roadmaps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["roadmap"]["roadmap_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec![second, first]);
    assert_eq!(body["roadmaps"][1]["color"], Value::Null);
}

#[tokio::test]
async fn test_search_is_case_sensitive_substring() {
    let (app, state) = setup();
    let token = login(&state, "kakao-1", "Alice").await;

    create_roadmap(&app, &token, "Backend with Rust", json!([])).await;
    create_roadmap(&app, &token, "Frontend", json!([])).await;

    let (_, body) = post_json(
        &app,
        "/api/roadmap/search",
        None,
        json!({ "keyword": "end" }),
    )
    .await;
    assert_eq!(body["roadmaps"].as_array().unwrap().len(), 2);

    let (_, body) = post_json(
        &app,
        "/api/roadmap/search",
        None,
        json!({ "keyword": "Rust" }),
    )
    .await;
    assert_eq!(body["roadmaps"].as_array().unwrap().len(), 1);

    let (_, body) = post_json(
        &app,
        "/api/roadmap/search",
        None,
        json!({ "keyword": "rust" }),
    )
    .await;
    assert!(body["roadmaps"].as_array().unwrap().is_empty());

    let (_, body) = post_json(&app, "/api/roadmap/search", None, json!({})).await;
    assert_eq!(body["roadmaps"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_blank_search_is_ordered_by_views() {
    let (app, state) = setup();
    let token = login(&state, "kakao-1", "Alice").await;

    for (title, views) in [("Rust", 1), ("Go", 3), ("Zig", 0), ("Kotlin", 2)] {
        let id = create_roadmap(&app, &token, title, json!([])).await;
        for _ in 0..views {
            post_json(&app, "/api/roadmap/get", None, json!({ "roadmap_id": id })).await;
        }
    }

    let (status, body) = post_json(
        &app,
        "/api/roadmap/search",
        None,
        json!({ "keyword": "  " }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let views: Vec<i64> = body["roadmaps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["roadmap"]["view"].as_i64().unwrap())
        .collect();
    assert_eq!(views.len(), 4);
    assert!(views.windows(2).all(|w| w[0] >= w[1]), "{views:?}");
}

#[tokio::test]
async fn test_list_carries_caller_name() {
    let (app, state) = setup();
    let token = login(&state, "kakao-1", "Alice").await;
    create_roadmap(&app, &token, "Rust", json!([])).await;

    let (_, body) = post_json(&app, "/api/roadmap/list", Some(&token), json!({})).await;
    assert_eq!(body["user_name"], json!("Alice"));

    let (_, body) = post_json(&app, "/api/roadmap/list", None, json!({})).await;
    assert_eq!(body["user_name"], Value::Null);
}

#[tokio::test]
async fn test_toggle_like_round_trip() {
    let (app, state) = setup();
    let owner = login(&state, "kakao-1", "Alice").await;
    let fan = login(&state, "kakao-2", "Bob").await;

    let roadmap_id = create_roadmap(&app, &owner, "Rust", json!([])).await;

    let (status, body) = post_json(
        &app,
        "/api/roadmap/like",
        Some(&fan),
        json!({ "roadmap_id": roadmap_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "result": "liked", "likes": 1 }));

    let (_, body) = post_json(&app, "/api/roadmap/list", Some(&fan), json!({})).await;
    assert_eq!(body["roadmaps"][0]["roadmap"]["liked"], json!(true));
    assert_eq!(body["roadmaps"][0]["roadmap"]["likes"], json!(1));

    let (_, body) = post_json(&app, "/api/roadmap/list", Some(&owner), json!({})).await;
    assert_eq!(body["roadmaps"][0]["roadmap"]["liked"], json!(false));

    let (_, body) = post_json(&app, "/api/roadmap/list", None, json!({})).await;
    assert_eq!(body["roadmaps"][0]["roadmap"]["liked"], json!(false));

    let (_, body) = post_json(
        &app,
        "/api/roadmap/like",
        Some(&fan),
        json!({ "roadmap_id": roadmap_id }),
    )
    .await;
    assert_eq!(body, json!({ "result": "unliked", "likes": 0 }));
}

#[tokio::test]
async fn test_like_unknown_roadmap_is_not_found() {
    let (app, state) = setup();
    let token = login(&state, "kakao-1", "Alice").await;

    let (status, _) = post_json(
        &app,
        "/api/roadmap/like",
        Some(&token),
        json!({ "roadmap_id": uuid::Uuid::new_v4().to_string() }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_current_user() {
    let (app, state) = setup();
    let token = login(&state, "kakao-1", "Alice").await;

    let response = get(&app, "/api/auth/me", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["user"]["name"], json!("Alice"));

    let response = get(&app, "/api/auth/me", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_summary_is_written_in_background() {
    let (app, state) = setup_with(test_config(), Some(Arc::new(EchoSummary)));
    let token = login(&state, "kakao-1", "Alice").await;

    let roadmap_id = create_roadmap(
        &app,
        &token,
        "Rust",
        json!([{ "title": "Ownership", "date": "2024-01-01", "level": 1, "color_type": "RED" }]),
    )
    .await;
    let id: uuid::Uuid = roadmap_id.parse().unwrap();

    let summary = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let roadmap = state.store.get_roadmap(id).await.unwrap().unwrap();
            if let Some(summary) = roadmap.summary {
                return summary;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(summary, "Rust in 1 steps");

    let (_, body) = post_json(
        &app,
        "/api/roadmap/search",
        None,
        json!({ "keyword": "steps" }),
    )
    .await;
    assert_eq!(body["roadmaps"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_login_requires_provider_configuration() {
    let (app, _state) = setup();

    let response = get(&app, "/oauth2/authorization/kakao", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_redirects_to_kakao() {
    let mut config = test_config();
    config.kakao = Some(KakaoConfig {
        client_id: "client-123".to_string(),
        client_secret: "secret".to_string(),
        redirect_uri: "http://localhost:8080/login/oauth2/code/kakao".to_string(),
    });
    let (app, _state) = setup_with(config, None);

    let response = get(&app, "/oauth2/authorization/kakao", None).await;
    assert!(response.status().is_redirection());

    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("https://kauth.kakao.com/oauth/authorize?"));
    assert!(location.contains("client_id=client-123"));
    assert!(location.contains("state="));
}

#[tokio::test]
async fn test_callback_rejects_unknown_state() {
    let mut config = test_config();
    config.kakao = Some(KakaoConfig {
        client_id: "client-123".to_string(),
        client_secret: "secret".to_string(),
        redirect_uri: "http://localhost:8080/login/oauth2/code/kakao".to_string(),
    });
    let (app, _state) = setup_with(config, None);

    let response = get(&app, "/login/oauth2/code/kakao?code=abc&state=forged", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(
        &app,
        "/login/oauth2/code/kakao?error=access_denied&state=forged",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
