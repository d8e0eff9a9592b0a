//! Router assembly: HTTP endpoints, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - JSON API under `/api/v1/...`
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/users", post(http::http_post_user))
        .route("/api/v1/tests", post(http::http_post_test))
        .route("/api/v1/tests/complete", post(http::http_post_complete))
        .route("/api/v1/questions", get(http::http_get_questions))
        .route("/api/v1/categories", get(http::http_get_categories))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::PracticeConfig;
    use crate::dice::Dice;

    async fn app() -> Router {
        let state = AppState::from_config(PracticeConfig::default(), Dice::seeded(21)).await;
        build_router(Arc::new(state))
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, body)
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = send(&app().await, get("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_flow_over_http() {
        let app = app().await;
        let (status, _) = send(&app, post("/api/v1/users", json!({ "email": "ana@example.com" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(&app, post("/api/v1/users", json!({ "email": "ANA@example.com" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, test) = send(&app, post("/api/v1/tests", json!({ "email": "ana@example.com" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(test["part2"]["part"], json!(2));
        let part3 = test["part3"].as_array().unwrap();
        assert!((4..=6).contains(&part3.len()));
        assert!(!test["part1"].as_array().unwrap().is_empty());

        let ids: Vec<Value> = ["part1", "part3"]
            .iter()
            .flat_map(|k| test[*k].as_array().unwrap().iter().map(|q| q["id"].clone()))
            .chain(std::iter::once(test["part2"]["id"].clone()))
            .collect();
        let complete = json!({ "email": "ana@example.com", "questionIds": ids });
        let (status, body) = send(&app, post("/api/v1/tests/complete", complete.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["inserted"], json!(ids.len()));
        let (_, body) = send(&app, post("/api/v1/tests/complete", complete)).await;
        assert_eq!(body["inserted"], json!(0));
    }

    #[tokio::test]
    async fn unknown_user_is_404() {
        let (status, body) = send(&app().await, post("/api/v1/tests", json!({ "email": "nobody@example.com" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nobody@example.com"));
    }

    #[tokio::test]
    async fn questions_and_categories() {
        let app = app().await;
        send(&app, post("/api/v1/users", json!({ "email": "bo@example.com" }))).await;

        let (status, body) = send(&app, get("/api/v1/questions?email=bo@example.com&part=1&count=3&spread=true")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["questions"].as_array().unwrap().len(), 3);

        let (status, _) = send(&app, get("/api/v1/questions?email=bo@example.com&part=7")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, get("/api/v1/categories?part=1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["categories"], json!(["Free time", "Hometown", "Technology", "Work/Studies"]));
    }
}
