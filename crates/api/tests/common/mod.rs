#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use pathway_api::auth::jwt::JwtConfig;
use pathway_api::config::ServerConfig;
use pathway_api::router::build_app_router;
use pathway_api::state::AppState;
use pathway_api::storage::DocumentStore;
use pathway_llm::{Counsellor, LlmConfig};

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uploads go to a fresh directory under the system temp dir and text
/// generation is disabled.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 60,
        },
        upload_dir: std::env::temp_dir().join(format!("pathway-test-{}", uuid::Uuid::new_v4())),
        max_upload_bytes: 1024,
        llm: LlmConfig::disabled(),
    }
}

/// Build the full application router using the given pool and a
/// fallback-only counsellor.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Counsellor::fallback_only())
}

/// Build the full application router with a specific counsellor.
pub fn build_test_app_with(pool: PgPool, counsellor: Counsellor) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        counsellor: Arc::new(counsellor),
        documents: Arc::new(DocumentStore::new(config.upload_dir.clone())),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Send a `multipart/form-data` body with one file part and optional text
/// parts.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    file: Option<(&str, &[u8])>,
    fields: &[(&str, &str)],
    token: &str,
) -> Response<Body> {
    let boundary = "pathway-test-boundary";
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Sign up a user through the API and return the access token.
pub async fn signup(app: Router, email: &str) -> String {
    let body = json!({
        "email": email,
        "password": TEST_PASSWORD,
        "full_name": "Test Applicant",
    });
    let response = post_json(app, "/api/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// Complete onboarding with a strong computer-science profile.
pub async fn onboard(app: Router, token: &str) -> Value {
    let body = json!({
        "profile": {
            "education_level": "bachelors",
            "degree": "Bachelor's",
            "major": "Computer Science",
            "gpa": 3.8,
            "intended_degree": "masters",
            "field_of_study": "Computer Science",
            "preferred_countries": ["USA", "Canada"],
            "budget_min": 20000,
            "budget_max": 50000,
            "ielts_status": "completed",
            "ielts_score": 7.5,
            "gre_status": "completed",
            "gre_score": 325,
            "sop_status": "draft",
        }
    });
    let response = post_json_auth(app, "/api/profile/onboarding/complete", body, token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// Sign up and onboard in one step.
pub async fn onboarded_user(app: Router, email: &str) -> String {
    let token = signup(app.clone(), email).await;
    onboard(app, &token).await;
    token
}
