//! HTTP-level integration tests for signup, login and the current user.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, put_json_auth, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn signup_creates_user_at_stage_one(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({
        "email": "Ada@Example.com",
        "password": TEST_PASSWORD,
        "full_name": "Ada Lovelace",
    });
    let response = post_json(app, "/api/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["token_type"], "bearer");
    assert!(json["expires_in"].is_number());
    assert_eq!(json["user"]["email"], "ada@example.com");
    assert_eq!(json["user"]["onboarding_completed"], false);
    assert_eq!(json["user"]["current_stage"], 1);
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn signup_creates_an_empty_profile(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::signup(app.clone(), "profile@example.com").await;

    let response = get_auth(app, "/api/profile", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["gpa"].is_null());
    assert_eq!(json["preferred_countries"], json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_email_returns_409(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::signup(app.clone(), "twice@example.com").await;

    let body = json!({
        "email": "TWICE@example.com",
        "password": TEST_PASSWORD,
        "full_name": "Second",
    });
    let response = post_json(app, "/api/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "Email already registered");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn short_password_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({
        "email": "short@example.com",
        "password": "abc",
        "full_name": "Short",
    });
    let response = post_json(app, "/api/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_email_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({
        "email": "not-an-email",
        "password": TEST_PASSWORD,
        "full_name": "Nobody",
    });
    let response = post_json(app, "/api/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_returns_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::signup(app.clone(), "login@example.com").await;

    let body = json!({ "email": "login@example.com", "password": TEST_PASSWORD });
    let response = post_json(app.clone(), "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let token = json["access_token"].as_str().unwrap();
    let me = get_auth(app, "/api/auth/me", token).await;
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(body_json(me).await["email"], "login@example.com");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_wrong_password_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::signup(app.clone(), "wrongpw@example.com").await;

    let body = json!({ "email": "wrongpw@example.com", "password": "incorrect-password" });
    let response = post_json(app, "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid email or password");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_unknown_email_returns_same_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "email": "ghost@example.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid email or password");
}

// ---------------------------------------------------------------------------
// Current user
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn protected_route_without_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn protected_route_with_garbage_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/auth/me", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_me_changes_full_name(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::signup(app.clone(), "rename@example.com").await;

    let response = put_json_auth(
        app,
        "/api/auth/me",
        json!({ "full_name": "Renamed Applicant" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["full_name"], "Renamed Applicant");
}
