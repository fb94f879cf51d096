//! HTTP-level integration tests for the profile, onboarding, strength and
//! dashboard endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn partial_update_keeps_other_fields(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::signup(app.clone(), "partial@example.com").await;

    put_json_auth(app.clone(), "/api/profile", json!({ "gpa": 3.4, "major": "Physics" }), &token).await;
    let response = put_json_auth(app, "/api/profile", json!({ "budget_max": 30000 }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["gpa"], 3.4);
    assert_eq!(json["major"], "Physics");
    assert_eq!(json["budget_max"], 30000);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_values_are_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::signup(app.clone(), "invalid@example.com").await;

    let gpa = put_json_auth(app.clone(), "/api/profile", json!({ "gpa": 5.2 }), &token).await;
    assert_eq!(gpa.status(), StatusCode::BAD_REQUEST);

    let status = put_json_auth(app.clone(), "/api/profile", json!({ "ielts_status": "done" }), &token).await;
    assert_eq!(status.status(), StatusCode::BAD_REQUEST);

    let budget = put_json_auth(
        app,
        "/api/profile",
        json!({ "budget_min": 40000, "budget_max": 10000 }),
        &token,
    )
    .await;
    assert_eq!(budget.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn budget_update_cannot_invert_stored_range(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::onboarded_user(app.clone(), "range@example.com").await;

    let response = put_json_auth(app.clone(), "/api/profile", json!({ "budget_max": 100 }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let profile = body_json(get_auth(app.clone(), "/api/profile", &token).await).await;
    assert_eq!(profile["budget_min"], 20000);
    assert_eq!(profile["budget_max"], 50000);

    let widened = put_json_auth(app, "/api/profile", json!({ "budget_max": 60000 }), &token).await;
    assert_eq!(widened.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_fields_are_ignored(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::signup(app.clone(), "allowlist@example.com").await;

    let response = put_json_auth(
        app,
        "/api/profile",
        json!({ "user_id": 999, "id": 42, "major": "Economics" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_ne!(json["user_id"], 999);
    assert_eq!(json["major"], "Economics");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn onboarding_moves_to_stage_two_and_creates_tasks(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::signup(app.clone(), "onboard@example.com").await;

    let json = common::onboard(app.clone(), &token).await;
    assert_eq!(json["user"]["onboarding_completed"], true);
    assert_eq!(json["user"]["current_stage"], 2);

    // Exams are done, the SOP is still a draft.
    let titles: Vec<&str> = json["tasks_created"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Draft Statement of Purpose", "Research universities"]);

    let tasks = body_json(get_auth(app, "/api/tasks", &token).await).await;
    assert_eq!(tasks.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn onboarding_with_empty_profile_adds_exam_tasks(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::signup(app.clone(), "empty@example.com").await;

    let response = post_json_auth(
        app,
        "/api/profile/onboarding/complete",
        json!({ "profile": { "intended_degree": "masters" } }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let titles: Vec<&str> = json["tasks_created"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Prepare for IELTS/TOEFL",
            "Prepare for GRE",
            "Draft Statement of Purpose",
            "Research universities",
        ]
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn strength_reflects_profile(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::onboarded_user(app.clone(), "strength@example.com").await;

    let response = get_auth(app, "/api/profile/strength", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["academics"], "strong");
    assert_eq!(json["exams"], "completed");
    assert_eq!(json["sop"], "draft");
    assert_eq!(json["overall_score"], 90);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn dashboard_counts_shortlist_and_tasks(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::onboarded_user(app.clone(), "dash@example.com").await;
    post_json_auth(
        app.clone(),
        "/api/universities/shortlist",
        json!({ "university_id": 4 }),
        &token,
    )
    .await;

    let response = get_auth(app, "/api/profile/dashboard", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["user"]["current_stage"], 3);
    assert_eq!(json["shortlisted_count"], 1);
    assert_eq!(json["locked_count"], 0);
    assert_eq!(json["pending_tasks"], 2);
    assert_eq!(json["completed_tasks"], 0);
    assert_eq!(json["profile_strength"]["overall_score"], 90);
    assert_eq!(json["recent_tasks"][0]["priority"], "high");
}
