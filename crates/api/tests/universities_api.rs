//! HTTP-level integration tests for the fit-annotated university catalog.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth};
use sqlx::PgPool;

fn fit_scores(json: &serde_json::Value) -> Vec<i64> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|u| u["fit_score"].as_i64().unwrap())
        .collect()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_is_sorted_by_fit_score(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::onboarded_user(app.clone(), "catalog@example.com").await;

    let response = get_auth(app, "/api/universities", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let scores = fit_scores(&json);
    assert_eq!(scores.len(), 15);
    assert!(scores.windows(2).all(|w| w[0] >= w[1]), "not sorted: {scores:?}");
    assert!(scores.iter().all(|s| (0..=100).contains(s)));
    for uni in json.as_array().unwrap() {
        let category = uni["category"].as_str().unwrap();
        assert!(["dream", "target", "safe"].contains(&category));
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_without_profile_data_uses_neutral_fit(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::signup(app.clone(), "fresh@example.com").await;

    let json = body_json(get_auth(app, "/api/universities", &token).await).await;
    assert!(fit_scores(&json).iter().all(|s| *s == 50));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_by_country_and_program(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::signup(app.clone(), "filter@example.com").await;

    let json = body_json(get_auth(app.clone(), "/api/universities?country=germany", &token).await).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.iter().any(|n| n.contains("Munich")));
    assert!(names.iter().any(|n| n.contains("Aachen")));

    let json = body_json(get_auth(app, "/api/universities?program=forestry", &token).await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "University of British Columbia");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn recommendations_require_onboarding(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::signup(app.clone(), "early@example.com").await;

    let response = get_auth(app, "/api/universities/recommendations", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Please complete onboarding first");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn recommendations_respect_budget_and_countries(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::onboarded_user(app.clone(), "recs@example.com").await;

    let response = get_auth(app, "/api/universities/recommendations", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let recs = json.as_array().unwrap();
    assert!(!recs.is_empty());
    for uni in recs {
        let country = uni["country"].as_str().unwrap();
        assert!(country == "USA" || country == "Canada", "unexpected {country}");
        // Budget 50000 plus the 20% buffer.
        assert!(uni["tuition_max"].as_i64().unwrap() <= 60000);
    }
    let scores = fit_scores(&json);
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_by_id_includes_risk_level(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::onboarded_user(app.clone(), "single@example.com").await;

    let response = get_auth(app.clone(), "/api/universities/1", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["category"], "dream");
    assert_eq!(json["risk_level"], "high");

    let missing = get_auth(app, "/api/universities/9999", &token).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
