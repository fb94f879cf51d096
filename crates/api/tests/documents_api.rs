//! HTTP-level integration tests for document upload bookkeeping.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_multipart_auth};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn upload_list_and_delete(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::signup(app.clone(), "docs@example.com").await;

    let response = post_multipart_auth(
        app.clone(),
        "/api/documents/upload",
        Some(("transcript.pdf", &[7u8; 512][..])),
        &[("category", "financial")],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let doc = body_json(response).await;
    assert_eq!(doc["name"], "transcript.pdf");
    assert_eq!(doc["file_type"], "PDF");
    assert_eq!(doc["size_label"], "0.5 KB");
    assert_eq!(doc["category"], "financial");
    assert_eq!(doc["status"], "pending");
    assert!(doc.get("file_path").is_none());

    let list = body_json(get_auth(app.clone(), "/api/documents", &token).await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let uri = format!("/api/documents/{}", doc["id"]);
    let deleted = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let list = body_json(get_auth(app.clone(), "/api/documents", &token).await).await;
    assert_eq!(list.as_array().unwrap().len(), 0);

    assert_eq!(delete_auth(app, &uri, &token).await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn category_defaults_to_academic(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::signup(app.clone(), "default@example.com").await;

    let response = post_multipart_auth(
        app,
        "/api/documents/upload",
        Some(("passport", &b"scan"[..])),
        &[],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let doc = body_json(response).await;
    assert_eq!(doc["category"], "academic");
    assert!(doc["file_type"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_file_field_is_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::signup(app.clone(), "nofile@example.com").await;

    let response = post_multipart_auth(
        app,
        "/api/documents/upload",
        None,
        &[("category", "academic")],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn oversized_and_miscategorized_uploads_are_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::signup(app.clone(), "limits@example.com").await;

    // The test configuration caps uploads at 1 KiB.
    let too_big = post_multipart_auth(
        app.clone(),
        "/api/documents/upload",
        Some(("big.pdf", &[0u8; 2048][..])),
        &[],
        &token,
    )
    .await;
    assert_eq!(too_big.status(), StatusCode::BAD_REQUEST);

    let bad_category = post_multipart_auth(
        app.clone(),
        "/api/documents/upload",
        Some(("cv.pdf", &b"resume"[..])),
        &[("category", "selfies")],
        &token,
    )
    .await;
    assert_eq!(bad_category.status(), StatusCode::BAD_REQUEST);

    let list = body_json(get_auth(app, "/api/documents", &token).await).await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn documents_are_private(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = common::signup(app.clone(), "mine@example.com").await;
    let other = common::signup(app.clone(), "theirs@example.com").await;

    let doc = body_json(
        post_multipart_auth(
            app.clone(),
            "/api/documents/upload",
            Some(("sop.docx", &b"draft"[..])),
            &[("category", "application")],
            &owner,
        )
        .await,
    )
    .await;

    let list = body_json(get_auth(app.clone(), "/api/documents", &other).await).await;
    assert_eq!(list.as_array().unwrap().len(), 0);

    let uri = format!("/api/documents/{}", doc["id"]);
    assert_eq!(delete_auth(app, &uri, &other).await.status(), StatusCode::NOT_FOUND);
}
