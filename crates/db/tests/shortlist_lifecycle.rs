//! Integration tests for the shortlist lifecycle writes.
//!
//! Each test runs against a freshly migrated database, so the seeded
//! catalog is present (MIT has id 1, University of Toronto id 4).

use pathway_core::shortlist::application_tasks;
use pathway_core::stage::JourneyStage;
use pathway_db::models::shortlist::CreateShortlistEntry;
use pathway_db::models::task::{TaskFilter, UpdateTask};
use pathway_db::models::user::{CreateUser, User};
use pathway_db::repositories::{ShortlistRepo, TaskRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str) -> User {
    UserRepo::create_with_profile(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            full_name: "Test Student".to_string(),
        },
    )
    .await
    .unwrap()
}

fn entry(university_id: i64) -> CreateShortlistEntry {
    CreateShortlistEntry {
        university_id,
        category: "target".to_string(),
        notes: None,
    }
}

async fn stage_of(pool: &PgPool, user_id: i64) -> JourneyStage {
    UserRepo::find_by_id(pool, user_id).await.unwrap().unwrap().stage()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn add_advances_stage_and_rejects_duplicates(pool: PgPool) {
    let user = new_user(&pool, "add@example.com").await;

    let outcome = ShortlistRepo::add(&pool, user.id, &entry(1)).await.unwrap();
    assert_eq!(outcome.current_stage, JourneyStage::FinalizingUniversities);
    assert!(!outcome.entry.is_locked);
    assert_eq!(outcome.entry.application_status, "shortlisted");

    let dup = ShortlistRepo::add(&pool, user.id, &entry(1)).await;
    let err = dup.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(
        db_err.constraint(),
        Some("uq_shortlisted_universities_user_university")
    );
}

#[sqlx::test]
async fn lock_creates_four_high_priority_tasks(pool: PgPool) {
    let user = new_user(&pool, "lock@example.com").await;
    ShortlistRepo::add(&pool, user.id, &entry(1)).await.unwrap();

    let drafts = application_tasks(1, "MIT");
    let outcome = ShortlistRepo::lock(&pool, user.id, 1, &drafts)
        .await
        .unwrap()
        .expect("entry should lock");

    assert!(outcome.entry.is_locked);
    assert!(outcome.entry.locked_at.is_some());
    assert_eq!(outcome.current_stage, JourneyStage::PreparingApplications);
    assert_eq!(outcome.tasks_created.len(), 4);
    assert!(outcome
        .tasks_created
        .iter()
        .all(|t| t.priority == "high" && t.university_id == Some(1)));

    // Second lock is a no-op.
    let again = ShortlistRepo::lock(&pool, user.id, 1, &drafts).await.unwrap();
    assert!(again.is_none());

    let tasks = TaskRepo::list(&pool, user.id, &TaskFilter::default()).await.unwrap();
    assert_eq!(tasks.len(), 4);
}

#[sqlx::test]
async fn unlock_keeps_completed_tasks_and_regresses_stage(pool: PgPool) {
    let user = new_user(&pool, "unlock@example.com").await;
    ShortlistRepo::add(&pool, user.id, &entry(4)).await.unwrap();
    let locked = ShortlistRepo::lock(&pool, user.id, 4, &application_tasks(4, "Toronto"))
        .await
        .unwrap()
        .unwrap();

    let done = &locked.tasks_created[0];
    TaskRepo::update(
        &pool,
        done.id,
        user.id,
        &UpdateTask {
            is_completed: Some(true),
            ..Default::default()
        },
        Some(chrono::Utc::now()),
    )
    .await
    .unwrap()
    .unwrap();

    let outcome = ShortlistRepo::unlock(&pool, user.id, 4).await.unwrap().unwrap();
    assert!(!outcome.entry.is_locked);
    assert!(outcome.entry.locked_at.is_none());
    assert_eq!(outcome.tasks_removed, 3);
    assert_eq!(outcome.remaining_locked, 0);
    assert_eq!(outcome.current_stage, JourneyStage::FinalizingUniversities);

    let remaining = TaskRepo::list(&pool, user.id, &TaskFilter::default()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, done.id);
    assert!(remaining[0].is_completed);

    assert!(ShortlistRepo::unlock(&pool, user.id, 4).await.unwrap().is_none());
}

#[sqlx::test]
async fn unlock_with_other_locked_entries_keeps_stage_four(pool: PgPool) {
    let user = new_user(&pool, "two@example.com").await;
    for id in [1, 4] {
        ShortlistRepo::add(&pool, user.id, &entry(id)).await.unwrap();
        ShortlistRepo::lock(&pool, user.id, id, &application_tasks(id, "U"))
            .await
            .unwrap()
            .unwrap();
    }

    let outcome = ShortlistRepo::unlock(&pool, user.id, 1).await.unwrap().unwrap();
    assert_eq!(outcome.remaining_locked, 1);
    assert_eq!(outcome.current_stage, JourneyStage::PreparingApplications);
    assert_eq!(stage_of(&pool, user.id).await, JourneyStage::PreparingApplications);
}

#[sqlx::test]
async fn remove_refuses_locked_entries(pool: PgPool) {
    let user = new_user(&pool, "remove@example.com").await;
    ShortlistRepo::add(&pool, user.id, &entry(1)).await.unwrap();
    ShortlistRepo::add(&pool, user.id, &entry(4)).await.unwrap();
    ShortlistRepo::lock(&pool, user.id, 1, &application_tasks(1, "MIT"))
        .await
        .unwrap()
        .unwrap();

    assert!(!ShortlistRepo::remove(&pool, user.id, 1).await.unwrap());
    assert!(ShortlistRepo::remove(&pool, user.id, 4).await.unwrap());
    assert!(!ShortlistRepo::remove(&pool, user.id, 4).await.unwrap());

    let counts = ShortlistRepo::counts(&pool, user.id).await.unwrap();
    assert_eq!(counts.shortlisted, 1);
    assert_eq!(counts.locked, 1);
}

#[sqlx::test]
async fn entries_are_scoped_per_user(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let bob = new_user(&pool, "bob@example.com").await;
    ShortlistRepo::add(&pool, alice.id, &entry(1)).await.unwrap();

    assert!(ShortlistRepo::find(&pool, bob.id, 1).await.unwrap().is_none());
    assert!(ShortlistRepo::lock(&pool, bob.id, 1, &application_tasks(1, "MIT"))
        .await
        .unwrap()
        .is_none());
    assert_eq!(stage_of(&pool, bob.id).await, JourneyStage::BuildingProfile);
}
