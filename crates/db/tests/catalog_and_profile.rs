//! Integration tests for the catalog, profile, task and conversation repos.

use pathway_core::fit::recommendation_tuition_ceiling;
use pathway_core::stage::JourneyStage;
use pathway_db::models::profile::UpdateProfile;
use pathway_db::models::task::{CreateTask, TaskFilter};
use pathway_db::models::university::UniversityFilter;
use pathway_db::models::user::{CreateUser, User};
use pathway_db::repositories::{
    ConversationRepo, ProfileRepo, TaskRepo, UniversityRepo, UserRepo,
};
use sqlx::PgPool;

async fn new_user(pool: &PgPool, email: &str) -> User {
    UserRepo::create_with_profile(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            full_name: "Student".to_string(),
        },
    )
    .await
    .unwrap()
}

fn task(title: &str, priority: Option<&str>) -> CreateTask {
    CreateTask {
        university_id: None,
        title: title.to_string(),
        description: None,
        category: Some("general".to_string()),
        priority: priority.map(str::to_string),
        due_date: None,
    }
}

#[sqlx::test]
async fn catalog_is_seeded_in_order(pool: PgPool) {
    let all = UniversityRepo::list(&pool, &UniversityFilter::default()).await.unwrap();
    assert_eq!(all.len(), 15);
    assert_eq!(all[0].id, 1);
    assert!(all[0].name.contains("MIT"));
    assert_eq!(all[3].name, "University of Toronto");
}

#[sqlx::test]
async fn catalog_filters_combine(pool: PgPool) {
    let filter = UniversityFilter {
        country: Some("can".to_string()),
        budget_max: Some(36_000),
        program: Some("computer".to_string()),
    };
    let found = UniversityRepo::list(&pool, &filter).await.unwrap();
    let names: Vec<_> = found.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["University of Waterloo"]);
}

#[sqlx::test]
async fn candidates_respect_budget_buffer_and_countries(pool: PgPool) {
    let countries = vec!["germany".to_string(), "Canada".to_string()];
    let ceiling = Some(recommendation_tuition_ceiling(30_000));
    let found = UniversityRepo::list_candidates(&pool, ceiling, &countries).await.unwrap();
    // 36000 ceiling: TUM, Waterloo, RWTH. Toronto and UBC are over it.
    let ids: Vec<_> = found.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![5, 13, 15]);

    let everything = UniversityRepo::list_candidates(&pool, None, &[]).await.unwrap();
    assert_eq!(everything.len(), 15);
}

#[sqlx::test]
async fn email_is_unique(pool: PgPool) {
    new_user(&pool, "same@example.com").await;
    let err = UserRepo::create_with_profile(
        &pool,
        &CreateUser {
            email: "same@example.com".to_string(),
            password_hash: "x".to_string(),
            full_name: "Again".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.constraint()),
        Some("uq_users_email")
    );
}

#[sqlx::test]
async fn profile_update_only_touches_given_fields(pool: PgPool) {
    let user = new_user(&pool, "patch@example.com").await;
    ProfileRepo::update(
        &pool,
        user.id,
        &UpdateProfile {
            gpa: Some(3.6),
            major: Some("Physics".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let profile = ProfileRepo::update(
        &pool,
        user.id,
        &UpdateProfile {
            preferred_countries: Some(vec!["UK".into()]),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(profile.gpa, Some(3.6));
    assert_eq!(profile.major.as_deref(), Some("Physics"));
    assert_eq!(profile.preferred_countries, vec!["UK".to_string()]);
}

#[sqlx::test]
async fn onboarding_creates_tasks_and_never_lowers_stage(pool: PgPool) {
    let user = new_user(&pool, "onboard@example.com").await;
    let outcome = ProfileRepo::complete_onboarding(
        &pool,
        user.id,
        &UpdateProfile {
            intended_degree: Some("masters".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(outcome.user.onboarding_completed);
    assert_eq!(outcome.user.stage(), JourneyStage::DiscoveringUniversities);
    assert_eq!(outcome.tasks_created.len(), 4);

    sqlx::query("UPDATE users SET current_stage = 4 WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
    let user = UserRepo::mark_onboarded(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(user.stage(), JourneyStage::PreparingApplications);
}

#[sqlx::test]
async fn tasks_order_by_priority_then_newest(pool: PgPool) {
    let user = new_user(&pool, "tasks@example.com").await;
    TaskRepo::create(&pool, user.id, &task("low one", Some("low"))).await.unwrap();
    TaskRepo::create(&pool, user.id, &task("default", None)).await.unwrap();
    TaskRepo::create(&pool, user.id, &task("high old", Some("high"))).await.unwrap();
    TaskRepo::create(&pool, user.id, &task("high new", Some("high"))).await.unwrap();

    let tasks = TaskRepo::list(&pool, user.id, &TaskFilter::default()).await.unwrap();
    let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["high new", "high old", "default", "low one"]);
    assert_eq!(tasks[2].priority, "medium");

    let counts = TaskRepo::counts(&pool, user.id).await.unwrap();
    assert_eq!(counts.pending, 4);
    assert_eq!(counts.completed, 0);
}

#[sqlx::test]
async fn completion_flag_and_timestamp_must_agree(pool: PgPool) {
    let user = new_user(&pool, "check@example.com").await;
    let t = TaskRepo::create(&pool, user.id, &task("x", None)).await.unwrap();

    let result = sqlx::query("UPDATE tasks SET is_completed = TRUE WHERE id = $1")
        .bind(t.id)
        .execute(&pool)
        .await;
    assert!(result.is_err());
}

#[sqlx::test]
async fn conversation_history_is_oldest_first(pool: PgPool) {
    let user = new_user(&pool, "chat@example.com").await;
    for i in 0..5 {
        let role = if i % 2 == 0 { "user" } else { "assistant" };
        ConversationRepo::append(&pool, user.id, role, &format!("m{i}"))
            .await
            .unwrap();
    }

    let recent = ConversationRepo::recent(&pool, user.id, 3).await.unwrap();
    let messages: Vec<_> = recent.iter().map(|m| m.message.as_str()).collect();
    assert_eq!(messages, vec!["m2", "m3", "m4"]);

    assert_eq!(ConversationRepo::clear(&pool, user.id).await.unwrap(), 5);
    assert!(ConversationRepo::recent(&pool, user.id, 50).await.unwrap().is_empty());
}
