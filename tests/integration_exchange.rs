mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDateTime;
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use common::{
    create_test_class, create_test_class_test, create_test_lesson, create_test_note,
    create_test_time_slot, create_test_user,
};
use slateboard::config::cors::CorsConfig;
use slateboard::config::email::EmailConfig;
use slateboard::router::init_router;
use slateboard::slateboard_models::dependents::ClassTest;
use slateboard::slateboard_models::ids::{LessonId, UserId};
use slateboard::state::AppState;

async fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        email_config: EmailConfig::default(),
        cors_config: CorsConfig::default(),
    };
    init_router(state)
}

fn authed_request(
    method: &str,
    uri: &str,
    user: Uuid,
    role: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-user-id", user.to_string())
        .header("x-user-role", role)
        .header("content-type", "application/json");

    match body {
        Some(value) => builder
            .body(Body::from(serde_json::to_string(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A class, two teachers, a manager, a scheduled lesson owned by teacher A
/// on Monday 2024-03-04 at 08:00, and an empty slot owned by teacher B on
/// Wednesday 2024-03-06 at 10:00 (same ISO week).
struct SwapWorld {
    class_id: Uuid,
    teacher_a: Uuid,
    teacher_b: Uuid,
    manager: Uuid,
    original: Uuid,
    replacement: Uuid,
}

async fn seed_swap_world(pool: &PgPool) -> SwapWorld {
    let mut tx = pool.begin().await.unwrap();

    let class_id = create_test_class(&mut tx).await;
    let slot_morning = create_test_time_slot(&mut tx, 1, Some("08:00:00")).await;
    let slot_late = create_test_time_slot(&mut tx, 3, Some("10:00:00")).await;
    let teacher_a = create_test_user(&mut tx, "teacher", None).await;
    let teacher_b = create_test_user(&mut tx, "teacher", None).await;
    let manager = create_test_user(&mut tx, "manager", None).await;

    let original = create_test_lesson(
        &mut tx,
        class_id,
        slot_morning,
        "2024-03-04",
        Some(teacher_a),
        "regular",
        "scheduled",
        Some("Mathematics"),
    )
    .await;
    let replacement = create_test_lesson(
        &mut tx,
        class_id,
        slot_late,
        "2024-03-06",
        Some(teacher_b),
        "empty",
        "scheduled",
        None,
    )
    .await;

    tx.commit().await.unwrap();

    SwapWorld {
        class_id,
        teacher_a,
        teacher_b,
        manager,
        original,
        replacement,
    }
}

async fn submit_swap(app: &axum::Router, world: &SwapWorld) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/exchange-requests",
            world.teacher_a,
            "teacher",
            Some(json!({
                "request_type": "swap",
                "original_lesson_id": world.original,
                "replacement_lesson_id": world.replacement,
                "reason": "Medical appointment on Monday"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

async fn approve(app: &axum::Router, request_id: &str, user: Uuid, role: &str) -> StatusCode {
    app.clone()
        .oneshot(authed_request(
            "PATCH",
            &format!("/api/exchange-requests/{request_id}/approve"),
            user,
            role,
            None,
        ))
        .await
        .unwrap()
        .status()
}

async fn lesson_row(
    pool: &PgPool,
    id: Uuid,
) -> (String, String, Option<Uuid>, Option<String>, Option<Uuid>) {
    sqlx::query_as(
        "SELECT kind::text, status::text, teacher_id, subject, makeup_for FROM lessons WHERE id = $1",
    )
    .bind(id)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_submit_swap_request(pool: PgPool) {
    let world = seed_swap_world(&pool).await;
    let app = setup_test_app(pool.clone()).await;

    let body = submit_swap(&app, &world).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["request_type"], "swap");
    assert_eq!(body["data"]["teacher_approved"], false);
    assert_eq!(
        body["data"]["replacement_teacher_id"],
        world.teacher_b.to_string()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_submit_requires_lesson_ownership(pool: PgPool) {
    let world = seed_swap_world(&pool).await;
    let app = setup_test_app(pool.clone()).await;

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/exchange-requests",
            world.teacher_b,
            "teacher",
            Some(json!({
                "request_type": "swap",
                "original_lesson_id": world.original,
                "replacement_lesson_id": world.replacement,
                "reason": "Not my lesson"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_submit_unknown_lesson_not_found(pool: PgPool) {
    let world = seed_swap_world(&pool).await;
    let app = setup_test_app(pool.clone()).await;

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/exchange-requests",
            world.teacher_a,
            "teacher",
            Some(json!({
                "request_type": "swap",
                "original_lesson_id": Uuid::new_v4(),
                "replacement_lesson_id": world.replacement,
                "reason": "Ghost lesson"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_submit_swap_needs_scheduled_original(pool: PgPool) {
    let world = seed_swap_world(&pool).await;
    sqlx::query("UPDATE lessons SET status = 'completed' WHERE id = $1")
        .bind(world.original)
        .execute(&pool)
        .await
        .unwrap();
    let app = setup_test_app(pool.clone()).await;

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/exchange-requests",
            world.teacher_a,
            "teacher",
            Some(json!({
                "request_type": "swap",
                "original_lesson_id": world.original,
                "replacement_lesson_id": world.replacement,
                "reason": "Too late"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_submit_makeup_needs_absent_original(pool: PgPool) {
    let world = seed_swap_world(&pool).await;
    let app = setup_test_app(pool.clone()).await;

    // Original is scheduled, not absent
    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/exchange-requests",
            world.teacher_a,
            "teacher",
            Some(json!({
                "request_type": "makeup",
                "original_lesson_id": world.original,
                "replacement_lesson_id": world.replacement,
                "reason": "Nothing to make up"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_submit_rejects_ineligible_replacement(pool: PgPool) {
    let world = seed_swap_world(&pool).await;
    let app = setup_test_app(pool.clone()).await;

    // Occupied replacement
    sqlx::query("UPDATE lessons SET kind = 'regular', subject = 'Physics' WHERE id = $1")
        .bind(world.replacement)
        .execute(&pool)
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/exchange-requests",
            world.teacher_a,
            "teacher",
            Some(json!({
                "request_type": "swap",
                "original_lesson_id": world.original,
                "replacement_lesson_id": world.replacement,
                "reason": "Occupied target"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Different week
    sqlx::query(
        "UPDATE lessons SET kind = 'empty', subject = NULL, scheduled_date = '2024-03-12' WHERE id = $1",
    )
    .bind(world.replacement)
    .execute(&pool)
    .await
    .unwrap();

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/exchange-requests",
            world.teacher_a,
            "teacher",
            Some(json!({
                "request_type": "swap",
                "original_lesson_id": world.original,
                "replacement_lesson_id": world.replacement,
                "reason": "Wrong week"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_submit_rejects_cross_class_replacement(pool: PgPool) {
    let world = seed_swap_world(&pool).await;

    let mut tx = pool.begin().await.unwrap();
    let other_class = create_test_class(&mut tx).await;
    let other_slot = create_test_time_slot(&mut tx, 5, Some("11:00:00")).await;
    let other_replacement = create_test_lesson(
        &mut tx,
        other_class,
        other_slot,
        "2024-03-06",
        Some(world.teacher_b),
        "empty",
        "scheduled",
        None,
    )
    .await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/exchange-requests",
            world.teacher_a,
            "teacher",
            Some(json!({
                "request_type": "swap",
                "original_lesson_id": world.original,
                "replacement_lesson_id": other_replacement,
                "reason": "Wrong class"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_single_pending_request_per_lesson(pool: PgPool) {
    let world = seed_swap_world(&pool).await;
    let app = setup_test_app(pool.clone()).await;

    submit_swap(&app, &world).await;

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/exchange-requests",
            world.teacher_a,
            "teacher",
            Some(json!({
                "request_type": "swap",
                "original_lesson_id": world.original,
                "replacement_lesson_id": world.replacement,
                "reason": "Second attempt"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_manager_cannot_submit(pool: PgPool) {
    let world = seed_swap_world(&pool).await;
    let app = setup_test_app(pool.clone()).await;

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/exchange-requests",
            world.manager,
            "manager",
            Some(json!({
                "request_type": "swap",
                "original_lesson_id": world.original,
                "replacement_lesson_id": world.replacement,
                "reason": "Managers submit nothing"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_swap_two_stage_approval_applies_content(pool: PgPool) {
    let world = seed_swap_world(&pool).await;
    let app = setup_test_app(pool.clone()).await;

    let body = submit_swap(&app, &world).await;
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    // Manager cannot skip the teacher stage
    assert_eq!(
        approve(&app, &request_id, world.manager, "manager").await,
        StatusCode::CONFLICT
    );

    // Stage 1: the replacement slot's teacher
    assert_eq!(
        approve(&app, &request_id, world.teacher_b, "teacher").await,
        StatusCode::OK
    );

    // Still pending after stage 1; nothing moved yet
    let (kind, status, teacher, subject, _) = lesson_row(&pool, world.original).await;
    assert_eq!(kind, "regular");
    assert_eq!(status, "scheduled");
    assert_eq!(teacher, Some(world.teacher_a));
    assert_eq!(subject.as_deref(), Some("Mathematics"));

    // A second teacher approval cannot advance the request
    assert_eq!(
        approve(&app, &request_id, world.teacher_b, "teacher").await,
        StatusCode::CONFLICT
    );

    // Stage 2: manager; the swap applies
    assert_eq!(
        approve(&app, &request_id, world.manager, "manager").await,
        StatusCode::OK
    );

    let (kind, status, teacher, subject, _) = lesson_row(&pool, world.original).await;
    assert_eq!(kind, "empty");
    assert_eq!(status, "scheduled");
    assert_eq!(teacher, Some(world.teacher_b));
    assert!(subject.is_none());

    let (kind, status, teacher, subject, _) = lesson_row(&pool, world.replacement).await;
    assert_eq!(kind, "regular");
    assert_eq!(status, "scheduled");
    assert_eq!(teacher, Some(world.teacher_a));
    assert_eq!(subject.as_deref(), Some("Mathematics"));

    // A decided request cannot be approved again
    assert_eq!(
        approve(&app, &request_id, world.manager, "manager").await,
        StatusCode::CONFLICT
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_swap_repoints_dependents_and_recomputes_reminders(pool: PgPool) {
    let world = seed_swap_world(&pool).await;

    let mut tx = pool.begin().await.unwrap();
    let test_id = create_test_class_test(&mut tx, world.original, world.class_id).await;
    let note_on_original = create_test_note(&mut tx, world.original, world.teacher_a, Some(30)).await;
    let note_on_replacement =
        create_test_note(&mut tx, world.replacement, world.teacher_b, Some(30)).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;

    let body = submit_swap(&app, &world).await;
    let request_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(
        approve(&app, &request_id, world.teacher_b, "teacher").await,
        StatusCode::OK
    );
    assert_eq!(
        approve(&app, &request_id, world.manager, "manager").await,
        StatusCode::OK
    );

    // The test follows the lesson content to the replacement slot
    let class_test = sqlx::query_as::<_, ClassTest>(
        r#"SELECT id, lesson_id, class_id, subject, title, last_modified_by,
                  created_at, updated_at
           FROM class_tests WHERE id = $1"#,
    )
    .bind(test_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(class_test.lesson_id, LessonId::from(world.replacement));
    assert_eq!(class_test.last_modified_by, Some(UserId::from(world.manager)));

    // Notes swapped slots and their reminders follow the new start times:
    // replacement slot is Wednesday 10:00, original slot Monday 08:00.
    let (lesson_id, remind_at) = sqlx::query_as::<_, (Uuid, Option<NaiveDateTime>)>(
        "SELECT lesson_id, remind_at FROM lesson_notes WHERE id = $1",
    )
    .bind(note_on_original)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(lesson_id, world.replacement);
    assert_eq!(
        remind_at,
        Some("2024-03-06T09:30:00".parse::<NaiveDateTime>().unwrap())
    );

    let (lesson_id, remind_at) = sqlx::query_as::<_, (Uuid, Option<NaiveDateTime>)>(
        "SELECT lesson_id, remind_at FROM lesson_notes WHERE id = $1",
    )
    .bind(note_on_replacement)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(lesson_id, world.original);
    assert_eq!(
        remind_at,
        Some("2024-03-04T07:30:00".parse::<NaiveDateTime>().unwrap())
    );

    // The approved request itself keeps its original pointers
    let (original_ref, replacement_ref) = sqlx::query_as::<_, (Uuid, Uuid)>(
        "SELECT original_lesson_id, replacement_lesson_id FROM exchange_requests WHERE id = $1::uuid",
    )
    .bind(&request_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(original_ref, world.original);
    assert_eq!(replacement_ref, world.replacement);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_swap_repoints_other_pending_requests(pool: PgPool) {
    let world = seed_swap_world(&pool).await;

    // A second scheduled lesson by teacher B targets the same empty slot
    let mut tx = pool.begin().await.unwrap();
    let slot = create_test_time_slot(&mut tx, 7, Some("13:00:00")).await;
    let other_original = create_test_lesson(
        &mut tx,
        world.class_id,
        slot,
        "2024-03-05",
        Some(world.teacher_b),
        "regular",
        "scheduled",
        Some("Physics"),
    )
    .await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;

    let body = submit_swap(&app, &world).await;
    let first_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/exchange-requests",
            world.teacher_b,
            "teacher",
            Some(json!({
                "request_type": "swap",
                "original_lesson_id": other_original,
                "replacement_lesson_id": world.replacement,
                "reason": "Also want that slot"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let second_id = json_body(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    assert_eq!(
        approve(&app, &first_id, world.teacher_b, "teacher").await,
        StatusCode::OK
    );
    assert_eq!(
        approve(&app, &first_id, world.manager, "manager").await,
        StatusCode::OK
    );

    // The losing request now points at the slot that became empty
    let (replacement_ref,): (Uuid,) = sqlx::query_as(
        "SELECT replacement_lesson_id FROM exchange_requests WHERE id = $1::uuid",
    )
    .bind(&second_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(replacement_ref, world.original);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_makeup_single_manager_approval(pool: PgPool) {
    let world = seed_swap_world(&pool).await;
    sqlx::query("UPDATE lessons SET status = 'absent' WHERE id = $1")
        .bind(world.original)
        .execute(&pool)
        .await
        .unwrap();

    let app = setup_test_app(pool.clone()).await;

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/exchange-requests",
            world.teacher_a,
            "teacher",
            Some(json!({
                "request_type": "makeup",
                "original_lesson_id": world.original,
                "replacement_lesson_id": world.replacement,
                "reason": "Was out sick on Monday"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    let request_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["replacement_teacher_id"], serde_json::Value::Null);

    // No teacher stage for makeups
    assert_eq!(
        approve(&app, &request_id, world.teacher_b, "teacher").await,
        StatusCode::CONFLICT
    );
    assert_eq!(
        approve(&app, &request_id, world.manager, "manager").await,
        StatusCode::OK
    );

    let (kind, status, teacher, subject, makeup_for) =
        lesson_row(&pool, world.replacement).await;
    assert_eq!(kind, "makeup");
    assert_eq!(status, "scheduled");
    assert_eq!(teacher, Some(world.teacher_a));
    assert_eq!(subject.as_deref(), Some("Mathematics"));
    assert_eq!(makeup_for, Some(world.original));

    let (kind, status, teacher, subject, makeup_for) = lesson_row(&pool, world.original).await;
    assert_eq!(kind, "empty");
    assert_eq!(status, "scheduled");
    assert!(teacher.is_none());
    assert!(subject.is_none());
    assert!(makeup_for.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reject_leaves_lessons_untouched(pool: PgPool) {
    let world = seed_swap_world(&pool).await;
    let app = setup_test_app(pool.clone()).await;

    let body = submit_swap(&app, &world).await;
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    // An unrelated teacher is not an approver
    let mut tx = pool.begin().await.unwrap();
    let outsider = create_test_user(&mut tx, "teacher", None).await;
    tx.commit().await.unwrap();

    let response = app
        .clone()
        .oneshot(authed_request(
            "PATCH",
            &format!("/api/exchange-requests/{request_id}/reject"),
            outsider,
            "teacher",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The stage-1 teacher can reject
    let response = app
        .clone()
        .oneshot(authed_request(
            "PATCH",
            &format!("/api/exchange-requests/{request_id}/reject"),
            world.teacher_b,
            "teacher",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "rejected");

    let (kind, _, teacher, subject, _) = lesson_row(&pool, world.original).await;
    assert_eq!(kind, "regular");
    assert_eq!(teacher, Some(world.teacher_a));
    assert_eq!(subject.as_deref(), Some("Mathematics"));

    // A terminal request clears the way for a new one
    submit_swap(&app, &world).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cancel_only_by_requester_while_pending(pool: PgPool) {
    let world = seed_swap_world(&pool).await;
    let app = setup_test_app(pool.clone()).await;

    let body = submit_swap(&app, &world).await;
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/exchange-requests/{request_id}/cancel"),
            world.teacher_b,
            "teacher",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/exchange-requests/{request_id}/cancel"),
            world.teacher_a,
            "teacher",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "cancelled");

    // Cancelled requests cannot be approved or re-cancelled
    assert_eq!(
        approve(&app, &request_id, world.manager, "manager").await,
        StatusCode::CONFLICT
    );
    let response = app
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/exchange-requests/{request_id}/cancel"),
            world.teacher_a,
            "teacher",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_requests_with_status_filter(pool: PgPool) {
    let world = seed_swap_world(&pool).await;
    let app = setup_test_app(pool.clone()).await;

    let body = submit_swap(&app, &world).await;
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            "/api/exchange-requests?status=pending",
            world.manager,
            "manager",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["meta"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["id"], request_id);

    let response = app
        .oneshot(authed_request(
            "GET",
            "/api/exchange-requests?status=approved",
            world.manager,
            "manager",
            None,
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["meta"]["total"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_approval_creates_notifications(pool: PgPool) {
    let world = seed_swap_world(&pool).await;
    let app = setup_test_app(pool.clone()).await;

    let body = submit_swap(&app, &world).await;
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    // Submission notifies the stage-1 teacher
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM notifications WHERE receiver_type = 'user' AND receiver_id = $1",
    )
    .bind(world.teacher_b)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);

    assert_eq!(
        approve(&app, &request_id, world.teacher_b, "teacher").await,
        StatusCode::OK
    );
    assert_eq!(
        approve(&app, &request_id, world.manager, "manager").await,
        StatusCode::OK
    );

    // Final approval notifies the class about the schedule change
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM notifications WHERE receiver_type = 'class' AND receiver_id = $1",
    )
    .bind(world.class_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_submit_rejects_requester_time_conflict(pool: PgPool) {
    let world = seed_swap_world(&pool).await;

    // Teacher A already teaches another class at the replacement slot's time
    let mut tx = pool.begin().await.unwrap();
    let other_class = create_test_class(&mut tx).await;
    let (slot_late,): (Uuid,) =
        sqlx::query_as("SELECT time_slot_id FROM lessons WHERE id = $1")
            .bind(world.replacement)
            .fetch_one(&mut *tx)
            .await
            .unwrap();
    create_test_lesson(
        &mut tx,
        other_class,
        slot_late,
        "2024-03-06",
        Some(world.teacher_a),
        "regular",
        "scheduled",
        Some("Chemistry"),
    )
    .await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/exchange-requests",
            world.teacher_a,
            "teacher",
            Some(json!({
                "request_type": "swap",
                "original_lesson_id": world.original,
                "replacement_lesson_id": world.replacement,
                "reason": "Double booked"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_submit_rejects_empty_original(pool: PgPool) {
    let world = seed_swap_world(&pool).await;

    let mut tx = pool.begin().await.unwrap();
    let slot_afternoon = create_test_time_slot(&mut tx, 5, Some("13:00:00")).await;
    let spare_empty = create_test_lesson(
        &mut tx,
        world.class_id,
        slot_afternoon,
        "2024-03-08",
        Some(world.teacher_b),
        "empty",
        "scheduled",
        None,
    )
    .await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;

    // An empty slot has no content to give up, so it cannot be the
    // original of a swap even for its owning teacher.
    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/exchange-requests",
            world.teacher_b,
            "teacher",
            Some(json!({
                "request_type": "swap",
                "original_lesson_id": world.replacement,
                "replacement_lesson_id": spare_empty,
                "reason": "Trading away a slot I never taught"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // With the bogus request refused, a legitimate swap over the same
    // empty slot still applies end to end.
    let body = submit_swap(&app, &world).await;
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    assert_eq!(
        approve(&app, &request_id, world.teacher_b, "teacher").await,
        StatusCode::OK
    );
    assert_eq!(
        approve(&app, &request_id, world.manager, "manager").await,
        StatusCode::OK
    );

    let (kind, _, teacher_id, subject, _) = lesson_row(&pool, world.replacement).await;
    assert_eq!(kind, "regular");
    assert_eq!(teacher_id, Some(world.teacher_a));
    assert_eq!(subject.as_deref(), Some("Mathematics"));
}
