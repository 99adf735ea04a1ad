#[allow(unused_imports)]
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

pub fn generate_unique_email() -> String {
    format!("user-{}@test.local", Uuid::new_v4().simple())
}

pub async fn create_test_class(tx: &mut Transaction<'_, Postgres>) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO classes (name, academic_year) VALUES ($1, '2023-2024') RETURNING id",
    )
    .bind(format!("Class {}", Uuid::new_v4().simple()))
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

/// Create a time slot; `start_time` like "08:00:00", or None for an
/// unresolved ad-hoc slot.
pub async fn create_test_time_slot(
    tx: &mut Transaction<'_, Postgres>,
    sequence: i32,
    start_time: Option<&str>,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO time_slots (name, sequence, start_time, end_time)
           VALUES ($1, $2, $3::time, $3::time + interval '45 minutes')
           RETURNING id"#,
    )
    .bind(format!("Period {sequence}"))
    .bind(sequence)
    .bind(start_time)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

/// Create a user. `role` is one of "teacher", "manager", "student".
pub async fn create_test_user(
    tx: &mut Transaction<'_, Postgres>,
    role: &str,
    class_id: Option<Uuid>,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO users (name, email, role, class_id)
           VALUES ($1, $2, $3::user_role, $4)
           RETURNING id"#,
    )
    .bind(format!("Test {role}"))
    .bind(generate_unique_email())
    .bind(role)
    .bind(class_id)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

#[allow(clippy::too_many_arguments)]
pub async fn create_test_lesson(
    tx: &mut Transaction<'_, Postgres>,
    class_id: Uuid,
    time_slot_id: Uuid,
    date: &str,
    teacher_id: Option<Uuid>,
    kind: &str,
    status: &str,
    subject: Option<&str>,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO lessons
               (class_id, academic_year, time_slot_id, scheduled_date,
                teacher_id, subject, kind, status)
           VALUES ($1, '2023-2024', $2, $3::date, $4, $5,
                   $6::lesson_kind, $7::lesson_status)
           RETURNING id"#,
    )
    .bind(class_id)
    .bind(time_slot_id)
    .bind(date)
    .bind(teacher_id)
    .bind(subject)
    .bind(kind)
    .bind(status)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_test_class_test(
    tx: &mut Transaction<'_, Postgres>,
    lesson_id: Uuid,
    class_id: Uuid,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO class_tests (lesson_id, class_id, subject, title)
           VALUES ($1, $2, 'Mathematics', 'Unit test')
           RETURNING id"#,
    )
    .bind(lesson_id)
    .bind(class_id)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_test_note(
    tx: &mut Transaction<'_, Postgres>,
    lesson_id: Uuid,
    author_id: Uuid,
    remind_lead_minutes: Option<i32>,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO lesson_notes (lesson_id, author_id, content, remind_lead_minutes)
           VALUES ($1, $2, 'Bring the graded papers', $3)
           RETURNING id"#,
    )
    .bind(lesson_id)
    .bind(author_id)
    .bind(remind_lead_minutes)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}
