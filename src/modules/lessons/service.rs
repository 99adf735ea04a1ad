use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use slateboard_core::{AppError, PaginationMeta};
use slateboard_models::ids::{LessonId, TimeSlotId, UserId};

use crate::modules::lessons::model::{
    CancelLessonDto, CompleteLessonDto, CreateLessonDto, Lesson, LessonFilterParams, LessonKind,
    LessonStatus,
};

/// Column list shared by every lesson query so `query_as` rows always match
/// the `Lesson` struct.
pub(crate) const LESSON_COLUMNS: &str = "id, class_id, academic_year, time_slot_id, scheduled_date, \
     teacher_id, substitute_teacher_id, subject, topic, description, notes, \
     kind, status, makeup_for, completed_date, created_at, updated_at";

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct PaginatedLessonsResponse {
    pub data: Vec<Lesson>,
    pub meta: PaginationMeta,
}

pub struct LessonService;

impl LessonService {
    /// Create a lesson slot at schedule initialization.
    #[instrument(skip(db))]
    pub async fn create_lesson(db: &PgPool, dto: CreateLessonDto) -> Result<Lesson, AppError> {
        // Kind/content invariant: an empty slot has no teaching content (a
        // teacher may still be recorded as the slot's owner), a non-empty
        // lesson always has a teacher.
        if dto.kind == LessonKind::Empty {
            if dto.subject.is_some() || dto.topic.is_some() {
                return Err(AppError::validation(anyhow::anyhow!(
                    "An empty slot cannot have a subject or topic"
                )));
            }
        } else if dto.teacher_id.is_none() {
            return Err(AppError::validation(anyhow::anyhow!(
                "A non-empty lesson requires a teacher"
            )));
        }

        let query = format!(
            r#"INSERT INTO lessons
                   (class_id, academic_year, time_slot_id, scheduled_date,
                    teacher_id, subject, topic, description, kind)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING {LESSON_COLUMNS}"#
        );

        let lesson = sqlx::query_as::<_, Lesson>(&query)
            .bind(dto.class_id)
            .bind(&dto.academic_year)
            .bind(dto.time_slot_id)
            .bind(dto.scheduled_date)
            .bind(dto.teacher_id)
            .bind(&dto.subject)
            .bind(&dto.topic)
            .bind(&dto.description)
            .bind(dto.kind)
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::conflict(anyhow::anyhow!(
                        "A lesson already occupies this class/date/time slot"
                    ));
                }
                AppError::from(e)
            })?;

        Ok(lesson)
    }

    /// Fetch a lesson by id.
    #[instrument(skip(db))]
    pub async fn get_lesson(db: &PgPool, id: LessonId) -> Result<Lesson, AppError> {
        let query = format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE id = $1");

        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lesson not found")))
    }

    /// Paginated lesson listing with optional class/teacher/date filters.
    #[instrument(skip(db))]
    pub async fn list_lessons(
        db: &PgPool,
        filters: LessonFilterParams,
    ) -> Result<PaginatedLessonsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let where_clause = r#"($1::uuid IS NULL OR class_id = $1)
               AND ($2::uuid IS NULL OR teacher_id = $2)
               AND ($3::date IS NULL OR scheduled_date >= $3)
               AND ($4::date IS NULL OR scheduled_date <= $4)"#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM lessons WHERE {where_clause}"
        ))
        .bind(filters.class_id)
        .bind(filters.teacher_id)
        .bind(filters.from)
        .bind(filters.to)
        .fetch_one(db)
        .await?;

        let lessons = sqlx::query_as::<_, Lesson>(&format!(
            r#"SELECT {LESSON_COLUMNS} FROM lessons
               WHERE {where_clause}
               ORDER BY scheduled_date, time_slot_id
               LIMIT $5 OFFSET $6"#
        ))
        .bind(filters.class_id)
        .bind(filters.teacher_id)
        .bind(filters.from)
        .bind(filters.to)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(PaginatedLessonsResponse {
            data: lessons,
            meta: PaginationMeta {
                total,
                limit,
                offset: Some(offset),
                page: None,
                has_more: offset + limit < total,
            },
        })
    }

    /// Does the teacher already have a non-cancelled lesson at this
    /// date/slot, other than `exclude`?
    #[instrument(skip(db))]
    pub async fn find_conflict(
        db: &PgPool,
        teacher_id: UserId,
        date: NaiveDate,
        time_slot_id: TimeSlotId,
        exclude: Option<LessonId>,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                   SELECT 1 FROM lessons
                   WHERE teacher_id = $1
                     AND scheduled_date = $2
                     AND time_slot_id = $3
                     AND status <> 'cancelled'
                     AND ($4::uuid IS NULL OR id <> $4)
               )"#,
        )
        .bind(teacher_id)
        .bind(date)
        .bind(time_slot_id)
        .bind(exclude)
        .fetch_one(db)
        .await?;

        Ok(exists)
    }

    /// Mark a scheduled lesson completed, recording the date it was actually
    /// held. The slot's schedule coordinates are identity and stay put.
    #[instrument(skip(db))]
    pub async fn mark_completed(
        db: &PgPool,
        id: LessonId,
        dto: CompleteLessonDto,
    ) -> Result<Lesson, AppError> {
        let lesson = Self::get_lesson(db, id).await?;

        if lesson.status != LessonStatus::Scheduled {
            return Err(AppError::invalid_state(anyhow::anyhow!(
                "Only a scheduled lesson can be completed (current status: {:?})",
                lesson.status
            )));
        }

        let query = format!(
            r#"UPDATE lessons
               SET status = 'completed',
                   completed_date = COALESCE($2, scheduled_date),
                   notes = COALESCE($3, notes),
                   updated_at = now()
               WHERE id = $1
               RETURNING {LESSON_COLUMNS}"#
        );

        let lesson = sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .bind(dto.completed_date)
            .bind(&dto.notes)
            .fetch_one(db)
            .await?;

        Ok(lesson)
    }

    /// Cancel a lesson, recording the reason in its notes.
    #[instrument(skip(db))]
    pub async fn mark_cancelled(
        db: &PgPool,
        id: LessonId,
        dto: CancelLessonDto,
    ) -> Result<Lesson, AppError> {
        let lesson = Self::get_lesson(db, id).await?;

        if matches!(lesson.status, LessonStatus::Completed | LessonStatus::Cancelled) {
            return Err(AppError::invalid_state(anyhow::anyhow!(
                "Lesson is already {:?}",
                lesson.status
            )));
        }

        let query = format!(
            r#"UPDATE lessons
               SET status = 'cancelled',
                   notes = concat_ws(E'\n', notes, 'Cancelled: ' || $2),
                   updated_at = now()
               WHERE id = $1
               RETURNING {LESSON_COLUMNS}"#
        );

        let lesson = sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .bind(&dto.reason)
            .fetch_one(db)
            .await?;

        Ok(lesson)
    }
}
