//! The swap engine: repoints references through the handler registry and
//! exchanges the mutable content of the two lesson slots.
//!
//! Everything here runs inside the approval transaction. Any failure aborts
//! the whole approval, so a request can never be half-applied.

use chrono::{Duration, NaiveDateTime};
use sqlx::{Postgres, Transaction};
use tracing::instrument;

use slateboard_core::AppError;
use slateboard_models::exchange::ExchangeType;
use slateboard_models::ids::LessonId;
use slateboard_models::lessons::{Lesson, LessonContent, LessonKind, LessonStatus};

use super::registry::{LessonTarget, SwapContext, registry};

/// Aggregate outcome of one registry walk.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwapSummary {
    pub repointed: u64,
    pub reminders_recomputed: u64,
}

/// When a note reminder should fire for a lesson starting at `starts_at`
/// (schedule date combined with the slot's start time). `None` when the
/// slot has no start time, in which case the reminder is left as it was.
pub fn compute_remind_at(
    starts_at: Option<NaiveDateTime>,
    lead_minutes: i32,
) -> Option<NaiveDateTime> {
    Some(starts_at? - Duration::minutes(i64::from(lead_minutes)))
}

/// Walk the handler registry, flipping every lesson reference between the
/// two slots.
///
/// A handler error aborts the swap with a partial-failure error; the caller
/// drops the transaction and nothing is committed.
#[instrument(skip(tx))]
pub async fn swap_references(
    tx: &mut Transaction<'_, Postgres>,
    a: &LessonTarget,
    b: &LessonTarget,
    ctx: &SwapContext,
) -> Result<SwapSummary, AppError> {
    let mut summary = SwapSummary::default();

    for handler in registry() {
        let stats = handler.repoint(tx, a, b, ctx).await.map_err(|e| {
            AppError::partial_failure(anyhow::anyhow!(
                "Reference swap failed at {}.{}: {e}",
                handler.entity(),
                handler.lesson_column()
            ))
        })?;

        summary.repointed += stats.repointed;
        summary.reminders_recomputed += stats.reminders_recomputed;
    }

    tracing::debug!(
        repointed = summary.repointed,
        reminders_recomputed = summary.reminders_recomputed,
        "lesson references repointed"
    );

    Ok(summary)
}

/// Compute the post-approval content of both slots.
///
/// A swap trades content symmetrically, so the empty slot's owner (if any)
/// ends up owning the freed original slot. A makeup moves the absent
/// lesson's content into the replacement slot, rescheduled and marked as a
/// makeup of the original, and frees the original slot as empty.
pub fn exchanged_content(
    original: &Lesson,
    replacement: &Lesson,
    request_type: ExchangeType,
) -> (LessonContent, LessonContent) {
    match request_type {
        ExchangeType::Swap => (replacement.content(), original.content()),
        ExchangeType::Makeup => {
            let mut moved = original.content();
            moved.kind = LessonKind::Makeup;
            moved.status = LessonStatus::Scheduled;
            moved.makeup_for = Some(original.id);

            let freed = LessonContent {
                teacher_id: None,
                substitute_teacher_id: None,
                subject: None,
                topic: None,
                description: None,
                notes: None,
                kind: LessonKind::Empty,
                status: LessonStatus::Scheduled,
                makeup_for: None,
            };

            (freed, moved)
        }
    }
}

/// Persist the exchanged content of both slots. Identity and schedule
/// coordinates are never touched.
#[instrument(skip(tx, original, replacement), fields(original_id = %original.id, replacement_id = %replacement.id))]
pub async fn swap_lesson_content(
    tx: &mut Transaction<'_, Postgres>,
    original: &Lesson,
    replacement: &Lesson,
    request_type: ExchangeType,
) -> Result<(), AppError> {
    let (for_original, for_replacement) = exchanged_content(original, replacement, request_type);

    write_content(tx, original.id, &for_original).await?;
    write_content(tx, replacement.id, &for_replacement).await?;

    Ok(())
}

async fn write_content(
    tx: &mut Transaction<'_, Postgres>,
    id: LessonId,
    content: &LessonContent,
) -> Result<(), AppError> {
    sqlx::query(
        r#"UPDATE lessons
           SET teacher_id = $2,
               substitute_teacher_id = $3,
               subject = $4,
               topic = $5,
               description = $6,
               notes = $7,
               kind = $8,
               status = $9,
               makeup_for = $10,
               updated_at = now()
           WHERE id = $1"#,
    )
    .bind(id)
    .bind(content.teacher_id)
    .bind(content.substitute_teacher_id)
    .bind(&content.subject)
    .bind(&content.topic)
    .bind(&content.description)
    .bind(&content.notes)
    .bind(content.kind)
    .bind(content.status)
    .bind(content.makeup_for)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
