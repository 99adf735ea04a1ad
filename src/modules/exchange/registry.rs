//! Registry of lesson-reference handlers.
//!
//! Several tables store lesson ids; when an approved exchange moves content
//! between two slots, every such reference must follow the content it points
//! at. Each (table, referencing column) pair registers one handler here, and
//! the swap engine walks the registry inside the approval transaction. The
//! registry is a compile-time list: adding a new referencing table means
//! adding a handler and listing it in [`registry`].

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{Postgres, Transaction};

use slateboard_models::dependents::LessonNote;
use slateboard_models::ids::{ExchangeRequestId, LessonId, UserId};

use super::swap::compute_remind_at;

/// One side of a swap: a lesson slot plus its resolved start instant
/// (schedule date combined with the time slot's start time, when known).
#[derive(Debug, Clone, Copy)]
pub struct LessonTarget {
    pub id: LessonId,
    pub starts_at: Option<NaiveDateTime>,
}

/// Context shared by every handler invocation of one swap.
#[derive(Debug, Clone, Copy)]
pub struct SwapContext {
    /// The approving actor, stamped as last modifier on entities that
    /// track one.
    pub actor: UserId,
    /// The request being approved; its own row must not be repointed.
    pub exclude_request: Option<ExchangeRequestId>,
}

/// Per-handler outcome counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct RepointStats {
    pub repointed: u64,
    pub reminders_recomputed: u64,
}

/// A handler owns one referencing column of one table and knows how to flip
/// its rows between the two slots of a swap.
#[async_trait]
pub trait LessonRefHandler: Send + Sync {
    /// Table whose rows this handler owns.
    fn entity(&self) -> &'static str;

    /// The referencing column this handler repoints.
    fn lesson_column(&self) -> &'static str;

    /// Flip every reference between the two slots, within the caller's
    /// transaction.
    async fn repoint(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        a: &LessonTarget,
        b: &LessonTarget,
        ctx: &SwapContext,
    ) -> Result<RepointStats, sqlx::Error>;
}

/// Class tests reference the lesson they take place in.
pub struct ClassTestHandler;

#[async_trait]
impl LessonRefHandler for ClassTestHandler {
    fn entity(&self) -> &'static str {
        "class_tests"
    }

    fn lesson_column(&self) -> &'static str {
        "lesson_id"
    }

    async fn repoint(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        a: &LessonTarget,
        b: &LessonTarget,
        ctx: &SwapContext,
    ) -> Result<RepointStats, sqlx::Error> {
        // A single CASE update flips both directions at once, so a row
        // already moved to the other slot cannot be flipped back.
        let result = sqlx::query(
            r#"UPDATE class_tests
               SET lesson_id = CASE WHEN lesson_id = $1 THEN $2 ELSE $1 END,
                   last_modified_by = $3,
                   updated_at = now()
               WHERE lesson_id IN ($1, $2)"#,
        )
        .bind(a.id)
        .bind(b.id)
        .bind(ctx.actor)
        .execute(&mut **tx)
        .await?;

        Ok(RepointStats {
            repointed: result.rows_affected(),
            reminders_recomputed: 0,
        })
    }
}

/// Lesson notes reference a lesson and may carry a derived reminder, which
/// must be recomputed against the destination slot's start time.
pub struct LessonNoteHandler;

#[async_trait]
impl LessonRefHandler for LessonNoteHandler {
    fn entity(&self) -> &'static str {
        "lesson_notes"
    }

    fn lesson_column(&self) -> &'static str {
        "lesson_id"
    }

    async fn repoint(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        a: &LessonTarget,
        b: &LessonTarget,
        ctx: &SwapContext,
    ) -> Result<RepointStats, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE lesson_notes
               SET lesson_id = CASE WHEN lesson_id = $1 THEN $2 ELSE $1 END,
                   last_modified_by = $3,
                   updated_at = now()
               WHERE lesson_id IN ($1, $2)"#,
        )
        .bind(a.id)
        .bind(b.id)
        .bind(ctx.actor)
        .execute(&mut **tx)
        .await?;

        // Every reminder-bearing note on either slot just changed lessons,
        // so its derived remind_at must follow the new slot's start instant.
        // A destination without a start time leaves remind_at alone.
        let mut reminders = 0;
        for target in [a, b] {
            let notes = sqlx::query_as::<_, LessonNote>(
                r#"SELECT id, lesson_id, author_id, content, remind_lead_minutes,
                          remind_at, last_modified_by, created_at, updated_at
                   FROM lesson_notes
                   WHERE lesson_id = $1 AND remind_lead_minutes IS NOT NULL"#,
            )
            .bind(target.id)
            .fetch_all(&mut **tx)
            .await?;

            for note in notes {
                let Some(lead) = note.remind_lead_minutes else {
                    continue;
                };
                let Some(remind_at) = compute_remind_at(target.starts_at, lead) else {
                    continue;
                };

                sqlx::query("UPDATE lesson_notes SET remind_at = $2 WHERE id = $1")
                    .bind(note.id)
                    .bind(remind_at)
                    .execute(&mut **tx)
                    .await?;
                reminders += 1;
            }
        }

        Ok(RepointStats {
            repointed: result.rows_affected(),
            reminders_recomputed: reminders,
        })
    }
}

/// Other pending exchange requests reference lessons from both ends; each
/// end is its own registry entry. The request being approved is excluded so
/// it keeps recording the slots as they were when it was submitted.
pub struct ExchangeRefHandler {
    column: &'static str,
}

impl ExchangeRefHandler {
    pub const ORIGINAL: Self = Self {
        column: "original_lesson_id",
    };
    pub const REPLACEMENT: Self = Self {
        column: "replacement_lesson_id",
    };
}

#[async_trait]
impl LessonRefHandler for ExchangeRefHandler {
    fn entity(&self) -> &'static str {
        "exchange_requests"
    }

    fn lesson_column(&self) -> &'static str {
        self.column
    }

    async fn repoint(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        a: &LessonTarget,
        b: &LessonTarget,
        ctx: &SwapContext,
    ) -> Result<RepointStats, sqlx::Error> {
        let query = format!(
            r#"UPDATE exchange_requests
               SET {col} = CASE WHEN {col} = $1 THEN $2 ELSE $1 END,
                   updated_at = now()
               WHERE {col} IN ($1, $2)
                 AND status = 'pending'
                 AND ($3::uuid IS NULL OR id <> $3)"#,
            col = self.column
        );

        let result = sqlx::query(&query)
            .bind(a.id)
            .bind(b.id)
            .bind(ctx.exclude_request)
            .execute(&mut **tx)
            .await?;

        Ok(RepointStats {
            repointed: result.rows_affected(),
            reminders_recomputed: 0,
        })
    }
}

static HANDLERS: &[&dyn LessonRefHandler] = &[
    &ClassTestHandler,
    &LessonNoteHandler,
    &ExchangeRefHandler::ORIGINAL,
    &ExchangeRefHandler::REPLACEMENT,
];

/// Every registered handler, in execution order.
pub fn registry() -> &'static [&'static dyn LessonRefHandler] {
    HANDLERS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_entries_are_unique() {
        let pairs: Vec<_> = registry()
            .iter()
            .map(|h| (h.entity(), h.lesson_column()))
            .collect();
        let unique: HashSet<_> = pairs.iter().collect();

        assert_eq!(unique.len(), pairs.len());
    }

    #[test]
    fn test_registry_covers_both_request_ends() {
        let columns: Vec<_> = registry()
            .iter()
            .filter(|h| h.entity() == "exchange_requests")
            .map(|h| h.lesson_column())
            .collect();

        assert!(columns.contains(&"original_lesson_id"));
        assert!(columns.contains(&"replacement_lesson_id"));
    }
}
