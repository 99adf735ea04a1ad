//! Entities that hold lesson pointers.
//!
//! These are the dependent records the reference swap engine repoints when
//! two lessons exchange content: class tests and lesson notes. Other pending
//! exchange requests are the third dependent kind; their row type lives in
//! [`crate::exchange`].

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{ClassId, ClassTestId, LessonId, LessonNoteId, UserId};

/// A test scheduled against a lesson slot.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClassTest {
    pub id: ClassTestId,
    pub lesson_id: LessonId,
    pub class_id: ClassId,
    pub subject: String,
    pub title: String,
    pub last_modified_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A note attached to a lesson slot, optionally reminder-bearing.
///
/// `remind_at` is derived: the pointed-to lesson's scheduled date plus its
/// time-slot start time, minus `remind_lead_minutes`. It is stored in school
/// local time, so it is a naive timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LessonNote {
    pub id: LessonNoteId,
    pub lesson_id: LessonId,
    pub author_id: UserId,
    pub content: String,
    pub remind_lead_minutes: Option<i32>,
    pub remind_at: Option<NaiveDateTime>,
    pub last_modified_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
