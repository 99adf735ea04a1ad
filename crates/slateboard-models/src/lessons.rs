//! Lesson slot entities and their enums.
//!
//! A lesson slot is one (class, date, time-slot) unit of the timetable. Its
//! identity and schedule coordinates never change once assigned; the teaching
//! content (teacher, subject, topic, kind, status) is what the exchange
//! engine moves between slots.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{ClassId, LessonId, TimeSlotId, UserId};

/// What kind of lesson occupies a slot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "lesson_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    Regular,
    Makeup,
    Extracurricular,
    Fixed,
    Empty,
}

/// Lifecycle status of a lesson slot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "lesson_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    Scheduled,
    Completed,
    Cancelled,
    Postponed,
    Absent,
}

/// A period in the daily timetable grid.
///
/// `start_time` may be unresolved for ad-hoc slots; reminder recomputation
/// skips lessons whose slot has no start time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TimeSlot {
    pub id: TimeSlotId,
    pub name: String,
    pub sequence: i32,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

/// A lesson slot row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lesson {
    pub id: LessonId,
    // Schedule coordinates: immutable during exchange
    pub class_id: ClassId,
    pub academic_year: String,
    pub time_slot_id: TimeSlotId,
    pub scheduled_date: NaiveDate,
    // Mutable teaching content: the subject of exchange
    pub teacher_id: Option<UserId>,
    pub substitute_teacher_id: Option<UserId>,
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub kind: LessonKind,
    pub status: LessonStatus,
    pub makeup_for: Option<LessonId>,
    /// The date the lesson was actually held, once completed. Kept apart
    /// from `scheduled_date` so the slot's identity never moves.
    pub completed_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The mutable content of a lesson slot, detached from its identity.
///
/// The content-swap procedure moves values of this shape between two slots;
/// identity and schedule coordinates stay put.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonContent {
    pub teacher_id: Option<UserId>,
    pub substitute_teacher_id: Option<UserId>,
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub kind: LessonKind,
    pub status: LessonStatus,
    pub makeup_for: Option<LessonId>,
}

impl Lesson {
    /// Detach the mutable content from this slot.
    pub fn content(&self) -> LessonContent {
        LessonContent {
            teacher_id: self.teacher_id,
            substitute_teacher_id: self.substitute_teacher_id,
            subject: self.subject.clone(),
            topic: self.topic.clone(),
            description: self.description.clone(),
            notes: self.notes.clone(),
            kind: self.kind,
            status: self.status,
            makeup_for: self.makeup_for,
        }
    }

    /// Replace this slot's mutable content, leaving identity and schedule
    /// coordinates untouched.
    pub fn apply_content(&mut self, content: LessonContent) {
        self.teacher_id = content.teacher_id;
        self.substitute_teacher_id = content.substitute_teacher_id;
        self.subject = content.subject;
        self.topic = content.topic;
        self.description = content.description;
        self.notes = content.notes;
        self.kind = content.kind;
        self.status = content.status;
        self.makeup_for = content.makeup_for;
    }

    /// An empty slot holds no teacher and no subject.
    pub fn is_empty_slot(&self) -> bool {
        self.kind == LessonKind::Empty
    }
}
