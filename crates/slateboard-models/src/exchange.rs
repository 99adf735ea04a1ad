//! Exchange request entities and their enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{ExchangeRequestId, LessonId, UserId};

/// Discriminates the two exchange flows.
///
/// A *swap* trades an occupied slot with an empty one and needs the empty
/// slot's owning teacher plus a manager to approve. A *makeup* fills an empty
/// slot with the content of a previously absent lesson and needs a single
/// manager decision.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "exchange_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExchangeType {
    Swap,
    Makeup,
}

impl ExchangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Swap => "swap",
            Self::Makeup => "makeup",
        }
    }
}

/// Approval state of a request. `Pending` is the only non-terminal state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "exchange_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExchangeStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl ExchangeStatus {
    pub fn is_terminal(self) -> bool {
        self != Self::Pending
    }
}

/// An exchange request row.
///
/// For swaps, `teacher_approved` and `manager_approved` are the two
/// independent gates that subdivide the pending state; `status` flips to
/// `Approved` only when both are true and the content swap has executed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExchangeRequest {
    pub id: ExchangeRequestId,
    pub request_type: ExchangeType,
    pub original_lesson_id: LessonId,
    pub replacement_lesson_id: LessonId,
    pub requesting_teacher_id: UserId,
    /// Owner of the replacement slot at creation time; set for swaps only.
    pub replacement_teacher_id: Option<UserId>,
    pub reason: String,
    pub status: ExchangeStatus,
    pub teacher_approved: bool,
    pub manager_approved: bool,
    pub decided_by: Option<UserId>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
