//! Lesson DTOs.
//!
//! The shared entity types live in `slateboard-models`; this module holds
//! the request/response shapes specific to the lesson endpoints.

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

// Re-export the shared entities for controller/service convenience
pub use slateboard_models::lessons::{Lesson, LessonKind, LessonStatus, TimeSlot};

use slateboard_core::PaginationParams;
use slateboard_models::ids::{ClassId, TimeSlotId, UserId};

/// DTO for creating a lesson slot at schedule initialization.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLessonDto {
    pub class_id: ClassId,
    #[validate(length(min = 1, max = 20))]
    pub academic_year: String,
    pub time_slot_id: TimeSlotId,
    pub scheduled_date: NaiveDate,
    pub teacher_id: Option<UserId>,
    #[validate(length(max = 100))]
    pub subject: Option<String>,
    #[validate(length(max = 200))]
    pub topic: Option<String>,
    pub description: Option<String>,
    pub kind: LessonKind,
}

/// DTO for marking a lesson completed.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CompleteLessonDto {
    pub completed_date: Option<NaiveDate>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// DTO for cancelling a lesson.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CancelLessonDto {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// Query parameters for listing lessons.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct LessonFilterParams {
    pub class_id: Option<ClassId>,
    pub teacher_id: Option<UserId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}
