//! Exchange request DTOs.
//!
//! The shared entity types live in `slateboard-models`; this module holds
//! the request/response shapes specific to the exchange endpoints.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

// Re-export the shared entities for controller/service convenience
pub use slateboard_models::exchange::{ExchangeRequest, ExchangeStatus, ExchangeType};

use slateboard_core::PaginationParams;
use slateboard_models::ids::{LessonId, UserId};

/// DTO for submitting an exchange request. The requesting teacher comes
/// from the actor headers, never from the body.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExchangeRequestDto {
    pub request_type: ExchangeType,
    pub original_lesson_id: LessonId,
    pub replacement_lesson_id: LessonId,
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// Query parameters for listing exchange requests.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ExchangeFilterParams {
    pub status: Option<ExchangeStatus>,
    pub request_type: Option<ExchangeType>,
    pub requesting_teacher_id: Option<UserId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}
