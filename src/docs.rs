use utoipa::OpenApi;

use slateboard_core::{PaginationMeta, PaginationParams};
use slateboard_models::exchange::{ExchangeRequest, ExchangeStatus, ExchangeType};
use slateboard_models::lessons::{Lesson, LessonKind, LessonStatus, TimeSlot};

use crate::modules::exchange::model::{CreateExchangeRequestDto, ExchangeFilterParams};
use crate::modules::exchange::service::PaginatedExchangeRequestsResponse;
use crate::modules::lessons::model::{
    CancelLessonDto, CompleteLessonDto, CreateLessonDto, LessonFilterParams,
};
use crate::modules::lessons::service::PaginatedLessonsResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::lessons::controller::create_lesson,
        crate::modules::lessons::controller::get_lessons,
        crate::modules::lessons::controller::get_lesson_by_id,
        crate::modules::lessons::controller::complete_lesson,
        crate::modules::lessons::controller::cancel_lesson,
        crate::modules::exchange::controller::create_exchange_request,
        crate::modules::exchange::controller::get_exchange_requests,
        crate::modules::exchange::controller::get_exchange_request_by_id,
        crate::modules::exchange::controller::approve_exchange_request,
        crate::modules::exchange::controller::reject_exchange_request,
        crate::modules::exchange::controller::cancel_exchange_request,
    ),
    components(
        schemas(
            Lesson,
            LessonKind,
            LessonStatus,
            TimeSlot,
            CreateLessonDto,
            CompleteLessonDto,
            CancelLessonDto,
            LessonFilterParams,
            PaginatedLessonsResponse,
            ExchangeRequest,
            ExchangeStatus,
            ExchangeType,
            CreateExchangeRequestDto,
            ExchangeFilterParams,
            PaginatedExchangeRequestsResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    tags(
        (name = "Lessons", description = "Lesson slot management"),
        (name = "Exchange requests", description = "Lesson exchange request lifecycle")
    ),
    info(
        title = "Slateboard API",
        version = "0.1.0",
        description = "School schedule backend: lesson slots and the exchange-request workflow \
                       for swapping and making up lessons.",
    )
)]
pub struct ApiDoc;
