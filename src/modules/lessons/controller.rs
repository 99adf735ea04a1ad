use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use slateboard_core::{ApiResponse, AppError};
use slateboard_models::ids::LessonId;

use crate::middleware::actor::Actor;
use crate::modules::lessons::model::{
    CancelLessonDto, CompleteLessonDto, CreateLessonDto, Lesson, LessonFilterParams,
};
use crate::modules::lessons::service::{LessonService, PaginatedLessonsResponse};
use crate::state::AppState;

/// Create a lesson slot
#[utoipa::path(
    post,
    path = "/api/lessons",
    summary = "Create lesson slot",
    request_body = CreateLessonDto,
    responses(
        (status = 201, description = "Lesson created"),
        (status = 409, description = "Slot already occupied"),
        (status = 422, description = "Kind/content invariant violated")
    ),
    tag = "Lessons"
)]
#[instrument(skip(state, _actor))]
pub async fn create_lesson(
    State(state): State<AppState>,
    _actor: Actor,
    Json(dto): Json<CreateLessonDto>,
) -> Result<(StatusCode, Json<ApiResponse<Lesson>>), AppError> {
    dto.validate().map_err(AppError::validation)?;

    let lesson = LessonService::create_lesson(&state.db, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Lesson created", lesson)),
    ))
}

/// List lesson slots
#[utoipa::path(
    get,
    path = "/api/lessons",
    summary = "List lessons",
    params(LessonFilterParams),
    responses((status = 200, description = "Paginated lessons")),
    tag = "Lessons"
)]
#[instrument(skip(state, _actor))]
pub async fn get_lessons(
    State(state): State<AppState>,
    _actor: Actor,
    Query(filters): Query<LessonFilterParams>,
) -> Result<Json<ApiResponse<PaginatedLessonsResponse>>, AppError> {
    let lessons = LessonService::list_lessons(&state.db, filters).await?;

    Ok(Json(ApiResponse::ok("Lessons", lessons)))
}

/// Get a lesson slot by ID
#[utoipa::path(
    get,
    path = "/api/lessons/{id}",
    summary = "Get lesson by ID",
    params(("id" = Uuid, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Lesson"),
        (status = 404, description = "Lesson not found")
    ),
    tag = "Lessons"
)]
#[instrument(skip(state, _actor))]
pub async fn get_lesson_by_id(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Lesson>>, AppError> {
    let lesson = LessonService::get_lesson(&state.db, LessonId::from(id)).await?;

    Ok(Json(ApiResponse::ok("Lesson", lesson)))
}

/// Mark a lesson completed
#[utoipa::path(
    patch,
    path = "/api/lessons/{id}/complete",
    summary = "Mark lesson completed",
    params(("id" = Uuid, Path, description = "Lesson ID")),
    request_body = CompleteLessonDto,
    responses(
        (status = 200, description = "Lesson completed"),
        (status = 404, description = "Lesson not found"),
        (status = 409, description = "Lesson is not in a completable state")
    ),
    tag = "Lessons"
)]
#[instrument(skip(state, _actor))]
pub async fn complete_lesson(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
    Json(dto): Json<CompleteLessonDto>,
) -> Result<Json<ApiResponse<Lesson>>, AppError> {
    dto.validate().map_err(AppError::validation)?;

    let lesson = LessonService::mark_completed(&state.db, LessonId::from(id), dto).await?;

    Ok(Json(ApiResponse::ok("Lesson completed", lesson)))
}

/// Cancel a lesson
#[utoipa::path(
    patch,
    path = "/api/lessons/{id}/cancel",
    summary = "Cancel lesson",
    params(("id" = Uuid, Path, description = "Lesson ID")),
    request_body = CancelLessonDto,
    responses(
        (status = 200, description = "Lesson cancelled"),
        (status = 404, description = "Lesson not found"),
        (status = 409, description = "Lesson already terminal")
    ),
    tag = "Lessons"
)]
#[instrument(skip(state, _actor))]
pub async fn cancel_lesson(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
    Json(dto): Json<CancelLessonDto>,
) -> Result<Json<ApiResponse<Lesson>>, AppError> {
    dto.validate().map_err(AppError::validation)?;

    let lesson = LessonService::mark_cancelled(&state.db, LessonId::from(id), dto).await?;

    Ok(Json(ApiResponse::ok("Lesson cancelled", lesson)))
}
