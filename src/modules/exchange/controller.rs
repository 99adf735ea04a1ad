use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use slateboard_core::{ApiResponse, AppError};
use slateboard_models::ids::ExchangeRequestId;

use crate::middleware::actor::{Actor, RequireTeacher};
use crate::modules::exchange::model::{
    CreateExchangeRequestDto, ExchangeFilterParams, ExchangeRequest,
};
use crate::modules::exchange::service::{ExchangeService, PaginatedExchangeRequestsResponse};
use crate::state::AppState;

/// Submit an exchange request
#[utoipa::path(
    post,
    path = "/api/exchange-requests",
    summary = "Submit exchange request",
    request_body = CreateExchangeRequestDto,
    responses(
        (status = 201, description = "Request submitted"),
        (status = 403, description = "Actor does not own the original lesson"),
        (status = 404, description = "A referenced lesson does not exist"),
        (status = 409, description = "Original lesson already has a pending request, or is in the wrong state"),
        (status = 422, description = "Replacement slot not eligible")
    ),
    tag = "Exchange requests"
)]
#[instrument(skip(state, teacher))]
pub async fn create_exchange_request(
    State(state): State<AppState>,
    RequireTeacher(teacher): RequireTeacher,
    Json(dto): Json<CreateExchangeRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<ExchangeRequest>>), AppError> {
    dto.validate().map_err(AppError::validation)?;

    let request = ExchangeService::create_request(&state, teacher.id, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Exchange request submitted", request)),
    ))
}

/// List exchange requests
#[utoipa::path(
    get,
    path = "/api/exchange-requests",
    summary = "List exchange requests",
    params(ExchangeFilterParams),
    responses((status = 200, description = "Paginated exchange requests")),
    tag = "Exchange requests"
)]
#[instrument(skip(state, _actor))]
pub async fn get_exchange_requests(
    State(state): State<AppState>,
    _actor: Actor,
    Query(filters): Query<ExchangeFilterParams>,
) -> Result<Json<ApiResponse<PaginatedExchangeRequestsResponse>>, AppError> {
    let requests = ExchangeService::list_requests(&state.db, filters).await?;

    Ok(Json(ApiResponse::ok("Exchange requests", requests)))
}

/// Get an exchange request by ID
#[utoipa::path(
    get,
    path = "/api/exchange-requests/{id}",
    summary = "Get exchange request by ID",
    params(("id" = Uuid, Path, description = "Exchange request ID")),
    responses(
        (status = 200, description = "Exchange request"),
        (status = 404, description = "Exchange request not found")
    ),
    tag = "Exchange requests"
)]
#[instrument(skip(state, _actor))]
pub async fn get_exchange_request_by_id(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ExchangeRequest>>, AppError> {
    let request = ExchangeService::get_request(&state.db, ExchangeRequestId::from(id)).await?;

    Ok(Json(ApiResponse::ok("Exchange request", request)))
}

/// Approve an exchange request at its current stage
#[utoipa::path(
    patch,
    path = "/api/exchange-requests/{id}/approve",
    summary = "Approve exchange request",
    params(("id" = Uuid, Path, description = "Exchange request ID")),
    responses(
        (status = 200, description = "Approval recorded; the swap is applied on final approval"),
        (status = 404, description = "Exchange request not found"),
        (status = 409, description = "Request not pending, or actor is not the approver for the current stage")
    ),
    tag = "Exchange requests"
)]
#[instrument(skip(state, actor))]
pub async fn approve_exchange_request(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ExchangeRequest>>, AppError> {
    let request = ExchangeService::approve(&state, ExchangeRequestId::from(id), actor).await?;

    Ok(Json(ApiResponse::ok("Approval recorded", request)))
}

/// Reject an exchange request
#[utoipa::path(
    patch,
    path = "/api/exchange-requests/{id}/reject",
    summary = "Reject exchange request",
    params(("id" = Uuid, Path, description = "Exchange request ID")),
    responses(
        (status = 200, description = "Request rejected"),
        (status = 404, description = "Exchange request not found"),
        (status = 409, description = "Request not pending, or actor is not an approver")
    ),
    tag = "Exchange requests"
)]
#[instrument(skip(state, actor))]
pub async fn reject_exchange_request(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ExchangeRequest>>, AppError> {
    let request = ExchangeService::reject(&state, ExchangeRequestId::from(id), actor).await?;

    Ok(Json(ApiResponse::ok("Exchange request rejected", request)))
}

/// Cancel (withdraw) an exchange request
#[utoipa::path(
    delete,
    path = "/api/exchange-requests/{id}/cancel",
    summary = "Cancel exchange request",
    params(("id" = Uuid, Path, description = "Exchange request ID")),
    responses(
        (status = 200, description = "Request cancelled"),
        (status = 403, description = "Actor is not the requesting teacher"),
        (status = 404, description = "Exchange request not found"),
        (status = 409, description = "Request already decided")
    ),
    tag = "Exchange requests"
)]
#[instrument(skip(state, actor))]
pub async fn cancel_exchange_request(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ExchangeRequest>>, AppError> {
    let request = ExchangeService::cancel(&state, ExchangeRequestId::from(id), actor).await?;

    Ok(Json(ApiResponse::ok("Exchange request cancelled", request)))
}
