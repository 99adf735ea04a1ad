use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    approve_exchange_request, cancel_exchange_request, create_exchange_request,
    get_exchange_request_by_id, get_exchange_requests, reject_exchange_request,
};

/// Routes: POST /, GET /, GET /{id}, PATCH /{id}/approve, PATCH /{id}/reject,
/// DELETE /{id}/cancel
pub fn init_exchange_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(create_exchange_request).get(get_exchange_requests),
        )
        .route("/{id}", get(get_exchange_request_by_id))
        .route("/{id}/approve", patch(approve_exchange_request))
        .route("/{id}/reject", patch(reject_exchange_request))
        .route("/{id}/cancel", delete(cancel_exchange_request))
}
