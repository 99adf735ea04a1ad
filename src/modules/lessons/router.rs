use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    cancel_lesson, complete_lesson, create_lesson, get_lesson_by_id, get_lessons,
};

/// Routes: POST /, GET /, GET /{id}, PATCH /{id}/complete, PATCH /{id}/cancel
pub fn init_lessons_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_lesson).get(get_lessons))
        .route("/{id}", get(get_lesson_by_id))
        .route("/{id}/complete", patch(complete_lesson))
        .route("/{id}/cancel", patch(cancel_lesson))
}
