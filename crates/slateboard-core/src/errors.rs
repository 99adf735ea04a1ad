//! Application error types and HTTP response conversion.
//!
//! Every fallible operation in the service layer returns [`AppError`], which
//! pairs an HTTP status with an [`anyhow::Error`] payload. The constructors
//! map directly onto the domain error taxonomy:
//!
//! | Constructor         | Status | Meaning                                        |
//! |---------------------|--------|------------------------------------------------|
//! | `not_found`         | 404    | lesson or request id unresolved                |
//! | `forbidden`         | 403    | actor lacks the role/ownership for the action  |
//! | `invalid_state`     | 409    | request not in the expected stage, or lesson   |
//! |                     |        | no longer eligible                             |
//! | `validation`        | 422    | cross-field constraint violated                |
//! | `conflict`          | 409    | duplicate pending request on the same lesson   |
//! | `partial_failure`   | 500    | reference swap failed for a dependent entity   |
//! | `internal`          | 500    | everything else                                |

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn forbidden<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::FORBIDDEN, err)
    }

    /// The request is not in the stage the action expects, or a referenced
    /// lesson is no longer eligible.
    pub fn invalid_state<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    /// A cross-field constraint failed (wrong kind/status, class or week
    /// mismatch).
    pub fn validation<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    /// Another pending request already targets the same original lesson.
    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    /// A dependent-entity rewrite failed during a reference swap. The
    /// enclosing transaction has been rolled back by the time this surfaces.
    pub fn partial_failure<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    /// The gateway did not identify the caller.
    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, err)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.error.fmt(f)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "message": self.error.to_string(),
            "data": null,
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_status_codes() {
        assert_eq!(
            AppError::not_found(anyhow::anyhow!("x")).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::forbidden(anyhow::anyhow!("x")).status,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::invalid_state(anyhow::anyhow!("x")).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::validation(anyhow::anyhow!("x")).status,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::conflict(anyhow::anyhow!("x")).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::partial_failure(anyhow::anyhow!("x")).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_sqlx_like_error_is_internal() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_message_preserved() {
        let err = AppError::conflict(anyhow::anyhow!("a pending request already exists"));
        assert_eq!(err.error.to_string(), "a pending request already exists");
    }

    #[test]
    fn test_display_delegates_to_inner_error() {
        let err = AppError::not_found(anyhow::anyhow!("Lesson not found"));
        assert_eq!(format!("{err}"), "Lesson not found");
    }
}
