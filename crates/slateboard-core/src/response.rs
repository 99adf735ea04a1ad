//! The `{ success, message, data }` response envelope.
//!
//! Every endpoint wraps its payload in [`ApiResponse`] so consumers can rely
//! on a uniform shape; error responses use the same shape with
//! `success: false` and `data: null` (see [`crate::errors::AppError`]).

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// A successful response with no payload (deletes, cancellations).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}
