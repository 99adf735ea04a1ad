//! Actor identification.
//!
//! Authentication is owned by the upstream gateway, which verifies the
//! caller's token and forwards their identity as `x-user-id` and
//! `x-user-role` headers. The [`Actor`] extractor consumes those headers;
//! this service never sees or validates tokens itself.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};

use slateboard_core::AppError;
use slateboard_models::ids::UserId;
use slateboard_models::users::UserRole;

use crate::state::AppState;

const USER_ID_HEADER: &str = "x-user-id";
const USER_ROLE_HEADER: &str = "x-user-role";

/// The authenticated caller, as asserted by the gateway.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: UserId,
    pub role: UserRole,
}

impl Actor {
    pub fn is_manager(&self) -> bool {
        self.role == UserRole::Manager
    }

    pub fn is_teacher(&self) -> bool {
        self.role == UserRole::Teacher
    }
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Missing {USER_ID_HEADER} header")))?
            .parse::<UserId>()
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid {USER_ID_HEADER} header")))?;

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::unauthorized(anyhow::anyhow!("Missing {USER_ROLE_HEADER} header"))
            })?
            .parse::<UserRole>()
            .map_err(|e| AppError::unauthorized(anyhow::anyhow!(e)))?;

        Ok(Actor { id, role })
    }
}

/// Helper macro to create role check extractors for handlers that are only
/// reachable by one role.
macro_rules! require_role {
    ($name:ident, $role:expr, $label:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub Actor);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let actor = Actor::from_request_parts(parts, state).await?;

                if actor.role != $role {
                    return Err(AppError::forbidden(anyhow::anyhow!(
                        "This action requires the {} role",
                        $label
                    )));
                }

                Ok($name(actor))
            }
        }
    };
}

require_role!(RequireTeacher, UserRole::Teacher, "teacher");
require_role!(RequireManager, UserRole::Manager, "manager");
