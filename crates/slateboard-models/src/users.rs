//! User roles and the minimal user row the core consumes.
//!
//! Full user management lives in an external service; the exchange engine
//! only needs ownership checks, the approver directory, and email addresses
//! for notification dispatch.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{ClassId, UserId};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Teacher,
    Manager,
    Student,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Manager => "manager",
            Self::Student => "student",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teacher" => Ok(Self::Teacher),
            "manager" => Ok(Self::Manager),
            "student" => Ok(Self::Student),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub class_id: Option<ClassId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_roundtrip() {
        for role in [UserRole::Teacher, UserRole::Manager, UserRole::Student] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("principal".parse::<UserRole>().is_err());
    }
}
