//! # Slateboard Core
//!
//! Core types, errors, and utilities for the Slateboard API.
//!
//! This crate provides foundational types used throughout the Slateboard
//! application:
//!
//! - [`errors`]: Application error types with HTTP response conversion
//! - [`response`]: The `{ success, message, data }` response envelope
//! - [`pagination`]: Pagination utilities for API responses

pub mod errors;
pub mod pagination;
pub mod response;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use response::ApiResponse;
