//! Feature modules.
//!
//! Each module follows the same structure: `controller.rs` (HTTP handlers),
//! `service.rs` (business logic), `model.rs` (DTOs), `router.rs` (axum
//! router configuration).

pub mod exchange;
pub mod lessons;
pub mod notifications;
