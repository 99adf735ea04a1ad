//! # Slateboard API
//!
//! A REST backend for school schedule operations built with Axum and
//! PostgreSQL. Its core is the lesson exchange workflow: teachers request a
//! swap (move a scheduled lesson into an empty slot) or a makeup (reschedule
//! an absence), approvals run through a staged state machine, and final
//! approval atomically moves lesson content and repoints every record that
//! references the affected slots.
//!
//! ## Architecture
//!
//! The codebase follows a modular architecture inspired by NestJS:
//!
//! ```text
//! src/
//! ├── config/           # Configuration (database, email, CORS)
//! ├── middleware/       # Actor extraction from gateway headers
//! ├── modules/          # Feature modules
//! │   ├── lessons/     # Lesson slot management
//! │   ├── exchange/    # Exchange requests, approvals, the swap engine
//! │   └── notifications/ # Notification records and approver lookup
//! └── utils/            # Shared utilities (email)
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers (routes)
//! - `service.rs`: Business logic
//! - `model.rs`: DTOs and re-exported entities
//! - `router.rs`: Axum router configuration
//!
//! The exchange module additionally carries `registry.rs` (the
//! lesson-reference handler registry) and `swap.rs` (the swap engine).
//!
//! ## Authentication
//!
//! Token verification is owned by the upstream gateway; this service reads
//! the caller's identity from `x-user-id` and `x-user-role` headers. See
//! [`middleware::actor`].
//!
//! ## API Documentation
//!
//! When the server is running, API documentation is available at:
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`

pub mod config;
pub mod docs;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;

// Re-export workspace crates for convenience
pub use slateboard_core;
pub use slateboard_models;
