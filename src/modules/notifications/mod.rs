//! Notification and approver-directory collaborators.
//!
//! Delivery (push, in-app feeds, digests) is owned by an external service;
//! the core only exposes a narrow `notify` capability that persists
//! notification records, and an explicit directory for looking up approvers.
//! Callers treat both as fire-and-forget: failures are logged, never
//! propagated.

pub mod model;
pub mod service;
