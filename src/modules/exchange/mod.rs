//! Lesson exchange requests: submission, two-stage approval, and the
//! reference-and-content swap executed on final approval.

pub mod controller;
pub mod model;
pub mod registry;
pub mod router;
pub mod service;
pub mod swap;
