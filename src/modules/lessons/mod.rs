//! Lesson slots module.
//!
//! The timetable unit being exchanged. Slots are created at schedule
//! initialization and their content is mutated only by direct edits or by
//! the exchange engine during an approved request.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
